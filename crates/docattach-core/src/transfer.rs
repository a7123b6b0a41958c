//! Upload, preview, and download of catalog files.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::attachments::SharedAttachments;
use crate::blob::{infer_mime_type, Blob, BlobHandle, BlobHost};
use crate::catalog::FileCatalogService;
use crate::models::{CatalogEntry, UploadFile};
use crate::remote::RemoteFileClient;
use crate::util::InFlightGuard;
use crate::{Error, Result};

/// Confirmation returned after a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub message: &'static str,
    pub file_name: String,
    /// Sub-folder the file was uploaded into.
    pub folder_path: String,
}

/// Moves files between the remote service and the local machine.
pub struct TransferClient<H: BlobHost> {
    remote: RemoteFileClient,
    catalog: Arc<FileCatalogService>,
    attachments: SharedAttachments,
    blobs: H,
    preview_release_delay: Duration,
    uploads_in_flight: AtomicUsize,
}

impl<H: BlobHost> TransferClient<H> {
    pub fn new(
        remote: RemoteFileClient,
        catalog: Arc<FileCatalogService>,
        attachments: SharedAttachments,
        blobs: H,
        preview_release_delay: Duration,
    ) -> Self {
        Self {
            remote,
            catalog,
            attachments,
            blobs,
            preview_release_delay,
            uploads_in_flight: AtomicUsize::new(0),
        }
    }

    /// Whether any upload is currently in flight.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploads_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Upload `file` into the sub-folder of the record at `original_path`.
    ///
    /// On success the catalog is refreshed and the file is marked attached.
    /// A file that was already attached stays attached; uploading never
    /// detaches it. The three steps are not atomic: a refresh failure leaves
    /// the remote write in place.
    pub async fn upload(&self, file: &UploadFile, original_path: &str) -> Result<UploadOutcome> {
        if file.name.trim().is_empty() {
            return Err(Error::MissingArgument("file"));
        }
        if original_path.trim().is_empty() {
            return Err(Error::MissingArgument("original_path"));
        }

        let context = self.catalog.resolver().resolve(original_path)?;
        let _uploading = InFlightGuard::enter(&self.uploads_in_flight);

        self.remote
            .upload_document(file, &context.upload_folder_path())
            .await?;
        tracing::info!("Uploaded {} to {}", file.name, context.folder_path);

        self.catalog.fetch_catalog(original_path).await;
        self.attachments.lock().attach(&file.name);

        Ok(UploadOutcome {
            message: UPLOAD_SUCCESS_MESSAGE,
            file_name: file.name.clone(),
            folder_path: context.folder_path,
        })
    }

    /// Open the PDF rendition of a catalog file in a viewer.
    ///
    /// The handle stays valid for the configured grace period and is released
    /// afterwards whether or not the viewer has read it.
    pub async fn preview(&self, name: &str) -> Result<BlobHandle> {
        let entry = self.lookup(name)?;
        let remote_blob = self.remote.fetch_pdf(&entry.full_path).await?;

        let file_name = pdf_file_name(&entry.display_name);
        let handle = self.blobs.acquire(Blob {
            mime_type: infer_mime_type(remote_blob.content_type.as_deref(), &file_name),
            file_name,
            bytes: remote_blob.bytes,
        })?;

        if !self.blobs.open_viewer(&handle) {
            self.blobs.release(&handle);
            return Err(Error::PopupBlocked);
        }

        self.schedule_release(handle.clone());
        Ok(handle)
    }

    /// Save a catalog file locally under its display name.
    pub async fn download(&self, name: &str) -> Result<PathBuf> {
        let entry = self.lookup(name)?;
        let remote_blob = self.remote.download(&entry.full_path).await?;

        let handle = self.blobs.acquire(Blob {
            mime_type: infer_mime_type(remote_blob.content_type.as_deref(), &entry.display_name),
            file_name: entry.display_name.clone(),
            bytes: remote_blob.bytes,
        })?;
        let saved = self.blobs.save_as(&handle, &entry.display_name);
        self.blobs.release(&handle);

        let saved = saved?;
        tracing::info!("Downloaded {} to {}", entry.full_path, saved.display());
        Ok(saved)
    }

    fn lookup(&self, name: &str) -> Result<CatalogEntry> {
        self.catalog
            .find_entry(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn schedule_release(&self, handle: BlobHandle) {
        let blobs = self.blobs.clone();
        let delay = self.preview_release_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            blobs.release(&handle);
        });
    }
}

/// File name of the PDF rendition of `display_name`.
fn pdf_file_name(display_name: &str) -> String {
    Path::new(display_name)
        .with_extension("pdf")
        .to_string_lossy()
        .into_owned()
}
