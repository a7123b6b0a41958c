//! Per-record attachment session.
//!
//! Owns the catalog, the attachment list, and the transfer client for one
//! document. Create one per opened record and drop it when the record closes.

use std::path::PathBuf;
use std::sync::Arc;

use crate::attachments::SharedAttachments;
use crate::blob::{BlobHandle, BlobHost};
use crate::catalog::FileCatalogService;
use crate::config::ServiceConfig;
use crate::models::{CatalogEntry, UploadFile};
use crate::remote::RemoteFileClient;
use crate::resolve::PathResolver;
use crate::transfer::{TransferClient, UploadOutcome};
use crate::{Error, Result};

/// Attachment state and operations exposed to a UI layer.
pub struct AttachmentSession<H: BlobHost> {
    catalog: Arc<FileCatalogService>,
    attachments: SharedAttachments,
    transfers: TransferClient<H>,
}

impl<H: BlobHost> AttachmentSession<H> {
    /// Build a session against the service described by `config`.
    pub fn new(config: &ServiceConfig, blobs: H) -> Result<Self> {
        let remote = RemoteFileClient::from_config(config)?;
        let resolver = PathResolver::new(config.subfolder_template.clone());
        let catalog = Arc::new(FileCatalogService::new(remote.clone(), resolver));
        let attachments = SharedAttachments::default();
        let transfers = TransferClient::new(
            remote,
            Arc::clone(&catalog),
            attachments.clone(),
            blobs,
            config.preview_release_delay,
        );

        Ok(Self {
            catalog,
            attachments,
            transfers,
        })
    }

    /// Build a session from `DOCATTACH_*` environment variables.
    pub fn from_env(blobs: H) -> Result<Self> {
        Self::new(&ServiceConfig::from_env()?, blobs)
    }

    /// Names currently attached to the record, in attachment order.
    #[must_use]
    pub fn attachments(&self) -> Vec<String> {
        self.attachments.lock().names().to_vec()
    }

    #[must_use]
    pub fn is_attached(&self, name: &str) -> bool {
        self.attachments.lock().contains(name)
    }

    /// Files available in the record's sub-folder.
    #[must_use]
    pub fn available_files(&self) -> Vec<CatalogEntry> {
        self.catalog.entries()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading()
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.transfers.is_uploading()
    }

    /// Remote folder resolved by the last catalog fetch.
    #[must_use]
    pub fn folder_path(&self) -> Option<String> {
        self.catalog.folder_path()
    }

    /// Why the last catalog fetch came back empty, if it failed.
    #[must_use]
    pub fn last_fetch_error(&self) -> Option<Error> {
        self.catalog.last_error()
    }

    pub async fn fetch_available_files(&self, original_path: &str) -> Vec<CatalogEntry> {
        self.catalog.fetch_catalog(original_path).await
    }

    pub async fn upload_file(
        &self,
        file: &UploadFile,
        original_path: &str,
    ) -> Result<UploadOutcome> {
        self.transfers.upload(file, original_path).await
    }

    /// Attach or detach `name`; returns whether it is attached afterwards.
    pub fn toggle_attachment(&self, name: &str) -> bool {
        self.attachments.lock().toggle(name)
    }

    /// Replace the attachment list with a comma/newline separated list.
    pub fn set_attachments_from_string(&self, text: &str) {
        self.attachments.lock().import_from_str(text);
    }

    /// Newline-separated attachment list, suitable for storing on the record.
    #[must_use]
    pub fn get_attachments_as_string(&self) -> String {
        self.attachments.lock().export_string()
    }

    pub async fn preview_file(&self, name: &str) -> Result<BlobHandle> {
        self.transfers.preview(name).await
    }

    pub async fn download_file(&self, name: &str) -> Result<PathBuf> {
        self.transfers.download(name).await
    }

    pub fn clear_attachments(&self) {
        self.attachments.lock().clear();
    }
}

#[cfg(test)]
mod tests;
