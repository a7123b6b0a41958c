//! Transient local handles for previewed and downloaded files.
//!
//! A fetched blob is acquired into a [`BlobHandle`], handed to a viewer or a
//! save target, and released afterwards. Hosts decide what a handle is; the
//! bundled [`FsBlobHost`] stages blobs as files on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use crate::Result;

/// Unique identifier for an acquired blob, using UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobHandleId(Uuid);

impl BlobHandleId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BlobHandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobHandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bytes about to be exposed locally.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Blob {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Blob")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Reference to an acquired blob. Must be passed to [`BlobHost::release`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHandle {
    pub id: BlobHandleId,
    pub file_name: String,
    pub mime_type: String,
    /// Host-specific location of the blob (a staged file for [`FsBlobHost`]).
    pub location: PathBuf,
}

/// Platform glue for exposing fetched blobs to the user.
pub trait BlobHost: Clone + Send + Sync + 'static {
    /// Make `blob` locally addressable.
    fn acquire(&self, blob: Blob) -> Result<BlobHandle>;

    /// Open a viewing surface for `handle`; `false` when it could not open.
    fn open_viewer(&self, handle: &BlobHandle) -> bool;

    /// Save the blob under `file_name` in the host's download target.
    fn save_as(&self, handle: &BlobHandle, file_name: &str) -> Result<PathBuf>;

    /// Reclaim the resources held by `handle`.
    fn release(&self, handle: &BlobHandle);
}

type ViewerFn = dyn Fn(&Path) -> bool + Send + Sync;

/// Filesystem-backed host: blobs are staged in `staging_dir`, saves are
/// copied into `downloads_dir`, and viewing is delegated to an opener.
#[derive(Clone)]
pub struct FsBlobHost {
    staging_dir: PathBuf,
    downloads_dir: PathBuf,
    viewer: Option<Arc<ViewerFn>>,
}

impl fmt::Debug for FsBlobHost {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FsBlobHost")
            .field("staging_dir", &self.staging_dir)
            .field("downloads_dir", &self.downloads_dir)
            .field("viewer", &self.viewer.is_some())
            .finish()
    }
}

impl FsBlobHost {
    /// Host without a viewer; previews report a blocked viewing surface.
    pub fn new(staging_dir: impl Into<PathBuf>, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            downloads_dir: downloads_dir.into(),
            viewer: None,
        }
    }

    /// Host staging blobs below the system temp directory.
    pub fn in_temp_dir(downloads_dir: impl Into<PathBuf>) -> Self {
        Self::new(std::env::temp_dir().join("docattach-blobs"), downloads_dir)
    }

    /// Use `viewer` to open staged files; it returns whether a viewer opened.
    #[must_use]
    pub fn with_viewer(mut self, viewer: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.viewer = Some(Arc::new(viewer));
        self
    }

    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    #[must_use]
    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }
}

impl BlobHost for FsBlobHost {
    fn acquire(&self, blob: Blob) -> Result<BlobHandle> {
        fs::create_dir_all(&self.staging_dir)?;
        let id = BlobHandleId::new();
        let location = self
            .staging_dir
            .join(format!("{id}-{}", sanitize_file_name(&blob.file_name)));
        fs::write(&location, &blob.bytes)?;

        Ok(BlobHandle {
            id,
            file_name: blob.file_name,
            mime_type: blob.mime_type,
            location,
        })
    }

    fn open_viewer(&self, handle: &BlobHandle) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|viewer| viewer(handle.location.as_path()))
    }

    fn save_as(&self, handle: &BlobHandle, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.downloads_dir)?;
        let target = self.downloads_dir.join(sanitize_file_name(file_name));
        fs::copy(&handle.location, &target)?;
        Ok(target)
    }

    fn release(&self, handle: &BlobHandle) {
        match fs::remove_file(&handle.location) {
            Ok(()) => tracing::debug!("Released blob {}", handle.id),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => tracing::warn!(
                "Failed to release blob {} at {}: {}",
                handle.id,
                handle.location.display(),
                error
            ),
        }
    }
}

/// Pick a MIME type for a blob.
///
/// Uses `content_type` unless it is missing or the generic octet-stream type,
/// in which case the type is guessed from `file_name`.
#[must_use]
pub fn infer_mime_type(content_type: Option<&str>, file_name: &str) -> String {
    if let Some(content_type) = content_type {
        let trimmed = content_type.trim();
        if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("application/octet-stream") {
            return trimmed.to_string();
        }
    }

    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Reduce a remote file name to a single safe path component.
fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = last
        .chars()
        .map(|ch| if ch.is_control() || ch == ':' { '_' } else { ch })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "file".to_string(),
        _ => cleaned,
    }
}
