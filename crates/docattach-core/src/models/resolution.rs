//! Folder resolution result

use serde::{Deserialize, Serialize};

/// Where the files of a record live on the remote service.
///
/// Recomputed from the original document path on every call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    /// First segment of the original path.
    pub main_folder: String,
    /// Leading token of the original file name, up to the first space.
    pub file_prefix: String,
    /// Sub-folder name derived from the naming template.
    pub expected_subfolder_name: String,
    /// `main_folder/expected_subfolder_name`, shared by listing and upload.
    pub folder_path: String,
}

impl ResolutionContext {
    /// Folder path as sent to the upload endpoint (with a trailing `/`).
    #[must_use]
    pub fn upload_folder_path(&self) -> String {
        format!("{}/", self.folder_path)
    }

    /// Full remote path of a file below the resolved sub-folder.
    #[must_use]
    pub fn full_path_of(&self, relative_path: &str) -> String {
        format!("{}/{relative_path}", self.folder_path)
    }
}
