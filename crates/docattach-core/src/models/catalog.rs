//! Catalog entry model

use serde::{Deserialize, Serialize};

/// A file available for attachment in the resolved sub-folder.
///
/// `full_path` is unique within a catalog; `display_name` is only a label and
/// can repeat when nested folders hold files with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// File name shown to the user.
    pub display_name: String,
    /// Path of the file on the remote service.
    pub full_path: String,
    /// Folder containing the file, relative to the resolved sub-folder.
    pub folder: String,
}

impl CatalogEntry {
    /// Whether `name` identifies this entry by full path or display name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.full_path == name || self.display_name == name
    }
}
