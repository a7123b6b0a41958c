//! Remote file tree model

use serde::{Deserialize, Serialize};

/// A node of the remote service's file hierarchy.
///
/// Decoded from the `list-files-tree` payload, where each node carries a
/// `type` tag of `"file"` or `"folder"`. Only folders have children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
    },
    Folder {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<Vec<TreeNode>>,
    },
}

impl TreeNode {
    /// Build a file node.
    pub fn file(name: impl Into<String>) -> Self {
        Self::File { name: name.into() }
    }

    /// Build a folder node with the given children.
    pub fn folder(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Folder {
            name: name.into(),
            children: Some(children),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name } | Self::Folder { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }

    /// Children of a folder; empty for files and folders without a child list.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Folder {
                children: Some(children),
                ..
            } => children,
            _ => &[],
        }
    }

    /// Find a direct child folder with exactly `name` that has children.
    #[must_use]
    pub fn find_populated_folder<'a>(nodes: &'a [Self], name: &str) -> Option<&'a Self> {
        nodes
            .iter()
            .find(|node| node.is_folder() && node.name() == name)
            .filter(|node| !node.children().is_empty())
    }
}
