//! Flattening of a nested remote folder tree into a file list.

use crate::models::TreeNode;
use crate::util::join_remote_path;

/// A file found while walking a folder subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFile {
    pub name: String,
    /// Path relative to the walked subtree.
    pub path: String,
    /// Containing folder; `root_folder` for files directly below the subtree.
    pub folder: String,
}

/// Walk `nodes` depth-first in pre-order and collect every file.
///
/// `base_path` prefixes emitted paths and is extended with each folder name on
/// the way down. Files found while `base_path` is empty report `root_folder`
/// as their folder. Folders without children contribute nothing.
pub fn flatten_tree(nodes: &[TreeNode], base_path: &str, root_folder: &str) -> Vec<FlatFile> {
    let mut files = Vec::new();
    collect_files(nodes, base_path, root_folder, &mut files);
    files
}

fn collect_files(nodes: &[TreeNode], base_path: &str, root_folder: &str, out: &mut Vec<FlatFile>) {
    for node in nodes {
        match node {
            TreeNode::File { name } => {
                let folder = if base_path.is_empty() {
                    root_folder
                } else {
                    base_path
                };
                out.push(FlatFile {
                    name: name.clone(),
                    path: join_remote_path(base_path, name),
                    folder: folder.to_string(),
                });
            }
            TreeNode::Folder { name, .. } => {
                let children = node.children();
                if !children.is_empty() {
                    let nested = join_remote_path(base_path, name);
                    collect_files(children, &nested, root_folder, out);
                }
            }
        }
    }
}
