//! Data models for docattach

mod catalog;
mod resolution;
mod tree;
mod upload;

pub use catalog::CatalogEntry;
pub use resolution::ResolutionContext;
pub use tree::TreeNode;
pub use upload::UploadFile;
