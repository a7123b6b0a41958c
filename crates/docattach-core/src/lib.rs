//! docattach-core - Core library for docattach
//!
//! Resolves the remote folder that holds a record's attachments, lists the
//! files found there, tracks which of them are attached, and moves files
//! between the remote file service and the local machine.

pub mod attachments;
pub mod blob;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flatten;
pub mod models;
pub mod remote;
pub mod resolve;
pub mod session;
pub mod transfer;
pub mod util;

pub use attachments::AttachmentStore;
pub use blob::{BlobHost, FsBlobHost};
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use models::{CatalogEntry, ResolutionContext, TreeNode, UploadFile};
pub use resolve::{resolve, PathResolver};
pub use session::AttachmentSession;
