//! Catalog of files available for attachment to the current record.
//!
//! A fetch resolves the record's sub-folder, downloads the full remote tree,
//! and flattens the matching subtree. Failures never propagate: the catalog is
//! emptied and the failure is kept for display.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::flatten::flatten_tree;
use crate::models::{CatalogEntry, ResolutionContext, TreeNode};
use crate::remote::RemoteFileClient;
use crate::resolve::PathResolver;
use crate::util::InFlightGuard;
use crate::{Error, Result};

#[derive(Debug, Default)]
struct CatalogState {
    entries: Vec<CatalogEntry>,
    folder_path: Option<String>,
    last_error: Option<String>,
}

struct CatalogLoad {
    entries: Vec<CatalogEntry>,
    folder_path: String,
}

/// Fetches and publishes the available-file catalog.
///
/// Overlapping fetches are allowed. Each fetch takes a request token and only
/// the most recently issued one may publish its result.
#[derive(Debug)]
pub struct FileCatalogService {
    remote: RemoteFileClient,
    resolver: PathResolver,
    state: Mutex<CatalogState>,
    latest_request: AtomicU64,
    in_flight: AtomicUsize,
}

impl FileCatalogService {
    pub fn new(remote: RemoteFileClient, resolver: PathResolver) -> Self {
        Self {
            remote,
            resolver,
            state: Mutex::new(CatalogState::default()),
            latest_request: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Rebuild the catalog for the record stored at `original_path`.
    ///
    /// Returns the entries found; an empty list when the path cannot be
    /// resolved, the folders do not exist, or the fetch failed.
    pub async fn fetch_catalog(&self, original_path: &str) -> Vec<CatalogEntry> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        let context = match self.resolver.resolve(original_path) {
            Ok(context) => context,
            Err(error) => {
                tracing::debug!("Skipping catalog fetch: {}", error);
                self.publish(token, |state| {
                    state.entries.clear();
                    state.last_error = None;
                });
                return Vec::new();
            }
        };

        let _loading = InFlightGuard::enter(&self.in_flight);
        tracing::debug!("Fetching available files for {}", context.folder_path);

        match self.load(&context).await {
            Ok(CatalogLoad {
                entries,
                folder_path,
            }) => {
                tracing::info!("Loaded {} files from {}", entries.len(), folder_path);
                let published = entries.clone();
                self.publish(token, move |state| {
                    state.entries = published;
                    state.folder_path = Some(folder_path);
                    state.last_error = None;
                });
                entries
            }
            Err(error) => {
                tracing::warn!(
                    "Failed to load available files for {}: {}",
                    original_path,
                    error
                );
                let detail = error.to_string();
                self.publish(token, move |state| {
                    state.entries.clear();
                    state.last_error = Some(detail);
                });
                Vec::new()
            }
        }
    }

    /// Current catalog entries.
    #[must_use]
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.state().entries.clone()
    }

    /// Folder path recorded by the most recent published fetch.
    #[must_use]
    pub fn folder_path(&self) -> Option<String> {
        self.state().folder_path.clone()
    }

    /// Failure of the most recent published fetch, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<Error> {
        self.state().last_error.clone().map(Error::FetchFailure)
    }

    /// Whether any fetch is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Look up an entry by full path, falling back to the first entry with a
    /// matching display name.
    #[must_use]
    pub fn find_entry(&self, name: &str) -> Option<CatalogEntry> {
        let state = self.state();
        state
            .entries
            .iter()
            .find(|entry| entry.full_path == name)
            .or_else(|| state.entries.iter().find(|entry| entry.matches(name)))
            .cloned()
    }

    async fn load(&self, context: &ResolutionContext) -> Result<CatalogLoad> {
        let tree = self.remote.list_tree().await?;

        let Some(main_folder) = TreeNode::find_populated_folder(&tree, &context.main_folder)
        else {
            tracing::debug!("Main folder {} not found in tree", context.main_folder);
            return Ok(CatalogLoad {
                entries: Vec::new(),
                folder_path: context.main_folder.clone(),
            });
        };

        let Some(subfolder) = TreeNode::find_populated_folder(
            main_folder.children(),
            &context.expected_subfolder_name,
        ) else {
            tracing::debug!("Sub-folder {} not found in tree", context.folder_path);
            return Ok(CatalogLoad {
                entries: Vec::new(),
                folder_path: context.folder_path.clone(),
            });
        };

        Ok(CatalogLoad {
            entries: build_catalog(context, subfolder.children()),
            folder_path: context.folder_path.clone(),
        })
    }

    fn publish(&self, token: u64, apply: impl FnOnce(&mut CatalogState)) {
        let mut state = self.state();
        // Checked under the state lock so a newer fetch cannot publish in between.
        if self.latest_request.load(Ordering::SeqCst) != token {
            tracing::debug!("Discarding stale catalog result (request {})", token);
            return;
        }
        apply(&mut *state);
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Map the children of the resolved sub-folder to catalog entries.
pub fn build_catalog(context: &ResolutionContext, nodes: &[TreeNode]) -> Vec<CatalogEntry> {
    let entries: Vec<CatalogEntry> = flatten_tree(nodes, "", &context.expected_subfolder_name)
        .into_iter()
        .map(|file| CatalogEntry {
            full_path: context.full_path_of(&file.path),
            display_name: file.name,
            folder: file.folder,
        })
        .collect();

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.display_name.as_str()) {
            tracing::warn!(
                "Duplicate file name {} in {}; lookups by name use the first match",
                entry.display_name,
                context.folder_path
            );
        }
    }

    entries
}
