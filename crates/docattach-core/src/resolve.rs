//! Mapping of an original document path onto its remote attachment folder.
//!
//! A record stored at `Main/…/PREFIX rest of name.ext` keeps its attachments
//! in `Main/<template with PREFIX>`, where the default template is
//! `Informação Documentada - Procedimento {prefix}`.

use crate::models::ResolutionContext;
use crate::{Error, Result};

const PREFIX_PLACEHOLDER: &str = "{prefix}";

/// Default sub-folder naming rule.
pub const DEFAULT_SUBFOLDER_TEMPLATE: &str = "Informação Documentada - Procedimento {prefix}";

/// Sub-folder naming rule with a single `{prefix}` placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubfolderTemplate(String);

impl SubfolderTemplate {
    /// Parse a template, requiring exactly one `{prefix}` placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.matches(PREFIX_PLACEHOLDER).count() {
            1 => Ok(Self(template)),
            0 => Err(Error::InvalidInput(format!(
                "Sub-folder template must contain {PREFIX_PLACEHOLDER}: {template}"
            ))),
            _ => Err(Error::InvalidInput(format!(
                "Sub-folder template must contain {PREFIX_PLACEHOLDER} only once: {template}"
            ))),
        }
    }

    /// Render the sub-folder name for a file prefix.
    #[must_use]
    pub fn render(&self, prefix: &str) -> String {
        self.0.replacen(PREFIX_PLACEHOLDER, prefix, 1)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubfolderTemplate {
    fn default() -> Self {
        Self(DEFAULT_SUBFOLDER_TEMPLATE.to_string())
    }
}

/// Resolves original document paths into remote folder locations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathResolver {
    template: SubfolderTemplate,
}

impl PathResolver {
    #[must_use]
    pub const fn new(template: SubfolderTemplate) -> Self {
        Self { template }
    }

    #[must_use]
    pub const fn template(&self) -> &SubfolderTemplate {
        &self.template
    }

    /// Derive the attachment folder for `original_path`.
    ///
    /// Fails with [`Error::InvalidPath`] when the path has fewer than two
    /// `/`-separated segments.
    pub fn resolve(&self, original_path: &str) -> Result<ResolutionContext> {
        let segments: Vec<&str> = original_path.split('/').collect();
        let [main_folder, .., current_file_name] = segments.as_slice() else {
            return Err(Error::InvalidPath(original_path.to_string()));
        };

        let file_prefix = current_file_name
            .split_once(' ')
            .map_or(*current_file_name, |(prefix, _)| prefix);
        let expected_subfolder_name = self.template.render(file_prefix);
        let folder_path = format!("{main_folder}/{expected_subfolder_name}");

        Ok(ResolutionContext {
            main_folder: (*main_folder).to_string(),
            file_prefix: file_prefix.to_string(),
            expected_subfolder_name,
            folder_path,
        })
    }
}

/// Resolve `original_path` with the default naming template.
pub fn resolve(original_path: &str) -> Result<ResolutionContext> {
    PathResolver::default().resolve(original_path)
}
