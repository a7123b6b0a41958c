//! Attached-file bookkeeping for the current record.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Ordered list of file names attached to the current record.
///
/// Insertion order is preserved so the newline-separated export round-trips
/// through [`AttachmentStore::import_from_str`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentStore {
    names: Vec<String>,
}

impl AttachmentStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Detach `name` if attached, otherwise append it.
    ///
    /// Detaching removes every copy an import may have left behind. Returns
    /// whether the name is attached afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.names.retain(|existing| existing != name);
            false
        } else {
            self.names.push(name.to_string());
            true
        }
    }

    /// Append `name` unless it is already attached.
    ///
    /// Returns `true` when the name was newly added.
    pub fn attach(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Replace the whole set with names parsed from `text`.
    ///
    /// Names are separated by commas or newlines; each piece is trimmed and
    /// empty pieces are dropped.
    pub fn import_from_str(&mut self, text: &str) {
        self.names = parse_attachment_list(text);
    }

    /// Newline-separated list of attached names.
    #[must_use]
    pub fn export_string(&self) -> String {
        self.names.join("\n")
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Display for AttachmentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.export_string())
    }
}

impl<S: Into<String>> FromIterator<S> for AttachmentStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Attachment store shared between a session and its transfer client.
#[derive(Debug, Clone, Default)]
pub struct SharedAttachments(Arc<Mutex<AttachmentStore>>);

impl SharedAttachments {
    pub fn lock(&self) -> MutexGuard<'_, AttachmentStore> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current attachment list.
    #[must_use]
    pub fn snapshot(&self) -> AttachmentStore {
        self.lock().clone()
    }
}

/// Split a comma/newline separated attachment list.
pub fn parse_attachment_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toggle_appends_then_removes() {
        let mut store = AttachmentStore::new();

        assert!(store.toggle("a.pdf"));
        assert!(store.toggle("b.pdf"));
        assert_eq!(store.names(), ["a.pdf", "b.pdf"]);

        assert!(!store.toggle("a.pdf"));
        assert_eq!(store.names(), ["b.pdf"]);
    }

    #[test]
    fn toggle_twice_restores_original_set() {
        let original: AttachmentStore = ["x", "y", "z"].into_iter().collect();

        for name in ["y", "new", ""] {
            let mut store = original.clone();
            store.toggle(name);
            store.toggle(name);
            assert_eq!(
                store.iter().collect::<BTreeSet<_>>(),
                original.iter().collect::<BTreeSet<_>>()
            );
            assert_eq!(store.len(), original.len());
        }
    }

    #[test]
    fn toggle_twice_on_absent_name_is_identity() {
        let original: AttachmentStore = ["x", "y"].into_iter().collect();
        let mut store = original.clone();
        store.toggle("new");
        store.toggle("new");
        assert_eq!(store, original);
    }

    #[test]
    fn toggle_detaches_every_imported_copy() {
        let mut store = AttachmentStore::new();
        store.import_from_str("a.pdf,a.pdf,b.pdf");
        let original: BTreeSet<String> = store.iter().map(ToString::to_string).collect();

        assert!(!store.toggle("a.pdf"));
        assert_eq!(store.names(), ["b.pdf"]);

        assert!(store.toggle("a.pdf"));
        assert_eq!(store.names(), ["b.pdf", "a.pdf"]);
        assert_eq!(
            store.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            original
        );
    }

    #[test]
    fn import_splits_on_commas_and_newlines_and_trims() {
        let mut store: AttachmentStore = ["stale"].into_iter().collect();
        store.import_from_str(" a.pdf ,b.pdf\n\n c d.docx \r\n,, ");

        assert_eq!(store.names(), ["a.pdf", "b.pdf", "c d.docx"]);
        assert!(!store.contains("stale"));
    }

    #[test]
    fn import_of_empty_text_clears_the_set() {
        let mut store: AttachmentStore = ["a"].into_iter().collect();
        store.import_from_str("");
        assert!(store.is_empty());
    }

    #[test]
    fn export_joins_with_newlines() {
        let store: AttachmentStore = ["a", "b"].into_iter().collect();
        assert_eq!(store.export_string(), "a\nb");
        assert_eq!(store.to_string(), "a\nb");
        assert_eq!(AttachmentStore::new().export_string(), "");
    }

    #[test]
    fn export_then_import_round_trips() {
        let samples: [&[&str]; 4] = [
            &[],
            &["only.pdf"],
            &["PG-01 Manual.pdf", "annex b.xlsx", "z.txt"],
            &["dup", "dup", "other"],
        ];

        for names in samples {
            let store: AttachmentStore = names.iter().copied().collect();
            let mut restored = AttachmentStore::new();
            restored.import_from_str(&store.export_string());
            assert_eq!(restored, store);
        }
    }

    #[test]
    fn attach_does_not_duplicate() {
        let mut store = AttachmentStore::new();
        assert!(store.attach("a"));
        assert!(!store.attach("a"));
        assert_eq!(store.names(), ["a"]);
    }

    #[test]
    fn shared_attachments_see_each_others_changes() {
        let shared = SharedAttachments::default();
        let other = shared.clone();

        shared.lock().toggle("a.pdf");
        assert!(other.snapshot().contains("a.pdf"));
    }

    #[test]
    fn clear_empties_the_set() {
        let mut store: AttachmentStore = ["a", "b"].into_iter().collect();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }
}
