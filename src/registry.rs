//! Path-addressable registry of built widgets and pending stubs.
//!
//! Paths join node names with [`DELIMITER`]: `panel!btn` is the node `btn`
//! declared under `panel`. The empty path is the implicit root.

use indexmap::IndexMap;

use crate::error::RegistryError;
use crate::resolve::ResolvedCall;
use crate::widget::WidgetRef;

/// Separator between path segments. Reserved: node names must not contain it.
pub const DELIMITER: char = '!';

/// `parent!name`, or just `name` under the root.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}{DELIMITER}{name}")
    }
}

/// The parent path of `path` (empty for top-level nodes).
pub fn parent_of(path: &str) -> &str {
    path.rsplit_once(DELIMITER).map_or("", |(parent, _)| parent)
}

/// The last segment of `path`.
pub fn name_of(path: &str) -> &str {
    path.rsplit_once(DELIMITER).map_or(path, |(_, name)| name)
}

// ---------------------------------------------------------------------------
// IntoPath
// ---------------------------------------------------------------------------

/// Anything that names a path: a bang-joined string or a sequence of
/// segments.
pub trait IntoPath {
    fn into_path(self) -> String;
}

impl IntoPath for &str {
    fn into_path(self) -> String {
        self.to_owned()
    }
}

impl IntoPath for String {
    fn into_path(self) -> String {
        self
    }
}

impl IntoPath for &String {
    fn into_path(self) -> String {
        self.clone()
    }
}

impl IntoPath for &[&str] {
    fn into_path(self) -> String {
        let separator = DELIMITER.to_string();
        self.join(separator.as_str())
    }
}

impl<const N: usize> IntoPath for [&str; N] {
    fn into_path(self) -> String {
        self.as_slice().into_path()
    }
}

impl IntoPath for Vec<&str> {
    fn into_path(self) -> String {
        self.as_slice().into_path()
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// Placeholder for a node declared with the deferred marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Stub {
    /// The node's layout directive, resolved when the stub was recorded.
    pub layout: Option<ResolvedCall>,
}

#[derive(Debug, Clone)]
pub enum Entry {
    Pending(Stub),
    Built(WidgetRef),
}

impl Entry {
    /// The widget, if this entry is built.
    pub fn widget(&self) -> Option<&WidgetRef> {
        match self {
            Entry::Built(widget) => Some(widget),
            Entry::Pending(_) => None,
        }
    }

    /// Whether this entry is a stub waiting for `build_stub`.
    pub fn is_pending(&self) -> bool {
        matches!(self, Entry::Pending(_))
    }
}

impl From<WidgetRef> for Entry {
    fn from(widget: WidgetRef) -> Self {
        Entry::Built(widget)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Path to entry, in the order entries were first recorded.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry at `path`, pending or built.
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// Record an entry, returning the one it replaced.
    ///
    /// Replacing keeps the original position in iteration order.
    pub fn insert(&mut self, path: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(path.into(), entry.into())
    }

    /// Whether anything is recorded at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// The built widget at `path`.
    pub fn widget(&self, path: &str) -> Result<WidgetRef, RegistryError> {
        match self.entries.get(path) {
            Some(Entry::Built(widget)) => Ok(widget.clone()),
            Some(Entry::Pending(_)) => Err(RegistryError::Pending(path.to_owned())),
            None => Err(RegistryError::Missing(path.to_owned())),
        }
    }

    /// Recorded paths in the order they were first inserted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(path, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::basic::Basic;

    #[test]
    fn join_and_split() {
        assert_eq!(join("", "panel"), "panel");
        assert_eq!(join("panel", "btn"), "panel!btn");
        assert_eq!(parent_of("panel!btn"), "panel");
        assert_eq!(parent_of("panel"), "");
        assert_eq!(name_of("a!b!c"), "c");
        assert_eq!(name_of("a"), "a");
    }

    #[test]
    fn paths_from_segments() {
        assert_eq!(["a", "b", "c"].into_path(), "a!b!c");
        assert_eq!(vec!["a"].into_path(), "a");
        assert_eq!("x!y".into_path(), "x!y");
    }

    #[test]
    fn widget_lookup_errors() {
        let mut registry = Registry::new();
        registry.insert("stub", Entry::Pending(Stub { layout: None }));
        assert_eq!(
            registry.widget("stub").unwrap_err(),
            RegistryError::Pending("stub".into())
        );
        assert_eq!(
            registry.widget("nope").unwrap_err(),
            RegistryError::Missing("nope".into())
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut registry = Registry::new();
        registry.insert("a", WidgetRef::new(Basic::frame()));
        registry.insert("b", WidgetRef::new(Basic::frame()));
        let replaced = registry.insert("a", Entry::Pending(Stub { layout: None }));
        assert!(replaced.unwrap().widget().is_some());
        let order: Vec<_> = registry.paths().collect();
        assert_eq!(order, vec!["a", "b"]);
        assert!(registry.get("a").unwrap().is_pending());
        assert_eq!(registry.len(), 2);
    }
}
