//! Builder configuration.

/// Settings for [`Fire`](crate::fire::Fire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireConfig {
    /// How many levels of children an error snapshot shows before
    /// collapsing them to `{...}`.
    pub snapshot_depth: usize,
    /// Constructor name used for scrollbar companions.
    pub scrollbar: String,
    /// Reject node names that contain the path delimiter.
    pub strict_names: bool,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            snapshot_depth: 3,
            scrollbar: "Scrollbar".to_owned(),
            strict_names: true,
        }
    }
}

impl FireConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot depth (builder).
    pub fn with_snapshot_depth(mut self, depth: usize) -> Self {
        self.snapshot_depth = depth;
        self
    }

    /// Set the scrollbar constructor name (builder).
    pub fn with_scrollbar(mut self, name: impl Into<String>) -> Self {
        self.scrollbar = name.into();
        self
    }

    /// Toggle node name checking (builder).
    pub fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FireConfig::new();
        assert_eq!(config.snapshot_depth, 3);
        assert_eq!(config.scrollbar, "Scrollbar");
        assert!(config.strict_names);
    }

    #[test]
    fn builder_chain() {
        let config = FireConfig::new()
            .with_snapshot_depth(1)
            .with_scrollbar("AutoScrollbar")
            .with_strict_names(false);
        assert_eq!(config.snapshot_depth, 1);
        assert_eq!(config.scrollbar, "AutoScrollbar");
        assert!(!config.strict_names);
    }
}
