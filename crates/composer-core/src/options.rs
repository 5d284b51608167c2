//! Composer configuration.

/// Settings fixed for the lifetime of a [`ComposerModel`](crate::ComposerModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerOptions {
    /// Maximum number of undo steps kept; the oldest step is dropped beyond it.
    pub max_undo_depth: usize,
    /// Whether `enter` on an empty list item leaves the list instead of adding another item.
    pub exit_list_on_empty_enter: bool,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            max_undo_depth: 100,
            exit_list_on_empty_enter: true,
        }
    }
}

impl ComposerOptions {
    /// Set [`max_undo_depth`](Self::max_undo_depth).
    pub fn with_max_undo_depth(mut self, depth: usize) -> Self {
        self.max_undo_depth = depth;
        self
    }

    /// Set [`exit_list_on_empty_enter`](Self::exit_list_on_empty_enter).
    pub fn with_exit_list_on_empty_enter(mut self, exit: bool) -> Self {
        self.exit_list_on_empty_enter = exit;
        self
    }
}
