//! Composer State Interface
//!
//! Read-only views of a [`ComposerModel`] for hosts: a snapshot of content and selection, the
//! state of every toolbar action, and a textual dump for debugging.
//!
//! # Example
//!
//! ```rust
//! use composer_core::{ActionState, ComposerAction, ComposerModel};
//!
//! let mut model = ComposerModel::new();
//! model.replace_text("hello").unwrap();
//! model.select(0, 5).unwrap();
//! model.bold().unwrap();
//!
//! let state = model.state();
//! assert_eq!(state.html, "<strong>hello</strong>");
//! assert!(state.can_undo);
//!
//! let actions = model.action_states();
//! assert_eq!(actions[&ComposerAction::Bold], ActionState::Reversed);
//! assert_eq!(actions[&ComposerAction::Redo], ActionState::Disabled);
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::ComposerModel;
use crate::dom::{InlineFormatType, InlineStyle, LineKind, ListType};

/// Snapshot of the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerState {
    /// Rendered HTML
    pub html: String,
    /// Flattened text
    pub text: String,
    /// Selection start (UTF-16 code units)
    pub start: usize,
    /// Selection end (UTF-16 code units)
    pub end: usize,
    /// Content version (incremented after each content change)
    pub version: u64,
    /// Can undo
    pub can_undo: bool,
    /// Can redo
    pub can_redo: bool,
}

/// Actions a host can offer in its toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComposerAction {
    /// Toggle bold.
    Bold,
    /// Toggle italic.
    Italic,
    /// Toggle strikethrough.
    StrikeThrough,
    /// Toggle underline.
    Underline,
    /// Toggle inline code.
    InlineCode,
    /// Set or edit a link.
    Link,
    /// Toggle an ordered list.
    OrderedList,
    /// Toggle an unordered list.
    UnorderedList,
    /// Undo.
    Undo,
    /// Redo.
    Redo,
}

impl ComposerAction {
    /// Every action.
    pub const ALL: [ComposerAction; 10] = [
        ComposerAction::Bold,
        ComposerAction::Italic,
        ComposerAction::StrikeThrough,
        ComposerAction::Underline,
        ComposerAction::InlineCode,
        ComposerAction::Link,
        ComposerAction::OrderedList,
        ComposerAction::UnorderedList,
        ComposerAction::Undo,
        ComposerAction::Redo,
    ];

    fn format(self) -> Option<InlineFormatType> {
        match self {
            ComposerAction::Bold => Some(InlineFormatType::Bold),
            ComposerAction::Italic => Some(InlineFormatType::Italic),
            ComposerAction::StrikeThrough => Some(InlineFormatType::StrikeThrough),
            ComposerAction::Underline => Some(InlineFormatType::Underline),
            ComposerAction::InlineCode => Some(InlineFormatType::InlineCode),
            _ => None,
        }
    }
}

/// State of an action at the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionState {
    /// The action can be applied.
    Enabled,
    /// The style or list is already active; applying the action removes it.
    Reversed,
    /// The action would do nothing.
    Disabled,
}

impl ComposerModel {
    /// Snapshot of content, selection and history.
    pub fn state(&self) -> ComposerState {
        let selection = self.selection();
        ComposerState {
            html: self.html(),
            text: self.text(),
            start: selection.start,
            end: selection.end,
            version: self.version(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// State of every [`ComposerAction`] at the current selection.
    pub fn action_states(&self) -> BTreeMap<ComposerAction, ActionState> {
        let selection = self.selection();
        let styles = self.active_styles().unwrap_or_default();
        let kinds = self
            .dom()
            .line_kinds(selection.start, selection.end)
            .unwrap_or_default();
        let all_lines = |list_type: ListType| {
            !kinds.is_empty()
                && kinds
                    .iter()
                    .all(|kind| *kind == LineKind::ListItem(list_type))
        };
        let toggle = |active: bool| {
            if active {
                ActionState::Reversed
            } else {
                ActionState::Enabled
            }
        };
        let available = |enabled: bool| {
            if enabled {
                ActionState::Enabled
            } else {
                ActionState::Disabled
            }
        };

        ComposerAction::ALL
            .into_iter()
            .map(|action| {
                let state = match action {
                    ComposerAction::Link => {
                        if styles.iter().any(InlineStyle::is_link)
                            || (selection.is_collapsed()
                                && self.dom().link_span_at(selection.start).is_some())
                        {
                            ActionState::Reversed
                        } else {
                            available(!selection.is_collapsed())
                        }
                    }
                    ComposerAction::OrderedList => toggle(all_lines(ListType::Ordered)),
                    ComposerAction::UnorderedList => toggle(all_lines(ListType::Unordered)),
                    ComposerAction::Undo => available(self.can_undo()),
                    ComposerAction::Redo => available(self.can_redo()),
                    format => toggle(
                        format
                            .format()
                            .is_some_and(|format| styles.contains(&InlineStyle::from(format))),
                    ),
                };
                (action, state)
            })
            .collect()
    }

    /// Human-readable dump of the selection and the document tree.
    pub fn dump_state(&self) -> String {
        let selection = self.selection();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "selection: {}..{} (version {})",
            selection.start,
            selection.end,
            self.version()
        );
        out.push_str(&self.dom().to_tree_string());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_state_snapshot() {
        let mut model = ComposerModel::new();
        model.replace_text("a😄").unwrap();
        assert_eq!(
            model.state(),
            ComposerState {
                html: "a😄".to_string(),
                text: "a😄".to_string(),
                start: 3,
                end: 3,
                version: 1,
                can_undo: true,
                can_redo: false,
            }
        );
    }

    #[test]
    fn test_initial_action_states() {
        let model = ComposerModel::new();
        let actions = model.action_states();
        assert_eq!(actions.len(), ComposerAction::ALL.len());
        assert_eq!(actions[&ComposerAction::Bold], ActionState::Enabled);
        assert_eq!(actions[&ComposerAction::Link], ActionState::Disabled);
        assert_eq!(actions[&ComposerAction::OrderedList], ActionState::Enabled);
        assert_eq!(actions[&ComposerAction::Undo], ActionState::Disabled);
        assert_eq!(actions[&ComposerAction::Redo], ActionState::Disabled);
    }

    #[test]
    fn test_pending_format_reverses_action() {
        let mut model = ComposerModel::new();
        model.italic().unwrap();
        assert_eq!(
            model.action_states()[&ComposerAction::Italic],
            ActionState::Reversed
        );
    }

    #[test]
    fn test_list_and_link_states() {
        let mut model = ComposerModel::new();
        model.replace_text("one\ntwo").unwrap();
        model.select(0, 7).unwrap();
        model.unordered_list().unwrap();
        model.set_link("https://x.org").unwrap();
        let actions = model.action_states();
        assert_eq!(actions[&ComposerAction::UnorderedList], ActionState::Reversed);
        assert_eq!(actions[&ComposerAction::OrderedList], ActionState::Enabled);
        assert_eq!(actions[&ComposerAction::Link], ActionState::Reversed);
    }

    #[test]
    fn test_dump_state() {
        let mut model = ComposerModel::new();
        model.replace_text("hi").unwrap();
        model.select(0, 1).unwrap();
        assert_eq!(
            model.dump_state(),
            "selection: 0..1 (version 1)\n<root>\n  \"hi\"\n"
        );
    }
}
