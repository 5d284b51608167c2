//! Command Interface Layer
//!
//! [`ComposerModel`] is the single entry point for hosts. Every user intent is a [`Command`]
//! run through [`ComposerModel::execute`]; the named methods (`bold`, `backspace`, ...) are thin
//! wrappers over it.
//!
//! Commands are atomic. Each one validates its offsets, edits a copy of the document and only
//! commits when the whole edit succeeded, so an `Err` leaves document, selection and history
//! exactly as they were.
//!
//! # Example
//!
//! ```rust
//! use composer_core::{Command, ComposerModel, EditCommand, FormatCommand, InlineFormatType};
//!
//! let mut model = ComposerModel::new();
//! model.replace_text("This is bold text").unwrap();
//! model.select(8, 12).unwrap();
//! let update = model
//!     .execute(Command::Format(FormatCommand::Toggle(InlineFormatType::Bold)))
//!     .unwrap();
//!
//! assert_eq!(update.html().as_deref(), Some("This is <strong>bold</strong> text"));
//! assert_eq!(model.selection().start, 8);
//!
//! model
//!     .execute_batch(vec![
//!         Command::Select { start: 17, end: 17 },
//!         Command::Edit(EditCommand::InsertText { text: "!".to_string() }),
//!     ])
//!     .unwrap();
//! assert_eq!(model.text(), "This is bold text!");
//! ```

use std::collections::BTreeMap;

use crate::dom::{Dom, InlineFormatType, InlineStyle, LineKind, ListType, StyleSet};
use crate::error::{ComposerError, ModelError, OffsetError};
use crate::html;
use crate::offsets::{GraphemeSpan, OffsetMapper};
use crate::options::ComposerOptions;
use crate::update::{ComposerUpdate, Effect, UpdateReporter};

/// Selection range in UTF-16 code units, `start <= end`.
///
/// A collapsed selection (`start == end`) is a caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Selection start.
    pub start: usize,
    /// Selection end.
    pub end: usize,
}

impl Selection {
    /// Create a selection.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns `true` if the selection is a caret.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected UTF-16 code units.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace the whole document with plain text; `\n` starts a new line.
    ReplaceText {
        /// New content.
        text: String,
    },
    /// Replace a range with plain text.
    ReplaceTextIn {
        /// Replacement text.
        text: String,
        /// Range start (UTF-16 code units).
        start: usize,
        /// Range end (UTF-16 code units).
        end: usize,
    },
    /// Typing or paste: replace the selection with `text`, keeping the surrounding formatting.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Delete the selection, or the grapheme before the caret.
    Backspace,
    /// Delete the selection, or the grapheme after the caret.
    Delete,
    /// Delete a range.
    DeleteIn {
        /// Range start (UTF-16 code units).
        start: usize,
        /// Range end (UTF-16 code units).
        end: usize,
    },
    /// Split the current line at the selection.
    Enter,
    /// Replace the whole document with parsed HTML.
    SetContentFromHtml {
        /// HTML fragment.
        html: String,
    },
    /// Undo the last content change
    Undo,
    /// Redo the last undone change
    Redo,
}

/// Inline formatting commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    /// Toggle a format over the selection, or as pending for the next typed text.
    Toggle(InlineFormatType),
    /// Link the selection to `url`.
    SetLink {
        /// Link target; must not be empty.
        url: String,
    },
    /// Remove links from the selection, or the link around the caret.
    RemoveLinks,
}

/// Block structure commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCommand {
    /// Turn the selected lines into a list of this type, or back into paragraphs.
    ToggleList(ListType),
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Move the selection
    Select {
        /// Selection start (UTF-16 code units).
        start: usize,
        /// Selection end (UTF-16 code units).
        end: usize,
    },
    /// Inline formatting commands
    Format(FormatCommand),
    /// Block structure commands
    Block(BlockCommand),
}

#[derive(Debug, Clone)]
struct Snapshot {
    dom: Dom,
    selection: Selection,
}

#[derive(Debug)]
struct UndoRedoManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_undo: usize,
}

impl UndoRedoManager {
    fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo,
        }
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        if self.max_undo == 0 {
            return;
        }
        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snapshot);
    }

    fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }
}

/// Rich-text composer state.
///
/// Owns the document, the selection, pending formats and the undo history. Everything is
/// synchronous and exclusively owned; a model can be moved between threads but not shared.
#[derive(Debug)]
pub struct ComposerModel {
    dom: Dom,
    selection: Selection,
    /// Formats toggled at a caret, applied to the next inserted text.
    pending_formats: BTreeMap<InlineFormatType, bool>,
    undo_redo: UndoRedoManager,
    reporter: UpdateReporter,
    options: ComposerOptions,
    version: u64,
}

impl Default for ComposerModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposerModel {
    /// Create an empty composer with default options.
    pub fn new() -> Self {
        Self::with_options(ComposerOptions::default())
    }

    /// Create an empty composer.
    pub fn with_options(options: ComposerOptions) -> Self {
        Self {
            dom: Dom::new(),
            selection: Selection::default(),
            pending_formats: BTreeMap::new(),
            undo_redo: UndoRedoManager::new(options.max_undo_depth),
            reporter: UpdateReporter::default(),
            options,
            version: 0,
        }
    }

    /// Create a composer holding parsed `html`, with empty history and the caret at the end.
    pub fn from_html(html: &str) -> Result<Self, ComposerError> {
        let dom = html::parse(html)?;
        let selection = Selection::caret(dom.len());
        Ok(Self {
            reporter: UpdateReporter::seeded(&dom, selection),
            dom,
            selection,
            ..Self::new()
        })
    }

    /// Options this composer was created with.
    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    /// The document.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// The current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Flattened text of the document.
    pub fn text(&self) -> String {
        self.dom.text()
    }

    /// The document rendered as HTML.
    pub fn html(&self) -> String {
        self.dom.to_html()
    }

    /// Length of the flattened text in UTF-16 code units.
    pub fn text_len(&self) -> usize {
        self.dom.len()
    }

    /// Number of content changes since creation, undo and redo included.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The update reporter, holding what was last sent to the host.
    pub fn reporter(&self) -> &UpdateReporter {
        &self.reporter
    }

    /// Pending state of `format` at the caret, if it was toggled there.
    pub fn pending_format(&self, format: InlineFormatType) -> Option<bool> {
        self.pending_formats.get(&format).copied()
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.undo_redo.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.undo_redo.can_redo()
    }

    /// Undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_redo.undo_depth()
    }

    /// Redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.undo_redo.redo_depth()
    }

    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<ComposerUpdate, ComposerError> {
        tracing::debug!(
            ?command,
            start = self.selection.start,
            end = self.selection.end,
            "executing command"
        );

        let result = match command {
            Command::Edit(edit) => self.execute_edit(edit),
            Command::Select { start, end } => self.execute_select(start, end),
            Command::Format(format) => self.execute_format(format),
            Command::Block(block) => self.execute_block(block),
        };

        match &result {
            Ok(update) => tracing::debug!(
                start = self.selection.start,
                end = self.selection.end,
                len = self.dom.len(),
                keep = update.is_keep(),
                "command applied"
            ),
            Err(err) => tracing::warn!(%err, "command rejected"),
        }
        result
    }

    /// Batch execute commands, stopping at the first error.
    ///
    /// Commands before the failing one stay applied.
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<ComposerUpdate>, ComposerError> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            results.push(self.execute(command)?);
        }
        Ok(results)
    }

    /// Replace the whole document with plain text; the caret moves to the end.
    pub fn replace_text(&mut self, text: &str) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::ReplaceText {
            text: text.to_string(),
        }))
    }

    /// Replace `start..end` with plain text; the caret lands after it.
    pub fn replace_text_in(
        &mut self,
        text: &str,
        start: usize,
        end: usize,
    ) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::ReplaceTextIn {
            text: text.to_string(),
            start,
            end,
        }))
    }

    /// Type `text` over the selection.
    pub fn insert_text(&mut self, text: &str) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::InsertText {
            text: text.to_string(),
        }))
    }

    /// Move the selection.
    pub fn select(&mut self, start: usize, end: usize) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Select { start, end })
    }

    /// Delete backwards.
    pub fn backspace(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::Backspace))
    }

    /// Delete forwards.
    pub fn delete(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::Delete))
    }

    /// Delete `start..end`.
    pub fn delete_in(&mut self, start: usize, end: usize) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::DeleteIn { start, end }))
    }

    /// Split the line at the selection.
    pub fn enter(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::Enter))
    }

    /// Toggle bold.
    pub fn bold(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.toggle(InlineFormatType::Bold)
    }

    /// Toggle italic.
    pub fn italic(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.toggle(InlineFormatType::Italic)
    }

    /// Toggle strikethrough.
    pub fn strike_through(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.toggle(InlineFormatType::StrikeThrough)
    }

    /// Toggle underline.
    pub fn underline(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.toggle(InlineFormatType::Underline)
    }

    /// Toggle inline code.
    pub fn inline_code(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.toggle(InlineFormatType::InlineCode)
    }

    fn toggle(&mut self, format: InlineFormatType) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Format(FormatCommand::Toggle(format)))
    }

    /// Link the selection to `url`.
    pub fn set_link(&mut self, url: &str) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Format(FormatCommand::SetLink {
            url: url.to_string(),
        }))
    }

    /// Remove links from the selection.
    pub fn remove_links(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Format(FormatCommand::RemoveLinks))
    }

    /// Toggle an ordered list over the selected lines.
    pub fn ordered_list(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Block(BlockCommand::ToggleList(ListType::Ordered)))
    }

    /// Toggle an unordered list over the selected lines.
    pub fn unordered_list(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Block(BlockCommand::ToggleList(
            ListType::Unordered,
        )))
    }

    /// Undo the last content change.
    pub fn undo(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::Undo))
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::Redo))
    }

    /// Replace the whole document with parsed `html`; the caret moves to the end.
    pub fn set_content_from_html(&mut self, html: &str) -> Result<ComposerUpdate, ComposerError> {
        self.execute(Command::Edit(EditCommand::SetContentFromHtml {
            html: html.to_string(),
        }))
    }

    /// Styles active at the selection: inherited styles plus pending formats for a caret,
    /// styles shared by every selected character otherwise.
    pub fn active_styles(&self) -> Result<StyleSet, ComposerError> {
        let Selection { start, end } = self.selection;
        if start != end {
            let span = self.mapper().snap_outward(start, end)?;
            return Ok(self.dom.common_styles(span.start, span.end)?);
        }
        let mut styles = self.dom.styles_at(start)?;
        self.apply_pending(&mut styles);
        Ok(styles)
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<ComposerUpdate, ComposerError> {
        match command {
            EditCommand::ReplaceText { text } => {
                let dom = Dom::from_plain_text(&text);
                let len = dom.len();
                Ok(self.commit(dom, Selection::caret(len)))
            }
            EditCommand::ReplaceTextIn { text, start, end } => {
                self.validate(start, end)?;
                self.replace_in(&text, start, end)
            }
            EditCommand::InsertText { text } => {
                let Selection { start, end } = self.selection;
                self.replace_in(&text, start, end)
            }
            EditCommand::Backspace => self.backspace_at_selection(),
            EditCommand::Delete => self.delete_at_selection(),
            EditCommand::DeleteIn { start, end } => {
                self.validate(start, end)?;
                if start == end {
                    return Ok(self.report(Effect::Nothing));
                }
                self.remove_range(start, end)
            }
            EditCommand::Enter => self.split_at_selection(),
            EditCommand::SetContentFromHtml { html } => {
                let dom = html::parse(&html)?;
                let len = dom.len();
                Ok(self.commit(dom, Selection::caret(len)))
            }
            EditCommand::Undo => self.restore(true),
            EditCommand::Redo => self.restore(false),
        }
    }

    fn execute_select(&mut self, start: usize, end: usize) -> Result<ComposerUpdate, ComposerError> {
        self.validate(start, end)?;
        let selection = Selection::new(start, end);
        if selection != self.selection {
            self.pending_formats.clear();
            self.selection = selection;
        }
        Ok(self.report(Effect::SelectionOnly))
    }

    fn execute_format(&mut self, command: FormatCommand) -> Result<ComposerUpdate, ComposerError> {
        let Selection { start, end } = self.selection;
        match command {
            FormatCommand::Toggle(format) => {
                if start == end {
                    let active = self.active_styles()?.contains(&InlineStyle::from(format));
                    self.pending_formats.insert(format, !active);
                    tracing::debug!(?format, pending = !active, "pending format toggled");
                    return Ok(self.report(Effect::Nothing));
                }
                let span = self.mapper().snap_outward(start, end)?;
                let style = InlineStyle::from(format);
                let mut dom = self.dom.clone();
                if dom.has_style(span.start, span.end, &style)? {
                    dom.remove_style(span.start, span.end, &style)?;
                } else {
                    dom.apply_style(span.start, span.end, &style)?;
                }
                Ok(self.commit(dom, self.selection))
            }
            FormatCommand::SetLink { url } => {
                if url.is_empty() {
                    return Err(ModelError::EmptyLink.into());
                }
                if start == end {
                    return Ok(self.report(Effect::Nothing));
                }
                let span = self.mapper().snap_outward(start, end)?;
                let mut dom = self.dom.clone();
                dom.apply_style(span.start, span.end, &InlineStyle::Link(url))?;
                Ok(self.commit(dom, self.selection))
            }
            FormatCommand::RemoveLinks => {
                let span = if start == end {
                    match self.dom.link_span_at(start) {
                        Some(link) => GraphemeSpan {
                            start: link.range.start,
                            end: link.range.end,
                        },
                        None => return Ok(self.report(Effect::Nothing)),
                    }
                } else {
                    self.mapper().snap_outward(start, end)?
                };
                let mut dom = self.dom.clone();
                dom.remove_links(span.start, span.end)?;
                if dom == self.dom {
                    return Ok(self.report(Effect::Nothing));
                }
                Ok(self.commit(dom, self.selection))
            }
        }
    }

    fn execute_block(&mut self, command: BlockCommand) -> Result<ComposerUpdate, ComposerError> {
        let BlockCommand::ToggleList(list_type) = command;
        let Selection { start, end } = self.selection;
        let target = LineKind::ListItem(list_type);
        let kinds = self.dom.line_kinds(start, end)?;
        let kind = if !kinds.is_empty() && kinds.iter().all(|kind| *kind == target) {
            LineKind::Paragraph
        } else {
            target
        };
        let mut dom = self.dom.clone();
        dom.set_line_kind(start, end, kind)?;
        Ok(self.commit(dom, self.selection))
    }

    fn mapper(&self) -> OffsetMapper {
        OffsetMapper::new(&self.dom.text())
    }

    fn validate(&self, start: usize, end: usize) -> Result<(), OffsetError> {
        if start > end {
            return Err(OffsetError::InvalidRange { start, end });
        }
        let len = self.dom.len();
        if end > len {
            return Err(OffsetError::OutOfBounds { offset: end, len });
        }
        Ok(())
    }

    fn apply_pending(&self, styles: &mut StyleSet) {
        for (&format, &on) in &self.pending_formats {
            let style = InlineStyle::from(format);
            if on {
                styles.insert(style);
            } else {
                styles.remove(&style);
            }
        }
    }

    /// Styles for text replacing `span`: the first replaced character's, or the inherited
    /// styles at a caret, then pending formats.
    fn insertion_styles(&self, span: GraphemeSpan) -> Result<StyleSet, ComposerError> {
        let mut styles = if span.is_empty() {
            self.dom.styles_at(span.start)?
        } else {
            let first_end = self.mapper().next_boundary(span.start)?;
            self.dom.common_styles(span.start, first_end)?
        };
        self.apply_pending(&mut styles);
        Ok(styles)
    }

    fn replace_in(
        &mut self,
        text: &str,
        start: usize,
        end: usize,
    ) -> Result<ComposerUpdate, ComposerError> {
        let mapper = self.mapper();
        let span = if start == end {
            let at = mapper.floor(start)?;
            GraphemeSpan { start: at, end: at }
        } else {
            mapper.snap_outward(start, end)?
        };
        let styles = self.insertion_styles(span)?;
        let mut dom = self.dom.clone();
        let inserted = dom.replace_range(span.start, span.end, text, &styles)?;
        Ok(self.commit(dom, Selection::caret(span.start + inserted)))
    }

    fn remove_range(&mut self, start: usize, end: usize) -> Result<ComposerUpdate, ComposerError> {
        let span = self.mapper().snap_outward(start, end)?;
        let mut dom = self.dom.clone();
        dom.delete_range(span.start, span.end)?;
        Ok(self.commit(dom, Selection::caret(span.start)))
    }

    fn backspace_at_selection(&mut self) -> Result<ComposerUpdate, ComposerError> {
        let Selection { start, end } = self.selection;
        if start != end {
            return self.remove_range(start, end);
        }

        let line = self.dom.line_at(start)?;
        if start == line.line_start && matches!(line.kind, LineKind::ListItem(_)) {
            let mut dom = self.dom.clone();
            dom.set_line_kind(start, start, LineKind::Paragraph)?;
            return Ok(self.commit(dom, self.selection));
        }
        if start == 0 {
            return Ok(self.report(Effect::Nothing));
        }

        let mapper = self.mapper();
        let from = mapper.previous_boundary(start)?;
        let to = mapper.ceil(start)?;
        self.remove_range(from, to)
    }

    fn delete_at_selection(&mut self) -> Result<ComposerUpdate, ComposerError> {
        let Selection { start, end } = self.selection;
        if start != end {
            return self.remove_range(start, end);
        }
        if start == self.dom.len() {
            return Ok(self.report(Effect::Nothing));
        }

        let mapper = self.mapper();
        let from = mapper.floor(start)?;
        let to = mapper.next_boundary(start)?;
        self.remove_range(from, to)
    }

    fn split_at_selection(&mut self) -> Result<ComposerUpdate, ComposerError> {
        let Selection { start, end } = self.selection;
        if start == end && self.options.exit_list_on_empty_enter {
            let line = self.dom.line_at(start)?;
            if line.line_len == 0 && matches!(line.kind, LineKind::ListItem(_)) {
                let mut dom = self.dom.clone();
                dom.set_line_kind(start, start, LineKind::Paragraph)?;
                return Ok(self.commit(dom, self.selection));
            }
        }
        self.replace_in("\n", start, end)
    }

    fn restore(&mut self, undo: bool) -> Result<ComposerUpdate, ComposerError> {
        let current = Snapshot {
            dom: self.dom.clone(),
            selection: self.selection,
        };
        let restored = if undo {
            self.undo_redo.undo(current)
        } else {
            self.undo_redo.redo(current)
        };
        let Some(snapshot) = restored else {
            return Ok(self.report(Effect::Nothing));
        };

        self.dom = snapshot.dom;
        self.selection = snapshot.selection;
        self.pending_formats.clear();
        self.version += 1;
        Ok(self.report(Effect::Content))
    }

    /// Install `dom` as the new content and record the previous state in history.
    fn commit(&mut self, dom: Dom, selection: Selection) -> ComposerUpdate {
        let previous = std::mem::replace(&mut self.dom, dom);
        self.undo_redo.push(Snapshot {
            dom: previous,
            selection: self.selection,
        });
        self.selection = selection;
        self.pending_formats.clear();
        self.version += 1;
        self.report(Effect::Content)
    }

    fn report(&mut self, effect: Effect) -> ComposerUpdate {
        self.reporter.report(effect, &self.dom, self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::TextUpdate;

    const SHRUG: &str = "\u{1F937}\u{1F3FB}\u{200D}\u{2642}\u{FE0F}";

    fn model_with(text: &str) -> ComposerModel {
        let mut model = ComposerModel::new();
        model.replace_text(text).unwrap();
        model
    }

    #[test]
    fn test_replace_text_moves_caret_to_end() {
        let mut model = ComposerModel::new();
        let update = model.replace_text(&format!("{SHRUG}{SHRUG}")).unwrap();
        assert_eq!(update.selection(), Some(Selection::caret(14)));
        assert_eq!(model.text_len(), 14);
    }

    #[test]
    fn test_select_reports_keep() {
        let mut model = model_with("hello");
        let update = model.select(1, 3).unwrap();
        assert_eq!(update.text_update(), TextUpdate::Keep);
        assert_eq!(model.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let mut model = model_with("hello");
        assert_eq!(
            model.select(3, 1),
            Err(ComposerError::Offset(OffsetError::InvalidRange { start: 3, end: 1 }))
        );
        assert_eq!(
            model.select(0, 6),
            Err(ComposerError::Offset(OffsetError::OutOfBounds { offset: 6, len: 5 }))
        );
        assert_eq!(model.selection(), Selection::caret(5));
    }

    #[test]
    fn test_backspace_removes_whole_cluster() {
        let mut model = model_with(&format!("a{SHRUG}"));
        model.backspace().unwrap();
        assert_eq!(model.text(), "a");
        assert_eq!(model.selection(), Selection::caret(1));
    }

    #[test]
    fn test_backspace_inside_cluster_snaps() {
        let mut model = model_with(&format!("{SHRUG}b"));
        model.select(3, 3).unwrap();
        model.backspace().unwrap();
        assert_eq!(model.text(), "b");
        assert_eq!(model.selection(), Selection::caret(0));
    }

    #[test]
    fn test_noop_deletes_keep() {
        let mut model = model_with("ab");
        assert!(model.delete().unwrap().is_keep());
        model.select(0, 0).unwrap();
        assert!(model.backspace().unwrap().is_keep());
        assert_eq!(model.version(), 1);
        assert!(model.delete_in(1, 1).unwrap().is_keep());
    }

    #[test]
    fn test_delete_forward() {
        let mut model = model_with(&format!("{SHRUG}b"));
        model.select(0, 0).unwrap();
        model.delete().unwrap();
        assert_eq!(model.text(), "b");
        assert_eq!(model.selection(), Selection::caret(0));
    }

    #[test]
    fn test_pending_format_applies_to_typed_text() {
        let mut model = model_with("ab");
        assert!(model.bold().unwrap().is_keep());
        assert_eq!(model.pending_format(InlineFormatType::Bold), Some(true));
        model.insert_text("c").unwrap();
        assert_eq!(model.html(), "ab<strong>c</strong>");
        assert_eq!(model.pending_format(InlineFormatType::Bold), None);

        model.insert_text("d").unwrap();
        assert_eq!(model.html(), "ab<strong>cd</strong>");
    }

    #[test]
    fn test_pending_format_cleared_by_select() {
        let mut model = model_with("ab");
        model.italic().unwrap();
        model.select(1, 1).unwrap();
        model.insert_text("x").unwrap();
        assert_eq!(model.html(), "axb");
    }

    #[test]
    fn test_pending_toggle_off_inside_format() {
        let mut model = model_with("ab");
        model.select(0, 2).unwrap();
        model.bold().unwrap();
        model.select(2, 2).unwrap();
        model.bold().unwrap();
        assert_eq!(model.pending_format(InlineFormatType::Bold), Some(false));
        model.insert_text("c").unwrap();
        assert_eq!(model.html(), "<strong>ab</strong>c");
    }

    #[test]
    fn test_replace_keeps_first_replaced_style() {
        let mut model = model_with("abc");
        model.select(1, 2).unwrap();
        model.underline().unwrap();
        model.replace_text_in("XY", 1, 2).unwrap();
        assert_eq!(model.html(), "a<u>XY</u>c");
        assert_eq!(model.selection(), Selection::caret(3));
    }

    #[test]
    fn test_typing_at_link_end_does_not_extend_link() {
        let mut model = model_with("link");
        model.select(0, 4).unwrap();
        model.set_link("https://x.org").unwrap();
        model.select(4, 4).unwrap();
        model.insert_text("!").unwrap();
        assert_eq!(model.html(), "<a href=\"https://x.org\">link</a>!");

        model.select(2, 2).unwrap();
        model.insert_text("n").unwrap();
        assert_eq!(model.html(), "<a href=\"https://x.org\">linnk</a>!");
    }

    #[test]
    fn test_empty_link_is_rejected() {
        let mut model = model_with("link");
        model.select(0, 4).unwrap();
        assert_eq!(
            model.set_link(""),
            Err(ComposerError::Model(ModelError::EmptyLink))
        );
        assert_eq!(model.version(), 1);
    }

    #[test]
    fn test_remove_link_around_caret() {
        let mut model = model_with("a link here");
        model.select(2, 6).unwrap();
        model.set_link("https://x.org").unwrap();
        model.select(4, 4).unwrap();
        model.remove_links().unwrap();
        assert_eq!(model.html(), "a link here");
        assert!(model.remove_links().unwrap().is_keep());
    }

    #[test]
    fn test_enter_splits_and_exits_empty_item() {
        let mut model = model_with("item");
        model.unordered_list().unwrap();
        model.enter().unwrap();
        assert_eq!(model.html(), "<ul><li>item</li><li></li></ul>");
        assert_eq!(model.selection(), Selection::caret(5));

        model.enter().unwrap();
        assert_eq!(model.html(), "<ul><li>item</li></ul><p></p>");
        assert_eq!(model.selection(), Selection::caret(5));
    }

    #[test]
    fn test_enter_can_stay_in_list() {
        let options = ComposerOptions::default().with_exit_list_on_empty_enter(false);
        let mut model = ComposerModel::with_options(options);
        model.replace_text("item").unwrap();
        model.ordered_list().unwrap();
        model.enter().unwrap();
        model.enter().unwrap();
        assert_eq!(model.html(), "<ol><li>item</li><li></li><li></li></ol>");
    }

    #[test]
    fn test_backspace_at_item_start_lifts_line() {
        let mut model = model_with("a\nb");
        model.select(2, 3).unwrap();
        model.ordered_list().unwrap();
        assert_eq!(model.html(), "<p>a</p><ol><li>b</li></ol>");
        model.select(2, 2).unwrap();
        model.backspace().unwrap();
        assert_eq!(model.html(), "<p>a</p><p>b</p>");
        model.backspace().unwrap();
        assert_eq!(model.html(), "ab");
    }

    #[test]
    fn test_undo_depth_is_bounded() {
        let mut model = ComposerModel::with_options(ComposerOptions::default().with_max_undo_depth(2));
        for text in ["a", "b", "c"] {
            model.replace_text(text).unwrap();
        }
        assert_eq!(model.undo_depth(), 2);
        model.undo().unwrap();
        model.undo().unwrap();
        assert_eq!(model.text(), "a");
        assert!(model.undo().unwrap().is_keep());
    }

    #[test]
    fn test_failed_command_leaves_history_untouched() {
        let mut model = model_with("abc");
        let depth = model.undo_depth();
        assert!(model.set_content_from_html("<strong>x").is_err());
        assert_eq!(model.undo_depth(), depth);
        assert_eq!(model.text(), "abc");
    }

    #[test]
    fn test_from_html() {
        let model = ComposerModel::from_html("<em>hi</em>").unwrap();
        assert_eq!(model.selection(), Selection::caret(2));
        assert!(!model.can_undo());
        assert_eq!(model.version(), 0);
    }
}
