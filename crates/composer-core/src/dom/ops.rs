//! Structural mutation primitives.
//!
//! Every primitive takes UTF-16 offsets into the flattened text, works on the line projection,
//! and only replaces the tree once the whole edit succeeded, so a failing call leaves the
//! document untouched.

use super::lines::{Line, LineKind, Run, StyleSet};
use super::node::InlineStyle;
use super::Dom;
use crate::error::ModelError;
use crate::offsets::utf16_len;

/// Where an offset lands in the line structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePosition {
    /// Index of the line.
    pub index: usize,
    /// Flattened offset of the line's first character.
    pub line_start: usize,
    /// Length of the line (UTF-16 code units).
    pub line_len: usize,
    /// Block kind of the line.
    pub kind: LineKind,
}

/// Line index and local offset of a flattened offset; offsets at a separator belong to the
/// line before it.
fn locate(lines: &[Line], offset: usize) -> Option<(usize, usize)> {
    let mut line_start = 0;
    for (index, line) in lines.iter().enumerate() {
        let line_end = line_start + line.len();
        if offset <= line_end {
            return Some((index, offset.checked_sub(line_start)?));
        }
        line_start = line_end + 1;
    }
    None
}

/// `(index, local_start, local_end)` for every line sharing at least one character with
/// `start..end`.
fn overlaps(lines: &[Line], start: usize, end: usize) -> Vec<(usize, usize, usize)> {
    let mut out = Vec::new();
    let mut line_start = 0;
    for (index, line) in lines.iter().enumerate() {
        let line_end = line_start + line.len();
        let from = start.max(line_start);
        let to = end.min(line_end);
        if from < to {
            out.push((index, from - line_start, to - line_start));
        }
        line_start = line_end + 1;
    }
    out
}

/// Indices of the lines a selection touches: the cursor's line when collapsed, otherwise every
/// line the range reaches into.
fn touched(lines: &[Line], start: usize, end: usize) -> Vec<usize> {
    if start == end {
        return locate(lines, start).map(|(index, _)| index).into_iter().collect();
    }
    let mut out = Vec::new();
    let mut line_start = 0;
    for (index, line) in lines.iter().enumerate() {
        let line_end = line_start + line.len();
        if line_start < end && start <= line_end {
            out.push(index);
        }
        line_start = line_end + 1;
    }
    out
}

impl Dom {
    fn checked_lines(&self, start: usize, end: usize) -> Result<Vec<Line>, ModelError> {
        let lines = self.lines();
        let len = lines.iter().map(Line::len).sum::<usize>() + lines.len().saturating_sub(1);
        if start > end || end > len {
            return Err(ModelError::MalformedRange { start, end, len });
        }
        Ok(lines)
    }

    fn malformed(&self, start: usize, end: usize) -> ModelError {
        ModelError::MalformedRange {
            start,
            end,
            len: self.len(),
        }
    }

    /// Describe the line holding `offset`.
    pub fn line_at(&self, offset: usize) -> Result<LinePosition, ModelError> {
        let lines = self.checked_lines(offset, offset)?;
        let (index, local) = locate(&lines, offset).ok_or_else(|| self.malformed(offset, offset))?;
        Ok(LinePosition {
            index,
            line_start: offset - local,
            line_len: lines[index].len(),
            kind: lines[index].kind,
        })
    }

    /// Replace `start..end` with `text`, styling the inserted characters with `styles`.
    ///
    /// Each `\n` in `text` splits the line; new lines take the block kind of the line the edit
    /// started in. Removing a separator merges two lines, the first line's kind winning.
    /// Returns the UTF-16 length of what was inserted, separators included.
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        styles: &StyleSet,
    ) -> Result<usize, ModelError> {
        let mut lines = self.checked_lines(start, end)?;
        let (first, first_local) = locate(&lines, start).ok_or_else(|| self.malformed(start, end))?;
        let (last, last_local) = locate(&lines, end).ok_or_else(|| self.malformed(start, end))?;

        let mut head = lines[first].clone();
        head.split_off(first_local)
            .map_err(|_| self.malformed(start, end))?;
        let tail = lines[last]
            .clone()
            .split_off(last_local)
            .map_err(|_| self.malformed(start, end))?;

        let kind = head.kind;
        let pieces = crate::text::split_lines(text);
        let inserted_len =
            pieces.iter().map(|piece| utf16_len(piece)).sum::<usize>() + pieces.len() - 1;

        let mut replacement = Vec::with_capacity(pieces.len());
        let mut current = head;
        for (index, piece) in pieces.iter().enumerate() {
            if index > 0 {
                replacement.push(std::mem::replace(&mut current, Line::new(kind)));
            }
            if !piece.is_empty() {
                current.runs.push(Run::new(*piece, styles.clone()));
            }
        }
        current.runs.extend(tail);
        replacement.push(current);

        lines.splice(first..=last, replacement);
        *self = Dom::from_lines(lines);
        Ok(inserted_len)
    }

    /// Insert `text` at `offset`.
    pub fn insert_text(
        &mut self,
        offset: usize,
        text: &str,
        styles: &StyleSet,
    ) -> Result<usize, ModelError> {
        self.replace_range(offset, offset, text, styles)
    }

    /// Delete `start..end`.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(), ModelError> {
        self.replace_range(start, end, "", &StyleSet::new()).map(|_| ())
    }

    /// Split the line holding `offset` in two.
    pub fn split_block(&mut self, offset: usize) -> Result<(), ModelError> {
        self.replace_range(offset, offset, "\n", &StyleSet::new())
            .map(|_| ())
    }

    /// Merge the line holding `offset` with the line after it.
    pub fn merge_blocks(&mut self, offset: usize) -> Result<(), ModelError> {
        let position = self.line_at(offset)?;
        let separator = position.line_start + position.line_len;
        if separator >= self.len() {
            return Ok(());
        }
        self.delete_range(separator, separator + 1)
    }

    fn map_styles(
        &mut self,
        start: usize,
        end: usize,
        mut f: impl FnMut(&mut StyleSet),
    ) -> Result<(), ModelError> {
        let mut lines = self.checked_lines(start, end)?;
        for (index, from, to) in overlaps(&lines, start, end) {
            lines[index]
                .map_styles(from, to, &mut f)
                .map_err(|_| self.malformed(start, end))?;
        }
        *self = Dom::from_lines(lines);
        Ok(())
    }

    /// Wrap `start..end` in `style`. A link replaces any link already present in the range.
    pub fn apply_style(
        &mut self,
        start: usize,
        end: usize,
        style: &InlineStyle,
    ) -> Result<(), ModelError> {
        if let InlineStyle::Link(url) = style
            && url.is_empty()
        {
            return Err(ModelError::EmptyLink);
        }
        self.map_styles(start, end, |styles| {
            if style.is_link() {
                styles.retain(|s| !s.is_link());
            }
            styles.insert(style.clone());
        })
    }

    /// Unwrap `style` from `start..end`.
    pub fn remove_style(
        &mut self,
        start: usize,
        end: usize,
        style: &InlineStyle,
    ) -> Result<(), ModelError> {
        self.map_styles(start, end, |styles| {
            styles.remove(style);
        })
    }

    /// Unwrap every link from `start..end`.
    pub fn remove_links(&mut self, start: usize, end: usize) -> Result<(), ModelError> {
        self.map_styles(start, end, |styles| styles.retain(|s| !s.is_link()))
    }

    /// Styles shared by every character in `start..end`; empty if the range holds no text.
    pub fn common_styles(&self, start: usize, end: usize) -> Result<StyleSet, ModelError> {
        let lines = self.checked_lines(start, end)?;
        let mut common: Option<StyleSet> = None;
        for (index, from, to) in overlaps(&lines, start, end) {
            for run in lines[index].runs_in(from, to) {
                common = Some(match common {
                    None => run.styles.clone(),
                    Some(acc) => acc.intersection(&run.styles).cloned().collect(),
                });
            }
        }
        Ok(common.unwrap_or_default())
    }

    /// Returns `true` if every character in `start..end` carries `style`.
    ///
    /// A range without characters has no style.
    pub fn has_style(
        &self,
        start: usize,
        end: usize,
        style: &InlineStyle,
    ) -> Result<bool, ModelError> {
        Ok(self.common_styles(start, end)?.contains(style))
    }

    /// Styles that text typed at `offset` inherits.
    ///
    /// Those of the character before the offset, or of the first character when the offset
    /// starts a line. A link is only inherited strictly inside it, never at its edges.
    pub fn styles_at(&self, offset: usize) -> Result<StyleSet, ModelError> {
        let lines = self.checked_lines(offset, offset)?;
        let (index, local) = locate(&lines, offset).ok_or_else(|| self.malformed(offset, offset))?;
        let (before, after) = lines[index].styles_around(local);
        let mut styles = before.or(after).cloned().unwrap_or_default();
        styles.retain(|style| {
            !style.is_link()
                || (before.is_some_and(|s| s.contains(style))
                    && after.is_some_and(|s| s.contains(style)))
        });
        Ok(styles)
    }

    /// Block kinds of the lines touched by `start..end`.
    pub fn line_kinds(&self, start: usize, end: usize) -> Result<Vec<LineKind>, ModelError> {
        let lines = self.checked_lines(start, end)?;
        Ok(touched(&lines, start, end)
            .into_iter()
            .map(|index| lines[index].kind)
            .collect())
    }

    /// Set the block kind of every line touched by `start..end`.
    pub fn set_line_kind(
        &mut self,
        start: usize,
        end: usize,
        kind: LineKind,
    ) -> Result<(), ModelError> {
        let mut lines = self.checked_lines(start, end)?;
        for index in touched(&lines, start, end) {
            lines[index].kind = kind;
        }
        *self = Dom::from_lines(lines);
        Ok(())
    }
}
