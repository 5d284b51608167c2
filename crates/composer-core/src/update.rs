//! Update reporting.
//!
//! Every command answers with a [`ComposerUpdate`] telling the host whether its view can stay as
//! it is ([`TextUpdate::Keep`]) or must be replaced wholesale ([`TextUpdate::ReplaceAll`]).
//! There is no incremental diffing: any command that touches content reports the full HTML and
//! the full selection, so a host applying `ReplaceAll` is always consistent with the model.

use crate::commands::Selection;
use crate::dom::Dom;

/// What the host has to do with its view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextUpdate {
    /// Nothing visible changed.
    Keep,
    /// Replace the whole content and selection.
    ReplaceAll {
        /// New HTML as UTF-16 code units.
        replacement_html: Vec<u16>,
        /// Selection start (UTF-16 code units).
        start_utf16_codeunit: u32,
        /// Selection end (UTF-16 code units).
        end_utf16_codeunit: u32,
    },
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerUpdate {
    text_update: TextUpdate,
}

impl ComposerUpdate {
    /// An update that leaves the host view untouched.
    pub fn keep() -> Self {
        Self {
            text_update: TextUpdate::Keep,
        }
    }

    /// A full replacement carrying `html` and `selection`.
    pub fn replace_all(html: &str, selection: Selection) -> Self {
        Self {
            text_update: TextUpdate::ReplaceAll {
                replacement_html: html.encode_utf16().collect(),
                start_utf16_codeunit: to_u32(selection.start),
                end_utf16_codeunit: to_u32(selection.end),
            },
        }
    }

    /// The text update to apply.
    pub fn text_update(&self) -> TextUpdate {
        self.text_update.clone()
    }

    /// Returns `true` for [`TextUpdate::Keep`].
    pub fn is_keep(&self) -> bool {
        matches!(self.text_update, TextUpdate::Keep)
    }

    /// The replacement HTML decoded into a `String`, if this is a replacement.
    pub fn html(&self) -> Option<String> {
        match &self.text_update {
            TextUpdate::Keep => None,
            TextUpdate::ReplaceAll {
                replacement_html, ..
            } => String::from_utf16(replacement_html).ok(),
        }
    }

    /// The replacement selection, if this is a replacement.
    pub fn selection(&self) -> Option<Selection> {
        match &self.text_update {
            TextUpdate::Keep => None,
            TextUpdate::ReplaceAll {
                start_utf16_codeunit,
                end_utf16_codeunit,
                ..
            } => Some(Selection::new(
                *start_utf16_codeunit as usize,
                *end_utf16_codeunit as usize,
            )),
        }
    }
}

fn to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

/// How a command affected the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Content, formatting or structure changed.
    Content,
    /// Only the selection moved; the host already shows it.
    SelectionOnly,
    /// Nothing observable changed.
    Nothing,
}

/// Turns command effects into [`ComposerUpdate`]s and remembers what was last reported.
#[derive(Debug, Clone, Default)]
pub struct UpdateReporter {
    last_html: String,
    last_selection: Selection,
}

impl UpdateReporter {
    /// A reporter that treats `dom` and `selection` as already shown by the host.
    pub fn seeded(dom: &Dom, selection: Selection) -> Self {
        Self {
            last_html: dom.to_html(),
            last_selection: selection,
        }
    }

    /// Package the update for a command that had `effect` on the model.
    pub fn report(&mut self, effect: Effect, dom: &Dom, selection: Selection) -> ComposerUpdate {
        match effect {
            Effect::Content => {
                let html = dom.to_html();
                let update = ComposerUpdate::replace_all(&html, selection);
                self.last_html = html;
                self.last_selection = selection;
                update
            }
            Effect::SelectionOnly => {
                self.last_selection = selection;
                ComposerUpdate::keep()
            }
            Effect::Nothing => ComposerUpdate::keep(),
        }
    }

    /// HTML carried by the last `ReplaceAll`.
    pub fn last_html(&self) -> &str {
        &self.last_html
    }

    /// Selection the host is known to display.
    pub fn last_selection(&self) -> Selection {
        self.last_selection
    }
}
