#![warn(missing_docs)]
//! Composer Core - Headless Rich-Text Composer Kernel
//!
//! # Overview
//!
//! `composer-core` is the platform-independent core of a rich-text message composer. It owns a
//! formatted document tree and a selection, applies editing and formatting commands, and tells
//! the host after every command whether to keep its view or replace it with freshly rendered
//! HTML. It does not render anything itself.
//!
//! # Core Features
//!
//! - **Grapheme-safe editing**: offsets are UTF-16 code units (what host text views use) and
//!   every edit snaps to grapheme-cluster boundaries, so emoji sequences are never split
//! - **Canonical document tree**: formats, links, paragraphs and lists, always kept merged and
//!   normalized so equal documents render byte-identical HTML
//! - **HTML in and out**: deterministic serializer and a parser for the same markup
//! - **Undo/redo**: bounded snapshot history
//! - **Action states**: per-toolbar-button enabled/reversed/disabled flags
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface & State Queries          │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Update Reporter (Keep / ReplaceAll)        │  ← Host Sync
//! ├─────────────────────────────────────────────┤
//! │  HTML Serializer & Parser                   │  ← Markup
//! ├─────────────────────────────────────────────┤
//! │  Document Model (tree + line projection)    │  ← Structure
//! ├─────────────────────────────────────────────┤
//! │  Unicode Offset Mapper                      │  ← Coordinates
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use composer_core::{ComposerModel, TextUpdate};
//!
//! let mut model = ComposerModel::new();
//! model.replace_text("This is bold text").unwrap();
//! model.select(8, 12).unwrap();
//!
//! match model.bold().unwrap().text_update() {
//!     TextUpdate::ReplaceAll {
//!         replacement_html,
//!         start_utf16_codeunit,
//!         end_utf16_codeunit,
//!     } => {
//!         let html = String::from_utf16(&replacement_html).unwrap();
//!         assert_eq!(html, "This is <strong>bold</strong> text");
//!         assert_eq!((start_utf16_codeunit, end_utf16_codeunit), (8, 12));
//!     }
//!     TextUpdate::Keep => unreachable!(),
//! }
//! ```
//!
//! # Module Description
//!
//! - [`offsets`] - UTF-16 / grapheme-cluster offset mapping
//! - [`dom`] - Document tree and structural primitives
//! - [`html`] - HTML serializer and parser
//! - [`commands`] - Unified command interface ([`ComposerModel`])
//! - [`update`] - Update reporting
//! - [`state`] - State queries and action states
//! - [`spans`] - Typed style span enumeration
//! - [`encoding`] - Byte encodings of rendered HTML
//!
//! # Unicode Support
//!
//! - UTF-8 internal storage, UTF-16 code unit offsets at the API
//! - Grapheme clusters (emoji ZWJ sequences, skin tones, combining marks) are atomic

pub mod commands;
pub mod dom;
pub mod encoding;
pub mod error;
pub mod html;
pub mod offsets;
pub mod options;
pub mod spans;
pub mod state;
mod text;
pub mod update;

pub use commands::{
    BlockCommand, Command, ComposerModel, EditCommand, FormatCommand, Selection,
};
pub use dom::{Dom, InlineFormatType, InlineStyle, LineKind, ListType};
pub use encoding::{Encoding, encode_html};
pub use error::{ComposerError, EncodingError, ModelError, OffsetError};
pub use offsets::{GraphemeSpan, OffsetMapper};
pub use options::ComposerOptions;
pub use spans::{LinkTarget, SpanValue, StyleSpan};
pub use state::{ActionState, ComposerAction, ComposerState};
pub use update::{ComposerUpdate, TextUpdate};
