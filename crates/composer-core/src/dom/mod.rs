//! Document model.
//!
//! The document is an ordered tree of [`DomNode`]s. Text lives only in leaves; formatting and
//! block structure are ancestor containers. The tree is always kept in canonical form:
//!
//! - a document that is a single plain line keeps its inline nodes directly under the root;
//! - otherwise every plain line is a paragraph and consecutive list items of one type share a
//!   list container;
//! - adjacent text leaves are merged, inline containers are never empty, and no two adjacent
//!   sibling inline containers have the same kind.
//!
//! Offsets into the document are UTF-16 code units into the *flattened text*: all leaf text in
//! document order, with one `\n` between consecutive lines.

mod lines;
mod node;
mod ops;

pub use lines::{Line, LineKind, Run, StyleSet};
pub use ops::LinePosition;
pub use node::{ContainerKind, ContainerNode, DomNode, InlineFormatType, InlineStyle, ListType};

use std::fmt::Write as _;

use crate::html;
use lines::{lines_from_root, root_from_lines};

/// The document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dom {
    root: ContainerNode,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            root: ContainerNode::new(ContainerKind::Generic, Vec::new()),
        }
    }

    /// Build a document holding unstyled `text`; each `\n` starts a new line.
    pub fn from_plain_text(text: &str) -> Self {
        let lines = crate::text::split_lines(text)
            .iter()
            .map(|line| Line::plain(line))
            .collect();
        Self::from_lines(lines)
    }

    /// Build the canonical document for `lines`.
    pub fn from_lines(mut lines: Vec<Line>) -> Self {
        if lines.is_empty() {
            lines.push(Line::new(LineKind::Paragraph));
        }
        for line in &mut lines {
            line.normalize();
        }
        Self {
            root: root_from_lines(&lines),
        }
    }

    /// Project the document into lines.
    pub fn lines(&self) -> Vec<Line> {
        lines_from_root(&self.root)
    }

    /// The root container.
    pub fn root(&self) -> &ContainerNode {
        &self.root
    }

    /// The flattened text: leaf text with `\n` between lines.
    pub fn text(&self) -> String {
        self.lines()
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Length of the flattened text in UTF-16 code units.
    ///
    /// Equals the sum of leaf lengths plus one separator per line boundary.
    pub fn len(&self) -> usize {
        let lines = self.lines();
        lines.iter().map(Line::len).sum::<usize>() + lines.len().saturating_sub(1)
    }

    /// Returns `true` if the document holds no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the document as HTML.
    pub fn to_html(&self) -> String {
        html::to_html(&self.root)
    }

    /// Indented, human-readable dump of the tree.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        write_tree(&self.root, 0, &mut out);
        out
    }
}

fn write_tree(container: &ContainerNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match &container.kind {
        ContainerKind::Generic => {
            let _ = writeln!(out, "{indent}<root>");
        }
        ContainerKind::Link(url) => {
            let _ = writeln!(out, "{indent}<a href={url:?}>");
        }
        kind => {
            let _ = writeln!(out, "{indent}<{}>", kind.tag());
        }
    }
    for child in &container.children {
        match child {
            DomNode::Container(inner) => write_tree(inner, depth + 1, out),
            DomNode::Text(text) => {
                let _ = writeln!(out, "{indent}  {text:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let dom = Dom::new();
        assert_eq!(dom.len(), 0);
        assert_eq!(dom.text(), "");
        assert_eq!(dom.to_html(), "");
        assert_eq!(dom.lines(), vec![Line::new(LineKind::Paragraph)]);
    }

    #[test]
    fn test_plain_text_lines() {
        let dom = Dom::from_plain_text("ab\n\ncd");
        assert_eq!(dom.lines().len(), 3);
        assert_eq!(dom.text(), "ab\n\ncd");
        assert_eq!(dom.len(), 6);
        assert_eq!(dom.root().leaf_len() + 2, dom.len());
    }

    #[test]
    fn test_tree_dump() {
        let mut dom = Dom::from_plain_text("This is bold text");
        dom.apply_style(8, 12, &InlineStyle::Format(InlineFormatType::Bold))
            .unwrap();
        assert_eq!(
            dom.to_tree_string(),
            "<root>\n  \"This is \"\n  <strong>\n    \"bold\"\n  \" text\"\n"
        );
    }
}
