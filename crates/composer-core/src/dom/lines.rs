//! Line projection of the document tree.
//!
//! Edits are easiest to express over a flat list of lines, each a list of styled runs. The tree
//! is projected into lines, edited, and rebuilt in canonical form. Rebuilding is what keeps the
//! tree invariants: no empty inline containers, merged text leaves, and no two adjacent sibling
//! inline containers with the same kind.

use std::collections::BTreeSet;

use super::node::{ContainerKind, ContainerNode, DomNode, InlineStyle, ListType};
use crate::error::OffsetError;
use crate::offsets::{utf16_len, utf16_to_byte};

/// Set of inline styles applied to a run.
pub type StyleSet = BTreeSet<InlineStyle>;

/// A maximal piece of text sharing one style set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Text of the run (never contains a line separator).
    pub text: String,
    /// Styles applied to every character of the run.
    pub styles: StyleSet,
}

impl Run {
    /// Create a run.
    pub fn new(text: impl Into<String>, styles: StyleSet) -> Self {
        Self {
            text: text.into(),
            styles,
        }
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    /// Returns `true` if the run holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Block kind of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// A plain line.
    Paragraph,
    /// An item of a list of the given type.
    ListItem(ListType),
}

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Block kind.
    pub kind: LineKind,
    /// Styled runs, in order.
    pub runs: Vec<Run>,
}

impl Line {
    /// Create an empty line.
    pub fn new(kind: LineKind) -> Self {
        Self {
            kind,
            runs: Vec::new(),
        }
    }

    /// Create a plain line holding unstyled `text`.
    pub fn plain(text: &str) -> Self {
        let mut line = Self::new(LineKind::Paragraph);
        if !text.is_empty() {
            line.runs.push(Run::new(text, StyleSet::new()));
        }
        line
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    /// Returns `true` if the line holds no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// Concatenated text of the line.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Drop empty runs and merge neighbours with identical styles.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.styles == run.styles => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Split the line at `offset` (UTF-16, local to the line).
    ///
    /// `self` keeps everything before the offset; the runs after it are returned.
    pub fn split_off(&mut self, offset: usize) -> Result<Vec<Run>, OffsetError> {
        let mut pos = 0;
        for index in 0..self.runs.len() {
            let run_len = self.runs[index].len();
            if offset <= pos + run_len {
                let byte = utf16_to_byte(&self.runs[index].text, offset - pos)?;
                let mut tail = self.runs.split_off(index + 1);
                let run = &mut self.runs[index];
                let rest = run.text.split_off(byte);
                if !rest.is_empty() {
                    tail.insert(0, Run::new(rest, run.styles.clone()));
                }
                if run.text.is_empty() {
                    self.runs.pop();
                }
                return Ok(tail);
            }
            pos += run_len;
        }
        if offset == pos {
            return Ok(Vec::new());
        }
        Err(OffsetError::OutOfBounds { offset, len: pos })
    }

    /// Apply `f` to the style set of every run inside `start..end` (local UTF-16 offsets).
    pub fn map_styles(
        &mut self,
        start: usize,
        end: usize,
        mut f: impl FnMut(&mut StyleSet),
    ) -> Result<(), OffsetError> {
        let mut tail = self.split_off(end)?;
        let mut middle = self.split_off(start)?;
        for run in &mut middle {
            f(&mut run.styles);
        }
        self.runs.append(&mut middle);
        self.runs.append(&mut tail);
        self.normalize();
        Ok(())
    }

    /// Runs overlapping `start..end` (local UTF-16 offsets), with at least one character inside.
    pub fn runs_in(&self, start: usize, end: usize) -> impl Iterator<Item = &Run> {
        let mut pos = 0;
        self.runs.iter().filter(move |run| {
            let run_start = pos;
            pos += run.len();
            run_start < end && pos > start
        })
    }

    /// Styles of the characters immediately before and after `offset` (local UTF-16 offset).
    pub fn styles_around(&self, offset: usize) -> (Option<&StyleSet>, Option<&StyleSet>) {
        let mut before = None;
        let mut after = None;
        let mut pos = 0;
        for run in &self.runs {
            let run_end = pos + run.len();
            if offset > pos && offset <= run_end {
                before = Some(&run.styles);
            }
            if offset >= pos && offset < run_end {
                after = Some(&run.styles);
            }
            pos = run_end;
        }
        (before, after)
    }
}

/// Project the tree below `root` into lines.
pub(crate) fn lines_from_root(root: &ContainerNode) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut loose: Option<Line> = None;

    for child in &root.children {
        let block = child.as_container().filter(|c| c.kind.is_block());
        match block {
            Some(container) => {
                lines.extend(loose.take());
                match &container.kind {
                    ContainerKind::List(list_type) => {
                        for item in &container.children {
                            let mut line = Line::new(LineKind::ListItem(*list_type));
                            collect_runs(std::slice::from_ref(item), &mut StyleSet::new(), &mut line.runs);
                            line.normalize();
                            lines.push(line);
                        }
                    }
                    ContainerKind::ListItem => {
                        let mut line = Line::new(LineKind::ListItem(ListType::Unordered));
                        collect_runs(&container.children, &mut StyleSet::new(), &mut line.runs);
                        line.normalize();
                        lines.push(line);
                    }
                    _ => {
                        let mut line = Line::new(LineKind::Paragraph);
                        collect_runs(&container.children, &mut StyleSet::new(), &mut line.runs);
                        line.normalize();
                        lines.push(line);
                    }
                }
            }
            None => {
                let line = loose.get_or_insert_with(|| Line::new(LineKind::Paragraph));
                collect_runs(std::slice::from_ref(child), &mut StyleSet::new(), &mut line.runs);
                line.normalize();
            }
        }
    }

    lines.extend(loose);
    if lines.is_empty() {
        lines.push(Line::new(LineKind::Paragraph));
    }
    lines
}

fn collect_runs(nodes: &[DomNode], styles: &mut StyleSet, out: &mut Vec<Run>) {
    for node in nodes {
        match node {
            DomNode::Text(text) => out.push(Run::new(text.clone(), styles.clone())),
            DomNode::Container(container) => match container.kind.as_style() {
                Some(style) => {
                    let inserted = styles.insert(style.clone());
                    collect_runs(&container.children, styles, out);
                    if inserted {
                        styles.remove(&style);
                    }
                }
                None => collect_runs(&container.children, styles, out),
            },
        }
    }
}

/// Build the canonical tree for `lines`.
pub(crate) fn root_from_lines(lines: &[Line]) -> ContainerNode {
    if let [line] = lines
        && line.kind == LineKind::Paragraph
    {
        return ContainerNode::new(ContainerKind::Generic, build_inline(&line.runs, &StyleSet::new()));
    }

    let mut children: Vec<DomNode> = Vec::with_capacity(lines.len());
    for line in lines {
        let inline = build_inline(&line.runs, &StyleSet::new());
        match line.kind {
            LineKind::Paragraph => children.push(DomNode::Container(ContainerNode::new(
                ContainerKind::Paragraph,
                inline,
            ))),
            LineKind::ListItem(list_type) => {
                let item = DomNode::Container(ContainerNode::new(ContainerKind::ListItem, inline));
                match children.last_mut() {
                    Some(DomNode::Container(list))
                        if list.kind == ContainerKind::List(list_type) =>
                    {
                        list.children.push(item);
                    }
                    _ => children.push(DomNode::Container(ContainerNode::new(
                        ContainerKind::List(list_type),
                        vec![item],
                    ))),
                }
            }
        }
    }
    ContainerNode::new(ContainerKind::Generic, children)
}

/// Nest `runs` under the styles already opened by ancestors (`open`).
///
/// At each position the style that stays active for the most consecutive runs is opened first,
/// ties going to the smallest style in [`InlineStyle`] order. A container therefore always ends
/// at a run lacking its style, so two adjacent siblings can never share a kind.
fn build_inline(runs: &[Run], open: &StyleSet) -> Vec<DomNode> {
    let mut nodes: Vec<DomNode> = Vec::new();
    let mut index = 0;

    while index < runs.len() {
        let run = &runs[index];
        let mut best: Option<(&InlineStyle, usize)> = None;
        for style in run.styles.difference(open) {
            let span = runs[index..]
                .iter()
                .take_while(|r| r.styles.contains(style))
                .count();
            if best.is_none_or(|(_, best_span)| span > best_span) {
                best = Some((style, span));
            }
        }

        match best {
            None => {
                match nodes.last_mut() {
                    Some(DomNode::Text(text)) => text.push_str(&run.text),
                    _ => nodes.push(DomNode::Text(run.text.clone())),
                }
                index += 1;
            }
            Some((style, span)) => {
                let mut inner_open = open.clone();
                inner_open.insert(style.clone());
                let children = build_inline(&runs[index..index + span], &inner_open);
                nodes.push(DomNode::Container(ContainerNode::new(
                    style.clone().into(),
                    children,
                )));
                index += span;
            }
        }
    }

    nodes
}
