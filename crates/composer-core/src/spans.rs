//! Typed enumeration of inline style spans.
//!
//! A span is a maximal range of the flattened text carrying one style within a line. Hosts ask
//! for spans of one kind of style over a range; the visitor sees each span clipped to the range
//! and can stop the walk early with [`ControlFlow::Break`].

use std::collections::BTreeMap;
use std::ops::{ControlFlow, Range};

use crate::dom::{Dom, InlineFormatType, InlineStyle};

/// One style over one range of the flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan {
    /// UTF-16 range carrying the style.
    pub range: Range<usize>,
    /// The style.
    pub style: InlineStyle,
}

/// Link destination, for enumerating links with [`Dom::enumerate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget(pub String);

/// A value that can be read out of an [`InlineStyle`].
pub trait SpanValue: Sized {
    /// The value carried by `style`, or `None` if `style` is of another kind.
    fn from_style(style: &InlineStyle) -> Option<Self>;
}

impl SpanValue for InlineStyle {
    fn from_style(style: &InlineStyle) -> Option<Self> {
        Some(style.clone())
    }
}

impl SpanValue for InlineFormatType {
    fn from_style(style: &InlineStyle) -> Option<Self> {
        match style {
            InlineStyle::Format(format) => Some(*format),
            InlineStyle::Link(_) => None,
        }
    }
}

impl SpanValue for LinkTarget {
    fn from_style(style: &InlineStyle) -> Option<Self> {
        match style {
            InlineStyle::Link(url) => Some(LinkTarget(url.clone())),
            InlineStyle::Format(_) => None,
        }
    }
}

impl Dom {
    /// Every style span, ordered by start offset then style.
    pub fn style_spans(&self) -> Vec<StyleSpan> {
        let mut spans = Vec::new();
        let mut line_start = 0;

        for line in self.lines() {
            let mut open: BTreeMap<InlineStyle, usize> = BTreeMap::new();
            let mut position = line_start;
            for run in &line.runs {
                let ended: Vec<InlineStyle> = open
                    .keys()
                    .filter(|style| !run.styles.contains(*style))
                    .cloned()
                    .collect();
                for style in ended {
                    if let Some(start) = open.remove(&style) {
                        spans.push(StyleSpan {
                            range: start..position,
                            style,
                        });
                    }
                }
                for style in &run.styles {
                    open.entry(style.clone()).or_insert(position);
                }
                position += run.len();
            }
            spans.extend(open.into_iter().map(|(style, start)| StyleSpan {
                range: start..position,
                style,
            }));
            line_start = position + 1;
        }

        spans.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then_with(|| a.style.cmp(&b.style))
        });
        spans
    }

    /// Visit every span of value type `T` overlapping `range`, clipped to it.
    pub fn enumerate<T, F>(&self, range: Range<usize>, mut visit: F)
    where
        T: SpanValue,
        F: FnMut(T, Range<usize>) -> ControlFlow<()>,
    {
        for span in self.style_spans() {
            let start = span.range.start.max(range.start);
            let end = span.range.end.min(range.end);
            if start >= end {
                continue;
            }
            if let Some(value) = T::from_style(&span.style)
                && visit(value, start..end).is_break()
            {
                return;
            }
        }
    }

    /// Visit every inline format span overlapping `range`.
    pub fn enumerate_formats<F>(&self, range: Range<usize>, visit: F)
    where
        F: FnMut(InlineFormatType, Range<usize>) -> ControlFlow<()>,
    {
        self.enumerate(range, visit);
    }

    /// Visit every link span overlapping `range`.
    pub fn enumerate_links<F>(&self, range: Range<usize>, mut visit: F)
    where
        F: FnMut(&str, Range<usize>) -> ControlFlow<()>,
    {
        self.enumerate(range, |target: LinkTarget, span| visit(&target.0, span));
    }

    /// The link span containing `offset`, edges included.
    pub fn link_span_at(&self, offset: usize) -> Option<StyleSpan> {
        self.style_spans().into_iter().find(|span| {
            span.style.is_link() && span.range.start <= offset && offset <= span.range.end
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Dom {
        let mut dom = Dom::from_plain_text("This is bold text\nsecond line");
        dom.apply_style(8, 12, &InlineFormatType::Bold.into())
            .unwrap();
        dom.apply_style(10, 25, &InlineFormatType::Italic.into())
            .unwrap();
        dom.apply_style(0, 4, &InlineStyle::Link("https://x.org".into()))
            .unwrap();
        dom
    }

    #[test]
    fn test_style_spans_split_at_lines() {
        let spans = sample().style_spans();
        assert_eq!(
            spans,
            vec![
                StyleSpan {
                    range: 0..4,
                    style: InlineStyle::Link("https://x.org".into()),
                },
                StyleSpan {
                    range: 8..12,
                    style: InlineFormatType::Bold.into(),
                },
                StyleSpan {
                    range: 10..17,
                    style: InlineFormatType::Italic.into(),
                },
                StyleSpan {
                    range: 18..25,
                    style: InlineFormatType::Italic.into(),
                },
            ]
        );
    }

    #[test]
    fn test_enumerate_formats_clips_to_range() {
        let mut seen = Vec::new();
        sample().enumerate_formats(8..12, |format, range| {
            seen.push((format, range));
            ControlFlow::Continue(())
        });
        assert_eq!(
            seen,
            vec![
                (InlineFormatType::Bold, 8..12),
                (InlineFormatType::Italic, 10..12)
            ]
        );
    }

    #[test]
    fn test_enumerate_stops_on_break() {
        let mut count = 0;
        sample().enumerate::<InlineStyle, _>(0..30, |_, _| {
            count += 1;
            ControlFlow::Break(())
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn test_enumerate_links() {
        let dom = sample();
        let mut links = Vec::new();
        dom.enumerate_links(0..30, |url, range| {
            links.push((url.to_string(), range));
            ControlFlow::Continue(())
        });
        assert_eq!(links, vec![("https://x.org".to_string(), 0..4)]);
        assert_eq!(dom.link_span_at(4).map(|span| span.range), Some(0..4));
        assert_eq!(dom.link_span_at(5), None);
    }
}
