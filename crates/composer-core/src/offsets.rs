//! Unicode offset mapping.
//!
//! Hosts address text in UTF-16 code units while the document stores UTF-8. Deletions and
//! style boundaries must also respect extended grapheme clusters, so that a composed emoji
//! (which can occupy anywhere from 2 to a dozen UTF-16 code units) is never split.
//!
//! [`OffsetMapper`] precomputes the grapheme-cluster boundaries of a flattened text in UTF-16
//! code units and answers snapping queries with a binary search.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::OffsetError;

/// Number of UTF-16 code units needed to encode `text`.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 code unit offset into a byte offset within `text`.
///
/// Fails if the offset is past the end or points between the two halves of a surrogate pair.
pub fn utf16_to_byte(text: &str, offset: usize) -> Result<usize, OffsetError> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == offset {
            return Ok(byte);
        }
        if units > offset {
            return Err(OffsetError::NotCharBoundary { offset });
        }
        units += ch.len_utf16();
    }

    match units.cmp(&offset) {
        std::cmp::Ordering::Equal => Ok(text.len()),
        std::cmp::Ordering::Greater => Err(OffsetError::NotCharBoundary { offset }),
        std::cmp::Ordering::Less => Err(OffsetError::OutOfBounds { offset, len: units }),
    }
}

/// Convert a byte offset within `text` into UTF-16 code units.
///
/// A byte offset that is not on a char boundary counts the whole text.
pub fn byte_to_utf16(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or_else(|| utf16_len(text), utf16_len)
}

/// A UTF-16 range aligned to grapheme-cluster boundaries (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeSpan {
    /// Inclusive start (UTF-16 code units).
    pub start: usize,
    /// Exclusive end (UTF-16 code units).
    pub end: usize,
}

impl GraphemeSpan {
    /// Width of the span in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a collapsed span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Grapheme-cluster boundary table for one flattened text.
#[derive(Debug, Clone)]
pub struct OffsetMapper {
    /// Sorted UTF-16 offsets of every cluster start, plus the text length.
    boundaries: Vec<usize>,
}

impl OffsetMapper {
    /// Build the boundary table for `text`.
    ///
    /// Every `\n` is a line separator and a cluster of its own, even after a `\r`.
    pub fn new(text: &str) -> Self {
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        boundaries.push(0);
        let mut units = 0;
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                units += 1;
                boundaries.push(units);
            }
            for grapheme in line.graphemes(true) {
                units += utf16_len(grapheme);
                boundaries.push(units);
            }
        }
        Self { boundaries }
    }

    /// Length of the mapped text in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.boundaries.last().copied().unwrap_or(0)
    }

    /// Returns `true` if the mapped text is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, offset: usize) -> Result<(), OffsetError> {
        let len = self.len();
        if offset > len {
            tracing::trace!(offset, len, "offset out of bounds");
            return Err(OffsetError::OutOfBounds { offset, len });
        }
        Ok(())
    }

    /// Returns `true` if `offset` sits on a grapheme-cluster boundary.
    pub fn is_boundary(&self, offset: usize) -> bool {
        self.boundaries.binary_search(&offset).is_ok()
    }

    /// The largest cluster boundary that is `<= offset`.
    pub fn floor(&self, offset: usize) -> Result<usize, OffsetError> {
        self.check(offset)?;
        Ok(match self.boundaries.binary_search(&offset) {
            Ok(i) => self.boundaries[i],
            // Index 0 always holds 0, so a miss is never at the front.
            Err(i) => self.boundaries[i - 1],
        })
    }

    /// The smallest cluster boundary that is `>= offset`.
    pub fn ceil(&self, offset: usize) -> Result<usize, OffsetError> {
        self.check(offset)?;
        Ok(match self.boundaries.binary_search(&offset) {
            Ok(i) | Err(i) => self.boundaries[i],
        })
    }

    /// Start of the cluster ending at or containing `offset`; `0` stays `0`.
    pub fn previous_boundary(&self, offset: usize) -> Result<usize, OffsetError> {
        self.check(offset)?;
        if offset == 0 {
            return Ok(0);
        }
        Ok(match self.boundaries.binary_search(&offset) {
            Ok(i) | Err(i) => self.boundaries[i - 1],
        })
    }

    /// End of the cluster starting at or containing `offset`; the text end stays put.
    pub fn next_boundary(&self, offset: usize) -> Result<usize, OffsetError> {
        self.check(offset)?;
        if offset == self.len() {
            return Ok(offset);
        }
        Ok(match self.boundaries.binary_search(&offset) {
            Ok(i) => self.boundaries[i + 1],
            Err(i) => self.boundaries[i],
        })
    }

    /// Widen `start..end` so both ends sit on cluster boundaries.
    ///
    /// The range only ever grows: a cluster that is partially covered becomes fully covered.
    pub fn snap_outward(&self, start: usize, end: usize) -> Result<GraphemeSpan, OffsetError> {
        if start > end {
            return Err(OffsetError::InvalidRange { start, end });
        }
        let span = GraphemeSpan {
            start: self.floor(start)?,
            end: self.ceil(end)?,
        };
        if span.start != start || span.end != end {
            tracing::trace!(start, end, snapped_start = span.start, snapped_end = span.end, "snapped range");
        }
        Ok(span)
    }

    /// Iterate over every cluster as a [`GraphemeSpan`].
    pub fn spans(&self) -> impl Iterator<Item = GraphemeSpan> + '_ {
        self.boundaries.windows(2).map(|w| GraphemeSpan {
            start: w[0],
            end: w[1],
        })
    }
}
