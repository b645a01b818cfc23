//! Segment offsets derived from the header.

use std::ops::Range;

use serde::Serialize;

use crate::error::DecodeError;
use crate::format::{Category, FormatVariant, CATEGORY_COUNT, INDEX_SIZE};
use crate::header::Header;

/// Byte offsets of every segment in a database file.
///
/// Dictionaries are laid out back to back in [`Category::ALL`] order, so each
/// segment starts where the previous one ends. `records_start` is the end of
/// the last dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Dictionary segment byte ranges, in [`Category::ALL`] order
    pub dictionaries: [Range<usize>; CATEGORY_COUNT],
    /// Start of the record array (`Rstart`)
    pub records_start: usize,
    /// End of the record array
    pub records_end: usize,
    /// Start of the first-octet index, when the variant has one
    pub index_offset: Option<usize>,
    /// Total number of bytes the layout describes
    pub total_len: usize,
}

impl Layout {
    /// Prefix-sum the segment sizes declared by `header`.
    pub fn compute(header: &Header, variant: FormatVariant) -> Result<Self, DecodeError> {
        let mut offset = variant.header_size();
        let mut dictionaries: [Range<usize>; CATEGORY_COUNT] = Default::default();

        for category in Category::ALL {
            let count = header.count(category) as usize;
            let entry_size = variant.entry_size(category);
            let end = span_end(offset, count, entry_size).ok_or(
                DecodeError::MalformedDictionary {
                    category,
                    offset,
                    needed: usize::MAX,
                    len: 0,
                },
            )?;
            dictionaries[category.index()] = offset..end;
            offset = end;
        }

        let records_start = offset;
        let records_end = span_end(
            records_start,
            header.record_count as usize,
            variant.record_size(),
        )
        .ok_or(DecodeError::MalformedRecord {
            offset: records_start,
            needed: usize::MAX,
            len: 0,
        })?;

        let (index_offset, total_len) = if variant.has_index() {
            let end = records_end
                .checked_add(INDEX_SIZE)
                .ok_or(DecodeError::MalformedIndex {
                    offset: records_end,
                    needed: INDEX_SIZE,
                    len: 0,
                })?;
            (Some(records_end), end)
        } else {
            (None, records_end)
        };

        Ok(Self {
            dictionaries,
            records_start,
            records_end,
            index_offset,
            total_len,
        })
    }

    /// Byte range of one dictionary segment.
    pub fn dictionary(&self, category: Category) -> Range<usize> {
        self.dictionaries[category.index()].clone()
    }

    /// Check every segment against a buffer of `len` bytes.
    ///
    /// Segments are checked in file order so the first truncated one is the
    /// one reported.
    pub fn validate(&self, len: usize) -> Result<(), DecodeError> {
        for category in Category::ALL {
            let range = self.dictionary(category);
            if range.end > len {
                return Err(DecodeError::MalformedDictionary {
                    category,
                    offset: range.start,
                    needed: range.end - range.start,
                    len,
                });
            }
        }
        if self.records_end > len {
            return Err(DecodeError::MalformedRecord {
                offset: self.records_start,
                needed: self.records_end - self.records_start,
                len,
            });
        }
        if let Some(index_offset) = self.index_offset {
            if self.total_len > len {
                return Err(DecodeError::MalformedIndex {
                    offset: index_offset,
                    needed: INDEX_SIZE,
                    len,
                });
            }
        }
        Ok(())
    }
}

fn span_end(start: usize, count: usize, size: usize) -> Option<usize> {
    count.checked_mul(size).and_then(|n| start.checked_add(n))
}
