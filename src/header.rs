//! Fixed-size header decoding.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::format::{Category, FormatVariant, CATEGORY_COUNT};

/// Decoded file header.
///
/// The counts fully determine every offset that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Version tag as stored in the file
    pub version: u32,
    /// Dictionary cardinalities, in [`Category::ALL`] order
    pub counts: [u32; CATEGORY_COUNT],
    /// Number of records in the range table
    pub record_count: u32,
}

impl Header {
    /// Decode the header at offset 0.
    ///
    /// Legacy headers store the six counts as 16-bit values, current headers
    /// as 32-bit values. The version tag and record count are 32-bit in both.
    pub fn decode(data: &[u8], variant: FormatVariant) -> Result<Self, DecodeError> {
        let size = variant.header_size();
        if data.len() < size {
            return Err(DecodeError::MalformedHeader {
                expected: size,
                actual: data.len(),
            });
        }

        let mut cursor = ByteCursor::new(data);
        let version = cursor.read_u32().map_err(|e| e.header())?;
        let mut counts = [0u32; CATEGORY_COUNT];
        for count in counts.iter_mut() {
            *count = cursor
                .read_id(variant.id_width())
                .map_err(|e| e.header())?;
        }
        let record_count = cursor.read_u32().map_err(|e| e.header())?;
        debug_assert_eq!(cursor.position(), size);

        Ok(Self {
            version,
            counts,
            record_count,
        })
    }

    /// Number of entries in the given dictionary.
    pub fn count(&self, category: Category) -> u32 {
        self.counts[category.index()]
    }
}
