//! Bounds-checked big-endian reads over a byte buffer.

use crate::error::DecodeError;
use crate::format::Category;

/// A read that would run past the end of the buffer.
///
/// Carries no context of its own; callers attach it to the segment being
/// decoded with one of the conversion methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub offset: usize,
    pub needed: usize,
    pub len: usize,
}

impl OutOfBounds {
    pub fn header(self) -> DecodeError {
        DecodeError::MalformedHeader {
            expected: self.offset.saturating_add(self.needed),
            actual: self.len,
        }
    }

    pub fn dictionary(self, category: Category) -> DecodeError {
        DecodeError::MalformedDictionary {
            category,
            offset: self.offset,
            needed: self.needed,
            len: self.len,
        }
    }

    pub fn record(self) -> DecodeError {
        DecodeError::MalformedRecord {
            offset: self.offset,
            needed: self.needed,
            len: self.len,
        }
    }

    pub fn index(self) -> DecodeError {
        DecodeError::MalformedIndex {
            offset: self.offset,
            needed: self.needed,
            len: self.len,
        }
    }
}

/// Borrow `len` bytes at `offset`, failing closed instead of panicking.
#[inline]
pub fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8], OutOfBounds> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(OutOfBounds {
            offset,
            needed: len,
            len: data.len(),
        })
}

/// Read a big-endian `u32` at `offset`.
#[inline]
pub fn read_u32_at(data: &[u8], offset: usize) -> Result<u32, OutOfBounds> {
    let bytes = slice_at(data, offset, 4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Sequential reader that advances by declared field widths.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor positioned at `pos`. Nothing is checked until the first read.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Take the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], OutOfBounds> {
        let bytes = slice_at(self.data, self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, OutOfBounds> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, OutOfBounds> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a dictionary id of the given width (2 or 4 bytes), widened to `u32`.
    pub fn read_id(&mut self, width: usize) -> Result<u32, OutOfBounds> {
        match width {
            2 => self.read_u16().map(u32::from),
            _ => self.read_u32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let data = [0x00, 0x01, 0x00, 0x02, 0x0A, 0x00, 0x00, 0x00, 0x18];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u16().unwrap(), 1);
        assert_eq!(cursor.read_id(2).unwrap(), 2);
        assert_eq!(cursor.read_u32().unwrap(), 0x0A00_0000);
        assert_eq!(cursor.read_u8().unwrap(), 24);
        assert_eq!(cursor.position(), 9);
    }

    #[test]
    fn test_read_past_end_fails_closed() {
        let data = [0u8; 3];
        let mut cursor = ByteCursor::new(&data);
        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            OutOfBounds {
                offset: 0,
                needed: 4,
                len: 3
            }
        );
        // Failed reads do not advance.
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_slice_at_overflow() {
        let data = [0u8; 8];
        assert!(slice_at(&data, usize::MAX, 2).is_err());
        assert!(slice_at(&data, 8, 0).is_ok());
        assert!(slice_at(&data, 9, 0).is_err());
    }

    #[test]
    fn test_read_u32_at() {
        let data = [0xFF, 0x0A, 0x00, 0x00, 0x05];
        assert_eq!(read_u32_at(&data, 1).unwrap(), 0x0A00_0005);
        assert!(read_u32_at(&data, 2).is_err());
    }

    #[test]
    fn test_context_conversion() {
        let oob = OutOfBounds {
            offset: 20,
            needed: 66,
            len: 40,
        };
        assert!(matches!(
            oob.dictionary(Category::City),
            DecodeError::MalformedDictionary {
                category: Category::City,
                ..
            }
        ));
        assert!(matches!(oob.record(), DecodeError::MalformedRecord { .. }));
    }
}
