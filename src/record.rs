//! Range records.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::format::{Category, FormatVariant, CATEGORY_COUNT};

/// The range half of a record: `[start, start + 2^(32-mask) - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    pub start: u32,
    pub mask: u8,
}

impl IpRange {
    /// Read only the start address and prefix length of the record at `offset`.
    #[inline]
    pub fn decode_at(data: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let mut cursor = ByteCursor::at(data, offset);
        let start = cursor.read_u32().map_err(|e| e.record())?;
        let mask = cursor.read_u8().map_err(|e| e.record())?;
        if mask > 32 {
            return Err(DecodeError::InvalidMask { offset, mask });
        }
        Ok(Self { start, mask })
    }

    /// Number of addresses covered. `2^32` for a /0.
    #[inline]
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.mask))
    }

    /// Last address covered, inclusive.
    ///
    /// A start that is not aligned to its prefix can push the end past the
    /// address space; the end is clamped rather than wrapped.
    #[inline]
    pub fn end(&self) -> u32 {
        let end = u64::from(self.start) + self.size() - 1;
        end.min(u64::from(u32::MAX)) as u32
    }

    #[inline]
    pub fn contains(&self, ip: u32) -> bool {
        ip >= self.start && ip <= self.end()
    }

    /// The range as a CIDR network.
    pub fn network(&self) -> Ipv4Net {
        // mask <= 32 is checked on decode
        Ipv4Net::new(Ipv4Addr::from(self.start), self.mask)
            .unwrap_or_else(|_| Ipv4Net::from(Ipv4Addr::from(self.start)))
    }
}

/// A fully decoded record: a range plus one id per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub range: IpRange,
    /// Category ids, in [`Category::ALL`] order
    pub ids: [u32; CATEGORY_COUNT],
}

impl Record {
    /// Decode the record at `offset`.
    pub fn decode_at(data: &[u8], offset: usize, variant: FormatVariant) -> Result<Self, DecodeError> {
        let range = IpRange::decode_at(data, offset)?;
        let mut cursor = ByteCursor::at(data, offset + 5);
        let mut ids = [0u32; CATEGORY_COUNT];
        for id in ids.iter_mut() {
            *id = cursor
                .read_id(variant.id_width())
                .map_err(|e| e.record())?;
        }
        Ok(Self { range, ids })
    }

    pub fn id(&self, category: Category) -> u32 {
        self.ids[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let r = IpRange {
            start: 0x0A00_0000,
            mask: 24,
        };
        assert_eq!(r.size(), 256);
        assert_eq!(r.end(), 0x0A00_00FF);
        assert!(r.contains(0x0A00_0000));
        assert!(r.contains(0x0A00_00FF));
        assert!(!r.contains(0x09FF_FFFF));
        assert!(!r.contains(0x0A00_0100));
    }

    #[test]
    fn test_mask_extremes() {
        let all = IpRange { start: 0, mask: 0 };
        assert_eq!(all.size(), 1 << 32);
        assert_eq!(all.end(), u32::MAX);
        assert!(all.contains(0));
        assert!(all.contains(u32::MAX));

        let host = IpRange {
            start: 0x0808_0808,
            mask: 32,
        };
        assert_eq!(host.end(), 0x0808_0808);
        assert!(host.contains(0x0808_0808));
        assert!(!host.contains(0x0808_0809));
    }

    #[test]
    fn test_unaligned_end_is_clamped() {
        let r = IpRange {
            start: 0xFFFF_FF00,
            mask: 16,
        };
        assert_eq!(r.end(), u32::MAX);
    }

    #[test]
    fn test_decode_legacy_record() {
        let mut data = vec![0xAA];
        data.extend_from_slice(&0x0A00_0000u32.to_be_bytes());
        data.push(24);
        for id in 1u16..=6 {
            data.extend_from_slice(&id.to_be_bytes());
        }
        assert_eq!(data.len(), 1 + 17);

        let record = Record::decode_at(&data, 1, FormatVariant::Legacy).unwrap();
        assert_eq!(record.range.start, 0x0A00_0000);
        assert_eq!(record.range.mask, 24);
        assert_eq!(record.ids, [1, 2, 3, 4, 5, 6]);
        assert_eq!(record.id(Category::City), 5);
        assert_eq!(record.range.network().to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_decode_truncated_record() {
        let mut data = 0x0A00_0000u32.to_be_bytes().to_vec();
        data.push(24);
        data.extend_from_slice(&[0u8; 20]);
        assert!(matches!(
            Record::decode_at(&data, 0, FormatVariant::Current),
            Err(DecodeError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_invalid_mask() {
        let mut data = 0u32.to_be_bytes().to_vec();
        data.push(33);
        assert_eq!(
            IpRange::decode_at(&data, 0),
            Err(DecodeError::InvalidMask { offset: 0, mask: 33 })
        );
    }
}
