//! First-octet acceleration index (legacy variant).

use crate::cursor::read_u32_at;
use crate::error::DecodeError;
use crate::format::{INDEX_ENTRIES, INDEX_ENTRY_SIZE};

/// 256-entry table mapping a top octet to the record index where records
/// starting with that octet begin.
///
/// A zero entry means no record starts with that exact octet, so lookups
/// scan outwards to the nearest set neighbour on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstOctetIndex {
    entries: [u32; INDEX_ENTRIES],
}

impl FirstOctetIndex {
    /// Decode 256 big-endian `u32` entries starting at `offset`.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let mut entries = [0u32; INDEX_ENTRIES];
        for (i, entry) in entries.iter_mut().enumerate() {
            let pos = offset + i * INDEX_ENTRY_SIZE;
            *entry = read_u32_at(data, pos).map_err(|e| e.index())?;
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: [u32; INDEX_ENTRIES]) -> Self {
        Self { entries }
    }

    pub fn entry(&self, octet: u8) -> u32 {
        self.entries[octet as usize]
    }

    /// Inclusive lower bound: the first set entry scanning `octet, octet-1, .., 0`.
    pub fn lower_bound(&self, octet: u8) -> usize {
        self.entries[..=octet as usize]
            .iter()
            .rev()
            .find(|&&e| e != 0)
            .map_or(0, |&e| e as usize)
    }

    /// Inclusive upper bound: the first set entry scanning `octet+1, .., 255`,
    /// or `last` when none is set.
    pub fn upper_bound(&self, octet: u8, last: usize) -> usize {
        self.entries[octet as usize + 1..]
            .iter()
            .find(|&&e| e != 0)
            .map_or(last, |&e| e as usize)
    }

    /// Search window `[lo, hi]` for `ip` over `record_count` records.
    ///
    /// Bounds are clamped to the record array. Returns `None` when there is
    /// nothing to search.
    pub fn window(&self, ip: u32, record_count: usize) -> Option<(usize, usize)> {
        let last = record_count.checked_sub(1)?;
        let octet = (ip >> 24) as u8;
        let lo = self.lower_bound(octet).min(last);
        let hi = self.upper_bound(octet, last).min(last);
        (lo <= hi).then_some((lo, hi))
    }
}
