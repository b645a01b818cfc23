//! The decoded database and its range lookup.

use std::fmt;
use std::net::Ipv4Addr;

use crate::addr::ip_to_u32;
use crate::config::LoadOptions;
use crate::dictionary::Dictionary;
use crate::error::{DecodeError, LookupError};
use crate::format::{Category, FormatVariant, CATEGORY_COUNT};
use crate::header::Header;
use crate::index::FirstOctetIndex;
use crate::layout::Layout;
use crate::record::{IpRange, Record};
use crate::result::LookupResult;

/// An immutable, fully decoded geolocation database.
///
/// The database owns its byte source (`Vec<u8>`, a memory map, a borrowed
/// slice...) for its whole lifetime and never mutates it, so a shared
/// reference can be queried from any number of threads at once.
///
/// # Example
///
/// ```ignore
/// use ipdb::Database;
///
/// let db = Database::open_readfile("ipdb.dat")?;
/// let result = db.lookup("42.63.123.32")?;
/// println!("{} {} {}", result.cidr, result.country, result.isp);
/// ```
pub struct Database<S: AsRef<[u8]> = Vec<u8>> {
    source: S,
    variant: FormatVariant,
    header: Header,
    layout: Layout,
    dictionaries: [Dictionary; CATEGORY_COUNT],
    index: Option<FirstOctetIndex>,
}

impl<S: AsRef<[u8]>> Database<S> {
    /// Decode `source`, detecting the layout from its size.
    pub fn from_source(source: S) -> Result<Self, DecodeError> {
        Self::from_source_with(source, LoadOptions::default())
    }

    /// Decode `source` with explicit options.
    pub fn from_source_with(source: S, options: LoadOptions) -> Result<Self, DecodeError> {
        let variant = match options.format.variant() {
            Some(variant) => variant,
            None => detect_variant(source.as_ref()),
        };
        Self::decode(source, variant)
    }

    fn decode(source: S, variant: FormatVariant) -> Result<Self, DecodeError> {
        let data = source.as_ref();
        let header = Header::decode(data, variant)?;
        let layout = Layout::compute(&header, variant)?;
        layout.validate(data.len())?;

        // Each dictionary starts where the previous one ended.
        let mut dictionaries: [Dictionary; CATEGORY_COUNT] = Default::default();
        let mut offset = variant.header_size();
        for category in Category::ALL {
            let (dictionary, end) =
                Dictionary::decode(data, offset, header.count(category), variant, category)?;
            debug_assert_eq!(end, layout.dictionary(category).end);
            dictionaries[category.index()] = dictionary;
            offset = end;
        }
        debug_assert_eq!(offset, layout.records_start);

        let index = layout
            .index_offset
            .map(|index_offset| FirstOctetIndex::decode(data, index_offset))
            .transpose()?;

        log::debug!(
            "Decoded {} database: version {}, {} records, dictionaries {:?}, records at {}",
            variant,
            header.version,
            header.record_count,
            header.counts,
            layout.records_start
        );

        Ok(Self {
            source,
            variant,
            header,
            layout,
            dictionaries,
            index,
        })
    }

    /// Look up a dotted-quad address.
    pub fn lookup(&self, address: &str) -> Result<LookupResult, LookupError> {
        let ip = ip_to_u32(address)?;
        self.lookup_raw(ip)
    }

    /// Look up an address.
    pub fn lookup_addr(&self, address: Ipv4Addr) -> Result<LookupResult, LookupError> {
        self.lookup_raw(u32::from(address))
    }

    /// Look up an address given as its big-endian `u32` value.
    pub fn lookup_raw(&self, ip: u32) -> Result<LookupResult, LookupError> {
        let position = self.find(ip)?;
        self.materialize(position)
    }

    /// Like [`lookup_raw`](Self::lookup_raw) but searching the whole record
    /// array, ignoring any first-octet index.
    pub fn lookup_raw_unindexed(&self, ip: u32) -> Result<LookupResult, LookupError> {
        let last = self
            .record_count()
            .checked_sub(1)
            .ok_or(LookupError::AddressNotFound(Ipv4Addr::from(ip)))?;
        let position = self.search(ip, 0, last)?;
        self.materialize(position)
    }

    /// Position of the record covering `ip`.
    pub fn find(&self, ip: u32) -> Result<usize, LookupError> {
        let (lo, hi) = self
            .search_window(ip)
            .ok_or(LookupError::AddressNotFound(Ipv4Addr::from(ip)))?;
        log::trace!("Searching {} in records [{}, {}]", Ipv4Addr::from(ip), lo, hi);
        self.search(ip, lo, hi)
    }

    /// Inclusive record window a lookup for `ip` searches.
    ///
    /// Narrowed by the first-octet index when present, otherwise the whole
    /// array. `None` for an empty database.
    pub fn search_window(&self, ip: u32) -> Option<(usize, usize)> {
        let count = self.record_count();
        match &self.index {
            Some(index) => index.window(ip, count),
            None => count.checked_sub(1).map(|last| (0, last)),
        }
    }

    /// Binary search `[lo, hi]` for the record whose range contains `ip`.
    ///
    /// Only the start address and mask of each probed record are decoded.
    fn search(&self, ip: u32, mut lo: usize, mut hi: usize) -> Result<usize, LookupError> {
        let data = self.source.as_ref();
        let record_size = self.variant.record_size();

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let range = IpRange::decode_at(data, self.layout.records_start + mid * record_size)?;

            if range.contains(ip) {
                return Ok(mid);
            }
            if ip > range.end() {
                lo = mid + 1;
            } else {
                match mid.checked_sub(1) {
                    Some(next) => hi = next,
                    None => break,
                }
            }
        }

        Err(LookupError::AddressNotFound(Ipv4Addr::from(ip)))
    }

    fn materialize(&self, position: usize) -> Result<LookupResult, LookupError> {
        let record = self.record(position)?;
        Ok(LookupResult::materialize(&record, &self.dictionaries))
    }

    /// Decode the record at `position`.
    pub fn record(&self, position: usize) -> Result<Record, DecodeError> {
        let record_size = self.variant.record_size();
        let offset = self
            .layout
            .records_start
            .saturating_add(position.saturating_mul(record_size));
        if position >= self.record_count() {
            return Err(DecodeError::MalformedRecord {
                offset,
                needed: record_size,
                len: self.layout.records_end,
            });
        }
        Record::decode_at(self.source.as_ref(), offset, self.variant)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn record_count(&self) -> usize {
        self.header.record_count as usize
    }

    pub fn dictionary(&self, category: Category) -> &Dictionary {
        &self.dictionaries[category.index()]
    }

    /// The first-octet index, present only for the legacy layout.
    pub fn index(&self) -> Option<&FirstOctetIndex> {
        self.index.as_ref()
    }

    /// The raw bytes backing this database.
    pub fn as_bytes(&self) -> &[u8] {
        self.source.as_ref()
    }
}

impl<S: AsRef<[u8]>> fmt::Debug for Database<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("variant", &self.variant)
            .field("header", &self.header)
            .field("layout", &self.layout)
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

/// Guess the layout of `data` from the sizes its header declares.
///
/// A variant whose layout accounts for exactly `data.len()` bytes wins,
/// current before legacy. Failing that, the first variant whose layout fits
/// inside the buffer is used. Otherwise the legacy layout is assumed and its
/// decode error surfaces to the caller.
///
/// The header's version tag is not consulted. Its values are not tied to a
/// layout, so the same tag can appear in files of either kind. Use
/// [`FormatSelection`](crate::FormatSelection) to pin the layout explicitly.
pub fn detect_variant(data: &[u8]) -> FormatVariant {
    const CANDIDATES: [FormatVariant; 2] = [FormatVariant::Current, FormatVariant::Legacy];

    let expected_len = |variant: FormatVariant| {
        Header::decode(data, variant)
            .and_then(|header| Layout::compute(&header, variant))
            .map(|layout| layout.total_len)
            .ok()
    };

    if let Some(&variant) = CANDIDATES
        .iter()
        .find(|&&v| expected_len(v) == Some(data.len()))
    {
        return variant;
    }

    if let Some(&variant) = CANDIDATES
        .iter()
        .find(|&&v| matches!(expected_len(v), Some(n) if n <= data.len()))
    {
        log::warn!(
            "No layout matches {} bytes exactly; decoding as {} with trailing data",
            data.len(),
            variant
        );
        return variant;
    }

    log::warn!("No layout fits {} bytes; assuming legacy", data.len());
    FormatVariant::Legacy
}
