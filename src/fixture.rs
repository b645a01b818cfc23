//! Synthetic database buffers for tests.

use std::net::Ipv4Addr;

use crate::format::{Category, FormatVariant, CATEGORY_COUNT, INDEX_ENTRIES};

/// Builds a valid database buffer in either layout.
pub(crate) struct FixtureBuilder {
    variant: FormatVariant,
    version: u32,
    dictionaries: [Vec<(u32, Vec<u8>)>; CATEGORY_COUNT],
    records: Vec<(u32, u8, [u32; CATEGORY_COUNT])>,
    index: Option<[u32; INDEX_ENTRIES]>,
    trailing: Vec<u8>,
}

impl FixtureBuilder {
    pub fn new(variant: FormatVariant) -> Self {
        Self {
            variant,
            version: 1,
            dictionaries: Default::default(),
            records: Vec::new(),
            index: None,
            trailing: Vec::new(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn entry(mut self, category: Category, id: u32, name: &str) -> Self {
        self.dictionaries[category.index()].push((id, name.as_bytes().to_vec()));
        self
    }

    /// Entry whose name field is written verbatim (before null padding).
    pub fn raw_entry(mut self, category: Category, id: u32, name: &[u8]) -> Self {
        self.dictionaries[category.index()].push((id, name.to_vec()));
        self
    }

    pub fn continent(self, id: u32, name: &str) -> Self {
        self.entry(Category::Continent, id, name)
    }

    pub fn country(self, id: u32, name: &str) -> Self {
        self.entry(Category::Country, id, name)
    }

    pub fn record(self, ip: &str, mask: u8, ids: [u32; CATEGORY_COUNT]) -> Self {
        let ip: Ipv4Addr = ip.parse().expect("fixture ip");
        self.record_raw(u32::from(ip), mask, ids)
    }

    pub fn record_raw(mut self, start: u32, mask: u8, ids: [u32; CATEGORY_COUNT]) -> Self {
        self.records.push((start, mask, ids));
        self
    }

    /// Replace the computed first-octet index.
    pub fn index(mut self, entries: [u32; INDEX_ENTRIES]) -> Self {
        self.index = Some(entries);
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    /// First-octet index over records sorted by start: each octet that
    /// begins at least one record points at its first record.
    pub fn computed_index(&self) -> [u32; INDEX_ENTRIES] {
        let mut entries = [0u32; INDEX_ENTRIES];
        let mut seen = [false; INDEX_ENTRIES];
        for (i, (start, _, _)) in self.sorted_records().iter().enumerate() {
            let octet = (*start >> 24) as usize;
            if !seen[octet] {
                seen[octet] = true;
                entries[octet] = i as u32;
            }
        }
        entries
    }

    fn sorted_records(&self) -> Vec<(u32, u8, [u32; CATEGORY_COUNT])> {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.0);
        records
    }

    pub fn build(&self) -> Vec<u8> {
        let v = self.variant;
        let mut out = Vec::new();

        out.extend_from_slice(&self.version.to_be_bytes());
        for dictionary in &self.dictionaries {
            put_id(&mut out, v, dictionary.len() as u32);
        }
        out.extend_from_slice(&(self.records.len() as u32).to_be_bytes());
        assert_eq!(out.len(), v.header_size());

        for category in Category::ALL {
            for (id, name) in &self.dictionaries[category.index()] {
                put_id(&mut out, v, *id);
                let mut field = name.clone();
                field.resize(category.name_width(), 0);
                out.extend_from_slice(&field);
            }
        }

        for (start, mask, ids) in self.sorted_records() {
            out.extend_from_slice(&start.to_be_bytes());
            out.push(mask);
            for id in ids {
                put_id(&mut out, v, id);
            }
        }

        if v.has_index() {
            let entries = self.index.unwrap_or_else(|| self.computed_index());
            for entry in entries {
                out.extend_from_slice(&entry.to_be_bytes());
            }
        }

        out.extend_from_slice(&self.trailing);
        out
    }
}

fn put_id(out: &mut Vec<u8>, variant: FormatVariant, id: u32) {
    match variant.id_width() {
        2 => out.extend_from_slice(&(id as u16).to_be_bytes()),
        _ => out.extend_from_slice(&id.to_be_bytes()),
    }
}

/// One continent `{1: "AS"}`, one country `{1: "CN"}` and a single
/// `10.0.0.0/24` record pointing at both.
pub(crate) fn sample_db(variant: FormatVariant) -> Vec<u8> {
    FixtureBuilder::new(variant)
        .continent(1, "AS")
        .country(1, "CN")
        .record_raw(167_772_160, 24, [1, 1, 0, 0, 0, 0])
        .build()
}

/// A database with every category populated and a mix of prefix lengths,
/// adjacent ranges and gaps, spread over several top octets.
pub(crate) fn rich_builder(variant: FormatVariant) -> FixtureBuilder {
    FixtureBuilder::new(variant)
        .continent(1, "AS")
        .continent(2, "NA")
        .continent(3, "EU")
        .country(1, "CN")
        .country(2, "US")
        .country(3, "DE")
        .entry(Category::Area, 1, "East China")
        .entry(Category::Area, 2, "West Coast")
        .entry(Category::Region, 1, "Zhejiang")
        .entry(Category::Region, 2, "California")
        .entry(Category::Region, 3, "Hesse")
        .entry(Category::City, 1, "Hangzhou")
        .entry(Category::City, 2, "Mountain View")
        .entry(Category::City, 3, "Frankfurt")
        .entry(Category::Isp, 1, "China Telecom")
        .entry(Category::Isp, 2, "Google")
        .entry(Category::Isp, 3, "DE-CIX")
        .record("1.0.0.0", 24, [1, 1, 1, 1, 1, 1])
        .record("1.0.1.0", 24, [1, 1, 1, 1, 1, 1])
        .record("1.0.4.0", 22, [1, 1, 1, 1, 1, 1])
        .record("8.8.8.0", 24, [2, 2, 2, 2, 2, 2])
        .record("8.8.9.0", 32, [2, 2, 2, 2, 2, 2])
        .record("10.0.0.0", 24, [1, 1, 0, 0, 0, 0])
        .record("42.63.0.0", 16, [1, 1, 1, 1, 1, 1])
        .record("42.64.0.0", 10, [1, 1, 1, 1, 1, 9])
        .record("80.81.192.0", 22, [3, 3, 0, 3, 3, 3])
        .record("100.0.0.0", 7, [2, 2, 0, 0, 0, 0])
        .record("172.16.0.0", 12, [0, 0, 0, 0, 0, 0])
        .record("200.0.0.0", 8, [2, 2, 2, 2, 2, 2])
        .record("255.255.255.0", 24, [3, 3, 0, 0, 0, 0])
}
