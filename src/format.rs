//! On-disk format constants and the two layout variants.
//!
//! Both variants are big-endian throughout:
//!
//! ```text
//! +----------------------+
//! |       HEADER         |  20 bytes (legacy) / 32 bytes (current)
//! +----------------------+
//! | CONTINENT dictionary |  count * (id + 2)
//! | COUNTRY dictionary   |  count * (id + 2)
//! | AREA dictionary      |  count * (id + 64)
//! | REGION dictionary    |  count * (id + 64)
//! | CITY dictionary      |  count * (id + 64)
//! | ISP dictionary       |  count * (id + 64)
//! +----------------------+  <- Rstart
//! |       RECORDS        |  count * (4 + 1 + 6 * id)
//! +----------------------+
//! | FIRST-OCTET INDEX    |  256 * 4 bytes (legacy only)
//! +----------------------+
//! ```
//!
//! `id` is 2 bytes in the legacy variant and 4 bytes in the current one.

use std::fmt;

use serde::Serialize;

/// Width of the short name field (continent, country codes).
pub const SHORT_NAME_WIDTH: usize = 2;

/// Width of the long name field (area, region, city, ISP).
pub const LONG_NAME_WIDTH: usize = 64;

/// Number of entries in the first-octet index.
pub const INDEX_ENTRIES: usize = 256;

/// Size of one first-octet index entry.
pub const INDEX_ENTRY_SIZE: usize = 4;

/// Total size of the first-octet index in bytes.
pub const INDEX_SIZE: usize = INDEX_ENTRIES * INDEX_ENTRY_SIZE;

/// Number of label categories carried by every record.
pub const CATEGORY_COUNT: usize = 6;

/// Label category, in on-disk dictionary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Continent,
    Country,
    Area,
    Region,
    City,
    Isp,
}

impl Category {
    /// All categories in the order their dictionaries appear in the file.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Continent,
        Category::Country,
        Category::Area,
        Category::Region,
        Category::City,
        Category::Isp,
    ];

    /// Position of this category in dictionary and record order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Width of the fixed name field for this category.
    pub fn name_width(self) -> usize {
        match self {
            Category::Continent | Category::Country => SHORT_NAME_WIDTH,
            _ => LONG_NAME_WIDTH,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Continent => "continent",
            Category::Country => "country",
            Category::Area => "area",
            Category::Region => "region",
            Category::City => "city",
            Category::Isp => "isp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the two mutually incompatible binary layouts.
///
/// Every width that differs between the layouts is answered here, so decoding
/// and lookup code never branch on the variant directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVariant {
    /// 16-bit ids, 20-byte header, trailing first-octet index
    Legacy,
    /// 32-bit ids, 32-byte header, no index
    Current,
}

impl FormatVariant {
    /// Size of the fixed header.
    pub fn header_size(self) -> usize {
        match self {
            FormatVariant::Legacy => 20,
            FormatVariant::Current => 32,
        }
    }

    /// Width of every dictionary id and record category id.
    pub fn id_width(self) -> usize {
        match self {
            FormatVariant::Legacy => 2,
            FormatVariant::Current => 4,
        }
    }

    /// Size of one dictionary entry for the given category.
    pub fn entry_size(self, category: Category) -> usize {
        self.id_width() + category.name_width()
    }

    /// Size of one record: ip (4) + mask (1) + six category ids.
    pub fn record_size(self) -> usize {
        4 + 1 + CATEGORY_COUNT * self.id_width()
    }

    /// Whether a first-octet index follows the record array.
    pub fn has_index(self) -> bool {
        matches!(self, FormatVariant::Legacy)
    }

    /// Strip null padding from a fixed-width name field.
    ///
    /// The legacy writer may leave nulls on either side of the name.
    pub fn trim_name(self, raw: &[u8]) -> &[u8] {
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
        let raw = &raw[..end];
        match self {
            FormatVariant::Legacy => {
                let start = raw.iter().position(|&b| b != 0).unwrap_or(raw.len());
                &raw[start..]
            }
            FormatVariant::Current => raw,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatVariant::Legacy => "legacy",
            FormatVariant::Current => "current",
        }
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
