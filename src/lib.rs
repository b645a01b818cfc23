//! ipdb - Reader for the fixed-layout binary IPv4 geolocation database.
//!
//! The database is a sorted array of disjoint IPv4 ranges. Each range carries
//! six small integer ids that index into string dictionaries stored earlier in
//! the file (continent, country, area, region, city, ISP).
//!
//! # Features
//!
//! - **Two layouts**: the legacy 16-bit id layout with a first-octet index and
//!   the current 32-bit id layout, selected once at load time
//! - **Fail-closed decoding**: every offset is bounds-checked; corrupt files are
//!   rejected as a whole, never partially loaded
//! - **Zero-copy queries**: records are decoded in place from the owned buffer,
//!   which may be a `Vec<u8>` or a memory map
//! - **Thread-safe**: a loaded [`Database`] is immutable and needs no locking
//! - **Hot reload**: [`CachedDatabase`] adds a result cache and atomic swaps
//!
//! # Quick Start
//!
//! ```ignore
//! use ipdb::Database;
//!
//! let db = Database::open_readfile("ipdb.dat")?;
//! let result = db.lookup("42.63.123.32")?;
//! println!("{} {} {} {}", result.cidr, result.country, result.region, result.isp);
//! ```
//!
//! Buffers obtained elsewhere are decoded with [`Database::from_source`]:
//!
//! ```ignore
//! use ipdb::{Database, FormatSelection, LoadOptions};
//!
//! let bytes: Vec<u8> = fetch_database()?;
//! let db = Database::from_source_with(bytes, LoadOptions::new(FormatSelection::Legacy))?;
//! let result = db.lookup_raw(708_803_360)?;
//! ```

mod addr;
mod cached;
mod config;
mod cursor;
mod database;
mod dictionary;
mod error;
mod header;
mod index;
mod layout;
mod loader;
mod record;
mod result;

pub mod format;

#[cfg(test)]
mod fixture;

// Re-export core types
pub use error::{DecodeError, Error, LookupError, Result};
pub use format::{Category, FormatVariant};

pub use addr::{ip_to_u32, u32_to_ip};
pub use database::{detect_variant, Database};
pub use dictionary::Dictionary;
pub use header::Header;
pub use index::FirstOctetIndex;
pub use layout::Layout;
pub use record::{IpRange, Record};
pub use result::LookupResult;

// Re-export configuration and loading
pub use cached::{CacheStats, CachedDatabase};
pub use config::{CacheConfig, FormatSelection, LoadOptions, DEFAULT_CACHE_CAPACITY};
pub use loader::read_bytes;
