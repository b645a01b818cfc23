//! Loading database files from disk.
//!
//! Files ending in `.gz` are decompressed into memory before decoding.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use memmap2::Mmap;

use crate::config::LoadOptions;
use crate::database::Database;
use crate::Result;

/// Read a database file into memory, gunzipping `.gz` files.
pub fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let raw = fs::read(path)?;

    if is_gzip(path) {
        let mut decoder = GzDecoder::new(&raw[..]);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        log::debug!(
            "Decompressed {:?}: {} -> {} bytes",
            path,
            raw.len(),
            decompressed.len()
        );
        Ok(decompressed)
    } else {
        Ok(raw)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

impl Database<Vec<u8>> {
    /// Read and decode a database file.
    pub fn open_readfile(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_readfile_with(path, LoadOptions::default())
    }

    /// Read and decode a database file with explicit options.
    pub fn open_readfile_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = read_bytes(path)?;
        let db = Database::from_source_with(data, options)?;
        log::info!(
            "Loaded {} database from {:?}: {} records",
            db.variant(),
            path,
            db.record_count()
        );
        Ok(db)
    }
}

impl Database<Mmap> {
    /// Memory-map and decode an uncompressed database file.
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_mmap_with(path, LoadOptions::default())
    }

    /// Memory-map and decode an uncompressed database file with explicit options.
    ///
    /// The file must not be modified while the database is alive.
    pub fn open_mmap_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let db = Database::from_source_with(mmap, options)?;
        log::info!(
            "Mapped {} database from {:?}: {} records",
            db.variant(),
            path,
            db.record_count()
        );
        Ok(db)
    }
}
