//! Cached database handle with hot reload support.
//!
//! This module provides a shared lookup handle with:
//! - LRU cache for lookup results
//! - Atomic hot reload for swapping in a new database without downtime
//! - Thread-safe concurrent access

use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use quick_cache::sync::Cache;

use crate::addr::ip_to_u32;
use crate::config::CacheConfig;
use crate::database::Database;
use crate::error::LookupError;
use crate::result::LookupResult;
use crate::Result;

/// Cached lookups over a database that can be replaced at runtime.
///
/// Not-found outcomes are cached along with matches. Queries already in
/// flight during a reload finish against the database they started on.
///
/// # Example
///
/// ```ignore
/// use ipdb::CachedDatabase;
/// use std::path::Path;
///
/// let db = CachedDatabase::open(Path::new("ipdb.dat"))?;
/// let result = db.lookup("42.63.123.32")?;
///
/// // Hot reload a newer file
/// db.reload(Path::new("ipdb-new.dat"))?;
/// ```
pub struct CachedDatabase {
    /// The current database, wrapped in ArcSwap for atomic replacement.
    inner: ArcSwap<Database>,
    /// Cache of lookup outcomes keyed by address, tagged with the generation
    /// they were computed under. `None` means not found.
    cache: Option<Cache<u32, CacheEntry>>,
    config: CacheConfig,
    /// Incremented on every reload.
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedDatabase {
    /// Open a database file with default configuration.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, CacheConfig::default())
    }

    /// Open a database file with custom configuration.
    pub fn open_with_config(path: &Path, config: CacheConfig) -> Result<Self> {
        let db = Database::open_readfile_with(path, config.load)?;
        Ok(Self::new(db, config))
    }

    /// Create from bytes with default configuration.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_config(data, CacheConfig::default())
    }

    /// Create from bytes with custom configuration.
    pub fn from_bytes_with_config(data: Vec<u8>, config: CacheConfig) -> Result<Self> {
        let db = Database::from_source_with(data, config.load)?;
        Ok(Self::new(db, config))
    }

    /// Wrap an already decoded database.
    pub fn new(db: Database, config: CacheConfig) -> Self {
        let cache = if config.cache_enabled && config.cache_capacity > 0 {
            Some(Cache::new(config.cache_capacity))
        } else {
            None
        };

        Self {
            inner: ArcSwap::from_pointee(db),
            cache,
            config,
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Hot reload from a new file.
    ///
    /// The new file is fully decoded before anything is swapped; on failure
    /// the current database stays in service.
    pub fn reload(&self, path: &Path) -> Result<()> {
        let db = Database::open_readfile_with(path, self.config.load)?;
        self.swap(db);
        log::info!("Hot reloaded database from {:?}", path);
        Ok(())
    }

    /// Hot reload from bytes.
    pub fn reload_from_bytes(&self, data: Vec<u8>) -> Result<()> {
        let db = Database::from_source_with(data, self.config.load)?;
        self.swap(db);
        log::info!("Hot reloaded database from bytes");
        Ok(())
    }

    // The database must be stored before the generation moves: a reader
    // that observes the new generation is then guaranteed to load the new
    // database.
    fn swap(&self, db: Database) {
        self.inner.store(Arc::new(db));
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.clear_cache();
    }

    /// Look up a dotted-quad address with caching.
    pub fn lookup(&self, address: &str) -> std::result::Result<LookupResult, LookupError> {
        let ip = ip_to_u32(address)?;
        self.lookup_raw(ip)
    }

    /// Look up an address with caching.
    pub fn lookup_addr(&self, address: Ipv4Addr) -> std::result::Result<LookupResult, LookupError> {
        self.lookup_raw(u32::from(address))
    }

    /// Look up a `u32` address with caching.
    ///
    /// Entries computed before the latest reload are never served, even if a
    /// slow lookup writes one back after the cache was cleared.
    pub fn lookup_raw(&self, ip: u32) -> std::result::Result<LookupResult, LookupError> {
        let not_found = || LookupError::AddressNotFound(Ipv4Addr::from(ip));

        // Read the generation before the database, never after.
        let generation = self.generation.load(Ordering::SeqCst);

        // Check cache first
        if let Some(ref cache) = self.cache {
            match cache.get(&ip) {
                Some(entry) if entry.generation == generation => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return entry.outcome.ok_or_else(not_found);
                }
                _ => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        // Cache miss - perform lookup
        let db = self.inner.load();
        let outcome = match db.lookup_raw(ip) {
            Ok(result) => Some(result),
            Err(LookupError::AddressNotFound(_)) => None,
            Err(err) => return Err(err),
        };

        // Store in cache
        if let Some(ref cache) = self.cache {
            cache.insert(
                ip,
                CacheEntry {
                    generation,
                    outcome: outcome.clone(),
                },
            );
        }

        outcome.ok_or_else(not_found)
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        match self.cache {
            Some(ref cache) => CacheStats {
                capacity: self.config.cache_capacity,
                len: cache.len(),
                hits: self.hits.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
                enabled: true,
            },
            None => CacheStats::default(),
        }
    }

    /// Get the current generation (incremented on each reload).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Get the database currently in service.
    ///
    /// The returned guard may become stale after a hot reload.
    pub fn inner(&self) -> arc_swap::Guard<Arc<Database>> {
        self.inner.load()
    }
}

#[derive(Clone)]
struct CacheEntry {
    generation: u64,
    outcome: Option<LookupResult>,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    pub hits: u64,
    pub misses: u64,
    /// Whether caching is enabled.
    pub enabled: bool,
}
