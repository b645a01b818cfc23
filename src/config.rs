//! Load and cache configuration types.

use std::str::FromStr;

use crate::error::DecodeError;
use crate::format::FormatVariant;

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Which on-disk layout to decode a buffer as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatSelection {
    /// Pick the layout whose declared size matches the buffer
    #[default]
    Auto,
    /// Force the 16-bit id layout with a first-octet index
    Legacy,
    /// Force the 32-bit id layout
    Current,
}

impl FormatSelection {
    pub fn name(&self) -> &'static str {
        match self {
            FormatSelection::Auto => "auto",
            FormatSelection::Legacy => "legacy",
            FormatSelection::Current => "current",
        }
    }

    /// The forced variant, or `None` for auto-detection.
    pub fn variant(&self) -> Option<FormatVariant> {
        match self {
            FormatSelection::Auto => None,
            FormatSelection::Legacy => Some(FormatVariant::Legacy),
            FormatSelection::Current => Some(FormatVariant::Current),
        }
    }
}

impl FromStr for FormatSelection {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(FormatSelection::Auto),
            "legacy" | "v1" => Ok(FormatSelection::Legacy),
            "current" | "v2" => Ok(FormatSelection::Current),
            _ => Err(DecodeError::UnknownFormat(s.to_string())),
        }
    }
}

impl From<FormatVariant> for FormatSelection {
    fn from(variant: FormatVariant) -> Self {
        match variant {
            FormatVariant::Legacy => FormatSelection::Legacy,
            FormatVariant::Current => FormatSelection::Current,
        }
    }
}

/// Options applied when decoding a database buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub format: FormatSelection,
}

impl LoadOptions {
    pub fn new(format: FormatSelection) -> Self {
        Self { format }
    }
}

/// Configuration for [`CachedDatabase`](crate::CachedDatabase).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub cache_capacity: usize,
    /// Whether to enable caching.
    pub cache_enabled: bool,
    /// How buffers are decoded on open and reload.
    pub load: LoadOptions,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_enabled: true,
            load: LoadOptions::default(),
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with the specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            ..Self::default()
        }
    }

    /// Create a configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self {
            cache_capacity: 0,
            cache_enabled: false,
            ..Self::default()
        }
    }

    /// Decode buffers with the given format selection.
    pub fn with_format(mut self, format: FormatSelection) -> Self {
        self.load.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("auto".parse(), Ok(FormatSelection::Auto));
        assert_eq!("LEGACY".parse(), Ok(FormatSelection::Legacy));
        assert_eq!("v2".parse(), Ok(FormatSelection::Current));
        assert_eq!(
            "ipv6".parse::<FormatSelection>(),
            Err(DecodeError::UnknownFormat("ipv6".to_string()))
        );
    }

    #[test]
    fn test_format_variant_mapping() {
        assert_eq!(FormatSelection::Auto.variant(), None);
        assert_eq!(
            FormatSelection::from(FormatVariant::Legacy).variant(),
            Some(FormatVariant::Legacy)
        );
        assert_eq!(FormatSelection::Current.name(), "current");
    }

    #[test]
    fn test_cache_config() {
        let config = CacheConfig::default();
        assert!(config.cache_enabled);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.load.format, FormatSelection::Auto);

        let config = CacheConfig::no_cache().with_format(FormatSelection::Legacy);
        assert!(!config.cache_enabled);
        assert_eq!(config.load.format, FormatSelection::Legacy);

        assert_eq!(CacheConfig::with_capacity(5).cache_capacity, 5);
    }
}
