//! Materialized lookup results.

use std::fmt;

use ipnet::Ipv4Net;
use serde::Serialize;

use crate::dictionary::Dictionary;
use crate::format::{Category, CATEGORY_COUNT};
use crate::record::Record;

/// Result of a successful lookup. Owned entirely by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LookupResult {
    /// Matched range in `a.b.c.d/len` form
    pub cidr: String,
    #[serde(skip)]
    pub network: Ipv4Net,
    pub continent: String,
    pub country: String,
    pub area: String,
    pub region: String,
    pub city: String,
    pub isp: String,
}

impl LookupResult {
    /// Resolve a matched record against the six dictionaries.
    ///
    /// Ids missing from their dictionary resolve to an empty label.
    pub(crate) fn materialize(record: &Record, dictionaries: &[Dictionary; CATEGORY_COUNT]) -> Self {
        let label = |category: Category| {
            dictionaries[category.index()]
                .resolve(record.id(category))
                .to_string()
        };
        let network = record.range.network();

        Self {
            cidr: network.to_string(),
            network,
            continent: label(Category::Continent),
            country: label(Category::Country),
            area: label(Category::Area),
            region: label(Category::Region),
            city: label(Category::City),
            isp: label(Category::Isp),
        }
    }

    /// Label for one category.
    pub fn label(&self, category: Category) -> &str {
        match category {
            Category::Continent => &self.continent,
            Category::Country => &self.country,
            Category::Area => &self.area,
            Category::Region => &self.region,
            Category::City => &self.city,
            Category::Isp => &self.isp,
        }
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cidr)?;
        for category in Category::ALL {
            write!(f, "\t{}", self.label(category))?;
        }
        Ok(())
    }
}
