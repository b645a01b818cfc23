//! Id-to-name dictionaries.

use ahash::AHashMap;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::format::{Category, FormatVariant};

/// Mapping from a category id to its display name.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    category: Option<Category>,
    names: AHashMap<u32, String>,
}

impl Dictionary {
    /// Decode `count` fixed-size entries starting at `offset`.
    ///
    /// Returns the dictionary and the offset just past its last entry, which
    /// is where the next segment begins.
    pub fn decode(
        data: &[u8],
        offset: usize,
        count: u32,
        variant: FormatVariant,
        category: Category,
    ) -> Result<(Self, usize), DecodeError> {
        let id_width = variant.id_width();
        let name_width = category.name_width();
        let mut cursor = ByteCursor::at(data, offset);
        let mut names = AHashMap::with_capacity(count as usize);

        for _ in 0..count {
            let id = cursor
                .read_id(id_width)
                .map_err(|e| e.dictionary(category))?;
            let raw = cursor
                .read_bytes(name_width)
                .map_err(|e| e.dictionary(category))?;
            let name = String::from_utf8_lossy(variant.trim_name(raw)).into_owned();
            names.insert(id, name);
        }

        Ok((
            Self {
                category: Some(category),
                names,
            },
            cursor.position(),
        ))
    }

    /// Category this dictionary was decoded for.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Name for `id`, or the empty string when the id is unknown.
    pub fn resolve(&self, id: u32) -> &str {
        self.get(id).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(id, name)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }
}
