//! Error types for ipdb.

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::format::Category;

/// Error type for ipdb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The database buffer could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A query could not be answered
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ipdb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for decoding a database buffer.
///
/// Any of these aborts a load; no partially decoded database is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer is shorter than the header of the selected format
    #[error("malformed header: expected at least {expected} bytes, got {actual}")]
    MalformedHeader { expected: usize, actual: usize },

    /// A dictionary segment runs past the end of the buffer
    #[error("malformed {category} dictionary: {needed} bytes at offset {offset} exceed buffer of {len}")]
    MalformedDictionary {
        category: Category,
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The record array is truncated or a record is invalid
    #[error("malformed record: {needed} bytes at offset {offset} exceed buffer of {len}")]
    MalformedRecord {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A record carries a prefix length outside 0..=32
    #[error("malformed record at offset {offset}: invalid prefix length {mask}")]
    InvalidMask { offset: usize, mask: u8 },

    /// The first-octet index is truncated
    #[error("malformed first-octet index: {needed} bytes at offset {offset} exceed buffer of {len}")]
    MalformedIndex {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// Unknown format name in configuration
    #[error("unknown database format: {0}")]
    UnknownFormat(String),
}

/// Error type for database queries.
///
/// A lookup error never invalidates the database it was raised on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Query text is not an IPv4 dotted quad
    #[error("invalid IPv4 address: {0}")]
    InvalidAddressFormat(String),

    /// No record covers the address
    #[error("address not found: {0}")]
    AddressNotFound(Ipv4Addr),

    /// A record touched during the search could not be decoded
    #[error("corrupt database: {0}")]
    Corrupt(#[from] DecodeError),
}
