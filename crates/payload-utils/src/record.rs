//! Records, and the record set embedded in the payload document.
//!
//! A record set is an append-only collection of randomly generated records.
//! Generation keeps appending records until the set's compact JSON
//! serialization reaches a caller-supplied size threshold, so the set that
//! ends up embedded in the envelope is guaranteed to be oversized.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.

use crate::{
    error::PayloadError,
    text::alphanumeric_string,
    utc_timestamp,
};
use anyhow::{anyhow, Result};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::vec::Vec;

////////////////////////////////////////////////////////////////////////////////
// Constants.
////////////////////////////////////////////////////////////////////////////////

/// The number of random alphanumeric characters appended to each record's
/// description.
pub const DESCRIPTION_SUFFIX_LENGTH: usize = 50;
/// The number of random alphanumeric characters forming each record's value.
pub const VALUE_LENGTH: usize = 20;
/// The record set keeps growing until its compact JSON serialization is at
/// least this many bytes (1 MiB).
pub const SERIALIZED_SIZE_THRESHOLD: usize = 1024 * 1024;

/// Byte length of the compact serialization of an empty record set, namely
/// the literal `{"records":[]}`.
const EMPTY_SERIALIZATION_SIZE: usize = "{\"records\":[]}".len();

////////////////////////////////////////////////////////////////////////////////
// Records.
////////////////////////////////////////////////////////////////////////////////

/// A single synthetic record.  Records are immutable once created, and are
/// serialized with their fields in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The zero-based position of the record within the record set at the
    /// time it was created.
    index: u64,
    /// The UTC time at which the record was created, rendered as an ISO-8601
    /// timestamp with a `Z` suffix.
    timestamp: String,
    /// A human-readable description embedding the record's index and a
    /// random alphanumeric suffix.
    description: String,
    /// An opaque random alphanumeric string.
    value: String,
}

impl Record {
    /// Creates a fresh record at position `index`, sampling the description
    /// suffix and the value from `rng` and the timestamp from the system
    /// clock.
    pub fn new(rng: &mut impl Rng, index: u64) -> Self {
        Self {
            index,
            timestamp: utc_timestamp(),
            description: format!(
                "record {}: {}",
                index,
                alphanumeric_string(rng, DESCRIPTION_SUFFIX_LENGTH)
            ),
            value: alphanumeric_string(rng, VALUE_LENGTH),
        }
    }

    /// Returns the record's index.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the record's creation timestamp.
    #[inline]
    pub fn timestamp(&self) -> &str {
        self.timestamp.as_str()
    }

    /// Returns the record's description.
    #[inline]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the record's value.
    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Record sets.
////////////////////////////////////////////////////////////////////////////////

/// The collection of records embedded in the payload document.  The compact
/// serialization of this type is the value of the envelope's `parameters`
/// field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// The accumulated records, in insertion order.
    records: Vec<Record>,
}

impl RecordSet {
    /// Constructs a record set directly from a vector of records, validating
    /// the well-formedness of the result in the process.  Returns
    /// `Ok(record_set)` iff the records are indexed contiguously from zero.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let record_set = Self { records };

        record_set.assert_valid()?;

        Ok(record_set)
    }

    /// Generates a record set whose compact JSON serialization is at least
    /// `minimum_size` bytes long, appending fresh records until the
    /// threshold is reached.  The size check runs after each append, so the
    /// returned set always contains at least one record, and generation
    /// halts at the first point the threshold is met: no record is ever
    /// appended after the one that crosses it.
    ///
    /// The serialized size is tracked incrementally, exploiting the fact
    /// that the serialization of the set is the serializations of its
    /// records joined by single commas inside a fixed frame, rather than by
    /// re-serializing the whole collection after every append.
    pub fn generate(rng: &mut impl Rng, minimum_size: usize) -> Result<Self> {
        let mut records = Vec::new();
        let mut serialized_size = EMPTY_SERIALIZATION_SIZE;

        loop {
            let record = Record::new(rng, records.len() as u64);

            serialized_size += serde_json::to_vec(&record)?.len();
            if !records.is_empty() {
                // Separating comma between adjacent array elements.
                serialized_size += 1;
            }

            records.push(record);

            if serialized_size >= minimum_size {
                break;
            }
        }

        info!(
            "Generated record set: {} records, {} serialized bytes.",
            records.len(),
            serialized_size
        );

        Ok(Self { records })
    }

    /// Parses a record set from a JSON-encoded string, `json`, validating
    /// the well-formedness of the result in the process.  Returns
    /// `Ok(record_set)` iff parsing and the well-formedness checks succeed.
    pub fn from_json(json: &str) -> Result<Self> {
        let record_set: Self = serde_json::from_str(json)?;

        record_set.assert_valid()?;

        Ok(record_set)
    }

    /// Returns the records, in insertion order.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` iff the set contains no records.  Generated sets are
    /// never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the record set to compact JSON text, with no whitespace
    /// inserted between tokens and keys in field declaration order.
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the byte length (UTF-8) of the record set's compact JSON
    /// serialization.
    pub fn serialized_size(&self) -> Result<usize> {
        Ok(serde_json::to_vec(self)?.len())
    }

    /// Checks that the record set is valid, returning `Err(reason)` iff the
    /// set is found to be invalid.  A valid set carries indices that are
    /// exactly the sequence 0, 1, 2, … with no gaps or duplicates.
    fn assert_valid(&self) -> Result<()> {
        for (position, record) in self.records.iter().enumerate() {
            if record.index() != position as u64 {
                return Err(anyhow!(PayloadError::MisindexedRecord {
                    position: position as u64,
                    index: record.index(),
                }));
            }
        }

        Ok(())
    }
}
