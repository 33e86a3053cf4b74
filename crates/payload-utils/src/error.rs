//! Error types associated with the payload document.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.

use err_derive::Error;
use std::string::String;

////////////////////////////////////////////////////////////////////////////////
// Payload-related errors.
////////////////////////////////////////////////////////////////////////////////

/// A generic catch-all error type for functionality related to payload
/// documents.  Generation itself cannot fail other than by I/O or serializer
/// failure; these constructors surface when a document is parsed back and
/// found to be malformed.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error(
        display = "PayloadError: request ID {:?} is not a version-4 UUID.",
        _0
    )]
    InvalidRequestId(String),
    #[error(
        display = "PayloadError: timestamp {:?} is not an ISO-8601 UTC timestamp with a 'Z' suffix.",
        _0
    )]
    InvalidTimestamp(String),
    #[error(
        display = "PayloadError: parameters field does not contain a record set: {}.",
        _0
    )]
    MalformedParameters(String),
    #[error(
        display = "PayloadError: record at position {} carries index {}.",
        position,
        index
    )]
    MisindexedRecord {
        /// The position of the offending record within the record set.
        position: u64,
        /// The index the record actually carries.
        index: u64,
    },
}
