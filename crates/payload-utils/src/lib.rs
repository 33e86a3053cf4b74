//! Types and definitions relating to the synthetic payload document.
//!
//! The payload document is an oversized JSON object used to exercise
//! large-message handling in downstream components.  It consists of:
//!
//! - An inner collection of randomly generated records, grown until its
//!   compact serialization exceeds a fixed size threshold,
//! - An outer envelope carrying a fixed verification key, a per-run request
//!   ID, a generation timestamp, and static user and metadata blocks,
//! - The inner collection's compact serialization embedded in the envelope
//!   as an opaque string field, so the written document is double-encoded.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.

use chrono::{SecondsFormat, Utc};

/// The envelope wrapping the generated records, and its serialization.
pub mod envelope;
/// Error types related to payload generation and validation.
pub mod error;
/// Records, and the record set embedded in the envelope.
pub mod record;
/// Random text generation.
pub mod text;


////////////////////////////////////////////////////////////////////////////
// Canonical output location.
////////////////////////////////////////////////////////////////////////////

/// Canonical file path for the generated payload document, relative to the
/// working directory of the generator.
pub const CANONICAL_OUTPUT_FILE_PATH: &str = "test.json";

////////////////////////////////////////////////////////////////////////////
// Timestamps.
////////////////////////////////////////////////////////////////////////////

/// Returns the current UTC time rendered as an ISO-8601 timestamp with
/// microsecond precision and a literal `Z` suffix in place of a timezone
/// offset, e.g. `2021-06-01T13:45:20.000123Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
