//! The envelope wrapping the generated records.
//!
//! The envelope is the top-level object written to the output file.  It
//! carries a fixed verification key, a request ID sampled freshly for each
//! run, a generation timestamp, static user and metadata blocks, and the
//! compact serialization of a record set embedded as an opaque string.  Note
//! that the embedded record set is deliberately double-encoded: the
//! `parameters` field is a JSON string literal containing escaped JSON text,
//! not a nested object, and is never re-parsed during generation.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.

use crate::{error::PayloadError, record::RecordSet, utc_timestamp};
use anyhow::{anyhow, Result};
use chrono::DateTime;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::Write,
    path::Path,
    string::{String, ToString},
    vec::Vec,
};
use uuid::{Uuid, Variant};

////////////////////////////////////////////////////////////////////////////////
// Constants.
////////////////////////////////////////////////////////////////////////////////

/// The verification key carried verbatim in every generated envelope.
pub const VERIFICATION_KEY: &str =
    "H7MMHNWvNED0cLd/2xv+/UuXI2VtkSmo0sPaUuDCMo4qGUqVmPIHINSEmZcDXdY/+n+FLLcNmTAjvTZ/eqVUPA==";

/// The username carried in the envelope's static user block.
pub const USER_INFO_USERNAME: &str = "example_user";
/// The role carried in the envelope's static user block.
pub const USER_INFO_ROLE: &str = "administrator";
/// The permissions carried in the envelope's static user block.
pub const USER_INFO_PERMISSIONS: [&str; 3] = ["read", "write", "execute"];

/// The source carried in the envelope's static metadata block.
pub const METADATA_SOURCE: &str = "generated";
/// The version carried in the envelope's static metadata block.
pub const METADATA_VERSION: &str = "1.0";
/// The description carried in the envelope's static metadata block.
pub const METADATA_DESCRIPTION: &str =
    "This JSON contains a complex parameter string (parameters) exceeding 1MB.";

////////////////////////////////////////////////////////////////////////////////
// Static envelope blocks.
////////////////////////////////////////////////////////////////////////////////

/// The static user block embedded in every envelope.  The values never vary
/// between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The name of the (synthetic) user the payload is attributed to.
    username: String,
    /// The user's role.
    role: String,
    /// The user's permissions.
    permissions: Vec<String>,
}

impl UserInfo {
    /// Returns the username.
    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the role.
    #[inline]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the permissions.
    #[inline]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

/// The static metadata block embedded in every envelope.  The values never
/// vary between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// How the payload came to be.
    source: String,
    /// The version of the payload format.
    version: String,
    /// A human-readable description of the payload.
    description: String,
}

impl Metadata {
    /// Returns the source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the version.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }
}

////////////////////////////////////////////////////////////////////////////////
// Envelopes, proper.
////////////////////////////////////////////////////////////////////////////////

/// A type representing the payload document written to the output file.  The
/// serialization of this type, with fields in declaration order, is the
/// complete output of a generator run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    /// The fixed verification key.
    verification_key: String,
    /// The request ID identifying the run that produced the envelope.  A
    /// fresh version-4 UUID is sampled for every construction.
    request_id: Uuid,
    /// The UTC time at which the envelope was constructed, rendered as an
    /// ISO-8601 timestamp with a `Z` suffix.  Sampled independently of the
    /// embedded records' timestamps.
    timestamp: String,
    /// The static user block.
    user_info: UserInfo,
    /// The static metadata block.
    metadata: Metadata,
    /// The compact serialization of the embedded record set, carried as an
    /// opaque string.
    parameters: String,
}

impl Envelope {
    /// Constructs a new envelope around `record_set`, embedding the set's
    /// compact serialization as the `parameters` string and sampling a fresh
    /// request ID and timestamp.  Validates the well-formedness of the
    /// resulting envelope in the process, returning `Ok(envelope)` iff these
    /// well-formedness checks pass.
    pub fn new(record_set: &RecordSet) -> Result<Self> {
        let envelope = Self {
            verification_key: VERIFICATION_KEY.to_string(),
            request_id: Uuid::new_v4(),
            timestamp: utc_timestamp(),
            user_info: UserInfo {
                username: USER_INFO_USERNAME.to_string(),
                role: USER_INFO_ROLE.to_string(),
                permissions: USER_INFO_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            },
            metadata: Metadata {
                source: METADATA_SOURCE.to_string(),
                version: METADATA_VERSION.to_string(),
                description: METADATA_DESCRIPTION.to_string(),
            },
            parameters: record_set.to_compact_json()?,
        };

        envelope.assert_valid()?;

        Ok(envelope)
    }

    /// Parses an envelope from a JSON-encoded string, `json`, validating the
    /// well-formedness of the resulting envelope in the process.  Returns
    /// `Ok(envelope)` iff these well-formedness checks pass.
    pub fn from_json(json: &str) -> Result<Self> {
        let envelope: Self = serde_json::from_str(json)?;

        envelope.assert_valid()?;

        Ok(envelope)
    }

    /// Returns the verification key associated with this envelope.
    #[inline]
    pub fn verification_key(&self) -> &str {
        &self.verification_key
    }

    /// Returns the request ID associated with this envelope.
    #[inline]
    pub fn request_id(&self) -> &Uuid {
        &self.request_id
    }

    /// Returns the construction timestamp associated with this envelope.
    #[inline]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns the static user block associated with this envelope.
    #[inline]
    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    /// Returns the static metadata block associated with this envelope.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the embedded record set serialization associated with this
    /// envelope, as the opaque string that is written to the output file.
    #[inline]
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Serializes the envelope to compact JSON text, with no whitespace
    /// inserted between tokens and keys in field declaration order.
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the envelope to compact JSON text and writes it, UTF-8
    /// encoded, to a file at `path`, overwriting any existing file at that
    /// path.  The file handle is closed on all exit paths.  Fails with the
    /// underlying filesystem error if the path cannot be created or written.
    pub fn store<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_compact_json()?;

        info!("Writing payload document ({} bytes) to {:?}.", json.len(), path);

        let mut file = File::create(path)
            .map_err(|e| anyhow!("Could not create file {:?}: {}.", path, e))?;
        write!(file, "{}", json)?;

        Ok(())
    }

    /// Checks that the envelope is valid, returning `Err(reason)` iff the
    /// envelope is found to be invalid.  A valid envelope carries a
    /// version-4 RFC-4122 request ID, an ISO-8601 timestamp with a literal
    /// `Z` suffix, and a parameters string that parses back into a
    /// well-formed record set.
    fn assert_valid(&self) -> Result<()> {
        if self.request_id.get_version_num() != 4
            || self.request_id.get_variant() != Variant::RFC4122
        {
            return Err(anyhow!(PayloadError::InvalidRequestId(
                self.request_id.to_string()
            )));
        }

        if !self.timestamp.ends_with('Z')
            || DateTime::parse_from_rfc3339(&self.timestamp).is_err()
        {
            return Err(anyhow!(PayloadError::InvalidTimestamp(
                self.timestamp.clone()
            )));
        }

        RecordSet::from_json(&self.parameters)
            .map_err(|e| anyhow!(PayloadError::MalformedParameters(e.to_string())))?;

        Ok(())
    }
}
