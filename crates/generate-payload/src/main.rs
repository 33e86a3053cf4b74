//! generate-payload
//!
//! # Purpose
//!
//! This utility generates a synthetic JSON document whose embedded parameter
//! string exceeds 1MiB, and writes it to `test.json` in the working
//! directory, overwriting any existing file at that path.
//!
//! This is useful for exercising large-message handling in downstream
//! components, which tend to misbehave only once individual fields grow past
//! megabyte scale.
//!
//! The run is a single linear sequence: grow a record set until its compact
//! serialization reaches the size threshold, wrap its serialization in a
//! metadata envelope as an opaque string, and write the envelope to disk.
//! Any failure terminates the run with the underlying error.
//!
//! # Command line parameters
//!
//! None.  The utility takes no flags and reads no configuration: the output
//! path and the document's shape are fixed.  The `RUST_LOG` environment
//! variable controls diagnostic verbosity only and has no effect on the
//! generated document.
//!
//! # Authors
//!
//! The Veracruz Development Team.
//!
//! # Copyright
//!
//! See the file `LICENSE_MIT.markdown` in the Veracruz root directory for
//! licensing and copyright information.

use anyhow::Result;
use log::info;
use payload_utils::{
    envelope::Envelope,
    record::{RecordSet, SERIALIZED_SIZE_THRESHOLD},
    CANONICAL_OUTPUT_FILE_PATH,
};
use rand::thread_rng;

/// Entry point: grows the record set to the size threshold, builds the
/// envelope around it, and writes the result to the canonical output file.
fn main() -> Result<()> {
    env_logger::init();

    let mut rng = thread_rng();

    info!(
        "Generating a record set of at least {} serialized bytes.",
        SERIALIZED_SIZE_THRESHOLD
    );

    let record_set = RecordSet::generate(&mut rng, SERIALIZED_SIZE_THRESHOLD)?;

    info!("Building the envelope around {} records.", record_set.len());

    let envelope = Envelope::new(&record_set)?;

    envelope.store(CANONICAL_OUTPUT_FILE_PATH)?;

    println!("Wrote JSON data to {}.", CANONICAL_OUTPUT_FILE_PATH);

    Ok(())
}
