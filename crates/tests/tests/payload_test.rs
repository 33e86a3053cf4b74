//! Payload generation integration tests
//!
//! End-to-end tests of the payload generation pipeline: the full-size record
//! set, the envelope wrapped around it, and the document the generator
//! leaves on disk.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.

use log::info;
use payload_utils::{
    envelope::Envelope,
    record::{RecordSet, SERIALIZED_SIZE_THRESHOLD},
    CANONICAL_OUTPUT_FILE_PATH,
};
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use serde_json::Value;
use std::fs;
use uuid::Uuid;

/// A serialization threshold small enough for the tests that do not need a
/// full-size payload.
const SMALL_THRESHOLD: usize = 4096;

/// The exact set of root keys a written payload document carries.
const ROOT_KEYS: [&str; 6] = [
    "metadata",
    "parameters",
    "request_id",
    "timestamp",
    "user_info",
    "verification_key",
];

/// Initializes logging for a test run.
fn setup() {
    let _ = env_logger::Builder::from_default_env()
        .write_style(env_logger::fmt::WriteStyle::Always)
        .is_test(true)
        .try_init();
}

/// Asserts that `request_id` has the syntactic shape of a version-4 UUID:
/// 36 characters, hyphens at positions 9, 14, 19 and 24 (counting from one),
/// a version nibble of `4` and a variant nibble in {8, 9, a, b}.
fn assert_v4_request_id(request_id: &str) {
    assert_eq!(request_id.len(), 36);

    let bytes = request_id.as_bytes();
    for position in &[8, 13, 18, 23] {
        assert_eq!(bytes[*position], b'-');
    }
    assert_eq!(bytes[14], b'4');
    assert!(matches!(bytes[19], b'8' | b'9' | b'a' | b'b'));

    let uuid = Uuid::parse_str(request_id).unwrap();
    assert_eq!(uuid.get_version_num(), 4);
}

/// A full-size generation run: the record set's compact serialization must
/// reach the production threshold, and must have done so at the first
/// opportunity, with indices assigned contiguously along the way.
#[test]
fn full_size_generation_meets_threshold() {
    setup();

    let record_set = RecordSet::generate(&mut thread_rng(), SERIALIZED_SIZE_THRESHOLD).unwrap();
    let size = record_set.serialized_size().unwrap();

    info!(
        "Generated {} records, {} serialized bytes.",
        record_set.len(),
        size
    );

    assert!(!record_set.is_empty());
    assert!(size >= 1048576);

    for (position, record) in record_set.records().iter().enumerate() {
        assert_eq!(record.index(), position as u64);
    }

    let truncated =
        RecordSet::new(record_set.records()[..record_set.len() - 1].to_vec()).unwrap();
    assert!(truncated.serialized_size().unwrap() < SERIALIZED_SIZE_THRESHOLD);
}

/// The complete pipeline at production scale: generate, wrap, write to disk,
/// and check the document that lands there, both through the typed parser
/// and as raw JSON.
#[test]
fn written_document_has_contract_shape() {
    setup();

    let filename = "payload-e2e.temp";
    let record_set = RecordSet::generate(&mut thread_rng(), SERIALIZED_SIZE_THRESHOLD).unwrap();
    let envelope = Envelope::new(&record_set).unwrap();

    envelope.store(filename).unwrap();
    let contents = fs::read_to_string(filename).unwrap();
    fs::remove_file(filename).unwrap();

    // The typed parser accepts its own output.
    Envelope::from_json(&contents).unwrap();

    let value: Value = serde_json::from_str(&contents).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<_> = object.keys().map(|k| k.as_str()).collect();
    keys.sort();
    assert_eq!(keys, ROOT_KEYS);

    assert_v4_request_id(object["request_id"].as_str().unwrap());
    assert!(object["timestamp"].as_str().unwrap().ends_with('Z'));

    // The parameters field is carried as an opaque string whose content is
    // itself JSON text of the record set.
    let parameters = object["parameters"].as_str().unwrap();
    assert!(parameters.len() >= 1048576);

    let inner: Value = serde_json::from_str(parameters).unwrap();
    let inner_object = inner.as_object().unwrap();
    assert_eq!(inner_object.keys().collect::<Vec<_>>(), vec!["records"]);

    let records = inner_object["records"].as_array().unwrap();
    assert_eq!(records.len(), record_set.len());
    for (position, record) in records.iter().enumerate() {
        assert_eq!(record["index"].as_u64().unwrap(), position as u64);
        assert!(record["timestamp"].is_string());
        assert!(record["description"].is_string());
        assert!(record["value"].is_string());
    }
}

/// Two generator runs in succession produce distinct request IDs and
/// non-decreasing envelope timestamps.
#[test]
fn successive_runs_differ_in_request_id() {
    setup();

    let mut rng = thread_rng();
    let first = Envelope::new(&RecordSet::generate(&mut rng, SMALL_THRESHOLD).unwrap()).unwrap();
    let second = Envelope::new(&RecordSet::generate(&mut rng, SMALL_THRESHOLD).unwrap()).unwrap();

    assert_ne!(first.request_id(), second.request_id());

    // Fixed-width rendering makes lexicographic comparison chronological.
    assert!(first.timestamp() <= second.timestamp());
}

/// Seeded generation reproduces record content.  Timestamps are sampled
/// from the clock and exempt from reproducibility, but record count,
/// descriptions and values must all coincide.
#[test]
fn seeded_generation_reproduces_record_content() {
    setup();

    let first = RecordSet::generate(&mut StdRng::seed_from_u64(42), SMALL_THRESHOLD).unwrap();
    let second = RecordSet::generate(&mut StdRng::seed_from_u64(42), SMALL_THRESHOLD).unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(
        first.serialized_size().unwrap(),
        second.serialized_size().unwrap()
    );

    for (a, b) in first.records().iter().zip(second.records().iter()) {
        assert_eq!(a.index(), b.index());
        assert_eq!(a.description(), b.description());
        assert_eq!(a.value(), b.value());
    }
}

/// The canonical output path is the fixed relative `test.json`, and storing
/// to it overwrites whatever a previous run left behind.
#[test]
fn canonical_path_write_overwrites() {
    setup();

    assert_eq!(CANONICAL_OUTPUT_FILE_PATH, "test.json");

    let mut rng = thread_rng();
    let first = Envelope::new(&RecordSet::generate(&mut rng, SMALL_THRESHOLD).unwrap()).unwrap();
    let second = Envelope::new(&RecordSet::generate(&mut rng, SMALL_THRESHOLD).unwrap()).unwrap();

    first.store(CANONICAL_OUTPUT_FILE_PATH).unwrap();
    second.store(CANONICAL_OUTPUT_FILE_PATH).unwrap();

    let contents = fs::read_to_string(CANONICAL_OUTPUT_FILE_PATH).unwrap();
    fs::remove_file(CANONICAL_OUTPUT_FILE_PATH).unwrap();

    let on_disk = Envelope::from_json(&contents).unwrap();
    assert_eq!(on_disk.request_id(), second.request_id());
    assert_ne!(on_disk.request_id(), first.request_id());
}
