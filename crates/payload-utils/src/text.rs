//! Random text generation.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.

use rand::{distributions::Alphanumeric, Rng};

/// Returns a string of exactly `length` characters, each drawn independently
/// and uniformly from the 62-character alphanumeric alphabet (26 lowercase
/// letters, 26 uppercase letters, 10 digits), consuming entropy from `rng`.
/// A `length` of zero produces the empty string.
pub fn alphanumeric_string(rng: &mut impl Rng, length: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
