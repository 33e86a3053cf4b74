//! Payload generator integration test-suite.
//!
//! This crate carries no library code of its own; the test material lives in
//! the `tests` directory.
//!
//! ## Authors
//!
//! The Veracruz Development Team.
//!
//! ## Licensing and copyright notice
//!
//! See the `LICENSE_MIT.markdown` file in the Veracruz root directory for
//! information on licensing and copyright.
