//! Fuzzing library for tailscale-keygen.
//!
//! Targets the parsers for Tailscale API responses, which are the only
//! untrusted input the server decodes.
//!
//! # Usage
//!
//! ```bash
//! cd crates/keygen-fuzz
//! cargo +nightly fuzz run fuzz_key_response -- -max_total_time=60
//! ```

pub use tailscale_keygen::models;
