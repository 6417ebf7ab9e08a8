#![no_main]

use libfuzzer_sys::fuzz_target;
use tailscale_keygen::models::{AccessToken, TokenResponse};

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Ok or Err
    if let Ok(response) = serde_json::from_slice::<TokenResponse>(data) {
        let _ = AccessToken::from(response);
    }
});
