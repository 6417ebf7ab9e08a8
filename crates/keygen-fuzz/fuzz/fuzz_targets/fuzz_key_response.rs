#![no_main]

use libfuzzer_sys::fuzz_target;
use tailscale_keygen::models::KeyResponse;

fuzz_target!(|data: &[u8]| {
    // Timestamps go through chrono; make sure odd RFC 3339 input cannot panic
    let _ = serde_json::from_slice::<KeyResponse>(data);
});
