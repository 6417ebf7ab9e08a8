//! Data models for the Tailscale API and the inbound endpoint.
//!
//! Upstream models use `#[serde(default)]` for fields we do not depend on and
//! `#[serde(rename = "camelCase")]` where the API naming differs.

mod key;
mod response;
mod token;

pub use key::{
    CreateKeyRequest, DeviceCapabilities, DeviceCreateCapabilities, EphemeralKey, KeyCapabilities,
    KeyResponse,
};
pub use response::{ErrorResponse, HealthResponse, IssuedKeyResponse};
pub use token::{AccessToken, TokenResponse};
