//! Auth key creation models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::api;

/// Body of `POST /api/v2/tailnet/{tailnet}/keys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateKeyRequest {
    pub capabilities: KeyCapabilities,
    #[serde(rename = "expirySeconds")]
    pub expiry_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCapabilities {
    pub devices: DeviceCapabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCapabilities {
    pub create: DeviceCreateCapabilities,
}

/// What a device joining with the key is allowed to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCreateCapabilities {
    pub reusable: bool,
    pub ephemeral: bool,
    pub preauthorized: bool,
    pub tags: Vec<String>,
}

impl CreateKeyRequest {
    /// Single-use, ephemeral, non-preauthorized key carrying exactly one tag
    /// and expiring after [`api::KEY_EXPIRY_SECONDS`].
    ///
    /// These flags are fixed and never taken from the inbound request.
    #[must_use]
    pub fn ephemeral(tag: impl Into<String>) -> Self {
        Self {
            capabilities: KeyCapabilities {
                devices: DeviceCapabilities {
                    create: DeviceCreateCapabilities {
                        reusable: false,
                        ephemeral: true,
                        preauthorized: false,
                        tags: vec![tag.into()],
                    },
                },
            },
            expiry_seconds: api::KEY_EXPIRY_SECONDS,
        }
    }
}

/// An issued auth key. Ownership passes to the caller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EphemeralKey(String);

impl EphemeralKey {
    /// Wrap a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the upstream returned an empty key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EphemeralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EphemeralKey([redacted])")
    }
}

/// Response from key creation. Only `key` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyResponse {
    /// Key identifier, safe to log.
    #[serde(default)]
    pub id: Option<String>,

    /// The auth key itself.
    pub key: EphemeralKey,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}
