//! Key issuance: credentials check, token exchange, key creation.

use std::sync::Arc;

use crate::client::{TailscaleApi, TailscaleClient};
use crate::config::{Config, Credentials};
use crate::error::{IssueError, IssueResult, UpstreamStage};
use crate::models::{CreateKeyRequest, EphemeralKey};

/// Mints one ephemeral key per call.
///
/// Holds no per-request state. Every call performs a fresh token exchange
/// and a fresh key request; nothing is cached between calls.
#[derive(Clone)]
pub struct KeyIssuer {
    api: Arc<dyn TailscaleApi>,
    credentials: Credentials,
}

impl KeyIssuer {
    /// Create an issuer over any [`TailscaleApi`] implementation.
    #[must_use]
    pub fn new(api: Arc<dyn TailscaleApi>, credentials: Credentials) -> Self {
        Self { api, credentials }
    }

    /// Create an issuer backed by a [`TailscaleClient`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = TailscaleClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.credentials.clone()))
    }

    /// Credentials this issuer was built with.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Issue a key.
    ///
    /// The credentials check runs before any outbound call. The key request
    /// body is always [`CreateKeyRequest::ephemeral`] with the configured tag.
    pub async fn issue(&self) -> IssueResult<EphemeralKey> {
        let creds = self.credentials.resolve().map_err(IssueError::configuration_missing)?;

        let token = self
            .api
            .exchange_token(creds.client_id, creds.client_secret)
            .await
            .map_err(|e| IssueError::from_client(UpstreamStage::TokenExchange, e))?;

        let request = CreateKeyRequest::ephemeral(creds.tag);
        let response = self
            .api
            .create_auth_key(&token, creds.tailnet, &request)
            .await
            .map_err(|e| IssueError::from_client(UpstreamStage::KeyIssuance, e))?;

        tracing::info!(
            key_id = ?response.id,
            expires = ?response.expires,
            tailnet = creds.tailnet,
            tag = creds.tag,
            "Issued ephemeral auth key"
        );
        Ok(response.key)
    }
}

impl std::fmt::Debug for KeyIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyIssuer").field("credentials", &self.credentials).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::{ClientError, ClientResult};
    use crate::models::{AccessToken, KeyResponse};

    /// Records calls and replays canned results.
    #[derive(Default)]
    struct FakeApi {
        token_status: Option<u16>,
        key_status: Option<u16>,
        calls: Mutex<Vec<String>>,
        key_requests: Mutex<Vec<(String, String, CreateKeyRequest)>>,
    }

    #[async_trait::async_trait]
    impl TailscaleApi for FakeApi {
        async fn exchange_token(
            &self,
            client_id: &str,
            _client_secret: &str,
        ) -> ClientResult<AccessToken> {
            self.calls.lock().unwrap().push(format!("token:{client_id}"));
            match self.token_status {
                Some(status) => Err(ClientError::unauthorized(status, "invalid client")),
                None => Ok(AccessToken::new("tok123")),
            }
        }

        async fn create_auth_key(
            &self,
            token: &AccessToken,
            tailnet: &str,
            request: &CreateKeyRequest,
        ) -> ClientResult<KeyResponse> {
            self.calls.lock().unwrap().push(format!("key:{tailnet}"));
            self.key_requests.lock().unwrap().push((
                token.secret().to_string(),
                tailnet.to_string(),
                request.clone(),
            ));
            match self.key_status {
                Some(_) => Err(ClientError::bad_request("requested tags are invalid")),
                None => Ok(KeyResponse {
                    id: Some("k1".to_string()),
                    key: EphemeralKey::new("tskey-abc"),
                    created: None,
                    expires: None,
                }),
            }
        }
    }

    fn issuer(api: &Arc<FakeApi>, credentials: Credentials) -> KeyIssuer {
        KeyIssuer::new(Arc::clone(api) as Arc<dyn TailscaleApi>, credentials)
    }

    fn credentials() -> Credentials {
        Config::for_testing("http://unused.localhost").credentials
    }

    #[tokio::test]
    async fn test_issue_success() {
        let api = Arc::new(FakeApi::default());
        let key = issuer(&api, credentials()).issue().await.unwrap();

        assert_eq!(key.expose(), "tskey-abc");
        assert_eq!(*api.calls.lock().unwrap(), vec!["token:test-client-id", "key:example.com"]);

        let requests = api.key_requests.lock().unwrap();
        let (token, _, request) = &requests[0];
        assert_eq!(token, "tok123");
        assert_eq!(request, &CreateKeyRequest::ephemeral("tag:test"));
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuit() {
        let api = Arc::new(FakeApi::default());
        let err = issuer(&api, Credentials::default()).issue().await.unwrap_err();

        match err {
            IssueError::ConfigurationMissing { missing } => assert_eq!(missing.len(), 4),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_failure_skips_key_call() {
        let api = Arc::new(FakeApi { token_status: Some(401), ..FakeApi::default() });
        let err = issuer(&api, credentials()).issue().await.unwrap_err();

        assert!(matches!(
            err,
            IssueError::UpstreamCallFailed { stage: UpstreamStage::TokenExchange, .. }
        ));
        assert_eq!(*api.calls.lock().unwrap(), vec!["token:test-client-id"]);
    }

    #[tokio::test]
    async fn test_key_failure() {
        let api = Arc::new(FakeApi { key_status: Some(400), ..FakeApi::default() });
        let err = issuer(&api, credentials()).issue().await.unwrap_err();

        assert!(matches!(
            err,
            IssueError::UpstreamCallFailed { stage: UpstreamStage::KeyIssuance, .. }
        ));
    }

    #[tokio::test]
    async fn test_every_call_exchanges_a_fresh_token() {
        let api = Arc::new(FakeApi::default());
        let issuer = issuer(&api, credentials());

        issuer.issue().await.unwrap();
        issuer.issue().await.unwrap();

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.iter().filter(|c| c.starts_with("token:")).count(), 2);
    }
}
