//! Property-based tests for the key request shape and credentials check.

use proptest::prelude::*;

use tailscale_keygen::config::Credentials;
use tailscale_keygen::error::IssueError;
use tailscale_keygen::models::CreateKeyRequest;

const NAMES: [&str; 4] = ["TS_OAUTH_CLIENT_ID", "TS_OAUTH_CLIENT_SECRET", "TS_TAILNET", "TS_TAG"];

fn maybe_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), Just(Some(String::new())), "[a-zA-Z0-9:_.-]{1,24}".prop_map(Some)]
}

proptest! {
    #[test]
    fn key_request_flags_never_change(tag in ".{0,64}") {
        let body = serde_json::to_value(CreateKeyRequest::ephemeral(tag.clone())).unwrap();
        let create = &body["capabilities"]["devices"]["create"];

        prop_assert_eq!(&create["reusable"], false);
        prop_assert_eq!(&create["ephemeral"], true);
        prop_assert_eq!(&create["preauthorized"], false);
        prop_assert_eq!(&create["tags"], &serde_json::json!([tag]));
        prop_assert_eq!(&body["expirySeconds"], 300);
    }

    #[test]
    fn missing_names_exactly_the_absent_values(
        id in maybe_value(),
        secret in maybe_value(),
        tailnet in maybe_value(),
        tag in maybe_value(),
    ) {
        let values = [id.clone(), secret.clone(), tailnet.clone(), tag.clone()];
        let creds = Credentials { oauth_client_id: id, oauth_client_secret: secret, tailnet, tag };

        let expected: Vec<&str> = NAMES
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();

        prop_assert_eq!(creds.missing(), expected.clone());
        prop_assert_eq!(creds.is_complete(), expected.is_empty());

        if !expected.is_empty() {
            let message = IssueError::configuration_missing(creds.missing()).public_message();
            for name in NAMES {
                prop_assert_eq!(message.contains(name), expected.contains(&name));
            }
        }
    }
}
