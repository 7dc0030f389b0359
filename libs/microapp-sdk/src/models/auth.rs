use serde::{Deserialize, Serialize};
use std::fmt;

use super::REDACTED;

/// `grant_type` for exchanging an authorization code.
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "app_to_tp_authorization_code";
/// `grant_type` for refreshing an authorizer token.
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "app_to_tp_refresh_token";

/// Platform-level credential of the third-party application. Valid for two hours.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComponentAccessToken {
    pub component_access_token: String,
    /// Seconds
    pub expires_in: i64,
}

impl fmt::Debug for ComponentAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentAccessToken")
            .field("component_access_token", &REDACTED)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatePreAuthCodeRequest {
    pub share_ratio: i64,
    pub share_amount: i64,
}

/// Short-lived code embedded in the authorization page link. Valid for ten minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreAuthCode {
    pub pre_auth_code: String,
    pub expires_in: i64,
}

/// A permission the merchant ticked on the authorization page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorizePermission {
    pub id: i64,
    pub category: String,
    pub description: String,
}

/// Credentials for acting on behalf of an authorized micro app.
///
/// The access token lives two hours; the refresh token a month and is single use.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OAuthToken {
    #[serde(alias = "authorize_access_token")]
    pub authorizer_access_token: String,
    #[serde(alias = "authorize_refresh_token")]
    pub authorizer_refresh_token: String,
    pub expires_in: i64,
    #[serde(alias = "authorizer_app_id")]
    pub authorizer_appid: String,
    pub authorize_permission: Vec<AuthorizePermission>,
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("authorizer_access_token", &REDACTED)
            .field("authorizer_refresh_token", &REDACTED)
            .field("expires_in", &self.expires_in)
            .field("authorizer_appid", &self.authorizer_appid)
            .field("authorize_permission", &self.authorize_permission)
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshedOAuthToken {
    #[serde(alias = "authorize_access_token")]
    pub authorizer_access_token: String,
    #[serde(alias = "authorize_refresh_token")]
    pub authorizer_refresh_token: String,
    pub expires_in: i64,
}

impl fmt::Debug for RefreshedOAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedOAuthToken")
            .field("authorizer_access_token", &REDACTED)
            .field("authorizer_refresh_token", &REDACTED)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Authorization code recovered after a missed authorization push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorizationCode {
    pub authorization_code: String,
    pub expires_in: i64,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn token_debug_hides_secrets() {
        let token: OAuthToken = serde_json::from_str(
            r#"{"authorizer_access_token":"acc-1","authorizer_refresh_token":"ref-1","expires_in":7200,"authorizer_appid":"tt9"}"#,
        )
        .unwrap();
        let text = format!("{token:?}");
        assert!(!text.contains("acc-1"));
        assert!(!text.contains("ref-1"));
        assert!(text.contains("tt9"));
        assert!(token.authorize_permission.is_empty());
    }

    #[test]
    fn component_token_tolerates_missing_fields() {
        let token: ComponentAccessToken = serde_json::from_str("{}").unwrap();
        assert_eq!(token, ComponentAccessToken::default());
        assert!(format!("{token:?}").contains(REDACTED));
    }

    #[test]
    fn permissions_deserialize() {
        let token: OAuthToken = serde_json::from_str(
            r#"{"authorize_permission":[{"id":3,"category":"basic","description":"profile"}]}"#,
        )
        .unwrap();
        assert_eq!(token.authorize_permission[0].id, 3);
        assert_eq!(token.authorize_permission[0].category, "basic");
    }
}
