//! OAuth2 credentials and access token lifecycle.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::api::client::body_snippet;
use crate::api::types::TokenResponse;
use crate::error::{Error, Result};

/// Read-only scope requested for the photo library.
pub const PHOTOS_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.readonly";

/// Seconds subtracted from the server-reported lifetime so a token never
/// expires in the middle of a request.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 10;

/// OAuth client credentials, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Long-lived refresh token obtained through the consent flow.
    #[serde(default)]
    pub refresh_token: String,

    /// Redirect URI registered for the client.
    #[serde(default)]
    pub redirect_uri: String,
}

/// A bearer token and the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Build a token from a server-reported lifetime, applying the safety margin.
    ///
    /// Lifetimes that would leave the token expired on arrival, or that
    /// overflow the timestamp range, are rejected.
    pub fn from_ttl(value: String, expires_in_secs: i64, now: DateTime<Utc>) -> Result<Self> {
        if expires_in_secs <= TOKEN_EXPIRY_MARGIN_SECS {
            return Err(Error::MalformedResponse(format!(
                "token lifetime of {}s is not longer than the {}s expiry margin",
                expires_in_secs, TOKEN_EXPIRY_MARGIN_SECS
            )));
        }

        let expires_at = Duration::try_seconds(expires_in_secs - TOKEN_EXPIRY_MARGIN_SECS)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                Error::MalformedResponse(format!(
                    "token lifetime of {}s is out of range",
                    expires_in_secs
                ))
            })?;

        Ok(Self { value, expires_at })
    }

    /// A token is usable iff `now < expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Exchanges the refresh token for access tokens and caches the current one.
///
/// The cache lock is held across a refresh, so callers that find the token
/// expired at the same time share a single token-endpoint request.
pub struct TokenManager {
    http: Client,
    credentials: Credentials,
    token_url: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    /// Create a token manager. No request is made until a token is needed.
    pub fn new(http: Client, credentials: Credentials, token_url: impl Into<String>) -> Self {
        Self {
            http,
            credentials,
            token_url: token_url.into(),
            cached: Mutex::new(None),
        }
    }

    /// Get a usable access token, refreshing it if absent or expired.
    pub async fn get_valid_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(Utc::now()) {
                return Ok(token.value.clone());
            }
            tracing::debug!("Access token expired at {}", token.expires_at);
        }

        let token = self.fetch_access_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Perform the refresh-token grant.
    async fn fetch_access_token(&self) -> Result<AccessToken> {
        tracing::info!("Fetching new access token...");

        let params = [
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let body = self.post_token_request(&params).await?;

        let value = body.access_token.ok_or_else(|| {
            Error::MalformedResponse("token response is missing 'access_token'".into())
        })?;
        let expires_in = body.expires_in.ok_or_else(|| {
            Error::MalformedResponse("token response is missing 'expires_in'".into())
        })?;

        let token = AccessToken::from_ttl(value, expires_in, Utc::now())?;
        tracing::debug!("Access token valid until {}", token.expires_at);
        Ok(token)
    }

    /// Swap a one-time authorization code for a refresh token.
    pub async fn exchange_authorization_code(&self, code: &str) -> Result<String> {
        let params = [
            ("code", code),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("scope", PHOTOS_SCOPE),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let body = self.post_token_request(&params).await?;

        body.refresh_token.ok_or_else(|| {
            Error::MalformedResponse(
                "token response did not include a 'refresh_token' (was consent prompted?)".into(),
            )
        })
    }

    /// POST a form to the token endpoint and decode the JSON answer.
    ///
    /// OAuth errors come back as 4xx with a JSON body, so the body is decoded
    /// before the status is looked at.
    async fn post_token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self.http.post(&self.token_url).form(params).send().await?;

        let status = response.status();
        tracing::debug!("Token endpoint response status: {}", status);
        let text = response.text().await?;

        let body: TokenResponse = serde_json::from_str(&text).map_err(|e| {
            Error::MalformedResponse(format!(
                "Failed to parse token response: {} - Response: {}",
                e,
                body_snippet(&text)
            ))
        })?;

        if let Some(code) = body.error {
            let description = body.error_description.unwrap_or_default();
            tracing::error!("Token endpoint rejected the request: {}", code);
            return Err(Error::Auth { code, description });
        }

        if !status.is_success() {
            return Err(Error::Api(format!("Token endpoint returned HTTP {}", status)));
        }

        Ok(body)
    }
}

/// Build the URL the user opens once to grant offline access.
pub fn consent_url(credentials: &Credentials, auth_url: &str) -> Result<Url> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("prompt", "consent"),
            ("response_type", "code"),
            ("client_id", credentials.client_id.as_str()),
            ("scope", PHOTOS_SCOPE),
            ("access_type", "offline"),
        ],
    )?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Credentials {
        Credentials {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh-abc".to_string(),
            redirect_uri: "http://localhost:8080/callback".to_string(),
        }
    }

    fn manager_for(server: &MockServer) -> TokenManager {
        TokenManager::new(
            Client::new(),
            test_credentials(),
            format!("{}/token", server.uri()),
        )
    }

    #[test]
    fn test_access_token_margin() {
        let now = Utc::now();
        let token = AccessToken::from_ttl("t".to_string(), 3600, now).unwrap();
        assert_eq!(token.expires_at, now + Duration::seconds(3590));
        assert!(token.is_valid_at(now));
        assert!(token.is_valid_at(now + Duration::seconds(3589)));
        assert!(!token.is_valid_at(now + Duration::seconds(3590)));
    }

    #[test]
    fn test_lifetime_within_margin_is_rejected() {
        let now = Utc::now();
        for ttl in [-1, 0, 5, TOKEN_EXPIRY_MARGIN_SECS] {
            assert!(matches!(
                AccessToken::from_ttl("t".to_string(), ttl, now),
                Err(Error::MalformedResponse(_))
            ));
        }
        let token = AccessToken::from_ttl("t".to_string(), TOKEN_EXPIRY_MARGIN_SECS + 1, now).unwrap();
        assert!(token.is_valid_at(now));
    }

    #[test]
    fn test_huge_lifetime_is_rejected() {
        let now = Utc::now();
        assert!(matches!(
            AccessToken::from_ttl("t".to_string(), i64::MAX, now),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            AccessToken::from_ttl("t".to_string(), i64::MAX / 1000, now),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_consent_url_parameters() {
        let url = consent_url(
            &test_credentials(),
            "https://accounts.google.com/o/oauth2/v2/auth",
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("prompt".into(), "consent".into())));
        assert!(pairs.contains(&("access_type".into(), "offline".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("scope".into(), PHOTOS_SCOPE.into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:8080/callback".into()
        )));
    }

    #[tokio::test]
    async fn test_token_cached_within_validity_window() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert_eq!(manager.get_valid_token().await.unwrap(), "access-1");
        assert_eq!(manager.get_valid_token().await.unwrap(), "access-1");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        *manager.cached.lock().await = Some(AccessToken {
            value: "stale".to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        });

        let token = manager.get_valid_token().await.unwrap();
        assert_eq!(token, "fresh");

        let cached = manager.cached.lock().await;
        assert!(cached.as_ref().unwrap().is_valid_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "shared",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = std::sync::Arc::new(manager_for(&server));
        let handles: Vec<_> = (0..5)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_valid_token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }
    }

    #[tokio::test]
    async fn test_refresh_error_is_reported_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        match manager.get_valid_token().await {
            Err(Error::Auth { code, description }) => {
                assert_eq!(code, "invalid_grant");
                assert_eq!(description, "Token has been expired or revoked.");
            }
            other => panic!("Expected Auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exchange_authorization_code_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "bad code"
            })))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let err = manager.exchange_authorization_code("4/xyz").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid_grant"));
        assert!(msg.contains("bad code"));
    }

    #[tokio::test]
    async fn test_exchange_authorization_code_returns_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=4%2Fxyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access",
                "expires_in": 3599,
                "refresh_token": "1//new-refresh"
            })))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let refresh = manager.exchange_authorization_code("4/xyz").await.unwrap();
        assert_eq!(refresh, "1//new-refresh");
    }

    #[tokio::test]
    async fn test_non_json_token_response_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert!(matches!(
            manager.get_valid_token().await,
            Err(Error::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_access_token_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "expires_in": 10 })),
            )
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert!(matches!(
            manager.get_valid_token().await,
            Err(Error::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_exchange_without_refresh_token_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert!(matches!(
            manager.exchange_authorization_code("4/xyz").await,
            Err(Error::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_short_lived_token_is_not_returned_or_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert!(matches!(
            manager.get_valid_token().await,
            Err(Error::MalformedResponse(_))
        ));
        assert!(manager.cached.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": i64::MAX
            })))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert!(matches!(
            manager.get_valid_token().await,
            Err(Error::MalformedResponse(_))
        ));
    }
}
