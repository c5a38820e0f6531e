use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use crate::domain::StoreError;

const GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

// Exchanges an API key for short-lived IAM bearer tokens and caches them.
pub struct IamAuthenticator {
    http: Client,
    token_url: Url,
    apikey: String,
    cached: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    // `auth_url` must be a base url; the token path is appended to whatever
    // path it already has.
    pub fn new(http: Client, auth_url: &Url, apikey: impl Into<String>) -> Self {
        let mut token_url = auth_url.clone();
        if let Ok(mut path) = token_url.path_segments_mut() {
            path.pop_if_empty().extend(["identity", "token"]);
        }
        Self {
            http,
            token_url,
            apikey: apikey.into(),
            cached: Mutex::new(None),
        }
    }

    // Returns a valid access token, fetching a new one when the cached token
    // has used up most of its lifetime.
    pub async fn token(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached
            .as_ref()
            .filter(|token| Instant::now() < token.refresh_at)
        {
            return Ok(token.access_token.clone());
        }

        let fresh = self.request_token().await?;
        // Refresh at 80% of the advertised lifetime.
        let lifetime = Duration::from_secs(fresh.expires_in.saturating_mul(4) / 5);
        let access_token = fresh.access_token;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        tracing::debug!(refresh_in_secs = lifetime.as_secs(), "iam token refreshed.");

        Ok(access_token)
    }

    async fn request_token(&self) -> Result<TokenResponse, StoreError> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", GRANT_TYPE)
            .append_pair("apikey", &self.apikey)
            .finish();

        let res = self
            .http
            .post(self.token_url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(form)
            .send()
            .await
            .map_err(|err| StoreError::Auth(format!("token request failed: {err}")))?;
        let status = res.status();

        if !status.is_success() {
            let detail = res.text().await.map_err(|err| {
                StoreError::Auth(format!("failed to read {status} token response: {err}"))
            })?;
            return Err(StoreError::Auth(format!(
                "token endpoint returned {status}: {detail}"
            )));
        }

        res.json::<TokenResponse>()
            .await
            .map_err(|err| StoreError::Auth(format!("invalid token response: {err}")))
    }
}
