use crate::domain::{GuestDocument, GuestStore, InsertResult, StoreError};
use crate::interface_adapters::clients::iam::IamAuthenticator;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use url::Url;

// Thin wrapper around reqwest for the document store HTTP API.
pub struct CloudantClient {
    http: Client,
    base_url: Url,
    auth: IamAuthenticator,
}

#[derive(Debug)]
pub enum ClientError {
    InvalidUrl { url: String, reason: String },
    Http(reqwest::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl { url, reason } => write!(f, "invalid url '{url}': {reason}"),
            ClientError::Http(err) => write!(f, "failed to build http client: {err}"),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Deserialize)]
struct FindResponse {
    docs: Vec<Value>,
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|err| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: "not a base url".to_string(),
        });
    }
    Ok(url)
}

// Keep the raw upstream payload; non-JSON bodies are wrapped as a JSON string.
fn error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

impl CloudantClient {
    pub fn new(service_url: &str, auth_url: &str, apikey: &str) -> Result<Self, ClientError> {
        let http = Client::builder().build().map_err(ClientError::Http)?;
        let base_url = parse_base_url(service_url)?;
        let auth_url = parse_base_url(auth_url)?;
        let auth = IamAuthenticator::new(http.clone(), &auth_url, apikey);

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base urls are validated in `new`, so segments are always writable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // Attach the bearer token, send, and turn non-2xx answers into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let token = self.auth.token().await?;
        let res = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        let status = res.status();

        if !status.is_success() {
            let text = res.text().await.map_err(|err| {
                StoreError::Transport(format!("failed to read {status} response: {err}"))
            })?;
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                body: error_body(&text),
            });
        }

        Ok(res)
    }
}

#[async_trait]
impl GuestStore for CloudantClient {
    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        let url = self.endpoint(&[name]);
        self.send(self.http.put(url)).await?;
        Ok(())
    }

    async fn insert(
        &self,
        collection: &str,
        document: GuestDocument,
    ) -> Result<InsertResult, StoreError> {
        let url = self.endpoint(&[collection]);
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(document.into_bytes());

        self.send(request)
            .await?
            .json::<InsertResult>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let url = self.endpoint(&[collection, "_find"]);
        let request = self.http.post(url).json(&json!({ "selector": {} }));

        let found = self
            .send(request)
            .await?
            .json::<FindResponse>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;

        Ok(found.docs)
    }
}
