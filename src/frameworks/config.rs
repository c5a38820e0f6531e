use serde::Deserialize;
use std::{env, fmt};

// Runtime/server settings resolved from the process environment.

pub const COLLECTION_NAME: &str = "session-guests";
pub const DEFAULT_AUTH_URL: &str = "https://iam.cloud.ibm.com";

const SERVICES_VAR: &str = "CE_SERVICES";
const URL_VAR: &str = "CLOUDANT_URL";
const APIKEY_VAR: &str = "CLOUDANT_APIKEY";
const AUTH_URL_VAR: &str = "CLOUDANT_AUTH_URL";

pub fn http_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
}

pub fn resolve_auth_url<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(AUTH_URL_VAR)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub apikey: String,
    pub url: String,
}

// Keep the key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("apikey", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidServiceBinding(String),
    Missing { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidServiceBinding(reason) => {
                write!(f, "{SERVICES_VAR} is not a valid service binding: {reason}")
            }
            ConfigError::Missing { field } => {
                write!(f, "missing document store {field}; set {SERVICES_VAR} or {URL_VAR}/{APIKEY_VAR}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// Shape of the platform service-binding blob:
// {"cloudantnosqldb":[{"credentials":{"apikey":"...","url":"..."}}]}
#[derive(Deserialize)]
struct ServiceBindings {
    cloudantnosqldb: Vec<ServiceBinding>,
}

#[derive(Deserialize)]
struct ServiceBinding {
    credentials: BindingCredentials,
}

#[derive(Deserialize)]
struct BindingCredentials {
    apikey: Option<String>,
    url: Option<String>,
}

fn parse_bindings(raw: &str) -> Result<BindingCredentials, ConfigError> {
    let bindings: ServiceBindings = serde_json::from_str(raw)
        .map_err(|err| ConfigError::InvalidServiceBinding(err.to_string()))?;

    bindings
        .cloudantnosqldb
        .into_iter()
        .next()
        .map(|binding| binding.credentials)
        .ok_or_else(|| ConfigError::InvalidServiceBinding("cloudantnosqldb is empty".to_string()))
}

// Binding blob first, then the explicit variables override each field.
pub fn resolve_credentials<F>(lookup: F) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let (mut apikey, mut url) = match present(SERVICES_VAR) {
        Some(raw) => {
            let bound = parse_bindings(&raw)?;
            (bound.apikey, bound.url)
        }
        None => (None, None),
    };

    if let Some(value) = present(URL_VAR) {
        url = Some(value);
    }
    if let Some(value) = present(APIKEY_VAR) {
        apikey = Some(value);
    }

    let apikey = apikey
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing { field: "apikey" })?;
    let url = url
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing { field: "url" })?;

    Ok(Credentials { apikey, url })
}

// Process environment as a lookup for the resolvers above.
pub fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}
