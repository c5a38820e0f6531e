use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::domain::errors::StoreError;

// Opaque guest payload. The bytes are relayed to the store untouched so the
// store, not this service, decides whether they are a valid document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDocument(Vec<u8>);

impl GuestDocument {
    // An empty (or whitespace-only) body is stored as an empty object.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self(b"{}".to_vec());
        }
        Self(body.to_vec())
    }

    // Form posts become a flat JSON object of strings; a repeated key
    // collects its values into an array.
    pub fn from_form(body: &[u8]) -> Self {
        let mut fields = Map::new();
        for (key, value) in url::form_urlencoded::parse(body) {
            let value = Value::String(value.into_owned());
            match fields.entry(key.into_owned()) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Value::Array(values) => values.push(value),
                    existing => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, value]);
                    }
                },
            }
        }
        Self(Value::Object(fields).to_string().into_bytes())
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

// Store acknowledgement for a newly written document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertResult {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

// Use cases depend on this port, never on a concrete store client.
#[async_trait]
pub trait GuestStore: Send + Sync {
    async fn create_collection(&self, name: &str) -> Result<(), StoreError>;

    async fn insert(
        &self,
        collection: &str,
        document: GuestDocument,
    ) -> Result<InsertResult, StoreError>;

    // Match-all query over the collection.
    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
}
