use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::{GuestDocument, GuestStore, InsertResult, StoreError};

pub(crate) type CollectionTable = Arc<Mutex<HashMap<String, Vec<Value>>>>;

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub create: bool,
    pub insert: bool,
    pub find: bool,
}

// In-memory store that mimics the remote document store closely enough for
// use-case and route tests: conflicts on re-create, assigns ids on insert.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    collections: CollectionTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_collection(self, name: &str) -> Self {
        self.collections
            .lock()
            .expect("collections mutex poisoned")
            .insert(name.to_string(), Vec::new());
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn documents(&self, name: &str) -> Vec<Value> {
        let guard = self.collections.lock().expect("collections mutex poisoned");
        guard.get(name).cloned().unwrap_or_default()
    }
}

fn unavailable() -> StoreError {
    StoreError::Transport("connection refused".to_string())
}

#[async_trait]
impl GuestStore for RecordingStore {
    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        if self.failures.create {
            return Err(unavailable());
        }

        let mut guard = self.collections.lock().expect("collections mutex poisoned");
        if guard.contains_key(name) {
            return Err(StoreError::Upstream {
                status: 412,
                body: json!({
                    "error": "file_exists",
                    "reason": "The database could not be created, the file already exists."
                }),
            });
        }
        guard.insert(name.to_string(), Vec::new());
        Ok(())
    }

    async fn insert(
        &self,
        collection: &str,
        document: GuestDocument,
    ) -> Result<InsertResult, StoreError> {
        if self.failures.insert {
            return Err(unavailable());
        }

        let mut doc: Value = serde_json::from_slice(document.as_bytes()).map_err(|_| {
            StoreError::Upstream {
                status: 400,
                body: json!({ "error": "bad_request", "reason": "invalid UTF-8 JSON" }),
            }
        })?;

        let mut guard = self.collections.lock().expect("collections mutex poisoned");
        let docs = guard.get_mut(collection).ok_or_else(|| StoreError::Upstream {
            status: 404,
            body: json!({ "error": "not_found", "reason": "Database does not exist." }),
        })?;

        let id = format!("guest-{}", docs.len() + 1);
        let rev = "1-test".to_string();
        if let Some(object) = doc.as_object_mut() {
            object.insert("_id".to_string(), Value::String(id.clone()));
            object.insert("_rev".to_string(), Value::String(rev.clone()));
        }
        docs.push(doc);

        Ok(InsertResult { ok: true, id, rev })
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        if self.failures.find {
            return Err(unavailable());
        }

        let guard = self.collections.lock().expect("collections mutex poisoned");
        Ok(guard.get(collection).cloned().unwrap_or_default())
    }
}
