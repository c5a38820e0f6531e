use std::fmt;

use crate::domain::{GuestStore, StoreError};

// Status the store uses when the collection is already present.
const CONFLICT_STATUS: u16 = 412;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Created,
    AlreadyExists,
}

// Fatal startup error: the service must not listen without its collection.
#[derive(Debug)]
pub struct BootstrapError {
    pub collection: String,
    pub source: StoreError,
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to create collection '{}': {}",
            self.collection, self.source
        )
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// Idempotent create-if-missing for the guest collection.
pub struct EnsureCollectionUseCase<'a, S: ?Sized> {
    pub store: &'a S,
}

impl<S> EnsureCollectionUseCase<'_, S>
where
    S: GuestStore + ?Sized,
{
    pub async fn execute(&self, name: &str) -> Result<CollectionStatus, BootstrapError> {
        match self.store.create_collection(name).await {
            Ok(()) => {
                tracing::info!(collection = %name, "collection created.");
                Ok(CollectionStatus::Created)
            }
            // A conflict only counts as "already exists" when the store sent a
            // proper JSON error object; anything else is treated as fatal.
            Err(StoreError::Upstream { status, body })
                if status == CONFLICT_STATUS && body.is_object() =>
            {
                let reason = body
                    .get("reason")
                    .and_then(|value| value.as_str())
                    .unwrap_or("collection already exists");
                tracing::info!(collection = %name, %reason, "collection reused.");
                Ok(CollectionStatus::AlreadyExists)
            }
            Err(source) => {
                tracing::error!(collection = %name, error = %source, "collection bootstrap failed.");
                Err(BootstrapError {
                    collection: name.to_string(),
                    source,
                })
            }
        }
    }
}
