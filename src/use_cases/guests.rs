use serde_json::Value;

use crate::domain::{GuestDocument, GuestStore, InsertResult, StoreError};

// Writes one guest document into the collection.
pub struct CreateGuestUseCase<'a, S: ?Sized> {
    pub store: &'a S,
    pub collection: &'a str,
}

impl<S> CreateGuestUseCase<'_, S>
where
    S: GuestStore + ?Sized,
{
    pub async fn execute(&self, document: GuestDocument) -> Result<InsertResult, StoreError> {
        self.store.insert(self.collection, document).await
    }
}

// Returns every document in the collection.
pub struct ListGuestsUseCase<'a, S: ?Sized> {
    pub store: &'a S,
    pub collection: &'a str,
}

impl<S> ListGuestsUseCase<'_, S>
where
    S: GuestStore + ?Sized,
{
    pub async fn execute(&self) -> Result<Vec<Value>, StoreError> {
        self.store.find_all(self.collection).await
    }
}
