use crate::domain::GuestStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub store: Arc<dyn GuestStore>,
    // Collection every guest request reads from and writes to.
    pub collection: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn GuestStore>, collection: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}
