pub mod bootstrap;
pub mod guests;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::{BootstrapError, CollectionStatus, EnsureCollectionUseCase};
pub use guests::{CreateGuestUseCase, ListGuestsUseCase};
