pub mod errors;
mod guests;

// Re-export the domain boundary types and ports.
pub use errors::StoreError;
pub use guests::{GuestDocument, GuestStore, InsertResult};
