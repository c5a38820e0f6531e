// reqwest clients for the external document store.
pub mod cloudant;
pub mod iam;

pub use cloudant::{ClientError, CloudantClient};
