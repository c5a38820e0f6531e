pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::{COLLECTION_NAME, http_port};
pub use frameworks::server::{StartupError, bootstrap, prepare, run, run_with_config};
