pub mod config;
pub mod models;
pub mod observability;
pub mod sources;
pub mod store;

pub use config::{Config, ConfigError};
pub use observability::{init_observability, ObservabilityError};
pub use store::CartStore;
