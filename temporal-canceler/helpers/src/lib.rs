//! Shared utilities used by the canceler worker and its activities.

pub mod config;
pub mod connection;
pub mod secret;

pub use config::{BatchOperationKind, CancelerConfig, ConfigError};
pub use connection::{ConnectionSettings, TemporalConnection, connect};
pub use secret::{ApiKey, ApiKeySupplier};
