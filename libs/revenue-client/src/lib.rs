pub mod config;
pub mod form;
pub mod legacy;
pub mod rest;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use form::{FormError, InsertForm};
pub use legacy::{LegacyClient, LegacyError, YmRange};
pub use rest::{RestError, RevenueClient};
pub use types::*;
