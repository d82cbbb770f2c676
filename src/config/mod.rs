//! Configuration loading and management.
//!
//! - [`types`]: top-level [`Config`], [`ServerConfig`] and [`ConfigError`]
//! - [`listen`]: network listener configuration
//! - [`limits`]: line length and queue sizes
//! - [`validation`]: checks run by [`Config::load`]

mod defaults;
mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{Config, ConfigError, ServerConfig};
pub use validation::{validate, ValidationError};
