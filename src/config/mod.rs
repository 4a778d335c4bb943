//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated)
//!     → handed to Application::configure by the embedding process
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a minimal (or missing) config still boots
//! - Validation separates syntactic (serde) from semantic checks
//! - A handful of fields stay writable after boot through the application's
//!   accessor shim (`view`, `engine`, `root`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::{AppConfig, LogConfig};
