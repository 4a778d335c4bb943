//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce structured log events (tracing)
//!     → logging.rs (subscriber installed at application construction)
//!     → error.log under the configured log directory
//!       (stderr when the directory is not writable)
//! ```
//!
//! # Design Decisions
//! - Structured logging via the `tracing` ecosystem
//! - The request ID is attached to dispatch events for correlation
//! - The first registration in a process wins; later applications reuse it

pub mod logging;

pub use logging::Logger;
