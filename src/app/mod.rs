//! Application orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap:
//!     AppConfig + Request snapshot
//!     → application.rs (verb registration, groups, constraints)
//!     → resources.rs (REST scaffolding over the same verb methods)
//!     → RouteTable / ConstraintStore populated
//!
//! Dispatch:
//!     run() resolves the effective method (form-spoofed override aware)
//!     → walks the method's routes in order, invoking every match
//!     → writes payloads to the Response; 404 fallback when nothing matched
//! ```
//!
//! # Design Decisions
//! - One Application value owned by the embedding process; no globals
//! - The branch prefix is a single slot, not a stack: groups do not nest
//! - Dispatch never breaks out of the loop; the last matching write wins

pub mod application;
pub mod resources;

pub use application::Application;
pub use resources::{ControllerSpec, ResourceOptions};
