//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration phase:
//!     Application verb methods
//!     → handler.rs (resolve controller references against the registry)
//!     → route.rs (Route with fixed, branch-prefixed path)
//!     → table.rs (append under the method; constraints per (method, path))
//!
//! Dispatch phase:
//!     effective method
//!     → table.rs (ordered route list)
//!     → route.rs (segment match + placeholder capture)
//!     → handler invocation → response
//! ```
//!
//! # Design Decisions
//! - Registration order is dispatch order; no priorities, no tries
//! - Matching is a pure function returning captured params
//! - Every matching route runs; the last response write wins

pub mod handler;
pub mod route;
pub mod table;

pub use handler::{Controller, ControllerRegistry, Handler, HandlerSpec, Payload};
pub use route::{ConstraintMap, Params, Route};
pub use table::{ConstraintStore, RouteTable};
