//! Gantry: the routing and dispatch core of a minimalist server-side MVC
//! microframework.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 APPLICATION                   │
//!                    │                                               │
//!  Request snapshot  │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!  ──────────────────┼─▶│  http   │──▶│   app    │──▶│  routing  │  │
//!                    │  │ request │   │ verb API │   │ table +   │  │
//!                    │  └─────────┘   │ groups   │   │ matching  │  │
//!                    │                │ resources│   └─────┬─────┘  │
//!                    │                └──────────┘         │        │
//!  Response          │  ┌─────────┐   ┌──────────┐   ┌─────▼─────┐  │
//!  ◀─────────────────┼──│  http   │◀──│ dispatch │◀──│ handlers/ │  │
//!                    │  │ response│   │  (run)   │   │controllers│  │
//!                    │  └─────────┘   └──────────┘   └───────────┘  │
//!                    │                                               │
//!                    │  config (TOML) · observability (tracing) ·    │
//!                    │  support (callback invoker)                   │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The embedding process builds a [`Request`] snapshot, constructs an
//! [`Application`] with its [`AppConfig`], registers routes, then calls
//! [`Application::run`] with a [`Response`] accumulator to write out.

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod routing;
pub mod support;

pub use app::{Application, ControllerSpec, ResourceOptions};
pub use config::schema::AppConfig;
pub use error::{FrameworkError, FrameworkResult};
pub use http::{Request, Response};
pub use routing::{Controller, ControllerRegistry, HandlerSpec, Params, Payload};
pub use support::CallbackSpec;
