//! HTTP request/response handling subsystem.
//!
//! # Data Flow
//! ```text
//! Embedding HTTP entry point
//!     → request.rs (immutable Request snapshot: method, path, form body)
//!     → [app layer registers routes and dispatches]
//!     → response.rs (accumulate headers, status, body)
//!     → Embedding entry point writes the response to the wire
//! ```
//!
//! # Design Decisions
//! - The Request is a snapshot built once by the embedder, never re-read
//! - Form bodies are parsed eagerly into a flat key/value bag
//! - The Response is an accumulator; later writes overwrite earlier bodies

pub mod request;
pub mod response;

pub use request::{BodyBag, Request, RequestBuilder};
pub use response::Response;
