//! Shared helpers with no better home.

pub mod callback;

pub use callback::{invoke, CallbackSpec, MiddlewareFn};
