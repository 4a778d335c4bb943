//! Response accumulator.
//!
//! # Responsibilities
//! - Collect headers, status code and body during dispatch
//! - Serialize structured handler payloads as JSON
//!
//! # Design Decisions
//! - `send` overwrites any previous body; with several matching routes the
//!   last write wins, which dispatch relies on
//! - The accumulated state is inspectable so the embedding entry point (and
//!   tests) can write it to the wire however they like

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;

use crate::error::{FrameworkError, FrameworkResult};

/// One outgoing HTTP response, accumulated during dispatch.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<String>,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn set(&mut self, name: &str, value: &str) -> FrameworkResult<&mut Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FrameworkError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| FrameworkError::InvalidHeader(value.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Write a raw body.
    pub fn send(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize a payload as the JSON body and tag the content type.
    pub fn json<T: Serialize>(&mut self, payload: &T) -> FrameworkResult<&mut Self> {
        let body = serde_json::to_string(payload)?;
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(body);
        Ok(self)
    }

    /// Force the status code.
    pub fn code(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
