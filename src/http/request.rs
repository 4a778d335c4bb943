//! Immutable request snapshot.
//!
//! # Responsibilities
//! - Hold the incoming method, URI and parsed form body
//! - Generate a unique request ID for log correlation
//! - Expose the body as a flat key/value bag (`has`/`get`)
//!
//! # Design Decisions
//! - Built once by the embedding server, read-only afterwards
//! - Method names are normalized to upper case at construction
//! - `uri()` returns the path component only; query strings do not take part
//!   in route matching

use std::collections::HashMap;
use std::str::FromStr;

use http::Uri;
use uuid::Uuid;

use crate::error::FrameworkResult;

/// Parsed form fields of a request body.
#[derive(Debug, Clone, Default)]
pub struct BodyBag {
    fields: HashMap<String, String>,
}

impl BodyBag {
    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Repeated keys keep the last value, matching how the original form data
    /// would be observed one field at a time.
    pub fn parse(raw: &str) -> Self {
        let fields = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { fields }
    }

    /// True if the body carries a field with this name.
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The raw value of a body field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }
}

/// One incoming HTTP request, frozen for the lifetime of a dispatch cycle.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    uri: Uri,
    body: BodyBag,
    id: Uuid,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// The HTTP method name, upper case (e.g. `"POST"`).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request path (no scheme, authority or query string).
    pub fn uri(&self) -> &str {
        self.uri.path()
    }

    /// The parsed form body.
    pub fn body(&self) -> &BodyBag {
        &self.body
    }

    /// Unique ID assigned at construction, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Builder for [`Request`] snapshots, used by the embedding entry point.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<String>,
    uri: Option<String>,
    body: BodyBag,
}

impl RequestBuilder {
    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.to_ascii_uppercase());
        self
    }

    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = Some(uri.to_string());
        self
    }

    /// Replace the body with a parsed urlencoded form.
    pub fn form(mut self, raw: &str) -> Self {
        self.body = BodyBag::parse(raw);
        self
    }

    /// Set a single body field.
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.body.insert(key, value);
        self
    }

    pub fn build(self) -> FrameworkResult<Request> {
        let uri = Uri::from_str(self.uri.as_deref().unwrap_or("/"))?;
        Ok(Request {
            method: self.method.unwrap_or_else(|| "GET".to_string()),
            uri,
            body: self.body,
            id: Uuid::new_v4(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let req = Request::builder().build().unwrap();
        assert_eq!(req.method(), "GET");
        assert_eq!(req.uri(), "/");
        assert!(req.body().is_empty());
    }

    #[test]
    fn test_method_normalized() {
        let req = Request::builder().method("post").build().unwrap();
        assert_eq!(req.method(), "POST");
    }

    #[test]
    fn test_uri_strips_query() {
        let req = Request::builder().uri("/users/42?tab=posts").build().unwrap();
        assert_eq!(req.uri(), "/users/42");
    }

    #[test]
    fn test_form_parsing() {
        let req = Request::builder()
            .method("POST")
            .form("method=PUT&name=jane%20doe")
            .build()
            .unwrap();
        assert!(req.body().has("method"));
        assert_eq!(req.body().get("method"), Some("PUT"));
        assert_eq!(req.body().get("name"), Some("jane doe"));
        assert!(!req.body().has("missing"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Request::builder().build().unwrap();
        let b = Request::builder().build().unwrap();
        assert_ne!(a.id(), b.id());
    }
}
