//! Shared utilities for integration tests.

use gantry::{AppConfig, Application, Request};

/// Config with the log directory pointed away from the working tree.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.log.path = std::env::temp_dir().join("gantry-test-logs");
    config
}

/// Application over a bare request.
pub fn app_for(method: &str, uri: &str) -> Application {
    Application::configure(test_config(), request(method, uri))
}

/// Application over a request carrying a form body.
pub fn app_with_form(method: &str, uri: &str, form: &str) -> Application {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .form(form)
        .build()
        .unwrap();
    Application::configure(test_config(), request)
}

pub fn request(method: &str, uri: &str) -> Request {
    Request::builder().method(method).uri(uri).build().unwrap()
}
