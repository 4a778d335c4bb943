//! Dispatch-loop behavior of `Application::run`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gantry::{
    Application, Controller, FrameworkError, FrameworkResult, HandlerSpec, Params, Payload,
    Request, Response,
};
use http::StatusCode;
use serde_json::json;

mod common;

fn text(body: &'static str) -> HandlerSpec {
    HandlerSpec::func(move |_, _, _| Ok(Payload::text(body)))
}

fn counting(counter: &Arc<AtomicUsize>, body: &'static str) -> HandlerSpec {
    let counter = counter.clone();
    HandlerSpec::func(move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Payload::text(body))
    })
}

#[test]
fn test_single_match_invokes_handler_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = common::app_for("GET", "/a");
    app.get("/a", counting(&calls, "hit")).unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(!missed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.body(), Some("hit"));
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_every_matching_route_runs_last_write_wins() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = common::app_for("GET", "/dup");
    app.get("/dup", counting(&calls, "first")).unwrap();
    app.get("/dup", counting(&calls, "second")).unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(!missed);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(response.body(), Some("second"));
}

#[test]
fn test_no_match_is_flagged_and_forced_404() {
    let mut app = common::app_for("GET", "/nope");
    app.get("/else", text("else")).unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(missed);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.body(), Some("Cannot GET /nope 404"));
}

#[test]
fn test_custom_404_handler_writes_body_status_still_forced() {
    let mut app = common::app_for("GET", "/nope");
    app.to404(HandlerSpec::func(|_, _, _| Ok(Payload::text("lost?"))))
        .unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(missed);
    assert_eq!(response.body(), Some("lost?"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_json_payload_written_as_json_body() {
    let mut app = common::app_for("GET", "/api/user");
    app.get(
        "/api/user",
        HandlerSpec::func(|_, _, _| Ok(Payload::Json(json!({"name": "ada"})))),
    )
    .unwrap();

    let mut response = Response::new();
    app.run(&mut response, None).unwrap();

    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.body(), Some(r#"{"name":"ada"}"#));
}

#[test]
fn test_placeholder_params_reach_handler() {
    let mut app = common::app_for("GET", "/users/42/posts/7");
    app.get(
        "/users/:user/posts/:post",
        HandlerSpec::func(|_, params, _| {
            Ok(Payload::Text(format!(
                "{}-{}",
                params.get("user").unwrap_or("?"),
                params.get("post").unwrap_or("?")
            )))
        }),
    )
    .unwrap();

    let mut response = Response::new();
    app.run(&mut response, None).unwrap();
    assert_eq!(response.body(), Some("42-7"));
}

#[test]
fn test_constraints_filter_at_dispatch() {
    let mut matching = common::app_for("GET", "/users/42");
    matching.get("/users/:id", text("ok")).unwrap();
    matching.constrain(&[("id", r"\d+")]).unwrap();
    let mut response = Response::new();
    assert!(!matching.run(&mut response, None).unwrap());

    let mut rejected = common::app_for("GET", "/users/jane");
    rejected.get("/users/:id", text("ok")).unwrap();
    rejected.constrain(&[("id", r"\d+")]).unwrap();
    let mut response = Response::new();
    assert!(rejected.run(&mut response, None).unwrap());
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_powered_by_header_set_and_disabled() {
    let mut app = common::app_for("GET", "/a");
    app.get("/a", text("hit")).unwrap();
    let mut response = Response::new();
    app.run(&mut response, None).unwrap();
    assert_eq!(response.header("x-powered-by"), Some("Gantry"));

    let mut quiet = common::app_for("GET", "/a");
    quiet.get("/a", text("hit")).unwrap();
    quiet.disable_x_powered_by();
    let mut response = Response::new();
    quiet.run(&mut response, None).unwrap();
    assert_eq!(response.header("x-powered-by"), None);
}

#[test]
fn test_pre_hook_false_lets_dispatch_proceed() {
    let mut app = common::app_for("GET", "/a");
    app.get("/a", text("hit")).unwrap();
    let mut response = Response::new();
    let hook = |_: &gantry::Request| false;
    let missed = app.run(&mut response, Some(&hook)).unwrap();
    assert!(!missed);
    assert_eq!(response.body(), Some("hit"));
}

#[test]
fn test_handler_receives_application_when_configured() {
    let mut config = common::test_config();
    config.pass_application_to_handlers = true;
    let mut app = gantry::Application::configure(config, common::request("GET", "/a"));
    app.get(
        "/a",
        HandlerSpec::func(|_, _, app| {
            let engine = app
                .and_then(|app| app.value("engine"))
                .unwrap_or_else(|| "absent".to_string());
            Ok(Payload::Text(engine))
        }),
    )
    .unwrap();

    let mut response = Response::new();
    app.run(&mut response, None).unwrap();
    assert_eq!(response.body(), Some("plain"));
}

#[test]
fn test_handler_gets_no_application_by_default() {
    let mut app = common::app_for("GET", "/a");
    app.get(
        "/a",
        HandlerSpec::func(|_, _, app| {
            Ok(Payload::text(if app.is_none() { "none" } else { "some" }))
        }),
    )
    .unwrap();

    let mut response = Response::new();
    app.run(&mut response, None).unwrap();
    assert_eq!(response.body(), Some("none"));
}

struct BookController;

impl Controller for BookController {
    fn invoke(
        &self,
        action: &str,
        _request: &Request,
        params: &Params,
        _app: Option<&Application>,
    ) -> FrameworkResult<Payload> {
        match action {
            "index" => Ok(Payload::text("all books")),
            "show" => Ok(Payload::Text(format!(
                "book {}",
                params.get("id").unwrap_or("?")
            ))),
            _ => Err(FrameworkError::UnknownAction {
                controller: "BookController".to_string(),
                action: action.to_string(),
            }),
        }
    }
}

#[test]
fn test_resource_scaffold_dispatches_through_controller() {
    let mut app = common::app_for("GET", "/books//books/3");
    app.controllers_mut()
        .register("BookController", || Box::new(BookController));
    app.resources("/books", "BookController", &[("id", r"\d+")])
        .unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(!missed);
    assert_eq!(response.body(), Some("book 3"));
}

#[test]
fn test_resource_scaffold_constraint_rejects_at_dispatch() {
    let mut app = common::app_for("GET", "/books//books/dune");
    app.controllers_mut()
        .register("BookController", || Box::new(BookController));
    app.resources("/books", "BookController", &[("id", r"\d+")])
        .unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(missed);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Form spoofing end to end: an HTML form can only POST, so a PUT route
// registered while the body carries `method=PUT` is keyed under POST and
// reachable by the POST request.
#[test]
fn test_spoofed_put_route_dispatches_on_post() {
    let mut app = common::app_with_form("POST", "/items/3", "method=PUT");
    app.put("/items/:id", text("updated")).unwrap();

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();

    assert!(!missed);
    assert_eq!(response.body(), Some("updated"));
}

// Once a post() call has captured the override, dispatch resolves the
// effective method to the override value. A body value that names no
// registered verb therefore 404s even though a POST route exists: the
// override slot is a single shared field, not per-route state.
#[test]
fn test_captured_override_redirects_effective_method() {
    let mut app = common::app_with_form("POST", "/x", "method=PATCH");
    app.post("/x", text("posted")).unwrap();
    assert_eq!(app.routes_for("POST").len(), 1);

    let mut response = Response::new();
    let missed = app.run(&mut response, None).unwrap();
    assert!(missed);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
