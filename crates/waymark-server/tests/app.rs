//! Integration tests for the request pipeline, driven through the Axum router.
//!
//! Tests cover:
//! 1. Routed handlers receive their captured parameters
//! 2. Content-type prefixes and status overrides reach the wire
//! 3. Blocked paths, redirects, and unmatched paths
//! 4. Status handlers rewriting error pages, with the matched route's params
//! 5. View routes rendered by Tera
//! 6. An application assembled from a settings file

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use http::{Method as HttpMethod, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use waymark_core::settings_loader;
use waymark_core::Settings;
use waymark_http::urls::routes::RouteHandler;
use waymark_http::{BoxFuture, HttpRequest, HttpResponse, Method, Router};
use waymark_server::{TeraRenderer, WaymarkApp};

struct TestResponse {
    status: StatusCode,
    headers: http::HeaderMap,
    body: String,
}

async fn send(app: axum::Router, method: HttpMethod, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builder should not fail");
    let response = app.oneshot(request).await.expect("router should not error");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

async fn get(app: &axum::Router, uri: &str) -> TestResponse {
    send(app.clone(), HttpMethod::GET, uri).await
}

fn echo_param(name: &'static str) -> RouteHandler {
    Arc::new(move |req: HttpRequest| -> BoxFuture {
        Box::pin(async move {
            let value = req.param(name).unwrap_or("<none>").to_string();
            HttpResponse::ok(format!("{name}={value}"))
        })
    })
}

fn text(body: &'static str) -> RouteHandler {
    Arc::new(move |_req: HttpRequest| -> BoxFuture {
        Box::pin(async move { HttpResponse::ok(body) })
    })
}

// ============================================================================
// 1. Routed handlers receive their captured parameters
// ============================================================================

#[tokio::test]
async fn test_required_param_reaches_handler() {
    let mut router = Router::new();
    router.get("users/{id}", echo_param("id")).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/users/42").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "id=42");
}

#[tokio::test]
async fn test_optional_param_absent_is_empty() {
    let mut router = Router::new();
    router.get("archive/{year?}", echo_param("year")).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    assert_eq!(get(&app, "/archive").await.body, "year=");
    assert_eq!(get(&app, "/archive/2023").await.body, "year=2023");
}

#[tokio::test]
async fn test_params_do_not_leak_between_requests() {
    let mut router = Router::new();
    router.get("a/{x}", echo_param("x")).unwrap();
    router.get("b/{y}", echo_param("x")).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    assert_eq!(get(&app, "/a/1").await.body, "x=1");
    assert_eq!(get(&app, "/b/2").await.body, "x=<none>");
}

#[tokio::test]
async fn test_method_filtering() {
    let mut router = Router::new();
    router.post("items", text("created")).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    assert_eq!(get(&app, "/items").await.status, StatusCode::NOT_FOUND);
    let response = send(app, HttpMethod::POST, "/items").await;
    assert_eq!(response.body, "created");
}

#[tokio::test]
async fn test_root_route() {
    let mut router = Router::new();
    router.get("/", text("home")).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    assert_eq!(get(&app, "/").await.body, "home");
}

// ============================================================================
// 2. Content-type prefixes and status overrides reach the wire
// ============================================================================

#[tokio::test]
async fn test_json_prefix_sets_header() {
    let mut router = Router::new();
    router.get("json:api/status", text(r#"{"ok":true}"#)).unwrap();
    router.get("csv:report", text("a,b")).unwrap();
    router.get("pdf:doc", text("%PDF")).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let status = get(&app, "/api/status").await;
    assert_eq!(
        status.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "application/json; charset=utf-8"
    );
    let report = get(&app, "/report").await;
    assert_eq!(
        report.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    let doc = get(&app, "/doc").await;
    assert_eq!(
        doc.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
}

#[tokio::test]
async fn test_status_override() {
    let mut router = Router::new();
    router.register("jobs", Method::Post, text("queued"), Some(202)).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = send(app, HttpMethod::POST, "/jobs").await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body, "queued");
}

// ============================================================================
// 3. Blocked paths, redirects, and unmatched paths
// ============================================================================

#[tokio::test]
async fn test_blocked_path_is_forbidden() {
    let mut router = Router::new();
    router.get("admin", text("admin home")).unwrap();
    router.get("admin/{page}", text("admin page")).unwrap();
    router.block("admin/*");
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    assert_eq!(get(&app, "/admin/settings").await.status, StatusCode::FORBIDDEN);
    assert_eq!(get(&app, "/admin/settings/x").await.status, StatusCode::FORBIDDEN);
    assert_eq!(get(&app, "/admin").await.body, "admin home");
}

#[tokio::test]
async fn test_redirect() {
    let mut router = Router::new();
    router.redirect_permanent("old", "new").unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/old").await;
    assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers.get(http::header::LOCATION).unwrap(), "/new");
    assert_eq!(get(&app, "/old/x").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmatched_is_not_found() {
    let app = WaymarkApp::new(Settings::default()).into_axum_router();
    assert_eq!(get(&app, "/anything").await.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// 4. Status handlers rewriting error pages
// ============================================================================

#[tokio::test]
async fn test_custom_not_found_page() {
    let mut router = Router::new();
    router
        .on_status(
            404,
            Arc::new(|req: &HttpRequest, resp: &mut HttpResponse| {
                resp.set_body(format!("No page at {}", req.path()));
            }),
        )
        .unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/missing").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "No page at /missing");
}

#[tokio::test]
async fn test_status_handler_sees_handler_status() {
    let mut router = Router::new();
    router
        .get(
            "broken",
            Arc::new(|_req: HttpRequest| -> BoxFuture {
                Box::pin(async { HttpResponse::server_error("raw") })
            }),
        )
        .unwrap();
    router
        .on_status(
            500,
            Arc::new(|_req: &HttpRequest, resp: &mut HttpResponse| {
                resp.set_body("Something went wrong");
            }),
        )
        .unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/broken").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Something went wrong");
}

#[tokio::test]
async fn test_custom_forbidden_page() {
    let mut router = Router::new();
    router.block("private/*");
    router
        .on_status(
            403,
            Arc::new(|_req: &HttpRequest, resp: &mut HttpResponse| {
                resp.set_body("Keep out");
            }),
        )
        .unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/private/files").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "Keep out");
}

#[tokio::test]
async fn test_status_handler_reads_route_params() {
    let mut router = Router::new();
    router
        .get(
            "users/{id}",
            Arc::new(|_req: HttpRequest| -> BoxFuture {
                Box::pin(async { HttpResponse::not_found("") })
            }),
        )
        .unwrap();
    router
        .on_status(
            404,
            Arc::new(|req: &HttpRequest, resp: &mut HttpResponse| {
                resp.set_body(format!("No user {}", req.param("id").unwrap_or("<none>")));
            }),
        )
        .unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/users/42").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "No user 42");

    // No route matched, so nothing is bound.
    assert_eq!(get(&app, "/people/42").await.body, "No user <none>");
}

// ============================================================================
// 5. View routes rendered by Tera
// ============================================================================

#[tokio::test]
async fn test_view_route_renders_template_with_params() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("profile.html"),
        "<h1>{{ greeting }}, user {{ id }}</h1>",
    )
    .unwrap();
    let renderer = TeraRenderer::with_dirs(vec![dir.path().to_path_buf()]).unwrap();

    let mut router = Router::new();
    router.set_renderer(Arc::new(renderer));
    router
        .view("profile/{id}", "profile", json!({"greeting": "Hello"}), None)
        .unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    let response = get(&app, "/profile/7").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "<h1>Hello, user 7</h1>");
    assert_eq!(
        response.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_view_route_missing_template_is_500() {
    let mut router = Router::new();
    router.set_renderer(Arc::new(TeraRenderer::new()));
    router.view("gone", "gone.html", json!({}), None).unwrap();
    let app = WaymarkApp::new(Settings::default()).router(router).into_axum_router();

    assert_eq!(get(&app, "/gone").await.status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// 6. An application assembled from a settings file
// ============================================================================

#[tokio::test]
async fn test_app_from_settings_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
debug = false
blocked = ["internal/*"]

[[redirects]]
from = "/docs"
to = "/documentation"

[[redirects]]
from = "/beta"
to = "/preview"
code = 302
"#
    )
    .unwrap();
    let settings = settings_loader::from_toml_file(file.path()).unwrap();
    let app = WaymarkApp::from_settings(settings).unwrap().into_axum_router();

    assert_eq!(get(&app, "/internal/metrics").await.status, StatusCode::FORBIDDEN);

    let docs = get(&app, "/docs").await;
    assert_eq!(docs.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(docs.headers.get(http::header::LOCATION).unwrap(), "/documentation");

    let beta = get(&app, "/beta").await;
    assert_eq!(beta.status, StatusCode::FOUND);
    assert_eq!(beta.headers.get(http::header::LOCATION).unwrap(), "/preview");
}
