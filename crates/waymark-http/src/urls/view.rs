//! View routes: GET routes answered by rendering a named template.
//!
//! The rendering itself is done by whatever implements [`ViewRenderer`]; the
//! server crate ships one backed by Tera.

use std::sync::Arc;

use serde_json::Value;

use waymark_core::WaymarkResult;

use super::routes::RouteHandler;
use crate::{BoxFuture, HttpRequest, HttpResponse, RouteParams};

/// Renders a named view with JSON data.
pub trait ViewRenderer: Send + Sync {
    /// Renders `view` with `data`.
    ///
    /// When `cache` is `false` the renderer must pick up template changes made
    /// since the last render.
    ///
    /// # Errors
    ///
    /// Returns an error if the view does not exist or fails to render.
    fn render(&self, view: &str, data: &Value, cache: bool) -> WaymarkResult<String>;
}

/// Builds a route handler that renders `view`.
///
/// Captured route parameters are added to `data` (when it is an object) under
/// any name `data` does not already define. A render failure produces a 500
/// response.
pub fn view_handler(
    renderer: Arc<dyn ViewRenderer>,
    view: impl Into<String>,
    data: Value,
    cache: bool,
) -> RouteHandler {
    let view: Arc<str> = Arc::from(view.into());
    let data = Arc::new(data);
    Arc::new(move |request: HttpRequest| -> BoxFuture {
        let renderer = Arc::clone(&renderer);
        let view = Arc::clone(&view);
        let data = merge_params(&data, request.params());
        Box::pin(async move {
            match renderer.render(&view, &data, cache) {
                Ok(body) => HttpResponse::ok(body),
                Err(e) => {
                    tracing::error!(view = %view, error = %e, "View rendering failed");
                    HttpResponse::server_error(format!("Error rendering view '{view}'"))
                }
            }
        })
    })
}

fn merge_params(data: &Value, params: &RouteParams) -> Value {
    let mut data = data.clone();
    if let Value::Object(map) = &mut data {
        for (name, value) in params {
            map.entry(name.clone())
                .or_insert_with(|| Value::String(value.clone()));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use waymark_core::WaymarkError;

    /// Echoes the view name, cache flag, and data.
    struct EchoRenderer;

    impl ViewRenderer for EchoRenderer {
        fn render(&self, view: &str, data: &Value, cache: bool) -> WaymarkResult<String> {
            if view == "missing" {
                return Err(WaymarkError::TemplateError("not found".into()));
            }
            Ok(format!("{view}|{cache}|{data}"))
        }
    }

    fn request_with(params: &[(&str, &str)]) -> HttpRequest {
        let mut store = RouteParams::new();
        for (name, value) in params {
            store.insert(*name, *value);
        }
        HttpRequest::builder().params(store).build()
    }

    #[tokio::test]
    async fn test_view_handler_renders() {
        let handler = view_handler(Arc::new(EchoRenderer), "home", json!({"a": 1}), false);
        let response = handler(request_with(&[])).await;
        assert_eq!(response.content_bytes(), br#"home|false|{"a":1}"#);
        assert!(!response.has_explicit_content_type());
    }

    #[tokio::test]
    async fn test_view_handler_merges_params_without_overriding() {
        let handler = view_handler(
            Arc::new(EchoRenderer),
            "user",
            json!({"title": "fixed"}),
            true,
        );
        let response = handler(request_with(&[("id", "7"), ("title", "from-path")])).await;
        let body = String::from_utf8(response.content_bytes()).unwrap();
        let data: Value = serde_json::from_str(body.split('|').nth(2).unwrap()).unwrap();
        assert_eq!(data, json!({"title": "fixed", "id": "7"}));
    }

    #[tokio::test]
    async fn test_view_handler_non_object_data_unchanged() {
        let handler = view_handler(Arc::new(EchoRenderer), "list", json!([1, 2]), true);
        let response = handler(request_with(&[("id", "7")])).await;
        assert_eq!(response.content_bytes(), b"list|true|[1,2]");
    }

    #[tokio::test]
    async fn test_view_handler_render_error_is_500() {
        let handler = view_handler(Arc::new(EchoRenderer), "missing", Value::Null, true);
        let response = handler(request_with(&[])).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
