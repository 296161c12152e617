//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body size
//! check, route dispatch, common headers, and access logging.

use crate::config::AppState;
use crate::handler::{api, static_files};
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body as _;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const API_PREFIX: &str = "/api/";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// Only the request head is inspected, so any body type is accepted; the
/// body is dropped before routing.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_parts(&parts, remote_addr));

    let path = parts.uri.path();
    let mut response = if let Some(resp) = check_http_method(&parts.method, &state) {
        resp
    } else if let Some(resp) = check_body_size(&parts, state.config.http.max_body_size) {
        resp
    } else {
        let ctx = RequestContext {
            path,
            is_head: parts.method == Method::HEAD,
        };
        route_request(&ctx, &state).await
    };

    apply_common_headers(&mut response, path, &parts.method, &state);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Early response for anything other than GET/HEAD
fn check_http_method(method: &Method, state: &AppState) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(state.config.http.enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(parts: &Parts, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = parts.headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> HttpResponse {
    let config = &state.config;

    // 1. Health check endpoints
    if config.health.enabled
        && (ctx.path == config.health.liveness_path || ctx.path == config.health.readiness_path)
    {
        return http::build_health_response("ok", ctx.is_head);
    }

    // 2. Template API
    if let Some(segment) = ctx.path.strip_prefix(API_PREFIX) {
        if segment == api::LIST_SEGMENT {
            return api::list_templates(&state.index, ctx.is_head);
        }
        if segment.is_empty() || segment.contains('/') {
            return http::build_404_response();
        }
        return api::get_templates(Arc::clone(&state.index), segment, ctx.is_head).await;
    }

    // 3. Landing page
    if ctx.path == "/" || ctx.path == "/index.html" {
        return static_files::serve_landing_page(ctx, &config.static_files.dir).await;
    }

    // 4. Static assets
    let prefix = config.static_files.url_prefix.trim_end_matches('/');
    if let Some(relative) = ctx
        .path
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        return static_files::serve_static(ctx, &config.static_files.dir, relative).await;
    }

    http::build_404_response()
}

/// `Server` on every response; CORS origin on API responses and
/// preflight answers when enabled
fn apply_common_headers(response: &mut HttpResponse, path: &str, method: &Method, state: &AppState) {
    let http_config = &state.config.http;
    let headers = response.headers_mut();

    match HeaderValue::from_str(&http_config.server_name) {
        Ok(value) => {
            headers.insert(SERVER, value);
        }
        Err(e) => logger::log_warning(&format!(
            "Invalid server name '{}': {e}",
            http_config.server_name
        )),
    }

    if http_config.enable_cors && (path.starts_with(API_PREFIX) || *method == Method::OPTIONS) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::templates::test_support::Corpus;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::fs;

    struct Fixture {
        corpus: Corpus,
        static_dir: tempfile::TempDir,
        state: Arc<AppState>,
    }

    fn fixture(configure: impl FnOnce(&mut Config)) -> Fixture {
        let corpus = Corpus::new();
        corpus.add("Python.gitignore", "*.pyc\n");
        corpus.add("Global/Lua.gitignore", "*.luac\n");

        let static_dir = tempfile::tempdir().unwrap();
        fs::write(static_dir.path().join("site.css"), "body{}").unwrap();

        let mut config = Config::load_from(static_dir.path().join("absent").to_str().unwrap()).unwrap();
        config.templates.root_dir = corpus.path().display().to_string();
        config.static_files.dir = static_dir.path().display().to_string();
        config.logging.access_log = false;
        configure(&mut config);

        let state = Arc::new(AppState::new(config, corpus.index()));
        Fixture {
            corpus,
            static_dir,
            state,
        }
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> HttpResponse {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), None).await.unwrap()
    }

    async fn body_string(response: HttpResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_list_endpoint() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/api/list").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/plain; charset=utf-8");
        assert_eq!(body_string(response).await, "lua,python");
    }

    #[tokio::test]
    async fn test_templates_endpoint() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/api/python,lua").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "## Python\n\n*.pyc\n\n## Lua\n\n*.luac"
        );
    }

    #[tokio::test]
    async fn test_templates_endpoint_not_found() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/api/python,cobol").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(
            body_string(response).await,
            r#"{"detail":"Template \"cobol\" not found."}"#
        );
    }

    #[tokio::test]
    async fn test_nested_api_path_is_plain_404() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/api/Global/Lua").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "404 Not Found");
    }

    #[tokio::test]
    async fn test_encoded_slash_in_api_path_is_plain_404() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/api/Global%2FLua").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_ne!(response.headers()["content-type"], "application/json");
        assert_eq!(body_string(response).await, "404 Not Found");
    }

    #[tokio::test]
    async fn test_access_log_follows_config() {
        let fx = fixture(|config| config.logging.access_log = true);
        let response = send(&fx.state, Method::GET, "/api/list").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "lua,python");
    }

    #[tokio::test]
    async fn test_head_request_has_no_body() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::HEAD, "/api/python").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-length"], "16");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::POST, "/api/python").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let fx = fixture(|config| config.http.max_body_size = 10);
        let req = Request::builder()
            .uri("/api/list")
            .header("content-length", "11")
            .body(())
            .unwrap();
        let response = handle_request(req, Arc::clone(&fx.state), None).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");

        let disabled = fixture(|config| config.health.enabled = false);
        let response = send(&disabled.state, Method::GET, "/readyz").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_landing_page_and_static_assets() {
        let fx = fixture(|_| {});
        let response = send(&fx.state, Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("/api/list"));

        fs::write(fx.static_dir.path().join("index.html"), "<h1>custom</h1>").unwrap();
        let response = send(&fx.state, Method::GET, "/").await;
        assert_eq!(body_string(response).await, "<h1>custom</h1>");

        let response = send(&fx.state, Method::GET, "/static/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/css; charset=utf-8");
        assert_eq!(body_string(response).await, "body{}");

        let response = send(&fx.state, Method::GET, "/static/missing.css").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_server_and_cors_headers() {
        let fx = fixture(|config| config.http.enable_cors = true);
        let response = send(&fx.state, Method::GET, "/api/list").await;
        assert_eq!(response.headers()["server"], "donotcommit");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let response = send(&fx.state, Method::GET, "/").await;
        assert!(!response.headers().contains_key("access-control-allow-origin"));

        let response = send(&fx.state, Method::OPTIONS, "/").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let plain = fixture(|_| {});
        let response = send(&plain.state, Method::GET, "/api/list").await;
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_index_is_fixed_at_startup() {
        let fx = fixture(|_| {});
        fx.corpus.add("Zig.gitignore", "zig-cache/\n");
        let response = send(&fx.state, Method::GET, "/api/zig").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
