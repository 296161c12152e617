//! HTTP response building module
//!
//! Builders for every status the server emits. Builders never panic: a
//! failed build is logged and replaced by an empty response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};

pub type HttpResponse = Response<Full<Bytes>>;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build a response with a body. For HEAD requests the body is dropped but
/// `Content-Length` still reports its size.
fn build(status: StatusCode, content_type: &str, body: Bytes, is_head: bool) -> HttpResponse {
    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { body };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 200 text/plain
pub fn build_text_response(body: String, is_head: bool) -> HttpResponse {
    build(StatusCode::OK, TEXT_PLAIN, Bytes::from(body), is_head)
}

/// 200 text/html
pub fn build_html_response(content: String, is_head: bool) -> HttpResponse {
    build(
        StatusCode::OK,
        "text/html; charset=utf-8",
        Bytes::from(content),
        is_head,
    )
}

/// 200 with the given content type, for static assets
pub fn build_file_response(data: Vec<u8>, content_type: &str, is_head: bool) -> HttpResponse {
    build(StatusCode::OK, content_type, Bytes::from(data), is_head)
}

/// 404 with a JSON `detail` message, used for unknown templates
pub fn build_not_found_detail_response(detail: &str, is_head: bool) -> HttpResponse {
    let body = serde_json::json!({ "detail": detail }).to_string();
    build(
        StatusCode::NOT_FOUND,
        "application/json",
        Bytes::from(body),
        is_head,
    )
}

/// 404 Not Found
pub fn build_404_response() -> HttpResponse {
    build(
        StatusCode::NOT_FOUND,
        TEXT_PLAIN,
        Bytes::from_static(b"404 Not Found"),
        false,
    )
}

/// 405 Method Not Allowed
pub fn build_405_response() -> HttpResponse {
    let mut response = build(
        StatusCode::METHOD_NOT_ALLOWED,
        TEXT_PLAIN,
        Bytes::from_static(b"405 Method Not Allowed"),
        false,
    );
    response
        .headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// 413 Payload Too Large
pub fn build_413_response() -> HttpResponse {
    build(
        StatusCode::PAYLOAD_TOO_LARGE,
        TEXT_PLAIN,
        Bytes::from_static(b"413 Payload Too Large"),
        false,
    )
}

/// 500 Internal Server Error
pub fn build_500_response() -> HttpResponse {
    build(
        StatusCode::INTERNAL_SERVER_ERROR,
        TEXT_PLAIN,
        Bytes::from_static(b"500 Internal Server Error"),
        false,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error(StatusCode::NO_CONTENT, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Health check response
pub fn build_health_response(status: &'static str, is_head: bool) -> HttpResponse {
    build(StatusCode::OK, TEXT_PLAIN, Bytes::from_static(status.as_bytes()), is_head)
}

fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
