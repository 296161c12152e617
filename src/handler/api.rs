//! Template API endpoints
//!
//! `GET /api/list` and `GET /api/{names}`.

use percent_encoding::percent_decode_str;
use std::sync::Arc;

use crate::http::{self, HttpResponse};
use crate::logger;
use crate::templates::{self, TemplateError, TemplateIndex};

/// Path segment that lists templates instead of fetching one
pub const LIST_SEGMENT: &str = "list";

/// Sorted template names, five per row
pub fn list_templates(index: &TemplateIndex, is_head: bool) -> HttpResponse {
    http::build_text_response(index.list_names(), is_head)
}

/// Aggregate the templates named in the raw (still percent-encoded) path
/// segment. File reads run on the blocking pool.
///
/// A segment that decodes to something holding `/` is not a template
/// request and gets a plain 404, same as an undecoded nested path.
pub async fn get_templates(
    index: Arc<TemplateIndex>,
    raw_segment: &str,
    is_head: bool,
) -> HttpResponse {
    let raw = percent_decode_str(raw_segment).decode_utf8_lossy().into_owned();
    if raw.contains('/') {
        return http::build_404_response();
    }

    let result =
        tokio::task::spawn_blocking(move || templates::get_templates(&index, &raw)).await;

    match result {
        Ok(Ok(body)) => http::build_text_response(body, is_head),
        Ok(Err(err @ TemplateError::NotFound(_))) => {
            logger::log_debug(&err.to_string());
            http::build_not_found_detail_response(&err.to_string(), is_head)
        }
        Ok(Err(err)) => {
            logger::log_error(&err.to_string());
            http::build_500_response()
        }
        Err(join_err) => {
            logger::log_error(&format!("Template task failed: {join_err}"));
            http::build_500_response()
        }
    }
}
