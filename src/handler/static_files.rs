//! Static file serving module
//!
//! Serves the landing page and assets from the static directory.

use crate::handler::router::RequestContext;
use crate::http::{self, mime, HttpResponse};
use crate::logger;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve the landing page: `index.html` from the static directory, or the
/// built-in page when the directory has none
pub async fn serve_landing_page(ctx: &RequestContext<'_>, static_dir: &str) -> HttpResponse {
    let index_path = Path::new(static_dir).join(INDEX_FILE);
    match fs::read_to_string(&index_path).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(_) => http::build_html_response(default_landing_page(), ctx.is_head),
    }
}

/// Serve `relative_path` from `static_dir`
pub async fn serve_static(
    ctx: &RequestContext<'_>,
    static_dir: &str,
    relative_path: &str,
) -> HttpResponse {
    let Some(file_path) = resolve_static_path(static_dir, relative_path, ctx.path) else {
        return http::build_404_response();
    };

    match fs::read(&file_path).await {
        Ok(content) => {
            http::build_file_response(content, mime::content_type_for(&file_path), ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            http::build_404_response()
        }
    }
}

/// Map a request path onto a regular file inside `static_dir`. Returns
/// `None` for missing files, directories, and anything escaping the root.
fn resolve_static_path(static_dir: &str, relative_path: &str, request_path: &str) -> Option<PathBuf> {
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let relative_path = relative_path.trim_start_matches('/');
    if relative_path.is_empty() {
        return None;
    }

    // File not found is common (404), no need to log
    let file_path_canonical = static_dir_canonical.join(relative_path).canonicalize().ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            file_path_canonical.display()
        ));
        return None;
    }

    file_path_canonical.is_file().then_some(file_path_canonical)
}

/// Built-in landing page describing the API
pub fn default_landing_page() -> String {
    String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>donotcommit</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            max-width: 720px;
            margin: 60px auto;
            padding: 0 20px;
            line-height: 1.6;
            color: #1f2328;
        }
        code, pre {
            font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
            background: #f6f8fa;
            border-radius: 6px;
        }
        code { padding: 2px 6px; }
        pre { padding: 16px; overflow-x: auto; }
    </style>
</head>
<body>
    <h1>donotcommit</h1>
    <p>Ready-made <code>.gitignore</code> files from
       <a href="https://github.com/github/gitignore">github/gitignore</a>.</p>

    <h2>List templates</h2>
    <pre>curl -L https://donotcommit.com/api/list</pre>

    <h2>Get templates</h2>
    <p>Comma separated, case insensitive:</p>
    <pre>curl -L https://donotcommit.com/api/python,lua,zig &gt; .gitignore</pre>
</body>
</html>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[test]
    fn test_resolve_file_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::create_dir_all(dir.path().join("css")).unwrap();
        std_fs::write(dir.path().join("css/site.css"), "body{}").unwrap();
        let root = dir.path().to_str().unwrap();

        let resolved = resolve_static_path(root, "css/site.css", "/static/css/site.css").unwrap();
        assert!(resolved.ends_with("css/site.css"));
    }

    #[test]
    fn test_resolve_rejects_traversal_and_directories() {
        let outer = tempfile::tempdir().unwrap();
        let static_dir = outer.path().join("static");
        std_fs::create_dir_all(static_dir.join("css")).unwrap();
        std_fs::write(outer.path().join("secret.txt"), "nope").unwrap();
        let root = static_dir.to_str().unwrap();

        assert!(resolve_static_path(root, "../secret.txt", "/static/../secret.txt").is_none());
        assert!(resolve_static_path(root, "css", "/static/css").is_none());
        assert!(resolve_static_path(root, "", "/static/").is_none());
        assert!(resolve_static_path(root, "missing.js", "/static/missing.js").is_none());
    }

    #[test]
    fn test_resolve_missing_static_dir() {
        assert!(resolve_static_path("/definitely/not/here", "app.js", "/static/app.js").is_none());
    }

    #[test]
    fn test_default_landing_page_mentions_api() {
        let html = default_landing_page();
        assert!(html.contains("/api/list"));
        assert!(html.contains("/api/python,lua,zig"));
    }
}
