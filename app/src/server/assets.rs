//! Static file serving for the generator form (ui/).

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "ui/"]
struct FormAssets;

/// Serve the form for bare `/` requests.
pub async fn form_index() -> Response {
    serve_embedded::<FormAssets>("index.html")
}

/// Fallback handler: serve form assets for unmatched paths.
/// Uses `Uri` instead of `Path` because fallback has no capture parameter.
pub async fn form_fallback(uri: Uri) -> Response {
    let request_path = uri.path();
    if is_api_path(request_path) {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "Not Found",
                "path": request_path,
            })),
        )
            .into_response();
    }

    serve_embedded::<FormAssets>(request_path.trim_start_matches('/'))
}

fn is_api_path(path: &str) -> bool {
    const API_PREFIXES: [&str; 2] = ["/api", "/ws"];

    API_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn serve_embedded<E: Embed>(path: &str) -> Response {
    let (path, asset) = match E::get(path) {
        Some(asset) => (path, Some(asset)),
        None => ("index.html", E::get("index.html")),
    };

    match asset {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::{form_fallback, form_index, is_api_path};
    use axum::body::to_bytes;
    use axum::http::{StatusCode, Uri, header};

    #[test]
    fn detects_api_paths_by_root_segment() {
        for path in ["/api", "/api/job/start", "/ws", "/ws/x"] {
            assert!(is_api_path(path), "{path} should be API");
        }
        for path in ["/", "/apiary", "/wsx", "/index.html"] {
            assert!(!is_api_path(path), "{path} should not be API");
        }
    }

    #[tokio::test]
    async fn unknown_api_path_returns_404_json() {
        let response = form_fallback(Uri::from_static("/api/nonexistent")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], "/api/nonexistent");
    }

    #[tokio::test]
    async fn index_and_unknown_paths_serve_form_html() {
        for response in [
            form_index().await,
            form_fallback(Uri::from_static("/settings")).await,
        ] {
            assert_eq!(response.status(), StatusCode::OK);
            let ct = response.headers().get(header::CONTENT_TYPE).unwrap();
            assert!(ct.to_str().unwrap().starts_with("text/html"));
        }
    }
}
