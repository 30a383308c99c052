// CORS configuration built from ALLOWED_ORIGINS

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::ServerConfig;

/// An empty list or a lone `*` allows any origin.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins = &server.cors_allowed_origins;
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    fn server(origins: &[&str]) -> ServerConfig {
        ServerConfig {
            port: 3000,
            host: "127.0.0.1".into(),
            cors_allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            history_ttl_secs: 86400,
        }
    }

    async fn allow_origin_header(origins: &[&str], origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&server(origins)));
        let response = app
            .oneshot(Request::get("/").header("origin", origin).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_configured_origin_is_echoed() {
        let header = allow_origin_header(&["http://localhost:3000"], "http://localhost:3000").await;
        assert_eq!(header.as_deref(), Some("http://localhost:3000"));
    }

    #[tokio::test]
    async fn test_unknown_origin_is_not_allowed() {
        let header = allow_origin_header(&["http://localhost:3000"], "http://evil.example").await;
        assert!(header.is_none());
    }

    #[tokio::test]
    async fn test_wildcard_allows_any() {
        let header = allow_origin_header(&["*"], "http://anywhere.example").await;
        assert_eq!(header.as_deref(), Some("*"));
    }
}
