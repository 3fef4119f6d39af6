//! Router assembly: health routes, entity routes and the HTTP middleware stack

use super::entity_registry::EntityRegistry;
use crate::config::ServerConfig;
use axum::http::{HeaderValue, Method};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete application router
pub fn build_router(registry: &EntityRegistry, server: &ServerConfig) -> Router {
    health_routes()
        .merge(registry.build_routes())
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME")
    }))
}

/// CORS policy for the read-only API
///
/// An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app(origins: &[&str]) -> Router {
        let server = ServerConfig {
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            ..Default::default()
        };
        build_router(&EntityRegistry::new(), &server)
    }

    async fn get(app: Router, uri: &str, origin: Option<&str>) -> axum::response::Response {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(origin) = origin {
            request = request.header(header::ORIGIN, origin);
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_body() {
        let response = get(app(&[]), "/healthz", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], env!("CARGO_PKG_NAME"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = get(app(&[]), "/api/widgets", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_origin_list_allows_any_origin() {
        let response = get(app(&[]), "/health", Some("https://elsewhere.dev")).await;
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_configured_origins_are_enforced() {
        let app = app(&["https://covetalks.com"]);

        let response = get(app.clone(), "/health", Some("https://covetalks.com")).await;
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://covetalks.com"
        );

        let response = get(app, "/health", Some("https://elsewhere.dev")).await;
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
