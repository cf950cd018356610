//! JSON proxy of the product data service

use adapter_backend::{BackendError, ProductQuery, RequestAuth};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use portal_core::backend::ProductPage;
use portal_core::{Isin, Product};
use serde::Serialize;
use serde_json::{json, Value};

use super::AppState;
use crate::error::ApiError;
use crate::session::MaybeSession;

/// Body of `GET /api/products/{isin}`
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// Body of `GET /api/products/isin/{isin}`
#[derive(Debug, Clone, Serialize)]
pub struct IsinLookupResponse {
    pub product: Product,
    pub success: bool,
}

/// Build the product routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/", get(missing_isin))
        .route("/api/products/{isin}", get(product_detail))
        .route("/api/products/isin/{isin}", get(product_by_isin))
        .route("/api/categories", get(categories))
        .route("/api/product-stats", get(product_stats))
        .route("/api/test-backend", get(test_backend))
}

/// Parse a path ISIN, telling an empty one apart from a malformed one
fn parse_isin(raw: &str) -> Result<Isin, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request("ISIN parameter is required"));
    }
    Isin::parse(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// GET /api/products
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ProductPage>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Bad product list query");
        ApiError::bad_request("Invalid query parameters").with_message(rejection.body_text())
    })?;
    tracing::debug!(?query, "Listing products");
    state
        .backend
        .list_products(&query, &RequestAuth::Service)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "Product list failed");
            ApiError::upstream("Failed to fetch products", &e)
        })
}

/// GET /api/products/
async fn missing_isin() -> ApiError {
    ApiError::bad_request("ISIN parameter is required")
}

/// GET /api/products/{isin}
async fn product_detail(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let isin = parse_isin(&raw)?;
    match state.backend.product_detail(&isin, &RequestAuth::Service).await {
        Ok(product) => Ok(Json(ProductResponse { product })),
        Err(BackendError::NotFound) => Err(ApiError::not_found("Product not found")),
        Err(e) => Err(ApiError::upstream("Failed to fetch product", &e)),
    }
}

/// GET /api/products/isin/{isin}
///
/// Credentials, first match wins: the caller's bearer header, the session
/// tokens (refreshed on 401), the service credentials.
async fn product_by_isin(
    State(state): State<AppState>,
    MaybeSession(active): MaybeSession,
    headers: HeaderMap,
    Path(raw): Path<String>,
) -> Result<Json<IsinLookupResponse>, ApiError> {
    let isin = parse_isin(&raw)?;
    let backend = &state.backend;

    let result = match (bearer(&headers), active) {
        (Some(token), _) => {
            tracing::debug!(%isin, "Lookup with caller token");
            backend.product_by_isin(&isin, &RequestAuth::Bearer(token)).await
        }
        (None, Some(active)) if active.is_authenticated() => {
            tracing::debug!(%isin, "Lookup with session token");
            let isin = &isin;
            backend
                .with_refresh(&active.handle, |token| async move {
                    backend.product_by_isin(isin, &RequestAuth::Bearer(token)).await
                })
                .await
        }
        _ => backend.product_by_isin(&isin, &RequestAuth::Service).await,
    };

    match result {
        Ok(product) => Ok(Json(IsinLookupResponse {
            product,
            success: true,
        })),
        Err(BackendError::NotFound) => Err(ApiError::not_found("Product not found")),
        Err(e) => Err(ApiError::upstream("Failed to fetch product", &e)
            .with_success_flag()
            .with_details(json!({
                "isin": isin.as_str(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))),
    }
}

/// GET /api/categories
async fn categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .backend
        .categories(&RequestAuth::Service)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to fetch categories", &e))
}

/// GET /api/product-stats
async fn product_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .backend
        .product_stats(&RequestAuth::Service)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to fetch product stats", &e))
}

/// GET /api/test-backend
async fn test_backend(State(state): State<AppState>) -> Response {
    let report = state.backend.ping().await;
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;
    use crate::routes::test_support::get;
    use axum::routing::get as route_get;

    fn detail_json(isin: &str) -> Value {
        json!({
            "product": {
                "id": 9,
                "label": "Phoenix Euro Stoxx",
                "isin": isin,
                "family": "Phoenix",
                "launch_date": "2025-03-10",
                "deliver": "BNP Paribas"
            },
            "status": {"id": 1, "code": "LIVE"}
        })
    }

    async fn lookup(headers: HeaderMap, Path(isin): Path<String>) -> Response {
        match isin.as_str() {
            "MISSING" => StatusCode::NOT_FOUND.into_response(),
            "BROKEN" => StatusCode::BAD_GATEWAY.into_response(),
            _ => {
                let mut body = detail_json(&isin);
                if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
                    body["product"]["label"] = json!(auth);
                }
                Json(body).into_response()
            }
        }
    }

    async fn fake_backend() -> String {
        let router = Router::new()
            .route("/", route_get(|| async { "data service" }))
            .route(
                "/api/products/",
                route_get(|| async {
                    Json(json!({
                        "count": 1,
                        "next": null,
                        "previous": null,
                        "results": [{
                            "id": 9, "label": "Phoenix Euro Stoxx", "isin": "FR0000000001",
                            "family": "Phoenix", "deliver": "BNP Paribas",
                            "launch_date": "2025-03-10"
                        }]
                    }))
                }),
            )
            .route("/api/products/{isin}/", route_get(lookup))
            .route("/api/products/isin/{isin}/", route_get(lookup))
            .route(
                "/api/categories/",
                route_get(|| async { Json(json!(["autocall", "phoenix"])) }),
            );
        spawn_backend(router).await
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_list_products_maps_page() {
        let state = state_for(&fake_backend().await);
        let response = get(&state, "/api/products?limit=5", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["products"][0]["isin"], "FR0000000001");
        assert_eq!(body["products"][0]["startDate"], "Mar. 2025");
        assert!(body["next"].is_null());
    }

    #[tokio::test]
    async fn test_list_products_bad_limit_is_json() {
        let response = get(&offline_state(), "/api/products?limit=abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Invalid query parameters");
        assert!(body["message"].as_str().unwrap().starts_with("Failed to deserialize query string"));
    }

    #[tokio::test]
    async fn test_lookup_forwards_caller_casing() {
        let state = state_for(&fake_backend().await);

        // Only the uppercase key fails upstream.
        let response = get(&state, "/api/products/isin/broken", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["product"]["isin"], "broken");

        let response = get(&state, "/api/products/isin/%20MISSING%20", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_products_unreachable_backend() {
        let response = get(&offline_state(), "/api/products", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch products");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_detail_found_and_missing() {
        let state = state_for(&fake_backend().await);

        let response = get(&state, "/api/products/fr0000000001", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["product"]["isin"], "fr0000000001");
        assert_eq!(body["product"]["status"], "Started");

        let response = get(&state, "/api/products/MISSING", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": "Product not found"}));
    }

    #[tokio::test]
    async fn test_detail_rejects_blank_and_malformed_isin() {
        let state = offline_state();

        let response = get(&state, "/api/products/", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "ISIN parameter is required");

        let response = get(&state, "/api/products/%20", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "ISIN parameter is required");

        let response = get(&state, "/api/products/FR00-12", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid ISIN: FR00-12");
    }

    #[tokio::test]
    async fn test_detail_upstream_failure() {
        let state = state_for(&fake_backend().await);
        let response = get(&state, "/api/products/BROKEN", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch product");
        assert_eq!(body["message"], "Backend API returned 502: Bad Gateway");
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn test_isin_lookup_prefers_caller_token() {
        let state = state_for(&fake_backend().await);
        let cookie = signed_in(&state);

        let response = build_request(&state, "/api/products/isin/FR1", Some("Bearer caller"), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["product"]["name"], "Bearer caller");
    }

    #[tokio::test]
    async fn test_isin_lookup_uses_session_token() {
        let state = state_for(&fake_backend().await);
        let cookie = signed_in(&state);

        let response = get(&state, "/api/products/isin/FR1", Some(&cookie)).await;
        let body = json_body(response).await;
        assert_eq!(body["product"]["name"], "Bearer access-1");
    }

    #[tokio::test]
    async fn test_isin_lookup_anonymous_has_no_user_token() {
        let state = state_for(&fake_backend().await);
        let response = get(&state, "/api/products/isin/FR1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["product"]["name"], "Phoenix Euro Stoxx");
    }

    #[tokio::test]
    async fn test_isin_lookup_failure_carries_details() {
        let state = state_for(&fake_backend().await);
        let response = get(&state, "/api/products/isin/BROKEN", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to fetch product");
        assert_eq!(body["details"]["isin"], "BROKEN");
        assert!(body["details"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_categories_passthrough() {
        let state = state_for(&fake_backend().await);
        let response = get(&state, "/api/categories", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!(["autocall", "phoenix"]));

        let response = get(&state, "/api/product-stats", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Failed to fetch product stats");
    }

    #[tokio::test]
    async fn test_backend_probe() {
        let state = state_for(&fake_backend().await);
        let response = get(&state, "/api/test-backend", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], 200);

        let response = get(&offline_state(), "/api/test-backend", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["backendUrl"], "http://127.0.0.1:9");
        assert_eq!(body["message"], "Backend connection failed");
    }

    async fn build_request(
        state: &AppState,
        uri: &str,
        authorization: Option<&str>,
        cookie: Option<&str>,
    ) -> Response {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let mut request = Request::builder().uri(uri);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        if let Some(cookie) = cookie {
            request = request.header(axum::http::header::COOKIE, cookie);
        }
        crate::routes::build_router(state.clone())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}
