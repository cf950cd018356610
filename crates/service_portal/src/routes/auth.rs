//! JSON authentication routes
//!
//! Tokens never reach the browser: a successful login opens a server-side
//! session and answers with the session cookie.

use adapter_backend::BackendError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use infra_session::{SessionId, TokenStore};
use portal_core::user::{validation_message, RegisterRequest};
use portal_core::User;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::{with_cookie, AppState};
use crate::error::ApiError;
use crate::session::{ActiveSession, MaybeSession};

/// Login body; the identifier may come under any of three names
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginBody {
    pub email: Option<String>,
    pub username: Option<String>,
    pub identifier: Option<String>,
    pub password: Option<String>,
}

impl LoginBody {
    /// First non-blank identifier field
    pub fn identifier(&self) -> Option<&str> {
        [&self.identifier, &self.email, &self.username]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

/// Build the authentication routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/logout", post(logout))
        .route("/api/token/refresh", post(refresh_token))
        .route("/api/profile", get(profile))
}

/// Log in against the data service and open a session.
///
/// A session already named by the request cookie is dropped first. The user
/// comes from the login payload, else from the profile endpoint.
pub(crate) async fn open_session(
    state: &AppState,
    previous: Option<SessionId>,
    identifier: &str,
    password: &str,
) -> Result<(SessionId, Option<User>), BackendError> {
    let response = state.backend.login(identifier, password).await?;

    if let Some(previous) = previous {
        state.sessions.remove(&previous);
    }
    let id = state.sessions.create();
    let handle = state.sessions.handle(id);
    handle.set_tokens(response.tokens());

    let user = match response.user {
        Some(user) => Some(user),
        None => match state.backend.profile(&response.access).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Profile lookup after login failed");
                None
            }
        },
    };
    if let Some(user) = &user {
        handle.set_user(user.clone());
    }
    tracing::info!(session = %id, "Session opened");
    Ok((id, user))
}

/// Revoke the refresh token and drop the session
pub(crate) async fn close_session(state: &AppState, active: &ActiveSession) {
    if let Some(refresh) = active.session.refresh_token.as_deref() {
        state.backend.logout(refresh).await;
    }
    state.sessions.remove(&active.id);
    tracing::info!(session = %active.id, "Session closed");
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    MaybeSession(active): MaybeSession,
    Json(body): Json<LoginBody>,
) -> Response {
    let (Some(identifier), Some(password)) = (body.identifier(), body.password.as_deref()) else {
        return ApiError::bad_request("Email/username and password are required")
            .with_success_flag()
            .into_response();
    };

    match open_session(&state, active.map(|a| a.id), identifier, password).await {
        Ok((id, user)) => with_cookie(
            state.cookies.build(&id, state.sessions.ttl()),
            Json(json!({ "success": true, "user": user })),
        ),
        Err(e) => {
            tracing::info!(error = %e, "API login failed");
            ApiError::unauthorized(e.to_string())
                .with_success_flag()
                .into_response()
        }
    }
}

/// POST /api/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if let Err(errors) = request.validate() {
        return Err(ApiError::bad_request(validation_message(&errors)).with_success_flag());
    }

    match state.backend.register(&request).await {
        Ok(created) => Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "data": created })),
        )
            .into_response()),
        Err(BackendError::Rejected(message)) => {
            Err(ApiError::bad_request(message).with_success_flag())
        }
        Err(e) => Err(ApiError::upstream("Registration failed", &e).with_success_flag()),
    }
}

/// POST /api/logout
async fn logout(State(state): State<AppState>, MaybeSession(active): MaybeSession) -> Response {
    if let Some(active) = &active {
        close_session(&state, active).await;
    }
    with_cookie(state.cookies.expire(), Json(json!({ "success": true })))
}

/// POST /api/token/refresh
async fn refresh_token(State(state): State<AppState>, MaybeSession(active): MaybeSession) -> Response {
    let Some(active) = active else {
        return ApiError::unauthorized("Not authenticated")
            .with_success_flag()
            .into_response();
    };
    let Some(refresh) = active.handle.refresh_token() else {
        return ApiError::unauthorized("No refresh token")
            .with_success_flag()
            .into_response();
    };

    match state.backend.refresh(&refresh).await {
        Ok(access) => {
            active.handle.set_access_token(access);
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Refresh refused, dropping session");
            active.handle.clear();
            with_cookie(
                state.cookies.expire(),
                ApiError::unauthorized("Token refresh failed").with_success_flag(),
            )
        }
    }
}

/// GET /api/profile
async fn profile(State(state): State<AppState>, MaybeSession(active): MaybeSession) -> Response {
    let Some(active) = active.filter(|a| a.is_authenticated()) else {
        return ApiError::unauthorized("Not authenticated").into_response();
    };

    let backend = &state.backend;
    let result = backend
        .with_refresh(&active.handle, |token| async move { backend.profile(&token).await })
        .await;

    match result {
        Ok(user) => {
            active.handle.set_user(user.clone());
            Json(json!({ "user": user })).into_response()
        }
        Err(e) if e.requires_login() => with_cookie(
            state.cookies.expire(),
            ApiError::unauthorized(e.to_string()),
        ),
        Err(e) => ApiError::upstream("Failed to fetch profile", &e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;
    use crate::routes::test_support::get;
    use axum::routing::get as route_get;
    use axum::http::header::{AUTHORIZATION, SET_COOKIE};
    use axum::http::HeaderMap;
    use serde_json::Value;

    fn bearer(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    async fn fake_login(Json(body): Json<Value>) -> Response {
        match (body["email"].as_str(), body["username"].as_str(), body["password"].as_str()) {
            (Some("jean@example.com"), _, Some("secret")) => Json(json!({
                "access": "a1",
                "refresh": "r1",
                "user": {"id": 1, "username": "jdupont", "email": "jean@example.com",
                         "role": "client", "first_name": "Jean", "last_name": "Dupont"}
            }))
            .into_response(),
            (_, Some("bare"), Some("secret")) => {
                Json(json!({"access": "a2", "refresh": "r2"})).into_response()
            }
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"non_field_errors": ["Invalid credentials"]})),
            )
                .into_response(),
        }
    }

    async fn fake_profile(headers: HeaderMap) -> Response {
        match bearer(&headers) {
            Some("a2") | Some("fresh") | Some("access-1") => Json(json!({
                "id": 2, "username": "bare", "email": "bare@example.com", "role": "sales"
            }))
            .into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    async fn fake_refresh(Json(body): Json<Value>) -> Response {
        match body["refresh"].as_str() {
            Some("refresh-1") => Json(json!({"access": "fresh"})).into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    async fn fake_backend() -> String {
        let router = Router::new()
            .route("/api/login/", post(fake_login))
            .route("/api/profile/", route_get(fake_profile))
            .route("/api/token/refresh/", post(fake_refresh))
            .route("/api/logout/", post(|| async { StatusCode::RESET_CONTENT }))
            .route(
                "/api/register/",
                post(|Json(body): Json<Value>| async move {
                    if body["username"] == "taken" {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"username": ["A user with that username already exists."]})),
                        )
                            .into_response()
                    } else {
                        (StatusCode::CREATED, Json(json!({"id": 5, "username": body["username"]})))
                            .into_response()
                    }
                }),
            );
        spawn_backend(router).await
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    fn set_cookie(response: &Response) -> String {
        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_identifier_precedence() {
        let body = LoginBody {
            email: Some("a@b.c".into()),
            username: Some("user".into()),
            identifier: Some("  ".into()),
            password: None,
        };
        assert_eq!(body.identifier(), Some("a@b.c"));
        assert_eq!(LoginBody::default().identifier(), None);
    }

    #[tokio::test]
    async fn test_login_opens_session() {
        let state = state_for(&fake_backend().await);
        let response = post_json(
            &state,
            "/api/login",
            r#"{"email":"jean@example.com","password":"secret"}"#,
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("portal_session="));
        assert!(cookie.contains("HttpOnly"));

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "jdupont");
        assert!(body.get("access").is_none());

        let id = state.cookies.session_id(&cookie).unwrap();
        let session = state.sessions.get(&id).unwrap();
        assert_eq!(session.access_token.as_deref(), Some("a1"));
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_login_fetches_profile_when_user_missing() {
        let state = state_for(&fake_backend().await);
        let response = post_json(
            &state,
            "/api/login",
            r#"{"identifier":"bare","password":"secret"}"#,
            None,
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["user"]["email"], "bare@example.com");
        assert_eq!(body["user"]["role"], "sales");
    }

    #[tokio::test]
    async fn test_login_replaces_previous_session() {
        let state = state_for(&fake_backend().await);
        let old = signed_in(&state);
        let response = post_json(
            &state,
            "/api/login",
            r#"{"email":"jean@example.com","password":"secret"}"#,
            Some(&old),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.sessions.len(), 1);
        assert!(state.cookies.session_id(&old).and_then(|id| state.sessions.get(&id)).is_none());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let state = state_for(&fake_backend().await);
        let response = post_json(
            &state,
            "/api/login",
            r#"{"email":"jean@example.com","password":"wrong"}"#,
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "error": "Invalid credentials"})
        );
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let response = post_json(&offline_state(), "/api/login", r#"{"password":"x"}"#, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_register_validates_before_forwarding() {
        let body = json!({
            "username": "newbie", "email": "not-an-email", "password": "longenough",
            "password_confirm": "longenough", "first_name": "N", "last_name": "B"
        });
        let response = post_json(&offline_state(), "/api/register", &body.to_string(), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Adresse email invalide");
    }

    #[tokio::test]
    async fn test_register_forwards_and_reports_rejection() {
        let state = state_for(&fake_backend().await);
        let mut body = json!({
            "username": "newbie", "email": "new@example.com", "password": "longenough",
            "password_confirm": "longenough", "first_name": "N", "last_name": "B"
        });

        let response = post_json(&state, "/api/register", &body.to_string(), None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["data"]["id"], 5);

        body["username"] = json!("taken");
        let response = post_json(&state, "/api/register", &body.to_string(), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "A user with that username already exists."
        );
    }

    #[tokio::test]
    async fn test_logout_drops_session_and_cookie() {
        let state = state_for(&fake_backend().await);
        let cookie = signed_in(&state);
        let response = post_json(&state, "/api/logout", "{}", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).contains("Max-Age=0"));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_updates_access_token() {
        let state = state_for(&fake_backend().await);
        let cookie = signed_in(&state);
        let response = post_json(&state, "/api/token/refresh", "{}", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let id = state.cookies.session_id(&cookie).unwrap();
        assert_eq!(state.sessions.get(&id).unwrap().access_token.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_refresh_without_session() {
        let response = post_json(&offline_state(), "/api/token/refresh", "{}", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let response = get(&offline_state(), "/api/profile", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_profile_refreshes_cached_user() {
        let state = state_for(&fake_backend().await);
        let cookie = signed_in(&state);
        let response = get(&state, "/api/profile", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["user"]["username"], "bare");

        let id = state.cookies.session_id(&cookie).unwrap();
        assert_eq!(state.sessions.get(&id).unwrap().user.unwrap().username, "bare");
    }

    #[tokio::test]
    async fn test_profile_rejected_token_clears_session() {
        let state = state_for(&fake_backend().await);
        let id = state.sessions.create();
        state.sessions.handle(id).set_tokens(portal_core::user::TokenPair {
            access: "stale".into(),
            refresh: "revoked".into(),
        });
        let cookie = format!("{}={}", state.cookies.name, id);

        let response = get(&state, "/api/profile", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).contains("Max-Age=0"));
        assert!(state.sessions.get(&id).is_none());
    }
}
