//! Client-space pages
//!
//! Every page requires an authenticated session. Holdings, documents and
//! statistics come from the showcase portfolio; the account comes from the
//! session.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use infra_session::PreferencesUpdate;
use portal_core::portfolio::{find_by_isin, HoldingFilter};
use portal_core::{showcase, Isin};

use super::auth::close_session;
use super::{html, with_cookie, AppState};
use crate::session::{ActiveSession, MaybeSession, PortalSession};
use crate::views::layout::{PortalLayout, PortalNav};
use crate::views::pages::{
    DashboardPage, DocumentsPage, DocumentsQuery, HoldingDetailPage, NotFoundPage, PortfolioPage,
    ProfilePage, SettingsPage, StatsPage,
};

/// Build the client-space routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/portfolio", get(portfolio))
        .route("/portfolio/{isin}", get(holding_detail))
        .route("/documents", get(documents))
        .route("/stats", get(stats))
        .route("/settings", get(settings).post(save_settings))
        .route("/profile", get(profile))
        .route("/logout", post(logout))
}

/// Wrap a page in the client-space shell
fn page<B: std::fmt::Display>(active: &ActiveSession, title: &str, nav: PortalNav, body: B) -> Response {
    html(PortalLayout {
        title,
        active: nav,
        user: active.user(),
        navigation: active.session.preferences.navigation_style,
        body,
    })
    .into_response()
}

/// GET /dashboard
async fn dashboard(PortalSession(active): PortalSession) -> Response {
    let client = showcase::current_client();
    let holdings = showcase::holdings();
    let alerts = showcase::alerts();
    let wishlist = showcase::wishlist();
    page(
        &active,
        "Tableau de bord",
        PortalNav::Dashboard,
        DashboardPage {
            user: active.user(),
            client: &client,
            holdings: &holdings,
            alerts: &alerts,
            wishlist: &wishlist,
        },
    )
}

/// GET /portfolio
async fn portfolio(PortalSession(active): PortalSession, Query(filter): Query<HoldingFilter>) -> Response {
    let holdings = showcase::holdings();
    page(
        &active,
        "Mon Portefeuille",
        PortalNav::Portfolio,
        PortfolioPage {
            filter: &filter,
            holdings: &holdings,
        },
    )
}

/// GET /portfolio/{isin}
async fn holding_detail(PortalSession(active): PortalSession, Path(raw): Path<String>) -> Response {
    let holdings = showcase::holdings();
    let holding = Isin::parse(&raw)
        .ok()
        .and_then(|isin| find_by_isin(&holdings, isin.as_str()));

    match holding {
        Some(holding) => page(
            &active,
            &holding.product.name,
            PortalNav::Portfolio,
            HoldingDetailPage { holding },
        ),
        None => {
            tracing::debug!(isin = %raw, "Holding not in portfolio");
            (
                StatusCode::NOT_FOUND,
                page(&active, "Page introuvable", PortalNav::Portfolio, NotFoundPage),
            )
                .into_response()
        }
    }
}

/// GET /documents
async fn documents(PortalSession(active): PortalSession, Query(query): Query<DocumentsQuery>) -> Response {
    let documents = showcase::client_documents();
    page(
        &active,
        "Mes Documents",
        PortalNav::Documents,
        DocumentsPage {
            query: &query,
            documents: &documents,
        },
    )
}

/// GET /stats
async fn stats(PortalSession(active): PortalSession) -> Response {
    let monthly = showcase::monthly_performance();
    let yearly = showcase::yearly_comparison();
    let allocation = showcase::asset_allocation();
    let risks = showcase::risk_metrics();
    let holdings = showcase::holdings();
    page(
        &active,
        "Mes Stats",
        PortalNav::Stats,
        StatsPage {
            monthly: &monthly,
            yearly: &yearly,
            allocation: &allocation,
            risks: &risks,
            holdings: &holdings,
        },
    )
}

/// GET /settings
async fn settings(PortalSession(active): PortalSession) -> Response {
    let preferences = active.session.preferences.clone();
    page(
        &active,
        "Paramètres",
        PortalNav::Settings,
        SettingsPage {
            preferences: &preferences,
            saved: false,
            error: None,
        },
    )
}

/// POST /settings
async fn save_settings(
    State(state): State<AppState>,
    PortalSession(mut active): PortalSession,
    Form(update): Form<PreferencesUpdate>,
) -> Response {
    let outcome = match state.sessions.update_preferences(&active.id, &update) {
        Some(outcome) => outcome,
        None => return Redirect::to("/login").into_response(),
    };

    match outcome {
        Ok(()) => {
            tracing::debug!(session = %active.id, "Preferences saved");
            if let Some(preferences) = state.sessions.preferences(&active.id) {
                active.session.preferences = preferences;
            }
            let preferences = active.session.preferences.clone();
            page(
                &active,
                "Paramètres",
                PortalNav::Settings,
                SettingsPage {
                    preferences: &preferences,
                    saved: true,
                    error: None,
                },
            )
        }
        Err(e) => {
            tracing::info!(error = %e, "Preferences rejected");
            let preferences = active.session.preferences.clone();
            let message = e.to_string();
            (
                StatusCode::BAD_REQUEST,
                page(
                    &active,
                    "Paramètres",
                    PortalNav::Settings,
                    SettingsPage {
                        preferences: &preferences,
                        saved: false,
                        error: Some(&message),
                    },
                ),
            )
                .into_response()
        }
    }
}

/// GET /profile
async fn profile(PortalSession(active): PortalSession) -> Response {
    let client = showcase::current_client();
    page(
        &active,
        "Mon profil",
        PortalNav::Profile,
        ProfilePage {
            user: active.user(),
            client: &client,
        },
    )
}

/// POST /logout
async fn logout(State(state): State<AppState>, MaybeSession(active): MaybeSession) -> Response {
    if let Some(active) = &active {
        close_session(&state, active).await;
    }
    with_cookie(state.cookies.expire(), Redirect::to("/"))
}
