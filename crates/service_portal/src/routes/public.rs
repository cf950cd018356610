//! Marketing site, catalog and sign-in pages
//!
//! Product pages read the data service with the service credentials and fall
//! back to the showcase selection when it cannot be reached.

use adapter_backend::{BackendError, ProductQuery, RequestAuth};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use portal_core::{showcase, Isin, Product};
use serde::Deserialize;
use validator::Validate;

use super::auth::open_session;
use super::{html, with_cookie, AppState};
use crate::session::MaybeSession;
use crate::views::layout::PublicLayout;
use crate::views::pages::{
    CatalogFilter, CatalogPage, HomePage, HomeQuery, LoginPage, ProductDetailPage,
    ProductUnavailable, RegisterForm, RegisterPage,
};
use portal_core::user::validation_message;

const CATALOG_FALLBACK: &str =
    "Le catalogue est momentanément indisponible. Voici une sélection de nos produits.";

/// Products shown on the home page
const HOME_PRODUCT_LIMIT: u32 = 12;

/// Submitted login form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
}

/// Build the public routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/nos-produits", get(catalog))
        .route("/nos-produits/{isin}", get(product_page))
        .route("/login", get(login_form).post(login_submit))
        .route("/register", get(register_form).post(register_submit))
        .route("/signup", get(|| async { Redirect::to("/register") }))
}

/// List products, or the showcase selection when the data service fails
async fn products_or_showcase(state: &AppState, query: &ProductQuery) -> Result<Vec<Product>, Vec<Product>> {
    match state.backend.list_products(query, &RequestAuth::Service).await {
        Ok(page) => Ok(page.products),
        Err(e) => {
            tracing::warn!(error = %e, "Product list unavailable, using showcase products");
            Err(showcase::sample_products())
        }
    }
}

/// GET /
async fn home(
    State(state): State<AppState>,
    MaybeSession(active): MaybeSession,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let query_products = ProductQuery {
        limit: Some(HOME_PRODUCT_LIMIT),
        ..ProductQuery::default()
    };
    let products = products_or_showcase(&state, &query_products)
        .await
        .unwrap_or_else(|fallback| fallback);
    let region = query.region.as_deref().map(str::trim).filter(|r| !r.is_empty());

    html(PublicLayout {
        title: "Accueil",
        active: "/",
        user: active.as_ref().and_then(|a| a.user()),
        body: HomePage {
            products: &products,
            region,
        },
    })
}

/// GET /nos-produits
async fn catalog(
    State(state): State<AppState>,
    MaybeSession(active): MaybeSession,
    Query(filter): Query<CatalogFilter>,
) -> impl IntoResponse {
    let (products, notice) = match products_or_showcase(&state, &filter.backend_query()).await {
        Ok(products) => (products, None),
        Err(fallback) => (fallback, Some(CATALOG_FALLBACK)),
    };
    let products = filter.apply(products);

    html(PublicLayout {
        title: "Nos produits",
        active: "/nos-produits",
        user: active.as_ref().and_then(|a| a.user()),
        body: CatalogPage {
            filter: &filter,
            products: &products,
            notice,
        },
    })
}

/// GET /nos-produits/{isin}
async fn product_page(
    State(state): State<AppState>,
    MaybeSession(active): MaybeSession,
    Path(raw): Path<String>,
) -> Response {
    let user = active.as_ref().and_then(|a| a.user());
    let unavailable = |status: StatusCode, message: &str| {
        (
            status,
            html(PublicLayout {
                title: "Produit introuvable",
                active: "/nos-produits",
                user,
                body: ProductUnavailable { message },
            }),
        )
            .into_response()
    };

    let Ok(isin) = Isin::parse(&raw) else {
        return unavailable(StatusCode::NOT_FOUND, "Ce code ISIN n'est pas valide.");
    };

    let product = match state.backend.product_detail(&isin, &RequestAuth::Service).await {
        Ok(product) => Ok(product),
        Err(BackendError::NotFound) => Err(BackendError::NotFound),
        Err(e) => {
            let showcase = showcase::sample_products()
                .into_iter()
                .find(|p| p.isin.eq_ignore_ascii_case(isin.as_str()));
            showcase.ok_or(e)
        }
    };

    match product {
        Ok(product) => html(PublicLayout {
            title: &product.name,
            active: "/nos-produits",
            user,
            body: ProductDetailPage { product: &product },
        })
        .into_response(),
        Err(BackendError::NotFound) => unavailable(
            StatusCode::NOT_FOUND,
            "Ce produit n'existe pas ou n'est plus commercialisé.",
        ),
        Err(e) => {
            tracing::error!(%isin, error = %e, "Product sheet unavailable");
            unavailable(
                StatusCode::SERVICE_UNAVAILABLE,
                "La fiche produit est momentanément indisponible. Réessayez dans quelques instants.",
            )
        }
    }
}

fn login_page(status: StatusCode, error: Option<&str>, identifier: &str) -> Response {
    (
        status,
        html(PublicLayout {
            title: "Connexion",
            active: "",
            user: None,
            body: LoginPage { error, identifier },
        }),
    )
        .into_response()
}

/// GET /login
async fn login_form(MaybeSession(active): MaybeSession) -> Response {
    if active.is_some_and(|a| a.is_authenticated()) {
        return Redirect::to("/dashboard").into_response();
    }
    login_page(StatusCode::OK, None, "")
}

/// POST /login
async fn login_submit(
    State(state): State<AppState>,
    MaybeSession(active): MaybeSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let identifier = form.identifier.trim();
    if identifier.is_empty() || form.password.is_empty() {
        return login_page(
            StatusCode::BAD_REQUEST,
            Some("Veuillez saisir votre identifiant et votre mot de passe."),
            identifier,
        );
    }

    match open_session(&state, active.map(|a| a.id), identifier, &form.password).await {
        Ok((id, _)) => with_cookie(
            state.cookies.build(&id, state.sessions.ttl()),
            Redirect::to("/dashboard"),
        ),
        Err(e) => {
            tracing::info!(error = %e, "Login form rejected");
            login_page(StatusCode::UNAUTHORIZED, Some(&e.to_string()), identifier)
        }
    }
}

fn register_page(status: StatusCode, error: Option<&str>, form: &RegisterForm) -> Response {
    (
        status,
        html(PublicLayout {
            title: "Créer un compte",
            active: "",
            user: None,
            body: RegisterPage { error, form },
        }),
    )
        .into_response()
}

/// GET /register
async fn register_form() -> Response {
    register_page(StatusCode::OK, None, &RegisterForm::default())
}

/// POST /register
async fn register_submit(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let request = form.to_request();
    if let Err(errors) = request.validate() {
        return register_page(StatusCode::BAD_REQUEST, Some(&validation_message(&errors)), &form);
    }

    match state.backend.register(&request).await {
        Ok(_) => {
            tracing::info!(username = %request.username, "Account created");
            Redirect::to("/login").into_response()
        }
        Err(BackendError::Rejected(message)) => {
            register_page(StatusCode::BAD_REQUEST, Some(&message), &form)
        }
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            register_page(
                StatusCode::SERVICE_UNAVAILABLE,
                Some("L'inscription est momentanément indisponible."),
                &form,
            )
        }
    }
}
