use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use serde_json::json;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{init_metrics, init_metrics_router, metrics_middleware};
use crate::middleware::auth::require_auth;
use crate::middleware::role::require_admin;
use crate::modules::alumnos::router::{init_alumnos_router, init_contactos_router};
use crate::modules::auth::router::init_auth_router;
use crate::modules::catalogos::router::{
    init_grados_router, init_niveles_router, init_sedes_router,
};
use crate::modules::pagos::router::init_pagos_router;
use crate::modules::qr::router::init_qr_router;
use crate::modules::rubros::router::init_rubros_router;
use crate::modules::rutas::router::{init_alumno_rutas_router, init_rutas_router};
use crate::modules::uniformes::router::init_uniformes_router;
use crate::modules::usuarios::router::{init_roles_router, init_usuarios_router};
use crate::state::AppState;
use crate::utils::errors::AppError;

async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(AppError::database)?;
    Ok(Json(json!({ "status": "ok" })))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

pub fn init_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);
    let auth_rate_limit = GovernorLayer::new(state.rate_limit_config.auth_governor_config());
    let general_rate_limit = GovernorLayer::new(state.rate_limit_config.general_governor_config());

    let protected = Router::new()
        .nest(
            "/usuarios",
            init_usuarios_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .nest("/roles", init_roles_router())
        .nest("/sedes", init_sedes_router())
        .nest("/niveles-educativos", init_niveles_router())
        .nest("/grados", init_grados_router())
        .nest(
            "/alumnos",
            init_alumnos_router().merge(init_alumno_rutas_router()),
        )
        .nest("/contactos", init_contactos_router())
        .nest("/rubros", init_rubros_router())
        .nest("/pagos", init_pagos_router())
        .nest("/rutas", init_rutas_router())
        .nest("/uniformes", init_uniformes_router())
        .nest("/qr", init_qr_router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(general_rate_limit);

    let api = Router::new()
        .nest("/auth", init_auth_router().layer(auth_rate_limit))
        .merge(protected);

    let metrics_handle = init_metrics();

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .merge(init_metrics_router(metrics_handle))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
        .with_state(state)
}
