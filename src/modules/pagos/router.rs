use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller;

pub fn init_pagos_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::query_pagos).post(controller::create_pago),
        )
        .route("/reporte-mensual", get(controller::reporte_mensual))
        .route("/{id}", get(controller::get_pago))
        .route("/{id}/anular", post(controller::anular_pago))
}
