use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller;

pub fn init_qr_router() -> Router<AppState> {
    Router::new()
        .route("/generar", post(controller::generar))
        .route("/validar", post(controller::validar))
        .route("/info/{token}", get(controller::info))
        .route("/pago/{pago_id}", get(controller::codigos_de_pago))
        .route("/expirados", delete(controller::limpiar_expirados))
}
