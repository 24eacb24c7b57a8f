use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller;

pub fn init_rubros_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::list_rubros).post(controller::create_rubro),
        )
        .route("/activos", get(controller::list_rubros_activos))
        .route(
            "/{id}",
            get(controller::get_rubro)
                .put(controller::update_rubro)
                .delete(controller::delete_rubro),
        )
        .route(
            "/{id}/detalles-uniforme",
            get(controller::list_detalles).post(controller::create_detalle),
        )
        .route(
            "/{id}/detalles-uniforme/{detalle_id}",
            axum::routing::delete(controller::delete_detalle),
        )
}
