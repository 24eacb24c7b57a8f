use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller;

/// Routes that hang off the student resource.
pub fn init_alumno_rutas_router() -> Router<AppState> {
    Router::new()
        .route("/rutas", post(controller::create_ruta))
        .route("/{alumno_id}/rutas", get(controller::list_rutas_de_alumno))
        .route(
            "/{alumno_id}/rutas/{rubro_transporte_id}",
            get(controller::get_ruta)
                .put(controller::update_ruta)
                .delete(controller::delete_ruta),
        )
}

pub fn init_rutas_router() -> Router<AppState> {
    Router::new().route("/deudores", get(controller::reporte_deudores))
}
