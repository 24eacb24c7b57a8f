use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller;

pub fn init_sedes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_sedes).post(controller::create_sede))
        .route(
            "/{id}",
            get(controller::get_sede)
                .put(controller::update_sede)
                .delete(controller::delete_sede),
        )
}

pub fn init_niveles_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::list_niveles).post(controller::create_nivel),
        )
        .route("/activos", get(controller::list_niveles_activos))
        .route(
            "/{id}",
            get(controller::get_nivel)
                .put(controller::update_nivel)
                .delete(controller::delete_nivel),
        )
}

pub fn init_grados_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::list_grados).post(controller::create_grado),
        )
        .route(
            "/{id}",
            get(controller::get_grado)
                .put(controller::update_grado)
                .delete(controller::delete_grado),
        )
}
