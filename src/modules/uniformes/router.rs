use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller;

pub fn init_uniformes_router() -> Router<AppState> {
    Router::new()
        .route(
            "/prendas",
            get(controller::list_prendas).post(controller::create_prenda),
        )
        .route(
            "/prendas/{id}",
            get(controller::get_prenda)
                .put(controller::update_prenda)
                .delete(controller::delete_prenda),
        )
        .route(
            "/entradas",
            get(controller::list_entradas).post(controller::create_entrada),
        )
        .route(
            "/entradas/{id}",
            get(controller::get_entrada)
                .put(controller::update_entrada)
                .delete(controller::delete_entrada),
        )
}
