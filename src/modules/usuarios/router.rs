use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller;

pub fn init_usuarios_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(controller::create_usuario).get(controller::list_usuarios),
        )
        .route(
            "/{id}",
            get(controller::get_usuario)
                .put(controller::update_usuario)
                .delete(controller::delete_usuario),
        )
}

pub fn init_roles_router() -> Router<AppState> {
    Router::new().route("/", get(controller::list_roles))
}
