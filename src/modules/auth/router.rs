use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(controller::login))
        .route("/forgot-password", post(controller::forgot_password))
        .route("/reset-password", post(controller::reset_password))
}
