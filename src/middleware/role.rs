//! Admin-gate middleware.
//!
//! The role model is a single `es_admin` flag carried in the JWT claims, so the
//! check never touches the database.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Route layer that rejects non-admin callers with 403.
///
/// ```rust,ignore
/// Router::new()
///     .nest("/usuarios", init_usuarios_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check_admin(state, req).await {
        Ok(req) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

async fn check_admin(state: AppState, req: Request) -> Result<Request, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !auth_user.es_admin() {
        return Err(AppError::forbidden(
            "Acceso denegado. Se requiere un rol de administrador.",
        ));
    }

    Ok(Request::from_parts(parts, body))
}
