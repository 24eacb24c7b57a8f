use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer JWT and exposes the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn es_admin(&self) -> bool {
        self.0.es_admin
    }

    pub fn codigo_usuario(&self) -> &str {
        &self.0.codigo_usuario
    }
}

/// Route layer that rejects requests without a valid bearer token.
pub async fn require_auth(
    axum::extract::State(state): axum::extract::State<AppState>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    let (mut parts, body) = req.into_parts();
    match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(_) => next.run(axum::extract::Request::from_parts(parts, body)).await,
        Err(err) => err.into_response(),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
