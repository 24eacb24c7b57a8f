use axum::{Json, extract::State};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
};
use super::service;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "User inactive or blocked")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = service::login(&state.db, &state.jwt_config, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service::forgot_password(&state.db, &state.email_config, &payload.email).await?;
    Ok(Json(MessageResponse {
        mensaje: "Si el correo existe, se enviaron instrucciones para restablecer la contraseña"
            .to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired token")
    ),
    tag = "auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service::reset_password(&state.db, &payload.token, &payload.nueva_password).await?;
    Ok(Json(MessageResponse {
        mensaje: "Contraseña actualizada correctamente".to_string(),
    }))
}
