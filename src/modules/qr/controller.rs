use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    CodigoQrPago, GenerarQrRequest, GenerarQrResponse, LimpiezaQrResponse, ValidarQrRequest,
    ValidarQrResponse,
};
use super::service;

#[utoipa::path(
    post,
    path = "/api/qr/generar",
    request_body = GenerarQrRequest,
    responses(
        (status = 201, body = GenerarQrResponse),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment is voided")
    ),
    security(("bearer_auth" = [])),
    tag = "qr"
)]
pub async fn generar(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GenerarQrRequest>,
) -> Result<(StatusCode, Json<GenerarQrResponse>), AppError> {
    let response = service::generar(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/qr/validar",
    request_body = ValidarQrRequest,
    responses((status = 200, body = ValidarQrResponse)),
    security(("bearer_auth" = [])),
    tag = "qr"
)]
pub async fn validar(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ValidarQrRequest>,
) -> Result<Json<ValidarQrResponse>, AppError> {
    Ok(Json(service::validar(&state.db, &payload.token).await?))
}

#[utoipa::path(
    get,
    path = "/api/qr/info/{token}",
    params(("token" = String, Path, description = "QR token")),
    responses((status = 200, body = ValidarQrResponse)),
    security(("bearer_auth" = [])),
    tag = "qr"
)]
pub async fn info(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ValidarQrResponse>, AppError> {
    Ok(Json(service::info(&state.db, &token).await?))
}

#[utoipa::path(
    get,
    path = "/api/qr/pago/{pago_id}",
    params(("pago_id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, body = [CodigoQrPago]),
        (status = 404, description = "Payment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "qr"
)]
pub async fn codigos_de_pago(
    State(state): State<AppState>,
    Path(pago_id): Path<i32>,
) -> Result<Json<Vec<CodigoQrPago>>, AppError> {
    Ok(Json(service::codigos_de_pago(&state.db, pago_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/qr/expirados",
    responses((status = 200, body = LimpiezaQrResponse)),
    security(("bearer_auth" = [])),
    tag = "qr"
)]
pub async fn limpiar_expirados(
    State(state): State<AppState>,
) -> Result<Json<LimpiezaQrResponse>, AppError> {
    Ok(Json(service::limpiar_expirados(&state.db).await?))
}
