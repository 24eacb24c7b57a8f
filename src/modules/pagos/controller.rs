use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AnularPagoRequest, CreatePagoRequest, Pago, PagoConDetalles, PagoFilter, ReporteMensual,
    ReporteMensualParams,
};
use super::service;

#[utoipa::path(
    post,
    path = "/api/pagos",
    request_body = CreatePagoRequest,
    responses(
        (status = 201, body = PagoConDetalles),
        (status = 404, description = "Student or fee not found"),
        (status = 422, description = "Business rule violated")
    ),
    security(("bearer_auth" = [])),
    tag = "pagos"
)]
pub async fn create_pago(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreatePagoRequest>,
) -> Result<(StatusCode, Json<PagoConDetalles>), AppError> {
    let pago = service::create_pago(&state.db, payload, auth.user_id()?).await?;
    Ok((StatusCode::CREATED, Json(pago)))
}

#[utoipa::path(
    get,
    path = "/api/pagos",
    params(PagoFilter),
    responses((status = 200, body = [Pago])),
    security(("bearer_auth" = [])),
    tag = "pagos"
)]
pub async fn query_pagos(
    State(state): State<AppState>,
    Query(filter): Query<PagoFilter>,
) -> Result<Json<Vec<Pago>>, AppError> {
    Ok(Json(service::query_pagos(&state.db, &filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/pagos/reporte-mensual",
    params(ReporteMensualParams),
    responses((status = 200, body = ReporteMensual)),
    security(("bearer_auth" = [])),
    tag = "pagos"
)]
pub async fn reporte_mensual(
    State(state): State<AppState>,
    Query(params): Query<ReporteMensualParams>,
) -> Result<Json<ReporteMensual>, AppError> {
    params
        .validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;
    Ok(Json(service::reporte_mensual(&state.db, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/pagos/{id}",
    params(("id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, body = PagoConDetalles),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "pagos"
)]
pub async fn get_pago(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PagoConDetalles>, AppError> {
    Ok(Json(service::get_pago(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/pagos/{id}/anular",
    params(("id" = i32, Path, description = "Payment id")),
    request_body = AnularPagoRequest,
    responses(
        (status = 200, body = PagoConDetalles),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already voided")
    ),
    security(("bearer_auth" = [])),
    tag = "pagos"
)]
pub async fn anular_pago(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<AnularPagoRequest>,
) -> Result<Json<PagoConDetalles>, AppError> {
    Ok(Json(
        service::anular_pago(&state.db, id, payload, auth.user_id()?).await?,
    ))
}
