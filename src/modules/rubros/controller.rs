use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    EliminarDetalleRequest, Rubro, RubroRequest, RubroUniformeDetalle,
    RubroUniformeDetalleRequest,
};
use super::service;

#[utoipa::path(
    get,
    path = "/api/rubros",
    responses((status = 200, body = [Rubro])),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn list_rubros(State(state): State<AppState>) -> Result<Json<Vec<Rubro>>, AppError> {
    Ok(Json(service::list_rubros(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/rubros/activos",
    responses((status = 200, body = [Rubro])),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn list_rubros_activos(
    State(state): State<AppState>,
) -> Result<Json<Vec<Rubro>>, AppError> {
    Ok(Json(service::list_rubros_activos(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/rubros/{id}",
    params(("id" = i32, Path, description = "Rubro id")),
    responses((status = 200, body = Rubro), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn get_rubro(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Rubro>, AppError> {
    Ok(Json(service::get_rubro(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/rubros",
    request_body = RubroRequest,
    responses((status = 201, body = Rubro), (status = 422, description = "Invalid limits")),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn create_rubro(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RubroRequest>,
) -> Result<(StatusCode, Json<Rubro>), AppError> {
    let rubro = service::create_rubro(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(rubro)))
}

#[utoipa::path(
    put,
    path = "/api/rubros/{id}",
    params(("id" = i32, Path, description = "Rubro id")),
    request_body = RubroRequest,
    responses((status = 200, body = Rubro), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn update_rubro(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RubroRequest>,
) -> Result<Json<Rubro>, AppError> {
    Ok(Json(service::update_rubro(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/rubros/{id}",
    params(("id" = i32, Path, description = "Rubro id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Rubro has payments")
    ),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn delete_rubro(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_rubro(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/rubros/{id}/detalles-uniforme",
    params(("id" = i32, Path, description = "Rubro id")),
    responses((status = 200, body = [RubroUniformeDetalle])),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn list_detalles(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<RubroUniformeDetalle>>, AppError> {
    Ok(Json(service::list_detalles_de_rubro(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/rubros/{id}/detalles-uniforme",
    params(("id" = i32, Path, description = "Rubro id")),
    request_body = RubroUniformeDetalleRequest,
    responses(
        (status = 201, body = RubroUniformeDetalle),
        (status = 409, description = "Garment already linked"),
        (status = 422, description = "Rubro is not of type Uniformes")
    ),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn create_detalle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<RubroUniformeDetalleRequest>,
) -> Result<(StatusCode, Json<RubroUniformeDetalle>), AppError> {
    let detalle =
        service::create_detalle(&state.db, id, payload.prenda_uniforme_id, auth.user_id()?)
            .await?;
    Ok((StatusCode::CREATED, Json(detalle)))
}

#[utoipa::path(
    delete,
    path = "/api/rubros/{id}/detalles-uniforme/{detalle_id}",
    params(
        ("id" = i32, Path, description = "Rubro id"),
        ("detalle_id" = i32, Path, description = "Detalle id")
    ),
    request_body = EliminarDetalleRequest,
    responses(
        (status = 204, description = "Soft deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "rubros"
)]
pub async fn delete_detalle(
    State(state): State<AppState>,
    Path((id, detalle_id)): Path<(i32, i32)>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<EliminarDetalleRequest>,
) -> Result<StatusCode, AppError> {
    service::delete_detalle(&state.db, id, detalle_id, &payload.motivo, auth.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
