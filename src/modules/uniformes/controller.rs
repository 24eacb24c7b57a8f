use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    EliminarEntradaRequest, EliminarPrendaRequest, EntradaConDetalles, EntradaFilter,
    EntradaUniforme, EntradaUniformeRequest, PrendaUniforme, PrendaUniformeRequest,
};
use super::service;

#[utoipa::path(
    get,
    path = "/api/uniformes/prendas",
    responses((status = 200, body = [PrendaUniforme])),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn list_prendas(
    State(state): State<AppState>,
) -> Result<Json<Vec<PrendaUniforme>>, AppError> {
    Ok(Json(service::list_prendas(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/uniformes/prendas/{id}",
    params(("id" = i32, Path, description = "Garment id")),
    responses((status = 200, body = PrendaUniforme), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn get_prenda(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PrendaUniforme>, AppError> {
    Ok(Json(service::get_prenda(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/uniformes/prendas",
    request_body = PrendaUniformeRequest,
    responses((status = 201, body = PrendaUniforme)),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn create_prenda(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<PrendaUniformeRequest>,
) -> Result<(StatusCode, Json<PrendaUniforme>), AppError> {
    let prenda = service::create_prenda(&state.db, payload, auth.user_id()?).await?;
    Ok((StatusCode::CREATED, Json(prenda)))
}

#[utoipa::path(
    put,
    path = "/api/uniformes/prendas/{id}",
    params(("id" = i32, Path, description = "Garment id")),
    request_body = PrendaUniformeRequest,
    responses((status = 200, body = PrendaUniforme), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn update_prenda(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<PrendaUniformeRequest>,
) -> Result<Json<PrendaUniforme>, AppError> {
    Ok(Json(
        service::update_prenda(&state.db, id, payload, auth.user_id()?).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/uniformes/prendas/{id}",
    params(("id" = i32, Path, description = "Garment id")),
    request_body = EliminarPrendaRequest,
    responses(
        (status = 204, description = "Soft deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn delete_prenda(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<EliminarPrendaRequest>,
) -> Result<StatusCode, AppError> {
    service::delete_prenda(&state.db, id, &payload.motivo, auth.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/uniformes/entradas",
    params(EntradaFilter),
    responses((status = 200, body = [EntradaUniforme])),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn list_entradas(
    State(state): State<AppState>,
    Query(filter): Query<EntradaFilter>,
) -> Result<Json<Vec<EntradaUniforme>>, AppError> {
    Ok(Json(service::list_entradas(&state.db, &filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/uniformes/entradas/{id}",
    params(("id" = i32, Path, description = "Stock entry id")),
    responses((status = 200, body = EntradaConDetalles), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn get_entrada(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntradaConDetalles>, AppError> {
    Ok(Json(service::get_entrada(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/uniformes/entradas",
    request_body = EntradaUniformeRequest,
    responses(
        (status = 201, body = EntradaConDetalles),
        (status = 404, description = "Garment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn create_entrada(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<EntradaUniformeRequest>,
) -> Result<(StatusCode, Json<EntradaConDetalles>), AppError> {
    let entrada = service::create_entrada(&state.db, payload, auth.user_id()?).await?;
    Ok((StatusCode::CREATED, Json(entrada)))
}

#[utoipa::path(
    put,
    path = "/api/uniformes/entradas/{id}",
    params(("id" = i32, Path, description = "Stock entry id")),
    request_body = EntradaUniformeRequest,
    responses((status = 200, body = EntradaConDetalles), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn update_entrada(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<EntradaUniformeRequest>,
) -> Result<Json<EntradaConDetalles>, AppError> {
    Ok(Json(
        service::update_entrada(&state.db, id, payload, auth.user_id()?).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/uniformes/entradas/{id}",
    params(("id" = i32, Path, description = "Stock entry id")),
    request_body = EliminarEntradaRequest,
    responses(
        (status = 204, description = "Soft deleted, stock reverted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "uniformes"
)]
pub async fn delete_entrada(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<EliminarEntradaRequest>,
) -> Result<StatusCode, AppError> {
    service::delete_entrada(&state.db, id, &payload.motivo, auth.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
