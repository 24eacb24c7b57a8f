use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    Grado, GradoFilter, GradoRequest, NivelEducativo, NivelEducativoRequest, Sede, SedeRequest,
};
use super::service;

#[utoipa::path(
    get,
    path = "/api/sedes",
    responses((status = 200, body = [Sede])),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn list_sedes(State(state): State<AppState>) -> Result<Json<Vec<Sede>>, AppError> {
    Ok(Json(service::list_sedes(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/sedes/{id}",
    params(("id" = i32, Path, description = "Sede id")),
    responses((status = 200, body = Sede), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn get_sede(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Sede>, AppError> {
    Ok(Json(service::get_sede(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sedes",
    request_body = SedeRequest,
    responses((status = 201, body = Sede)),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn create_sede(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SedeRequest>,
) -> Result<(StatusCode, Json<Sede>), AppError> {
    let sede = service::create_sede(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(sede)))
}

#[utoipa::path(
    put,
    path = "/api/sedes/{id}",
    params(("id" = i32, Path, description = "Sede id")),
    request_body = SedeRequest,
    responses((status = 200, body = Sede), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn update_sede(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<SedeRequest>,
) -> Result<Json<Sede>, AppError> {
    Ok(Json(service::update_sede(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sedes/{id}",
    params(("id" = i32, Path, description = "Sede id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Sede is referenced by other records")
    ),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn delete_sede(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_sede(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/niveles-educativos",
    responses((status = 200, body = [NivelEducativo])),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn list_niveles(
    State(state): State<AppState>,
) -> Result<Json<Vec<NivelEducativo>>, AppError> {
    Ok(Json(service::list_niveles(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/niveles-educativos/activos",
    responses((status = 200, body = [NivelEducativo])),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn list_niveles_activos(
    State(state): State<AppState>,
) -> Result<Json<Vec<NivelEducativo>>, AppError> {
    Ok(Json(service::list_niveles_activos(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/niveles-educativos/{id}",
    params(("id" = i32, Path, description = "Nivel educativo id")),
    responses((status = 200, body = NivelEducativo), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn get_nivel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<NivelEducativo>, AppError> {
    Ok(Json(service::get_nivel(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/niveles-educativos",
    request_body = NivelEducativoRequest,
    responses((status = 201, body = NivelEducativo)),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn create_nivel(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NivelEducativoRequest>,
) -> Result<(StatusCode, Json<NivelEducativo>), AppError> {
    let nivel = service::create_nivel(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(nivel)))
}

#[utoipa::path(
    put,
    path = "/api/niveles-educativos/{id}",
    params(("id" = i32, Path, description = "Nivel educativo id")),
    request_body = NivelEducativoRequest,
    responses((status = 200, body = NivelEducativo), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn update_nivel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<NivelEducativoRequest>,
) -> Result<Json<NivelEducativo>, AppError> {
    Ok(Json(service::update_nivel(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/niveles-educativos/{id}",
    params(("id" = i32, Path, description = "Nivel educativo id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Nivel is referenced by grados")
    ),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn delete_nivel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_nivel(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/grados",
    params(GradoFilter),
    responses((status = 200, body = [Grado])),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn list_grados(
    State(state): State<AppState>,
    Query(filter): Query<GradoFilter>,
) -> Result<Json<Vec<Grado>>, AppError> {
    Ok(Json(
        service::list_grados(&state.db, filter.nivel_educativo_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/grados/{id}",
    params(("id" = i32, Path, description = "Grado id")),
    responses((status = 200, body = Grado), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn get_grado(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Grado>, AppError> {
    Ok(Json(service::get_grado(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/grados",
    request_body = GradoRequest,
    responses((status = 201, body = Grado), (status = 404, description = "Nivel not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn create_grado(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GradoRequest>,
) -> Result<(StatusCode, Json<Grado>), AppError> {
    let grado = service::create_grado(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(grado)))
}

#[utoipa::path(
    put,
    path = "/api/grados/{id}",
    params(("id" = i32, Path, description = "Grado id")),
    request_body = GradoRequest,
    responses((status = 200, body = Grado), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn update_grado(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<GradoRequest>,
) -> Result<Json<Grado>, AppError> {
    Ok(Json(service::update_grado(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/grados/{id}",
    params(("id" = i32, Path, description = "Grado id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Grado is referenced by alumnos")
    ),
    security(("bearer_auth" = [])),
    tag = "catalogos"
)]
pub async fn delete_grado(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_grado(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
