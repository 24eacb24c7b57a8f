use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AlumnoRuta, CreateAlumnoRutaRequest, DeudoresParams, ReporteDeudores,
    UpdateAlumnoRutaRequest,
};
use super::service;

#[utoipa::path(
    get,
    path = "/api/alumnos/{alumno_id}/rutas",
    params(("alumno_id" = i32, Path, description = "Student id")),
    responses((status = 200, body = [AlumnoRuta])),
    security(("bearer_auth" = [])),
    tag = "rutas"
)]
pub async fn list_rutas_de_alumno(
    State(state): State<AppState>,
    Path(alumno_id): Path<i32>,
) -> Result<Json<Vec<AlumnoRuta>>, AppError> {
    Ok(Json(service::list_rutas_de_alumno(&state.db, alumno_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/{alumno_id}/rutas/{rubro_transporte_id}",
    params(
        ("alumno_id" = i32, Path, description = "Student id"),
        ("rubro_transporte_id" = i32, Path, description = "Transport fee id")
    ),
    responses((status = 200, body = AlumnoRuta), (status = 404, description = "Not assigned")),
    security(("bearer_auth" = [])),
    tag = "rutas"
)]
pub async fn get_ruta(
    State(state): State<AppState>,
    Path((alumno_id, rubro_transporte_id)): Path<(i32, i32)>,
) -> Result<Json<AlumnoRuta>, AppError> {
    Ok(Json(
        service::get_ruta(&state.db, alumno_id, rubro_transporte_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/alumnos/rutas",
    request_body = CreateAlumnoRutaRequest,
    responses(
        (status = 201, body = AlumnoRuta),
        (status = 404, description = "Student or fee not found"),
        (status = 409, description = "Already assigned"),
        (status = 422, description = "Fee is not a transport route or invalid dates")
    ),
    security(("bearer_auth" = [])),
    tag = "rutas"
)]
pub async fn create_ruta(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAlumnoRutaRequest>,
) -> Result<(StatusCode, Json<AlumnoRuta>), AppError> {
    let ruta = service::create_ruta(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(ruta)))
}

#[utoipa::path(
    put,
    path = "/api/alumnos/{alumno_id}/rutas/{rubro_transporte_id}",
    params(
        ("alumno_id" = i32, Path, description = "Student id"),
        ("rubro_transporte_id" = i32, Path, description = "Transport fee id")
    ),
    request_body = UpdateAlumnoRutaRequest,
    responses((status = 200, body = AlumnoRuta), (status = 404, description = "Not assigned")),
    security(("bearer_auth" = [])),
    tag = "rutas"
)]
pub async fn update_ruta(
    State(state): State<AppState>,
    Path((alumno_id, rubro_transporte_id)): Path<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<UpdateAlumnoRutaRequest>,
) -> Result<Json<AlumnoRuta>, AppError> {
    Ok(Json(
        service::update_ruta(&state.db, alumno_id, rubro_transporte_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/alumnos/{alumno_id}/rutas/{rubro_transporte_id}",
    params(
        ("alumno_id" = i32, Path, description = "Student id"),
        ("rubro_transporte_id" = i32, Path, description = "Transport fee id")
    ),
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 404, description = "Not assigned")
    ),
    security(("bearer_auth" = [])),
    tag = "rutas"
)]
pub async fn delete_ruta(
    State(state): State<AppState>,
    Path((alumno_id, rubro_transporte_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    service::delete_ruta(&state.db, alumno_id, rubro_transporte_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/rutas/deudores",
    params(DeudoresParams),
    responses((status = 200, body = ReporteDeudores)),
    security(("bearer_auth" = [])),
    tag = "rutas"
)]
pub async fn reporte_deudores(
    State(state): State<AppState>,
    Query(params): Query<DeudoresParams>,
) -> Result<Json<ReporteDeudores>, AppError> {
    Ok(Json(service::reporte_deudores(&state.db, &params).await?))
}
