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
    Alumno, AlumnoConPagos, AlumnoListaItem, AlumnoRequest, BuscarAlumnoParams, Contacto,
    ContactoDeAlumno, ContactoRequest, VincularContactoRequest,
};
use super::service;

#[utoipa::path(
    get,
    path = "/api/alumnos",
    responses((status = 200, body = [Alumno])),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn list_alumnos(State(state): State<AppState>) -> Result<Json<Vec<Alumno>>, AppError> {
    Ok(Json(service::list_alumnos(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/lista",
    responses((status = 200, body = [AlumnoListaItem])),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn lista_alumnos(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlumnoListaItem>>, AppError> {
    Ok(Json(service::lista_alumnos(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/buscar",
    params(BuscarAlumnoParams),
    responses((status = 200, body = [Alumno])),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn buscar_alumnos(
    State(state): State<AppState>,
    Query(params): Query<BuscarAlumnoParams>,
) -> Result<Json<Vec<Alumno>>, AppError> {
    Ok(Json(
        service::buscar_alumnos(&state.db, params.nombre.as_deref(), params.apellido.as_deref())
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/codigo/{codigo}",
    params(("codigo" = String, Path, description = "Student code")),
    responses(
        (status = 200, body = AlumnoConPagos),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn get_alumno_por_codigo(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<Json<AlumnoConPagos>, AppError> {
    Ok(Json(service::get_alumno_por_codigo(&state.db, &codigo).await?))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/{alumno_id}",
    params(("alumno_id" = i32, Path, description = "Student id")),
    responses((status = 200, body = Alumno), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn get_alumno(
    State(state): State<AppState>,
    Path(alumno_id): Path<i32>,
) -> Result<Json<Alumno>, AppError> {
    Ok(Json(service::get_alumno(&state.db, alumno_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/{alumno_id}/pagos",
    params(("alumno_id" = i32, Path, description = "Student id")),
    responses((status = 200, body = AlumnoConPagos), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn get_alumno_con_pagos(
    State(state): State<AppState>,
    Path(alumno_id): Path<i32>,
) -> Result<Json<AlumnoConPagos>, AppError> {
    Ok(Json(service::get_alumno_con_pagos(&state.db, alumno_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/alumnos",
    request_body = AlumnoRequest,
    responses(
        (status = 201, body = Alumno),
        (status = 409, description = "Duplicate student code")
    ),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn create_alumno(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<AlumnoRequest>,
) -> Result<(StatusCode, Json<Alumno>), AppError> {
    let alumno = service::create_alumno(&state.db, payload, auth.user_id()?).await?;
    Ok((StatusCode::CREATED, Json(alumno)))
}

#[utoipa::path(
    put,
    path = "/api/alumnos/{alumno_id}",
    params(("alumno_id" = i32, Path, description = "Student id")),
    request_body = AlumnoRequest,
    responses((status = 200, body = Alumno), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn update_alumno(
    State(state): State<AppState>,
    Path(alumno_id): Path<i32>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<AlumnoRequest>,
) -> Result<Json<Alumno>, AppError> {
    Ok(Json(
        service::update_alumno(&state.db, alumno_id, payload, auth.user_id()?).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/alumnos/{alumno_id}",
    params(("alumno_id" = i32, Path, description = "Student id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Student has payments")
    ),
    security(("bearer_auth" = [])),
    tag = "alumnos"
)]
pub async fn delete_alumno(
    State(state): State<AppState>,
    Path(alumno_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_alumno(&state.db, alumno_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/alumnos/{alumno_id}/contactos",
    params(("alumno_id" = i32, Path, description = "Student id")),
    responses((status = 200, body = [ContactoDeAlumno])),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn contactos_de_alumno(
    State(state): State<AppState>,
    Path(alumno_id): Path<i32>,
) -> Result<Json<Vec<ContactoDeAlumno>>, AppError> {
    Ok(Json(service::contactos_de_alumno(&state.db, alumno_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/alumnos/{alumno_id}/contactos/{contacto_id}",
    params(
        ("alumno_id" = i32, Path, description = "Student id"),
        ("contacto_id" = i32, Path, description = "Contact id")
    ),
    request_body = VincularContactoRequest,
    responses(
        (status = 204, description = "Linked"),
        (status = 404, description = "Student or contact not found"),
        (status = 409, description = "Already linked")
    ),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn vincular_contacto(
    State(state): State<AppState>,
    Path((alumno_id, contacto_id)): Path<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<VincularContactoRequest>,
) -> Result<StatusCode, AppError> {
    service::vincular_contacto(&state.db, alumno_id, contacto_id, &payload.parentesco).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/alumnos/{alumno_id}/contactos/{contacto_id}",
    params(
        ("alumno_id" = i32, Path, description = "Student id"),
        ("contacto_id" = i32, Path, description = "Contact id")
    ),
    responses(
        (status = 204, description = "Unlinked"),
        (status = 404, description = "Link not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn desvincular_contacto(
    State(state): State<AppState>,
    Path((alumno_id, contacto_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    service::desvincular_contacto(&state.db, alumno_id, contacto_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/contactos",
    responses((status = 200, body = [Contacto])),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn list_contactos(State(state): State<AppState>) -> Result<Json<Vec<Contacto>>, AppError> {
    Ok(Json(service::list_contactos(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/contactos/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    responses((status = 200, body = Contacto), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn get_contacto(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Contacto>, AppError> {
    Ok(Json(service::get_contacto(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/contactos",
    request_body = ContactoRequest,
    responses((status = 201, body = Contacto)),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn create_contacto(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContactoRequest>,
) -> Result<(StatusCode, Json<Contacto>), AppError> {
    let contacto = service::create_contacto(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(contacto)))
}

#[utoipa::path(
    put,
    path = "/api/contactos/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    request_body = ContactoRequest,
    responses((status = 200, body = Contacto), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn update_contacto(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ContactoRequest>,
) -> Result<Json<Contacto>, AppError> {
    Ok(Json(service::update_contacto(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/contactos/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contactos"
)]
pub async fn delete_contacto(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_contacto(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
