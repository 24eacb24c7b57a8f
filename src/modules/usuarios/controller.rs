use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateUsuarioRequest, Rol, UpdateUsuarioRequest, Usuario};
use super::service;

#[utoipa::path(
    get,
    path = "/api/usuarios",
    responses((status = 200, description = "List of users", body = [Usuario])),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn list_usuarios(State(state): State<AppState>) -> Result<Json<Vec<Usuario>>, AppError> {
    Ok(Json(service::list_usuarios(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = Usuario),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn get_usuario(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Usuario>, AppError> {
    Ok(Json(service::get_usuario(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = CreateUsuarioRequest,
    responses(
        (status = 201, description = "User created", body = Usuario),
        (status = 409, description = "Duplicate user code or email")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn create_usuario(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUsuarioRequest>,
) -> Result<(StatusCode, Json<Usuario>), AppError> {
    let usuario = service::create_usuario(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUsuarioRequest,
    responses(
        (status = 200, description = "User updated", body = Usuario),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn update_usuario(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUsuarioRequest>,
) -> Result<Json<Usuario>, AppError> {
    Ok(Json(service::update_usuario(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn delete_usuario(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    service::delete_usuario(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/roles",
    responses((status = 200, description = "List of roles", body = [Rol])),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Rol>>, AppError> {
    Ok(Json(service::list_roles(&state.db).await?))
}
