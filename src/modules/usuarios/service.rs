use sqlx::PgPool;
use tracing::info;

use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

use super::model::{CreateUsuarioRequest, Rol, UpdateUsuarioRequest, Usuario};

const USUARIO_COLUMNS: &str = r#"
    u.id, u.codigo_usuario, u.nombres, u.apellidos, u.email, u.celular,
    u.estado, u.rol_id, r.nombre AS rol_nombre
"#;

pub async fn list_usuarios(db: &PgPool) -> Result<Vec<Usuario>, AppError> {
    sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {USUARIO_COLUMNS} FROM usuarios u JOIN roles r ON r.id = u.rol_id ORDER BY u.codigo_usuario"
    ))
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_usuario(db: &PgPool, id: i32) -> Result<Usuario, AppError> {
    sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {USUARIO_COLUMNS} FROM usuarios u JOIN roles r ON r.id = u.rol_id WHERE u.id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Usuario {} no encontrado", id)))
}

pub async fn create_usuario(
    db: &PgPool,
    payload: CreateUsuarioRequest,
) -> Result<Usuario, AppError> {
    let rol_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
        .bind(payload.rol_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
    if !rol_exists {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Rol {} no encontrado",
            payload.rol_id
        )));
    }

    let hashed = hash_password(&payload.password)?;

    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO usuarios (codigo_usuario, nombres, apellidos, email, celular, password, rol_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&payload.codigo_usuario)
    .bind(&payload.nombres)
    .bind(&payload.apellidos)
    .bind(&payload.email)
    .bind(&payload.celular)
    .bind(&hashed)
    .bind(payload.rol_id)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow::anyhow!("Ya existe un usuario con ese código o correo"),
        ),
        _ => AppError::database(e),
    })?;

    info!(usuario_id = id, "User created");
    get_usuario(db, id).await
}

pub async fn update_usuario(
    db: &PgPool,
    id: i32,
    payload: UpdateUsuarioRequest,
) -> Result<Usuario, AppError> {
    // Fetch first so a missing row is a 404 rather than a silent no-op.
    get_usuario(db, id).await?;

    let hashed = match &payload.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    sqlx::query(
        r#"
        UPDATE usuarios
        SET nombres = $1, apellidos = $2, email = $3, celular = $4, estado = $5,
            rol_id = $6, password = COALESCE($7, password)
        WHERE id = $8
        "#,
    )
    .bind(&payload.nombres)
    .bind(&payload.apellidos)
    .bind(&payload.email)
    .bind(&payload.celular)
    .bind(&payload.estado)
    .bind(payload.rol_id)
    .bind(&hashed)
    .bind(id)
    .execute(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(anyhow::anyhow!("Ya existe un usuario con ese correo"))
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found(anyhow::anyhow!("Rol {} no encontrado", payload.rol_id))
        }
        _ => AppError::database(e),
    })?;

    get_usuario(db, id).await
}

pub async fn delete_usuario(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::conflict(anyhow::anyhow!(
                    "El usuario tiene registros asociados y no puede eliminarse"
                ))
            }
            _ => AppError::database(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Usuario {} no encontrado",
            id
        )));
    }

    info!(usuario_id = id, "User deleted");
    Ok(())
}

pub async fn list_roles(db: &PgPool) -> Result<Vec<Rol>, AppError> {
    sqlx::query_as::<_, Rol>("SELECT id, nombre, es_admin FROM roles ORDER BY id")
        .fetch_all(db)
        .await
        .map_err(AppError::database)
}
