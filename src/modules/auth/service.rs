use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, LoginResponse, UsuarioAutenticado};

#[derive(Debug, sqlx::FromRow)]
struct UsuarioLoginRow {
    id: i32,
    codigo_usuario: String,
    nombres: String,
    apellidos: String,
    email: String,
    password: String,
    estado: String,
    rol_nombre: String,
    es_admin: bool,
}

pub async fn login(
    db: &PgPool,
    jwt_config: &JwtConfig,
    payload: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let row = sqlx::query_as::<_, UsuarioLoginRow>(
        r#"
        SELECT u.id, u.codigo_usuario, u.nombres, u.apellidos, u.email, u.password,
               u.estado, r.nombre AS rol_nombre, r.es_admin
        FROM usuarios u
        JOIN roles r ON r.id = u.rol_id
        WHERE u.codigo_usuario = $1
        "#,
    )
    .bind(&payload.codigo_usuario)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::unauthorized("Credenciales inválidas"))?;

    if !verify_password(&payload.password, &row.password)? {
        warn!(codigo_usuario = %payload.codigo_usuario, "Failed login attempt");
        return Err(AppError::unauthorized("Credenciales inválidas"));
    }

    if row.estado != "activo" {
        return Err(AppError::forbidden(
            "El usuario se encuentra inactivo o bloqueado",
        ));
    }

    let token = create_access_token(
        row.id,
        &row.codigo_usuario,
        &row.email,
        row.es_admin,
        jwt_config,
    )?;

    info!(usuario_id = row.id, "User logged in");

    Ok(LoginResponse {
        token,
        usuario: UsuarioAutenticado {
            id: row.id,
            codigo_usuario: row.codigo_usuario,
            nombres: row.nombres,
            apellidos: row.apellidos,
            email: row.email,
            rol: row.rol_nombre,
            es_admin: row.es_admin,
        },
    })
}

#[derive(Debug, sqlx::FromRow)]
struct UsuarioResetRow {
    id: i32,
    nombres: String,
    email: String,
}

/// Always succeeds from the caller's perspective so that addresses cannot be
/// probed through this endpoint.
pub async fn forgot_password(
    db: &PgPool,
    email_config: &EmailConfig,
    email: &str,
) -> Result<(), AppError> {
    let usuario = sqlx::query_as::<_, UsuarioResetRow>(
        "SELECT id, nombres, email FROM usuarios WHERE email = $1 AND estado = 'activo'",
    )
    .bind(email)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?;

    let Some(usuario) = usuario else {
        info!("Password reset requested for unknown or inactive email");
        return Ok(());
    };

    let token = Uuid::new_v4().to_string();
    let expires = Utc::now() + Duration::hours(1);

    sqlx::query(
        "UPDATE usuarios SET password_reset_token = $1, password_reset_expires = $2 WHERE id = $3",
    )
    .bind(&token)
    .bind(expires)
    .bind(usuario.id)
    .execute(db)
    .await
    .map_err(AppError::database)?;

    EmailService::new(email_config.clone())
        .send_password_reset_email(&usuario.email, &usuario.nombres, &token)
        .await?;

    info!(usuario_id = usuario.id, "Password reset email queued");
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    id: i32,
    password_reset_expires: Option<DateTime<Utc>>,
}

pub async fn reset_password(
    db: &PgPool,
    token: &str,
    nueva_password: &str,
) -> Result<(), AppError> {
    let row = sqlx::query_as::<_, TokenRow>(
        "SELECT id, password_reset_expires FROM usuarios WHERE password_reset_token = $1",
    )
    .bind(token)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("El token no es válido")))?;

    let valid = row
        .password_reset_expires
        .map(|expires| expires > Utc::now())
        .unwrap_or(false);
    if !valid {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "El token ha expirado"
        )));
    }

    let hashed = hash_password(nueva_password)?;

    sqlx::query(
        r#"
        UPDATE usuarios
        SET password = $1, password_reset_token = NULL, password_reset_expires = NULL
        WHERE id = $2
        "#,
    )
    .bind(&hashed)
    .bind(row.id)
    .execute(db)
    .await
    .map_err(AppError::database)?;

    info!(usuario_id = row.id, "Password reset completed");
    Ok(())
}
