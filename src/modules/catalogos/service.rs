use sqlx::PgPool;

use crate::utils::errors::AppError;

use super::model::{
    Grado, GradoRequest, NivelEducativo, NivelEducativoRequest, Sede, SedeRequest,
};

fn map_delete_error(entity: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::conflict(anyhow::anyhow!(
                "{} tiene registros asociados y no puede eliminarse",
                entity
            ))
        }
        _ => AppError::database(e),
    }
}

// Sedes

pub async fn list_sedes(db: &PgPool) -> Result<Vec<Sede>, AppError> {
    sqlx::query_as::<_, Sede>("SELECT id, nombre, direccion FROM sedes ORDER BY nombre")
        .fetch_all(db)
        .await
        .map_err(AppError::database)
}

pub async fn get_sede(db: &PgPool, id: i32) -> Result<Sede, AppError> {
    sqlx::query_as::<_, Sede>("SELECT id, nombre, direccion FROM sedes WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Sede {} no encontrada", id)))
}

pub async fn create_sede(db: &PgPool, payload: SedeRequest) -> Result<Sede, AppError> {
    sqlx::query_as::<_, Sede>(
        "INSERT INTO sedes (nombre, direccion) VALUES ($1, $2) RETURNING id, nombre, direccion",
    )
    .bind(&payload.nombre)
    .bind(&payload.direccion)
    .fetch_one(db)
    .await
    .map_err(AppError::database)
}

pub async fn update_sede(db: &PgPool, id: i32, payload: SedeRequest) -> Result<Sede, AppError> {
    sqlx::query_as::<_, Sede>(
        "UPDATE sedes SET nombre = $1, direccion = $2 WHERE id = $3 RETURNING id, nombre, direccion",
    )
    .bind(&payload.nombre)
    .bind(&payload.direccion)
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Sede {} no encontrada", id)))
}

pub async fn delete_sede(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM sedes WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(map_delete_error("La sede"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Sede {} no encontrada",
            id
        )));
    }
    Ok(())
}

// Niveles educativos

pub async fn list_niveles(db: &PgPool) -> Result<Vec<NivelEducativo>, AppError> {
    sqlx::query_as::<_, NivelEducativo>(
        "SELECT id, nombre, activo FROM niveles_educativos ORDER BY id",
    )
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn list_niveles_activos(db: &PgPool) -> Result<Vec<NivelEducativo>, AppError> {
    sqlx::query_as::<_, NivelEducativo>(
        "SELECT id, nombre, activo FROM niveles_educativos WHERE activo ORDER BY id",
    )
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_nivel(db: &PgPool, id: i32) -> Result<NivelEducativo, AppError> {
    sqlx::query_as::<_, NivelEducativo>(
        "SELECT id, nombre, activo FROM niveles_educativos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Nivel educativo {} no encontrado", id)))
}

pub async fn create_nivel(
    db: &PgPool,
    payload: NivelEducativoRequest,
) -> Result<NivelEducativo, AppError> {
    sqlx::query_as::<_, NivelEducativo>(
        "INSERT INTO niveles_educativos (nombre, activo) VALUES ($1, $2) RETURNING id, nombre, activo",
    )
    .bind(&payload.nombre)
    .bind(payload.activo)
    .fetch_one(db)
    .await
    .map_err(AppError::database)
}

pub async fn update_nivel(
    db: &PgPool,
    id: i32,
    payload: NivelEducativoRequest,
) -> Result<NivelEducativo, AppError> {
    sqlx::query_as::<_, NivelEducativo>(
        "UPDATE niveles_educativos SET nombre = $1, activo = $2 WHERE id = $3 RETURNING id, nombre, activo",
    )
    .bind(&payload.nombre)
    .bind(payload.activo)
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Nivel educativo {} no encontrado", id)))
}

pub async fn delete_nivel(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM niveles_educativos WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(map_delete_error("El nivel educativo"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Nivel educativo {} no encontrado",
            id
        )));
    }
    Ok(())
}

// Grados

pub async fn list_grados(db: &PgPool, nivel_educativo_id: Option<i32>) -> Result<Vec<Grado>, AppError> {
    sqlx::query_as::<_, Grado>(
        r#"
        SELECT id, nombre, descripcion, nivel_educativo_id
        FROM grados
        WHERE $1::INTEGER IS NULL OR nivel_educativo_id = $1
        ORDER BY nivel_educativo_id, id
        "#,
    )
    .bind(nivel_educativo_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_grado(db: &PgPool, id: i32) -> Result<Grado, AppError> {
    sqlx::query_as::<_, Grado>(
        "SELECT id, nombre, descripcion, nivel_educativo_id FROM grados WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grado {} no encontrado", id)))
}

pub async fn create_grado(db: &PgPool, payload: GradoRequest) -> Result<Grado, AppError> {
    sqlx::query_as::<_, Grado>(
        r#"
        INSERT INTO grados (nombre, descripcion, nivel_educativo_id)
        VALUES ($1, $2, $3)
        RETURNING id, nombre, descripcion, nivel_educativo_id
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(payload.nivel_educativo_id)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found(anyhow::anyhow!(
                "Nivel educativo {} no encontrado",
                payload.nivel_educativo_id
            ))
        }
        _ => AppError::database(e),
    })
}

pub async fn update_grado(db: &PgPool, id: i32, payload: GradoRequest) -> Result<Grado, AppError> {
    sqlx::query_as::<_, Grado>(
        r#"
        UPDATE grados SET nombre = $1, descripcion = $2, nivel_educativo_id = $3
        WHERE id = $4
        RETURNING id, nombre, descripcion, nivel_educativo_id
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(payload.nivel_educativo_id)
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found(anyhow::anyhow!(
                "Nivel educativo {} no encontrado",
                payload.nivel_educativo_id
            ))
        }
        _ => AppError::database(e),
    })?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grado {} no encontrado", id)))
}

pub async fn delete_grado(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM grados WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(map_delete_error("El grado"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Grado {} no encontrado",
            id
        )));
    }
    Ok(())
}
