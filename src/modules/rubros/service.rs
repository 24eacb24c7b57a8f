use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::utils::errors::AppError;

use super::model::{Rubro, RubroRequest, RubroUniformeDetalle};

const RUBRO_COLUMNS: &str = r#"
    id, descripcion, tipo, penalizacion_por_mora, fecha_limite_pago,
    mes_colegiatura, dia_limite_pago, mes_limite_pago, monto_preestablecido, activo
"#;

fn validate_montos(payload: &RubroRequest) -> Result<(), AppError> {
    if let Some(mora) = payload.penalizacion_por_mora {
        if mora < Decimal::ZERO {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "La penalización por mora no puede ser negativa"
            )));
        }
    }
    if let Some(monto) = payload.monto_preestablecido {
        if monto < Decimal::ZERO {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "El monto preestablecido no puede ser negativo"
            )));
        }
    }
    Ok(())
}

pub async fn list_rubros(db: &PgPool) -> Result<Vec<Rubro>, AppError> {
    sqlx::query_as::<_, Rubro>(&format!("SELECT {RUBRO_COLUMNS} FROM rubros ORDER BY descripcion"))
        .fetch_all(db)
        .await
        .map_err(AppError::database)
}

pub async fn list_rubros_activos(db: &PgPool) -> Result<Vec<Rubro>, AppError> {
    sqlx::query_as::<_, Rubro>(&format!(
        "SELECT {RUBRO_COLUMNS} FROM rubros WHERE activo ORDER BY descripcion"
    ))
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_rubro(db: &PgPool, id: i32) -> Result<Rubro, AppError> {
    sqlx::query_as::<_, Rubro>(&format!("SELECT {RUBRO_COLUMNS} FROM rubros WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Rubro {} no encontrado", id)))
}

pub async fn create_rubro(db: &PgPool, payload: RubroRequest) -> Result<Rubro, AppError> {
    validate_montos(&payload)?;

    sqlx::query_as::<_, Rubro>(&format!(
        r#"
        INSERT INTO rubros (descripcion, tipo, penalizacion_por_mora, fecha_limite_pago,
                            mes_colegiatura, dia_limite_pago, mes_limite_pago,
                            monto_preestablecido, activo)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {RUBRO_COLUMNS}
        "#
    ))
    .bind(&payload.descripcion)
    .bind(payload.tipo)
    .bind(payload.penalizacion_por_mora)
    .bind(payload.fecha_limite_pago)
    .bind(payload.mes_colegiatura)
    .bind(payload.dia_limite_pago)
    .bind(payload.mes_limite_pago)
    .bind(payload.monto_preestablecido)
    .bind(payload.activo)
    .fetch_one(db)
    .await
    .map_err(AppError::database)
}

pub async fn update_rubro(db: &PgPool, id: i32, payload: RubroRequest) -> Result<Rubro, AppError> {
    validate_montos(&payload)?;

    sqlx::query_as::<_, Rubro>(&format!(
        r#"
        UPDATE rubros
        SET descripcion = $1, tipo = $2, penalizacion_por_mora = $3, fecha_limite_pago = $4,
            mes_colegiatura = $5, dia_limite_pago = $6, mes_limite_pago = $7,
            monto_preestablecido = $8, activo = $9
        WHERE id = $10
        RETURNING {RUBRO_COLUMNS}
        "#
    ))
    .bind(&payload.descripcion)
    .bind(payload.tipo)
    .bind(payload.penalizacion_por_mora)
    .bind(payload.fecha_limite_pago)
    .bind(payload.mes_colegiatura)
    .bind(payload.dia_limite_pago)
    .bind(payload.mes_limite_pago)
    .bind(payload.monto_preestablecido)
    .bind(payload.activo)
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Rubro {} no encontrado", id)))
}

pub async fn delete_rubro(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM rubros WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::conflict(anyhow::anyhow!(
                    "El rubro tiene registros asociados y no puede eliminarse"
                ))
            }
            _ => AppError::database(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Rubro {} no encontrado",
            id
        )));
    }
    Ok(())
}

// Uniform detalle links

pub async fn list_detalles_de_rubro(
    db: &PgPool,
    rubro_id: i32,
) -> Result<Vec<RubroUniformeDetalle>, AppError> {
    get_rubro(db, rubro_id).await?;

    sqlx::query_as::<_, RubroUniformeDetalle>(
        r#"
        SELECT d.id, d.rubro_id, d.prenda_uniforme_id,
               p.descripcion AS prenda_descripcion, p.talla, p.sexo, p.precio,
               d.fecha_creacion
        FROM rubro_uniforme_detalles d
        JOIN prendas_uniforme p ON p.id = d.prenda_uniforme_id
        WHERE d.rubro_id = $1 AND NOT d.es_eliminado
        ORDER BY p.descripcion, p.talla
        "#,
    )
    .bind(rubro_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn create_detalle(
    db: &PgPool,
    rubro_id: i32,
    prenda_uniforme_id: i32,
    usuario_id: i32,
) -> Result<RubroUniformeDetalle, AppError> {
    let rubro = get_rubro(db, rubro_id).await?;
    if rubro.tipo != super::model::TipoRubro::Uniformes {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "El rubro {} no es de tipo Uniformes",
            rubro_id
        )));
    }

    let prenda_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM prendas_uniforme WHERE id = $1 AND NOT es_eliminado)",
    )
    .bind(prenda_uniforme_id)
    .fetch_one(db)
    .await
    .map_err(AppError::database)?;
    if !prenda_exists {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Prenda de uniforme {} no encontrada",
            prenda_uniforme_id
        )));
    }

    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO rubro_uniforme_detalles (rubro_id, prenda_uniforme_id, usuario_creacion_id)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(rubro_id)
    .bind(prenda_uniforme_id)
    .bind(usuario_id)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow::anyhow!("La prenda ya está vinculada a este rubro"),
        ),
        _ => AppError::database(e),
    })?;

    info!(detalle_id = id, rubro_id, "Uniform garment linked to fee");

    sqlx::query_as::<_, RubroUniformeDetalle>(
        r#"
        SELECT d.id, d.rubro_id, d.prenda_uniforme_id,
               p.descripcion AS prenda_descripcion, p.talla, p.sexo, p.precio,
               d.fecha_creacion
        FROM rubro_uniforme_detalles d
        JOIN prendas_uniforme p ON p.id = d.prenda_uniforme_id
        WHERE d.id = $1
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await
    .map_err(AppError::database)
}

pub async fn delete_detalle(
    db: &PgPool,
    rubro_id: i32,
    detalle_id: i32,
    motivo: &str,
    usuario_id: i32,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE rubro_uniforme_detalles
        SET es_eliminado = TRUE, motivo_eliminacion = $1, fecha_eliminacion = NOW(),
            usuario_eliminacion_id = $2
        WHERE id = $3 AND rubro_id = $4 AND NOT es_eliminado
        "#,
    )
    .bind(motivo)
    .bind(usuario_id)
    .bind(detalle_id)
    .bind(rubro_id)
    .execute(db)
    .await
    .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Detalle {} no encontrado en el rubro {}",
            detalle_id,
            rubro_id
        )));
    }
    Ok(())
}
