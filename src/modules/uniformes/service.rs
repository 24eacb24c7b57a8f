use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::utils::errors::AppError;

use super::model::{
    EntradaConDetalles, EntradaFilter, EntradaUniforme, EntradaUniformeDetalle,
    EntradaUniformeRequest, PrendaUniforme, PrendaUniformeRequest,
};

const PRENDA_COLUMNS: &str = r#"
    id, descripcion, sexo, talla, precio, existencia_inicial, entradas, salidas,
    existencia_inicial + entradas - salidas AS existencia_actual,
    notas, fecha_creacion
"#;

pub async fn list_prendas(db: &PgPool) -> Result<Vec<PrendaUniforme>, AppError> {
    sqlx::query_as::<_, PrendaUniforme>(&format!(
        "SELECT {PRENDA_COLUMNS} FROM prendas_uniforme WHERE NOT es_eliminado ORDER BY descripcion, talla"
    ))
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_prenda(db: &PgPool, id: i32) -> Result<PrendaUniforme, AppError> {
    sqlx::query_as::<_, PrendaUniforme>(&format!(
        "SELECT {PRENDA_COLUMNS} FROM prendas_uniforme WHERE id = $1 AND NOT es_eliminado"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Prenda {} no encontrada", id)))
}

pub async fn create_prenda(
    db: &PgPool,
    payload: PrendaUniformeRequest,
    usuario_id: i32,
) -> Result<PrendaUniforme, AppError> {
    if payload.precio < Decimal::ZERO {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "El precio no puede ser negativo"
        )));
    }

    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO prendas_uniforme (descripcion, sexo, talla, precio, existencia_inicial,
                                      notas, usuario_creacion_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&payload.descripcion)
    .bind(&payload.sexo)
    .bind(&payload.talla)
    .bind(payload.precio)
    .bind(payload.existencia_inicial)
    .bind(&payload.notas)
    .bind(usuario_id)
    .fetch_one(db)
    .await
    .map_err(AppError::database)?;

    info!(prenda_id = id, "Uniform garment created");
    get_prenda(db, id).await
}

pub async fn update_prenda(
    db: &PgPool,
    id: i32,
    payload: PrendaUniformeRequest,
    usuario_id: i32,
) -> Result<PrendaUniforme, AppError> {
    if payload.precio < Decimal::ZERO {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "El precio no puede ser negativo"
        )));
    }

    let result = sqlx::query(
        r#"
        UPDATE prendas_uniforme
        SET descripcion = $1, sexo = $2, talla = $3, precio = $4, existencia_inicial = $5,
            notas = $6, fecha_actualizacion = NOW(), usuario_actualizacion_id = $7
        WHERE id = $8 AND NOT es_eliminado
        "#,
    )
    .bind(&payload.descripcion)
    .bind(&payload.sexo)
    .bind(&payload.talla)
    .bind(payload.precio)
    .bind(payload.existencia_inicial)
    .bind(&payload.notas)
    .bind(usuario_id)
    .bind(id)
    .execute(db)
    .await
    .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Prenda {} no encontrada",
            id
        )));
    }
    get_prenda(db, id).await
}

pub async fn delete_prenda(
    db: &PgPool,
    id: i32,
    motivo: &str,
    usuario_id: i32,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE prendas_uniforme
        SET es_eliminado = TRUE, motivo_eliminacion = $1, fecha_eliminacion = NOW(),
            usuario_eliminacion_id = $2
        WHERE id = $3 AND NOT es_eliminado
        "#,
    )
    .bind(motivo)
    .bind(usuario_id)
    .bind(id)
    .execute(db)
    .await
    .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Prenda {} no encontrada",
            id
        )));
    }

    info!(prenda_id = id, "Uniform garment soft deleted");
    Ok(())
}

// Entradas (stock-in documents)

const ENTRADA_COLUMNS: &str = r#"
    id, fecha_entrada, notas, total, fecha_creacion, usuario_creacion_id, es_eliminado
"#;

async fn fetch_entrada_detalles(
    db: &PgPool,
    entrada_id: i32,
) -> Result<Vec<EntradaUniformeDetalle>, AppError> {
    sqlx::query_as::<_, EntradaUniformeDetalle>(
        r#"
        SELECT d.id, d.entrada_uniforme_id, d.prenda_uniforme_id,
               p.descripcion AS prenda_descripcion, d.cantidad, d.subtotal
        FROM entrada_uniforme_detalles d
        JOIN prendas_uniforme p ON p.id = d.prenda_uniforme_id
        WHERE d.entrada_uniforme_id = $1
        ORDER BY d.id
        "#,
    )
    .bind(entrada_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn list_entradas(
    db: &PgPool,
    filter: &EntradaFilter,
) -> Result<Vec<EntradaUniforme>, AppError> {
    sqlx::query_as::<_, EntradaUniforme>(&format!(
        r#"
        SELECT {ENTRADA_COLUMNS} FROM entradas_uniforme
        WHERE NOT es_eliminado
          AND ($1::TIMESTAMPTZ IS NULL OR fecha_entrada >= $1)
          AND ($2::TIMESTAMPTZ IS NULL OR fecha_entrada <= $2)
          AND ($3::INTEGER IS NULL OR usuario_creacion_id = $3)
        ORDER BY fecha_entrada DESC
        "#
    ))
    .bind(filter.desde)
    .bind(filter.hasta)
    .bind(filter.usuario_creacion_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_entrada(db: &PgPool, id: i32) -> Result<EntradaConDetalles, AppError> {
    let entrada = sqlx::query_as::<_, EntradaUniforme>(&format!(
        "SELECT {ENTRADA_COLUMNS} FROM entradas_uniforme WHERE id = $1 AND NOT es_eliminado"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Entrada {} no encontrada", id)))?;

    let detalles = fetch_entrada_detalles(db, id).await?;
    Ok(EntradaConDetalles { entrada, detalles })
}

async fn insertar_detalles(
    tx: &mut Transaction<'_, Postgres>,
    entrada_id: i32,
    payload: &EntradaUniformeRequest,
) -> Result<Decimal, AppError> {
    let mut total = Decimal::ZERO;

    for detalle in &payload.detalles {
        let prenda_valida = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM prendas_uniforme WHERE id = $1 AND NOT es_eliminado)",
        )
        .bind(detalle.prenda_uniforme_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::database)?;
        if !prenda_valida {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Prenda {} no encontrada",
                detalle.prenda_uniforme_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO entrada_uniforme_detalles (entrada_uniforme_id, prenda_uniforme_id,
                                                   cantidad, subtotal)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entrada_id)
        .bind(detalle.prenda_uniforme_id)
        .bind(detalle.cantidad)
        .bind(detalle.subtotal)
        .execute(&mut **tx)
        .await
        .map_err(AppError::database)?;

        sqlx::query("UPDATE prendas_uniforme SET entradas = entradas + $1 WHERE id = $2")
            .bind(detalle.cantidad)
            .bind(detalle.prenda_uniforme_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::database)?;

        total += detalle.subtotal;
    }

    Ok(total)
}

/// Reverts the stock contribution of the entry's current detalles and removes
/// them.
async fn revertir_detalles(
    tx: &mut Transaction<'_, Postgres>,
    entrada_id: i32,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE prendas_uniforme p
        SET entradas = p.entradas - d.cantidad
        FROM entrada_uniforme_detalles d
        WHERE d.entrada_uniforme_id = $1 AND p.id = d.prenda_uniforme_id
        "#,
    )
    .bind(entrada_id)
    .execute(&mut **tx)
    .await
    .map_err(AppError::database)?;

    sqlx::query("DELETE FROM entrada_uniforme_detalles WHERE entrada_uniforme_id = $1")
        .bind(entrada_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::database)?;

    Ok(())
}

pub async fn create_entrada(
    db: &PgPool,
    payload: EntradaUniformeRequest,
    usuario_id: i32,
) -> Result<EntradaConDetalles, AppError> {
    let fecha_entrada = payload.fecha_entrada.unwrap_or_else(chrono::Utc::now);

    let mut tx = db.begin().await.map_err(AppError::database)?;

    let entrada_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO entradas_uniforme (fecha_entrada, notas, usuario_creacion_id)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(fecha_entrada)
    .bind(&payload.notas)
    .bind(usuario_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::database)?;

    let total = insertar_detalles(&mut tx, entrada_id, &payload).await?;

    sqlx::query("UPDATE entradas_uniforme SET total = $1 WHERE id = $2")
        .bind(total)
        .bind(entrada_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::database)?;

    tx.commit().await.map_err(AppError::database)?;

    info!(entrada_id, "Uniform stock entry registered");
    get_entrada(db, entrada_id).await
}

pub async fn update_entrada(
    db: &PgPool,
    id: i32,
    payload: EntradaUniformeRequest,
    usuario_id: i32,
) -> Result<EntradaConDetalles, AppError> {
    let mut tx = db.begin().await.map_err(AppError::database)?;

    let existe = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM entradas_uniforme WHERE id = $1 AND NOT es_eliminado FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(AppError::database)?;
    if existe.is_none() {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Entrada {} no encontrada",
            id
        )));
    }

    revertir_detalles(&mut tx, id).await?;
    let total = insertar_detalles(&mut tx, id, &payload).await?;

    let fecha_entrada = payload.fecha_entrada.unwrap_or_else(chrono::Utc::now);
    sqlx::query(
        r#"
        UPDATE entradas_uniforme
        SET fecha_entrada = $1, notas = $2, total = $3,
            fecha_actualizacion = NOW(), usuario_actualizacion_id = $4
        WHERE id = $5
        "#,
    )
    .bind(fecha_entrada)
    .bind(&payload.notas)
    .bind(total)
    .bind(usuario_id)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(AppError::database)?;

    tx.commit().await.map_err(AppError::database)?;

    get_entrada(db, id).await
}

pub async fn delete_entrada(
    db: &PgPool,
    id: i32,
    motivo: &str,
    usuario_id: i32,
) -> Result<(), AppError> {
    let mut tx = db.begin().await.map_err(AppError::database)?;

    let result = sqlx::query(
        r#"
        UPDATE entradas_uniforme
        SET es_eliminado = TRUE, motivo_eliminacion = $1, fecha_eliminacion = NOW(),
            usuario_eliminacion_id = $2
        WHERE id = $3 AND NOT es_eliminado
        "#,
    )
    .bind(motivo)
    .bind(usuario_id)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Entrada {} no encontrada",
            id
        )));
    }

    // Detalles stay for the audit trail; only the stock contribution reverts.
    sqlx::query(
        r#"
        UPDATE prendas_uniforme p
        SET entradas = p.entradas - d.cantidad
        FROM entrada_uniforme_detalles d
        WHERE d.entrada_uniforme_id = $1 AND p.id = d.prenda_uniforme_id
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(AppError::database)?;

    tx.commit().await.map_err(AppError::database)?;

    info!(entrada_id = id, "Uniform stock entry voided");
    Ok(())
}
