use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::qr::qr_png_data_uri;

use super::model::{
    CodigoQrPago, GenerarQrRequest, GenerarQrResponse, LimpiezaQrResponse, QrPagoInfo,
    ValidarQrResponse,
};

/// One year, the default lifetime of a receipt code.
const MINUTOS_EXPIRACION_DEFAULT: i64 = 525_600;

#[derive(Debug, sqlx::FromRow)]
struct PagoQrRow {
    id: i32,
    monto: Decimal,
    es_anulado: bool,
}

fn pago_info(id: i32, monto: Decimal) -> String {
    format!("Pago #{} - Monto Q{:.2}", id, monto)
}

pub async fn generar(db: &PgPool, payload: GenerarQrRequest) -> Result<GenerarQrResponse, AppError> {
    let pago = sqlx::query_as::<_, PagoQrRow>("SELECT id, monto, es_anulado FROM pagos WHERE id = $1")
        .bind(payload.pago_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("Pago {} no encontrado", payload.pago_id))
        })?;

    if pago.es_anulado {
        return Err(AppError::conflict(anyhow::anyhow!(
            "No se puede generar un código QR para un pago anulado"
        )));
    }

    // Idempotent: reuse a live code for the same payment instead of minting
    // another one.
    let existente = sqlx::query_as::<_, CodigoQrPago>(
        r#"
        SELECT id, token_unico, fecha_creacion, fecha_expiracion, esta_usado, pago_id
        FROM codigos_qr_pagos
        WHERE pago_id = $1 AND NOT esta_usado AND fecha_expiracion > NOW()
        ORDER BY fecha_creacion DESC
        LIMIT 1
        "#,
    )
    .bind(payload.pago_id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?;

    let codigo = match existente {
        Some(codigo) => codigo,
        None => {
            let minutos = payload
                .minutos_expiracion
                .unwrap_or(MINUTOS_EXPIRACION_DEFAULT);
            let expiracion = Utc::now() + Duration::minutes(minutos);
            let token = Uuid::new_v4();

            let codigo = sqlx::query_as::<_, CodigoQrPago>(
                r#"
                INSERT INTO codigos_qr_pagos (token_unico, fecha_expiracion, pago_id)
                VALUES ($1, $2, $3)
                RETURNING id, token_unico, fecha_creacion, fecha_expiracion, esta_usado, pago_id
                "#,
            )
            .bind(token)
            .bind(expiracion)
            .bind(payload.pago_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;

            info!(pago_id = payload.pago_id, "QR code generated");
            codigo
        }
    };

    let qr_imagen = qr_png_data_uri(&codigo.token_unico.to_string())?;

    Ok(GenerarQrResponse {
        token_unico: codigo.token_unico,
        pago_id: codigo.pago_id,
        fecha_expiracion: codigo.fecha_expiracion,
        pago_info: pago_info(pago.id, pago.monto),
        qr_imagen,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct CodigoConPagoRow {
    codigo_id: i32,
    fecha_expiracion: DateTime<Utc>,
    esta_usado: bool,
    pago_id: i32,
    alumno: String,
    rubro: String,
    monto: Decimal,
    fecha: DateTime<Utc>,
    es_anulado: bool,
}

async fn fetch_codigo(db: &PgPool, token: Uuid) -> Result<Option<CodigoConPagoRow>, AppError> {
    sqlx::query_as::<_, CodigoConPagoRow>(
        r#"
        SELECT c.id AS codigo_id, c.fecha_expiracion, c.esta_usado,
               p.id AS pago_id,
               TRIM(CONCAT_WS(' ', a.primer_nombre, a.segundo_nombre,
                              a.primer_apellido, a.segundo_apellido)) AS alumno,
               r.descripcion AS rubro, p.monto, p.fecha, p.es_anulado
        FROM codigos_qr_pagos c
        JOIN pagos p ON p.id = c.pago_id
        JOIN alumnos a ON a.id = p.alumno_id
        JOIN rubros r ON r.id = p.rubro_id
        WHERE c.token_unico = $1
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)
}

fn a_info(row: &CodigoConPagoRow) -> QrPagoInfo {
    QrPagoInfo {
        pago_id: row.pago_id,
        alumno: row.alumno.clone(),
        rubro: row.rubro.clone(),
        monto: row.monto,
        fecha: row.fecha,
        es_anulado: row.es_anulado,
    }
}

fn rechazo(mensaje: &str) -> ValidarQrResponse {
    ValidarQrResponse {
        valido: false,
        mensaje: mensaje.to_string(),
        pago: None,
    }
}

/// Single-use validation. Every failure is reported with `valido: false`
/// rather than an error status so scanners get a uniform shape.
pub async fn validar(db: &PgPool, token: &str) -> Result<ValidarQrResponse, AppError> {
    let Ok(token) = Uuid::parse_str(token) else {
        return Ok(rechazo("El formato del código QR no es válido"));
    };

    let Some(row) = fetch_codigo(db, token).await? else {
        return Ok(rechazo("El código QR no existe"));
    };

    if row.esta_usado {
        return Ok(rechazo("El código QR ya fue utilizado"));
    }

    if row.fecha_expiracion <= Utc::now() {
        return Ok(rechazo("El código QR ha expirado"));
    }

    if row.es_anulado {
        return Ok(ValidarQrResponse {
            valido: false,
            mensaje: "El pago asociado al código QR fue anulado".to_string(),
            pago: Some(a_info(&row)),
        });
    }

    // Conditional flip: exactly one concurrent scan wins.
    let consumido = sqlx::query(
        "UPDATE codigos_qr_pagos SET esta_usado = TRUE WHERE id = $1 AND NOT esta_usado",
    )
    .bind(row.codigo_id)
    .execute(db)
    .await
    .map_err(AppError::database)?;

    if consumido.rows_affected() == 0 {
        return Ok(rechazo("El código QR ya fue utilizado"));
    }

    info!(pago_id = row.pago_id, "QR code validated and consumed");

    Ok(ValidarQrResponse {
        valido: true,
        mensaje: "Pago verificado correctamente".to_string(),
        pago: Some(a_info(&row)),
    })
}

/// Read-only inspection: same checks as `validar` without consuming the code.
pub async fn info(db: &PgPool, token: &str) -> Result<ValidarQrResponse, AppError> {
    let Ok(token) = Uuid::parse_str(token) else {
        return Ok(rechazo("El formato del código QR no es válido"));
    };

    let Some(row) = fetch_codigo(db, token).await? else {
        return Ok(rechazo("El código QR no existe"));
    };

    if row.esta_usado {
        return Ok(ValidarQrResponse {
            valido: false,
            mensaje: "El código QR ya fue utilizado".to_string(),
            pago: Some(a_info(&row)),
        });
    }

    if row.fecha_expiracion <= Utc::now() {
        return Ok(ValidarQrResponse {
            valido: false,
            mensaje: "El código QR ha expirado".to_string(),
            pago: Some(a_info(&row)),
        });
    }

    if row.es_anulado {
        return Ok(ValidarQrResponse {
            valido: false,
            mensaje: "El pago asociado al código QR fue anulado".to_string(),
            pago: Some(a_info(&row)),
        });
    }

    Ok(ValidarQrResponse {
        valido: true,
        mensaje: "El código QR es válido".to_string(),
        pago: Some(a_info(&row)),
    })
}

pub async fn codigos_de_pago(db: &PgPool, pago_id: i32) -> Result<Vec<CodigoQrPago>, AppError> {
    let pago_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM pagos WHERE id = $1)")
        .bind(pago_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
    if !pago_exists {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Pago {} no encontrado",
            pago_id
        )));
    }

    sqlx::query_as::<_, CodigoQrPago>(
        r#"
        SELECT id, token_unico, fecha_creacion, fecha_expiracion, esta_usado, pago_id
        FROM codigos_qr_pagos WHERE pago_id = $1 ORDER BY fecha_creacion DESC
        "#,
    )
    .bind(pago_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn limpiar_expirados(db: &PgPool) -> Result<LimpiezaQrResponse, AppError> {
    let result = sqlx::query("DELETE FROM codigos_qr_pagos WHERE fecha_expiracion <= NOW()")
        .execute(db)
        .await
        .map_err(AppError::database)?;

    let eliminados = result.rows_affected();
    info!(eliminados, "Expired QR codes purged");
    Ok(LimpiezaQrResponse { eliminados })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_summary_line_uses_two_decimals() {
        assert_eq!(
            pago_info(42, Decimal::new(15050, 2)),
            "Pago #42 - Monto Q150.50"
        );
        assert_eq!(pago_info(7, Decimal::from(300)), "Pago #7 - Monto Q300.00");
    }
}
