use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::modules::rubros::model::TipoRubro;
use crate::utils::errors::AppError;

use super::model::{
    AnularPagoRequest, CreatePagoRequest, Pago, PagoConDetalles, PagoDetalle, PagoFilter,
    ReporteMensual, ReporteMensualItem, ReporteMensualParams, TotalPorClave,
};

const PAGO_COLUMNS: &str = r#"
    id, alumno_id, rubro_id, ciclo_escolar, fecha, monto, medio_pago, notas,
    es_colegiatura, mes_colegiatura, anio_colegiatura, es_pago_de_carnet, estado_carnet,
    es_pago_de_transporte, es_pago_de_uniforme, es_anulado, motivo_anulacion,
    fecha_anulacion, usuario_anulacion_id, fecha_creacion, usuario_creacion_id
"#;

/// Week of month for a day (1-7 is week 1, 8-14 week 2 and so on).
pub fn semana_del_mes(dia: u32) -> i32 {
    ((dia as i32 - 1) / 7) + 1
}

pub fn rango_semana(semana: i32, dias_del_mes: u32) -> String {
    let inicio = (semana - 1) * 7 + 1;
    let fin = (inicio + 6).min(dias_del_mes as i32);
    format!("{}-{}", inicio, fin)
}

fn dias_del_mes(anio: i32, mes: u32) -> u32 {
    let (siguiente_anio, siguiente_mes) = if mes == 12 { (anio + 1, 1) } else { (anio, mes + 1) };
    chrono::NaiveDate::from_ymd_opt(siguiente_anio, siguiente_mes, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

#[derive(Debug, sqlx::FromRow)]
struct RubroPagoRow {
    tipo: TipoRubro,
}

async fn fetch_detalles(db: &PgPool, pago_id: i32) -> Result<Vec<PagoDetalle>, AppError> {
    sqlx::query_as::<_, PagoDetalle>(
        r#"
        SELECT pd.id, pd.pago_id, pd.rubro_uniforme_detalle_id,
               pu.descripcion AS prenda_descripcion,
               pd.precio_unitario, pd.cantidad, pd.subtotal
        FROM pago_detalles pd
        JOIN rubro_uniforme_detalles rud ON rud.id = pd.rubro_uniforme_detalle_id
        JOIN prendas_uniforme pu ON pu.id = rud.prenda_uniforme_id
        WHERE pd.pago_id = $1
        ORDER BY pd.id
        "#,
    )
    .bind(pago_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_pago(db: &PgPool, id: i32) -> Result<PagoConDetalles, AppError> {
    let pago = sqlx::query_as::<_, Pago>(&format!("SELECT {PAGO_COLUMNS} FROM pagos WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Pago {} no encontrado", id)))?;

    let detalles = fetch_detalles(db, id).await?;
    Ok(PagoConDetalles { pago, detalles })
}

pub async fn query_pagos(db: &PgPool, filter: &PagoFilter) -> Result<Vec<Pago>, AppError> {
    sqlx::query_as::<_, Pago>(&format!(
        r#"
        SELECT {PAGO_COLUMNS} FROM pagos p
        WHERE ($1::INTEGER IS NULL OR p.ciclo_escolar = $1)
          AND ($2::INTEGER IS NULL OR p.rubro_id = $2)
          AND ($3::INTEGER IS NULL OR EXISTS (
                SELECT 1 FROM alumnos a WHERE a.id = p.alumno_id AND a.grado_id = $3))
          AND ($4::INTEGER IS NULL OR EXTRACT(MONTH FROM p.fecha)::INTEGER = $4)
        ORDER BY p.fecha DESC
        "#
    ))
    .bind(filter.ciclo_escolar)
    .bind(filter.rubro_id)
    .bind(filter.grado_id)
    .bind(filter.mes)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn create_pago(
    db: &PgPool,
    payload: CreatePagoRequest,
    usuario_id: i32,
) -> Result<PagoConDetalles, AppError> {
    if payload.monto <= Decimal::ZERO {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "El monto del pago debe ser mayor a cero"
        )));
    }

    let alumno_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM alumnos WHERE id = $1)")
            .bind(payload.alumno_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;
    if !alumno_exists {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Alumno {} no encontrado",
            payload.alumno_id
        )));
    }

    let rubro = sqlx::query_as::<_, RubroPagoRow>("SELECT tipo FROM rubros WHERE id = $1")
        .bind(payload.rubro_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("Rubro {} no encontrado", payload.rubro_id))
        })?;

    // The payment flags come from the fee type, never from the client.
    let es_colegiatura = rubro.tipo == TipoRubro::Colegiatura;
    let es_pago_de_transporte = rubro.tipo == TipoRubro::Transporte;
    let es_pago_de_uniforme = rubro.tipo == TipoRubro::Uniformes;

    let fecha = payload.fecha.unwrap_or_else(Utc::now);

    if es_colegiatura || es_pago_de_transporte {
        if payload.mes_colegiatura.is_none() || payload.anio_colegiatura.is_none() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Los pagos de colegiatura y transporte requieren mes y año"
            )));
        }
    }

    if es_pago_de_transporte {
        let asignado = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM alumno_rutas
                WHERE alumno_id = $1 AND rubro_transporte_id = $2
                  AND fecha_inicio <= $3::DATE
                  AND (fecha_fin IS NULL OR fecha_fin >= $3::DATE)
            )
            "#,
        )
        .bind(payload.alumno_id)
        .bind(payload.rubro_id)
        .bind(fecha.date_naive())
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if !asignado {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "El alumno no está asignado a esta ruta de transporte en la fecha del pago"
            )));
        }
    }

    if es_pago_de_uniforme {
        if payload.detalles.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Los pagos de uniforme requieren al menos un detalle"
            )));
        }

        let mut suma = Decimal::ZERO;
        for detalle in &payload.detalles {
            let esperado = detalle.precio_unitario * Decimal::from(detalle.cantidad);
            if detalle.subtotal != esperado {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "El subtotal del detalle no coincide con precio por cantidad"
                )));
            }
            suma += detalle.subtotal;
        }
        if payload.monto != suma {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "El monto del pago debe ser igual a la suma de los subtotales"
            )));
        }
    }

    let mut tx = db.begin().await.map_err(AppError::database)?;

    let pago_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO pagos (alumno_id, rubro_id, ciclo_escolar, fecha, monto, medio_pago, notas,
                           es_colegiatura, mes_colegiatura, anio_colegiatura,
                           es_pago_de_carnet, estado_carnet,
                           es_pago_de_transporte, es_pago_de_uniforme, usuario_creacion_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING id
        "#,
    )
    .bind(payload.alumno_id)
    .bind(payload.rubro_id)
    .bind(payload.ciclo_escolar)
    .bind(fecha)
    .bind(payload.monto)
    .bind(payload.medio_pago)
    .bind(&payload.notas)
    .bind(es_colegiatura)
    .bind(payload.mes_colegiatura)
    .bind(payload.anio_colegiatura)
    .bind(payload.es_pago_de_carnet)
    .bind(&payload.estado_carnet)
    .bind(es_pago_de_transporte)
    .bind(es_pago_de_uniforme)
    .bind(usuario_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::database)?;

    if es_pago_de_uniforme {
        for detalle in &payload.detalles {
            let prenda_id = sqlx::query_scalar::<_, i32>(
                r#"
                SELECT prenda_uniforme_id FROM rubro_uniforme_detalles
                WHERE id = $1 AND rubro_id = $2 AND NOT es_eliminado
                "#,
            )
            .bind(detalle.rubro_uniforme_detalle_id)
            .bind(payload.rubro_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| {
                AppError::unprocessable(anyhow::anyhow!(
                    "El detalle {} no pertenece al rubro del pago",
                    detalle.rubro_uniforme_detalle_id
                ))
            })?;

            sqlx::query(
                r#"
                INSERT INTO pago_detalles (pago_id, rubro_uniforme_detalle_id, precio_unitario,
                                           cantidad, subtotal)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(pago_id)
            .bind(detalle.rubro_uniforme_detalle_id)
            .bind(detalle.precio_unitario)
            .bind(detalle.cantidad)
            .bind(detalle.subtotal)
            .execute(&mut *tx)
            .await
            .map_err(AppError::database)?;

            sqlx::query("UPDATE prendas_uniforme SET salidas = salidas + $1 WHERE id = $2")
                .bind(detalle.cantidad)
                .bind(prenda_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::database)?;
        }
    }

    tx.commit().await.map_err(AppError::database)?;

    info!(pago_id, alumno_id = payload.alumno_id, "Payment registered");
    get_pago(db, pago_id).await
}

pub async fn anular_pago(
    db: &PgPool,
    id: i32,
    payload: AnularPagoRequest,
    usuario_id: i32,
) -> Result<PagoConDetalles, AppError> {
    let mut tx = db.begin().await.map_err(AppError::database)?;

    let pago = sqlx::query_as::<_, Pago>(&format!(
        "SELECT {PAGO_COLUMNS} FROM pagos WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Pago {} no encontrado", id)))?;

    if pago.es_anulado {
        return Err(AppError::conflict(anyhow::anyhow!(
            "El pago {} ya está anulado",
            id
        )));
    }

    sqlx::query(
        r#"
        UPDATE pagos
        SET es_anulado = TRUE, motivo_anulacion = $1, fecha_anulacion = NOW(),
            usuario_anulacion_id = $2
        WHERE id = $3
        "#,
    )
    .bind(&payload.motivo)
    .bind(usuario_id)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(AppError::database)?;

    // A voided uniform sale returns the garments to stock.
    if pago.es_pago_de_uniforme {
        sqlx::query(
            r#"
            UPDATE prendas_uniforme pu
            SET salidas = pu.salidas - pd.cantidad
            FROM pago_detalles pd
            JOIN rubro_uniforme_detalles rud ON rud.id = pd.rubro_uniforme_detalle_id
            WHERE pd.pago_id = $1 AND pu.id = rud.prenda_uniforme_id
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::database)?;
    }

    tx.commit().await.map_err(AppError::database)?;

    info!(pago_id = id, usuario_id, "Payment voided");
    get_pago(db, id).await
}

pub async fn reporte_mensual(
    db: &PgPool,
    params: &ReporteMensualParams,
) -> Result<ReporteMensual, AppError> {
    let mut items = sqlx::query_as::<_, ReporteMensualItem>(
        r#"
        SELECT p.id AS pago_id, p.alumno_id,
               TRIM(CONCAT_WS(' ', a.primer_nombre, a.segundo_nombre,
                              a.primer_apellido, a.segundo_apellido)) AS nombre_completo,
               g.nombre AS grado, n.nombre AS nivel_educativo, a.seccion,
               p.rubro_id, r.descripcion AS rubro_descripcion,
               p.fecha, p.monto, p.medio_pago, p.es_anulado, p.motivo_anulacion
        FROM pagos p
        JOIN alumnos a ON a.id = p.alumno_id
        JOIN grados g ON g.id = a.grado_id
        JOIN niveles_educativos n ON n.id = g.nivel_educativo_id
        JOIN rubros r ON r.id = p.rubro_id
        WHERE p.ciclo_escolar = $1
          AND EXTRACT(MONTH FROM p.fecha)::INTEGER = $2
          AND EXTRACT(YEAR FROM p.fecha)::INTEGER = $3
          AND ($4::INTEGER IS NULL OR a.grado_id = $4)
          AND ($5::TEXT IS NULL OR a.seccion = $5)
          AND ($6::INTEGER IS NULL OR p.rubro_id = $6)
        ORDER BY p.fecha, p.id
        "#,
    )
    .bind(params.ciclo_escolar)
    .bind(params.mes)
    .bind(params.anio)
    .bind(params.grado_id)
    .bind(&params.seccion)
    .bind(params.rubro_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)?;

    let dias = dias_del_mes(params.anio, params.mes as u32);
    for item in &mut items {
        let dia = item.fecha.day();
        item.dia_del_mes = dia as i32;
        item.semana_del_mes = semana_del_mes(dia);
        item.rango_semana = rango_semana(item.semana_del_mes, dias);
    }

    Ok(agregar_reporte(params, items))
}

/// Builds the aggregate section. Voided payments are listed but excluded from
/// every total.
fn agregar_reporte(params: &ReporteMensualParams, items: Vec<ReporteMensualItem>) -> ReporteMensual {
    use std::collections::BTreeMap;

    let mut por_rubro: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    let mut por_grado: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    let mut total_general = Decimal::ZERO;
    let mut cantidad_anulados = 0i64;

    for item in &items {
        if item.es_anulado {
            cantidad_anulados += 1;
            continue;
        }
        total_general += item.monto;

        let rubro = por_rubro.entry(item.rubro_descripcion.clone()).or_default();
        rubro.0 += item.monto;
        rubro.1 += 1;

        let grado = por_grado.entry(item.grado.clone()).or_default();
        grado.0 += item.monto;
        grado.1 += 1;
    }

    let a_totales = |mapa: BTreeMap<String, (Decimal, i64)>| {
        mapa.into_iter()
            .map(|(clave, (total, cantidad))| TotalPorClave {
                clave,
                total,
                cantidad,
            })
            .collect()
    };

    let cantidad_pagos = items.len() as i64;

    ReporteMensual {
        ciclo_escolar: params.ciclo_escolar,
        mes: params.mes,
        anio: params.anio,
        items,
        totales_por_rubro: a_totales(por_rubro),
        totales_por_grado: a_totales(por_grado),
        total_general,
        cantidad_pagos,
        cantidad_anulados,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::pagos::model::MedioPago;
    use chrono::TimeZone;

    #[test]
    fn week_of_month_boundaries() {
        assert_eq!(semana_del_mes(1), 1);
        assert_eq!(semana_del_mes(7), 1);
        assert_eq!(semana_del_mes(8), 2);
        assert_eq!(semana_del_mes(28), 4);
        assert_eq!(semana_del_mes(29), 5);
        assert_eq!(semana_del_mes(31), 5);
    }

    #[test]
    fn week_range_clamps_to_month_end() {
        assert_eq!(rango_semana(1, 31), "1-7");
        assert_eq!(rango_semana(4, 31), "22-28");
        assert_eq!(rango_semana(5, 31), "29-31");
        assert_eq!(rango_semana(5, 30), "29-30");
        assert_eq!(rango_semana(4, 28), "22-28");
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(dias_del_mes(2024, 2), 29);
        assert_eq!(dias_del_mes(2025, 2), 28);
        assert_eq!(dias_del_mes(2025, 12), 31);
    }

    fn item(monto: i64, rubro: &str, grado: &str, anulado: bool) -> ReporteMensualItem {
        ReporteMensualItem {
            pago_id: 1,
            alumno_id: 1,
            nombre_completo: "Ana Pérez".to_string(),
            grado: grado.to_string(),
            nivel_educativo: "Primaria".to_string(),
            seccion: None,
            rubro_id: 1,
            rubro_descripcion: rubro.to_string(),
            fecha: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
            monto: Decimal::from(monto),
            medio_pago: MedioPago::Efectivo,
            es_anulado: anulado,
            motivo_anulacion: None,
            semana_del_mes: 2,
            rango_semana: "8-14".to_string(),
            dia_del_mes: 10,
        }
    }

    fn params() -> ReporteMensualParams {
        ReporteMensualParams {
            ciclo_escolar: 2025,
            mes: 3,
            anio: 2025,
            grado_id: None,
            seccion: None,
            rubro_id: None,
        }
    }

    #[test]
    fn voided_payments_are_listed_but_excluded_from_totals() {
        let reporte = agregar_reporte(
            &params(),
            vec![
                item(100, "Colegiatura", "Primero", false),
                item(50, "Colegiatura", "Primero", true),
                item(200, "Transporte", "Segundo", false),
            ],
        );

        assert_eq!(reporte.items.len(), 3);
        assert_eq!(reporte.total_general, Decimal::from(300));
        assert_eq!(reporte.cantidad_pagos, 3);
        assert_eq!(reporte.cantidad_anulados, 1);

        let colegiatura = reporte
            .totales_por_rubro
            .iter()
            .find(|t| t.clave == "Colegiatura")
            .unwrap();
        assert_eq!(colegiatura.total, Decimal::from(100));
        assert_eq!(colegiatura.cantidad, 1);
    }

    #[test]
    fn totals_group_by_grado() {
        let reporte = agregar_reporte(
            &params(),
            vec![
                item(100, "Colegiatura", "Primero", false),
                item(150, "Colegiatura", "Primero", false),
                item(200, "Colegiatura", "Segundo", false),
            ],
        );

        let primero = reporte
            .totales_por_grado
            .iter()
            .find(|t| t.clave == "Primero")
            .unwrap();
        assert_eq!(primero.total, Decimal::from(250));
        assert_eq!(primero.cantidad, 2);
    }
}
