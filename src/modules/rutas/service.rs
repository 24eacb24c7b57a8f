use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::modules::rubros::model::TipoRubro;
use crate::utils::errors::AppError;

use super::model::{
    AlumnoRuta, AsignacionActiva, ConteoPorClave, CreateAlumnoRutaRequest, DeudorTransporte,
    DeudoresParams, MesAdeudado, ReporteDeudores, ResumenDeudores, UpdateAlumnoRutaRequest,
};

const DIA_LIMITE_DEFAULT: i32 = 5;

async fn validate_rubro_transporte(db: &PgPool, rubro_id: i32) -> Result<(), AppError> {
    let tipo = sqlx::query_scalar::<_, TipoRubro>("SELECT tipo FROM rubros WHERE id = $1")
        .bind(rubro_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Rubro {} no encontrado", rubro_id)))?;

    if tipo != TipoRubro::Transporte {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "El rubro {} no es de tipo Transporte",
            rubro_id
        )));
    }
    Ok(())
}

fn validate_fechas(
    fecha_inicio: NaiveDate,
    fecha_fin: Option<NaiveDate>,
) -> Result<(), AppError> {
    if let Some(fin) = fecha_fin {
        if fin < fecha_inicio {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "La fecha fin no puede ser anterior a la fecha de inicio"
            )));
        }
    }
    Ok(())
}

pub async fn list_rutas_de_alumno(db: &PgPool, alumno_id: i32) -> Result<Vec<AlumnoRuta>, AppError> {
    sqlx::query_as::<_, AlumnoRuta>(
        r#"
        SELECT id, alumno_id, rubro_transporte_id, fecha_inicio, fecha_fin
        FROM alumno_rutas WHERE alumno_id = $1 ORDER BY fecha_inicio
        "#,
    )
    .bind(alumno_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_ruta(
    db: &PgPool,
    alumno_id: i32,
    rubro_transporte_id: i32,
) -> Result<AlumnoRuta, AppError> {
    sqlx::query_as::<_, AlumnoRuta>(
        r#"
        SELECT id, alumno_id, rubro_transporte_id, fecha_inicio, fecha_fin
        FROM alumno_rutas WHERE alumno_id = $1 AND rubro_transporte_id = $2
        "#,
    )
    .bind(alumno_id)
    .bind(rubro_transporte_id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| {
        AppError::not_found(anyhow::anyhow!(
            "El alumno {} no está asignado a la ruta {}",
            alumno_id,
            rubro_transporte_id
        ))
    })
}

pub async fn create_ruta(
    db: &PgPool,
    payload: CreateAlumnoRutaRequest,
) -> Result<AlumnoRuta, AppError> {
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

    validate_rubro_transporte(db, payload.rubro_transporte_id).await?;
    validate_fechas(payload.fecha_inicio, payload.fecha_fin)?;

    let ruta = sqlx::query_as::<_, AlumnoRuta>(
        r#"
        INSERT INTO alumno_rutas (alumno_id, rubro_transporte_id, fecha_inicio, fecha_fin)
        VALUES ($1, $2, $3, $4)
        RETURNING id, alumno_id, rubro_transporte_id, fecha_inicio, fecha_fin
        "#,
    )
    .bind(payload.alumno_id)
    .bind(payload.rubro_transporte_id)
    .bind(payload.fecha_inicio)
    .bind(payload.fecha_fin)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow::anyhow!("El alumno ya está asignado a esta ruta"),
        ),
        _ => AppError::database(e),
    })?;

    info!(
        alumno_id = payload.alumno_id,
        rubro_id = payload.rubro_transporte_id,
        "Transport route assigned"
    );
    Ok(ruta)
}

pub async fn update_ruta(
    db: &PgPool,
    alumno_id: i32,
    rubro_transporte_id: i32,
    payload: UpdateAlumnoRutaRequest,
) -> Result<AlumnoRuta, AppError> {
    validate_fechas(payload.fecha_inicio, payload.fecha_fin)?;

    sqlx::query_as::<_, AlumnoRuta>(
        r#"
        UPDATE alumno_rutas SET fecha_inicio = $1, fecha_fin = $2
        WHERE alumno_id = $3 AND rubro_transporte_id = $4
        RETURNING id, alumno_id, rubro_transporte_id, fecha_inicio, fecha_fin
        "#,
    )
    .bind(payload.fecha_inicio)
    .bind(payload.fecha_fin)
    .bind(alumno_id)
    .bind(rubro_transporte_id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| {
        AppError::not_found(anyhow::anyhow!(
            "El alumno {} no está asignado a la ruta {}",
            alumno_id,
            rubro_transporte_id
        ))
    })
}

pub async fn delete_ruta(
    db: &PgPool,
    alumno_id: i32,
    rubro_transporte_id: i32,
) -> Result<(), AppError> {
    let result =
        sqlx::query("DELETE FROM alumno_rutas WHERE alumno_id = $1 AND rubro_transporte_id = $2")
            .bind(alumno_id)
            .bind(rubro_transporte_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "El alumno {} no está asignado a la ruta {}",
            alumno_id,
            rubro_transporte_id
        )));
    }
    Ok(())
}

// Debtor report

pub async fn reporte_deudores(
    db: &PgPool,
    params: &DeudoresParams,
) -> Result<ReporteDeudores, AppError> {
    if !(1..=12).contains(&params.mes) {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "El mes debe estar entre 1 y 12"
        )));
    }

    let corte = fin_de_mes(params.anio, params.mes as u32);

    let asignaciones = sqlx::query_as::<_, AsignacionActiva>(
        r#"
        SELECT ar.alumno_id, a.codigo,
               TRIM(CONCAT_WS(' ', a.primer_nombre, a.segundo_nombre,
                              a.primer_apellido, a.segundo_apellido)) AS nombre_completo,
               g.nombre AS grado, s.nombre AS sede,
               r.id AS rubro_id, r.descripcion AS ruta,
               r.monto_preestablecido, r.dia_limite_pago,
               ar.fecha_inicio, ar.fecha_fin
        FROM alumno_rutas ar
        JOIN alumnos a ON a.id = ar.alumno_id
        JOIN grados g ON g.id = a.grado_id
        JOIN sedes s ON s.id = a.sede_id
        JOIN rubros r ON r.id = ar.rubro_transporte_id
        WHERE a.estado = 'activo'
          AND (ar.fecha_fin IS NULL OR ar.fecha_fin >= $1)
          AND ($2::INTEGER IS NULL OR r.id = $2)
          AND ($3::INTEGER IS NULL OR a.sede_id = $3)
          AND ($4::INTEGER IS NULL OR a.grado_id = $4)
        "#,
    )
    .bind(corte)
    .bind(params.rubro_id)
    .bind(params.sede_id)
    .bind(params.grado_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)?;

    let pagos: Vec<(i32, i32, i32, i32)> = sqlx::query_as(
        r#"
        SELECT alumno_id, rubro_id, anio_colegiatura, mes_colegiatura
        FROM pagos
        WHERE es_pago_de_transporte AND NOT es_anulado
          AND anio_colegiatura = $1
          AND mes_colegiatura IS NOT NULL
        "#,
    )
    .bind(params.anio)
    .fetch_all(db)
    .await
    .map_err(AppError::database)?;

    let pagados: HashSet<(i32, i32, i32, i32)> = pagos.into_iter().collect();

    Ok(calcular_deudores(
        params,
        asignaciones,
        &pagados,
        Utc::now().date_naive(),
    ))
}

fn fin_de_mes(anio: i32, mes: u32) -> NaiveDate {
    let (siguiente_anio, siguiente_mes) = if mes == 12 { (anio + 1, 1) } else { (anio, mes + 1) };
    NaiveDate::from_ymd_opt(siguiente_anio, siguiente_mes, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(anio, mes, 28).unwrap_or_default())
}

fn fecha_limite(anio: i32, mes: i32, dia_limite: i32) -> NaiveDate {
    let ultimo = fin_de_mes(anio, mes as u32);
    let dia = (dia_limite as u32).min(ultimo.day());
    NaiveDate::from_ymd_opt(anio, mes as u32, dia).unwrap_or(ultimo)
}

/// Pure debt arithmetic over pre-fetched assignments and payment keys.
///
/// Owed months run from max(assignment start, January of the report year)
/// through the as-of month; the as-of month only counts once its due day has
/// passed and `incluir_mes_actual` is on.
fn calcular_deudores(
    params: &DeudoresParams,
    asignaciones: Vec<AsignacionActiva>,
    pagados: &HashSet<(i32, i32, i32, i32)>,
    hoy: NaiveDate,
) -> ReporteDeudores {
    let incluir_mes_actual = params.incluir_mes_actual.unwrap_or(true);
    let min_meses = params.min_meses.unwrap_or(1).max(1);
    let min_deuda = params.min_deuda.unwrap_or(Decimal::ZERO);

    let mut deudores = Vec::new();

    for asignacion in asignaciones {
        let dia_limite = asignacion.dia_limite_pago.unwrap_or(DIA_LIMITE_DEFAULT);

        let primer_mes = if asignacion.fecha_inicio.year() < params.anio {
            1
        } else if asignacion.fecha_inicio.year() > params.anio {
            continue;
        } else {
            asignacion.fecha_inicio.month() as i32
        };

        let mut meses_adeudados = Vec::new();

        for mes in primer_mes..=params.mes {
            if let Some(fin) = asignacion.fecha_fin {
                if fin < NaiveDate::from_ymd_opt(params.anio, mes as u32, 1).unwrap_or(fin) {
                    break;
                }
            }

            let limite = fecha_limite(params.anio, mes, dia_limite);
            if mes == params.mes {
                if !incluir_mes_actual || hoy <= limite {
                    continue;
                }
            }

            if pagados.contains(&(asignacion.alumno_id, asignacion.rubro_id, params.anio, mes)) {
                continue;
            }

            let dias_atraso = (hoy - limite).num_days().max(0);
            meses_adeudados.push(MesAdeudado {
                anio: params.anio,
                mes,
                monto: asignacion.monto_preestablecido.unwrap_or(Decimal::ZERO),
                dias_atraso,
            });
        }

        if meses_adeudados.is_empty() {
            continue;
        }

        let total_deuda: Decimal = meses_adeudados.iter().map(|m| m.monto).sum();
        let meses_atraso = meses_adeudados.len() as i32;

        if meses_atraso < min_meses || total_deuda < min_deuda {
            continue;
        }

        deudores.push(DeudorTransporte {
            alumno_id: asignacion.alumno_id,
            codigo: asignacion.codigo,
            nombre_completo: asignacion.nombre_completo,
            grado: asignacion.grado,
            sede: asignacion.sede,
            rubro_id: asignacion.rubro_id,
            ruta: asignacion.ruta,
            meses_adeudados,
            meses_atraso,
            total_deuda,
        });
    }

    deudores.sort_by(|a, b| {
        b.meses_atraso
            .cmp(&a.meses_atraso)
            .then(b.total_deuda.cmp(&a.total_deuda))
    });

    let resumen = resumir(&deudores);

    ReporteDeudores {
        anio: params.anio,
        mes: params.mes,
        deudores,
        resumen,
    }
}

fn resumir(deudores: &[DeudorTransporte]) -> ResumenDeudores {
    let total_deudores = deudores.len() as i64;
    let deuda_total: Decimal = deudores.iter().map(|d| d.total_deuda).sum();
    let promedio_deuda = if total_deudores > 0 {
        deuda_total / Decimal::from(total_deudores)
    } else {
        Decimal::ZERO
    };

    let mut con_un_mes = 0i64;
    let mut con_dos_meses = 0i64;
    let mut con_tres_o_mas = 0i64;
    let mut por_grado: BTreeMap<String, i64> = BTreeMap::new();
    let mut por_sede: BTreeMap<String, i64> = BTreeMap::new();
    let mut por_ruta: BTreeMap<String, i64> = BTreeMap::new();

    for deudor in deudores {
        match deudor.meses_atraso {
            1 => con_un_mes += 1,
            2 => con_dos_meses += 1,
            _ => con_tres_o_mas += 1,
        }
        *por_grado.entry(deudor.grado.clone()).or_default() += 1;
        *por_sede.entry(deudor.sede.clone()).or_default() += 1;
        *por_ruta.entry(deudor.ruta.clone()).or_default() += 1;
    }

    let a_conteos = |mapa: BTreeMap<String, i64>| {
        mapa.into_iter()
            .map(|(clave, cantidad)| ConteoPorClave { clave, cantidad })
            .collect()
    };

    ResumenDeudores {
        total_deudores,
        deuda_total,
        promedio_deuda,
        con_un_mes,
        con_dos_meses,
        con_tres_o_mas,
        por_grado: a_conteos(por_grado),
        por_sede: a_conteos(por_sede),
        por_ruta: a_conteos(por_ruta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asignacion(alumno_id: i32, inicio: NaiveDate, fin: Option<NaiveDate>) -> AsignacionActiva {
        AsignacionActiva {
            alumno_id,
            codigo: format!("A{:03}", alumno_id),
            nombre_completo: "Ana Pérez".to_string(),
            grado: "Primero".to_string(),
            sede: "Central".to_string(),
            rubro_id: 9,
            ruta: "Ruta norte".to_string(),
            monto_preestablecido: Some(Decimal::from(150)),
            dia_limite_pago: Some(5),
            fecha_inicio: inicio,
            fecha_fin: fin,
        }
    }

    fn params(anio: i32, mes: i32) -> DeudoresParams {
        DeudoresParams {
            anio,
            mes,
            rubro_id: None,
            sede_id: None,
            grado_id: None,
            min_meses: None,
            min_deuda: None,
            incluir_mes_actual: None,
        }
    }

    fn dia(anio: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(anio, mes, dia).unwrap()
    }

    #[test]
    fn debtor_owes_every_unpaid_month_since_assignment() {
        let reporte = calcular_deudores(
            &params(2025, 4),
            vec![asignacion(1, dia(2025, 1, 10), None)],
            &HashSet::new(),
            dia(2025, 4, 20),
        );

        assert_eq!(reporte.deudores.len(), 1);
        let deudor = &reporte.deudores[0];
        assert_eq!(deudor.meses_atraso, 4);
        assert_eq!(deudor.total_deuda, Decimal::from(600));
    }

    #[test]
    fn paid_months_are_covered() {
        let mut pagados = HashSet::new();
        pagados.insert((1, 9, 2025, 1));
        pagados.insert((1, 9, 2025, 2));

        let reporte = calcular_deudores(
            &params(2025, 3),
            vec![asignacion(1, dia(2025, 1, 1), None)],
            &pagados,
            dia(2025, 3, 20),
        );

        let deudor = &reporte.deudores[0];
        assert_eq!(deudor.meses_atraso, 1);
        assert_eq!(deudor.meses_adeudados[0].mes, 3);
    }

    #[test]
    fn fully_paid_student_is_not_a_debtor() {
        let mut pagados = HashSet::new();
        pagados.insert((1, 9, 2025, 1));
        pagados.insert((1, 9, 2025, 2));

        let reporte = calcular_deudores(
            &params(2025, 2),
            vec![asignacion(1, dia(2025, 1, 1), None)],
            &pagados,
            dia(2025, 2, 20),
        );

        assert!(reporte.deudores.is_empty());
    }

    #[test]
    fn current_month_waits_for_due_day() {
        // Due day is the 5th; on the 3rd the month is not yet owed.
        let reporte = calcular_deudores(
            &params(2025, 3),
            vec![asignacion(1, dia(2025, 3, 1), None)],
            &HashSet::new(),
            dia(2025, 3, 3),
        );
        assert!(reporte.deudores.is_empty());

        let reporte = calcular_deudores(
            &params(2025, 3),
            vec![asignacion(1, dia(2025, 3, 1), None)],
            &HashSet::new(),
            dia(2025, 3, 6),
        );
        assert_eq!(reporte.deudores.len(), 1);
    }

    #[test]
    fn excluding_current_month_drops_it() {
        let mut p = params(2025, 3);
        p.incluir_mes_actual = Some(false);

        let reporte = calcular_deudores(
            &p,
            vec![asignacion(1, dia(2025, 1, 1), None)],
            &HashSet::new(),
            dia(2025, 3, 20),
        );

        let deudor = &reporte.deudores[0];
        assert_eq!(deudor.meses_atraso, 2);
        assert!(deudor.meses_adeudados.iter().all(|m| m.mes != 3));
    }

    #[test]
    fn assignment_starting_mid_year_owes_from_its_start() {
        let reporte = calcular_deudores(
            &params(2025, 5),
            vec![asignacion(1, dia(2025, 3, 1), None)],
            &HashSet::new(),
            dia(2025, 5, 20),
        );

        let deudor = &reporte.deudores[0];
        assert_eq!(deudor.meses_atraso, 3);
        assert_eq!(deudor.meses_adeudados[0].mes, 3);
    }

    #[test]
    fn assignment_from_previous_year_owes_from_january() {
        let reporte = calcular_deudores(
            &params(2025, 2),
            vec![asignacion(1, dia(2024, 8, 1), None)],
            &HashSet::new(),
            dia(2025, 2, 20),
        );

        let deudor = &reporte.deudores[0];
        assert_eq!(deudor.meses_adeudados[0].mes, 1);
        assert_eq!(deudor.meses_atraso, 2);
    }

    #[test]
    fn min_meses_filters_small_debtors() {
        let mut p = params(2025, 4);
        p.min_meses = Some(3);
        let mut pagados = HashSet::new();
        pagados.insert((1, 9, 2025, 1));
        pagados.insert((1, 9, 2025, 2));

        let reporte = calcular_deudores(
            &p,
            vec![asignacion(1, dia(2025, 1, 1), None)],
            &pagados,
            dia(2025, 4, 20),
        );
        assert!(reporte.deudores.is_empty());
    }

    #[test]
    fn missing_preset_amount_counts_months_with_zero_debt() {
        let mut a = asignacion(1, dia(2025, 1, 1), None);
        a.monto_preestablecido = None;

        let reporte = calcular_deudores(&params(2025, 2), vec![a], &HashSet::new(), dia(2025, 2, 20));

        let deudor = &reporte.deudores[0];
        assert_eq!(deudor.meses_atraso, 2);
        assert_eq!(deudor.total_deuda, Decimal::ZERO);
    }

    #[test]
    fn summary_buckets_by_months_behind() {
        let mut pagados = HashSet::new();
        pagados.insert((2, 9, 2025, 1));
        pagados.insert((2, 9, 2025, 2));

        let reporte = calcular_deudores(
            &params(2025, 3),
            vec![
                asignacion(1, dia(2025, 1, 1), None),
                asignacion(2, dia(2025, 1, 1), None),
            ],
            &pagados,
            dia(2025, 3, 20),
        );

        assert_eq!(reporte.resumen.total_deudores, 2);
        assert_eq!(reporte.resumen.con_un_mes, 1);
        assert_eq!(reporte.resumen.con_tres_o_mas, 1);
        assert_eq!(reporte.resumen.deuda_total, Decimal::from(600));
        assert_eq!(reporte.resumen.promedio_deuda, Decimal::from(300));
    }
}
