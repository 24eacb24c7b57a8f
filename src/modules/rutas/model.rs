use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AlumnoRuta {
    pub id: i32,
    pub alumno_id: i32,
    pub rubro_transporte_id: i32,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlumnoRutaRequest {
    pub alumno_id: i32,
    pub rubro_transporte_id: i32,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAlumnoRutaRequest {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeudoresParams {
    pub anio: i32,
    /// As-of month (1-12).
    pub mes: i32,
    pub rubro_id: Option<i32>,
    pub sede_id: Option<i32>,
    pub grado_id: Option<i32>,
    /// Minimum months behind to be listed (default 1).
    pub min_meses: Option<i32>,
    /// Minimum accumulated debt to be listed (default 0).
    #[param(value_type = Option<f64>)]
    pub min_deuda: Option<Decimal>,
    /// Whether the as-of month itself counts once its due day has passed
    /// (default true).
    pub incluir_mes_actual: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MesAdeudado {
    pub anio: i32,
    pub mes: i32,
    #[schema(value_type = f64)]
    pub monto: Decimal,
    pub dias_atraso: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeudorTransporte {
    pub alumno_id: i32,
    pub codigo: String,
    pub nombre_completo: String,
    pub grado: String,
    pub sede: String,
    pub rubro_id: i32,
    pub ruta: String,
    pub meses_adeudados: Vec<MesAdeudado>,
    pub meses_atraso: i32,
    #[schema(value_type = f64)]
    pub total_deuda: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConteoPorClave {
    pub clave: String,
    pub cantidad: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResumenDeudores {
    pub total_deudores: i64,
    #[schema(value_type = f64)]
    pub deuda_total: Decimal,
    #[schema(value_type = f64)]
    pub promedio_deuda: Decimal,
    pub con_un_mes: i64,
    pub con_dos_meses: i64,
    pub con_tres_o_mas: i64,
    pub por_grado: Vec<ConteoPorClave>,
    pub por_sede: Vec<ConteoPorClave>,
    pub por_ruta: Vec<ConteoPorClave>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReporteDeudores {
    pub anio: i32,
    pub mes: i32,
    pub deudores: Vec<DeudorTransporte>,
    pub resumen: ResumenDeudores,
}

/// Active assignment joined with the route fee and student, the raw material of
/// the debtor report.
#[derive(Debug, Clone, FromRow)]
pub struct AsignacionActiva {
    pub alumno_id: i32,
    pub codigo: String,
    pub nombre_completo: String,
    pub grado: String,
    pub sede: String,
    pub rubro_id: i32,
    pub ruta: String,
    pub monto_preestablecido: Option<Decimal>,
    pub dia_limite_pago: Option<i32>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}
