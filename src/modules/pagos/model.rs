use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Payment methods. Stored as their integer discriminant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[repr(i32)]
pub enum MedioPago {
    Efectivo = 1,
    TarjetaCredito = 2,
    TarjetaDebito = 3,
    TransferenciaBancaria = 4,
    Cheque = 5,
    BoletaDeposito = 6,
    PagoMovil = 7,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Pago {
    pub id: i32,
    pub alumno_id: i32,
    pub rubro_id: i32,
    pub ciclo_escolar: i32,
    pub fecha: DateTime<Utc>,
    #[schema(value_type = f64)]
    pub monto: Decimal,
    pub medio_pago: MedioPago,
    pub notas: Option<String>,
    pub es_colegiatura: bool,
    pub mes_colegiatura: Option<i32>,
    pub anio_colegiatura: Option<i32>,
    pub es_pago_de_carnet: bool,
    pub estado_carnet: Option<String>,
    pub es_pago_de_transporte: bool,
    pub es_pago_de_uniforme: bool,
    pub es_anulado: bool,
    pub motivo_anulacion: Option<String>,
    pub fecha_anulacion: Option<DateTime<Utc>>,
    pub usuario_anulacion_id: Option<i32>,
    pub fecha_creacion: DateTime<Utc>,
    pub usuario_creacion_id: Option<i32>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PagoDetalle {
    pub id: i32,
    pub pago_id: i32,
    pub rubro_uniforme_detalle_id: i32,
    pub prenda_descripcion: String,
    #[schema(value_type = f64)]
    pub precio_unitario: Decimal,
    pub cantidad: i32,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagoConDetalles {
    #[serde(flatten)]
    pub pago: Pago,
    pub detalles: Vec<PagoDetalle>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePagoDetalleRequest {
    pub rubro_uniforme_detalle_id: i32,
    #[schema(value_type = f64)]
    pub precio_unitario: Decimal,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a cero"))]
    pub cantidad: i32,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePagoRequest {
    pub alumno_id: i32,
    pub rubro_id: i32,
    #[validate(range(min = 2000, max = 2100, message = "El ciclo escolar no es válido"))]
    pub ciclo_escolar: i32,
    /// Defaults to now when omitted.
    pub fecha: Option<DateTime<Utc>>,
    #[schema(value_type = f64)]
    pub monto: Decimal,
    pub medio_pago: MedioPago,
    pub notas: Option<String>,
    #[validate(range(min = 1, max = 12, message = "El mes de colegiatura debe estar entre 1 y 12"))]
    pub mes_colegiatura: Option<i32>,
    pub anio_colegiatura: Option<i32>,
    #[serde(default)]
    pub es_pago_de_carnet: bool,
    pub estado_carnet: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub detalles: Vec<CreatePagoDetalleRequest>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnularPagoRequest {
    #[validate(length(min = 1, message = "El motivo de anulación es requerido"))]
    pub motivo: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PagoFilter {
    pub ciclo_escolar: Option<i32>,
    pub rubro_id: Option<i32>,
    pub grado_id: Option<i32>,
    /// Calendar month (1-12) of the payment date.
    pub mes: Option<i32>,
}

// Monthly report

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ReporteMensualParams {
    pub ciclo_escolar: i32,
    #[validate(range(min = 1, max = 12, message = "El mes debe estar entre 1 y 12"))]
    pub mes: i32,
    pub anio: i32,
    pub grado_id: Option<i32>,
    pub seccion: Option<String>,
    pub rubro_id: Option<i32>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ReporteMensualItem {
    pub pago_id: i32,
    pub alumno_id: i32,
    pub nombre_completo: String,
    pub grado: String,
    pub nivel_educativo: String,
    pub seccion: Option<String>,
    pub rubro_id: i32,
    pub rubro_descripcion: String,
    pub fecha: DateTime<Utc>,
    #[schema(value_type = f64)]
    pub monto: Decimal,
    pub medio_pago: MedioPago,
    pub es_anulado: bool,
    pub motivo_anulacion: Option<String>,
    #[sqlx(skip)]
    pub semana_del_mes: i32,
    #[sqlx(skip)]
    pub rango_semana: String,
    #[sqlx(skip)]
    pub dia_del_mes: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalPorClave {
    pub clave: String,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub cantidad: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReporteMensual {
    pub ciclo_escolar: i32,
    pub mes: i32,
    pub anio: i32,
    pub items: Vec<ReporteMensualItem>,
    pub totales_por_rubro: Vec<TotalPorClave>,
    pub totales_por_grado: Vec<TotalPorClave>,
    #[schema(value_type = f64)]
    pub total_general: Decimal,
    pub cantidad_pagos: i64,
    pub cantidad_anulados: i64,
}
