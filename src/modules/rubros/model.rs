use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Fee categories. Stored as their integer discriminant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[repr(i32)]
pub enum TipoRubro {
    Colegiatura = 0,
    Inscripcion = 1,
    Material = 2,
    Uniformes = 3,
    Laboratorio = 4,
    CuotaUnica = 5,
    Utiles = 6,
    Libros = 7,
    Transporte = 8,
    Otros = 9,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Rubro {
    pub id: i32,
    pub descripcion: String,
    pub tipo: TipoRubro,
    #[schema(value_type = Option<f64>)]
    pub penalizacion_por_mora: Option<Decimal>,
    pub fecha_limite_pago: Option<NaiveDate>,
    pub mes_colegiatura: Option<i32>,
    pub dia_limite_pago: Option<i32>,
    pub mes_limite_pago: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub monto_preestablecido: Option<Decimal>,
    pub activo: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RubroRequest {
    #[validate(length(min = 1, message = "La descripción del rubro es requerida"))]
    pub descripcion: String,
    pub tipo: TipoRubro,
    #[schema(value_type = Option<f64>)]
    pub penalizacion_por_mora: Option<Decimal>,
    pub fecha_limite_pago: Option<NaiveDate>,
    #[validate(range(min = 1, max = 12, message = "El mes de colegiatura debe estar entre 1 y 12"))]
    pub mes_colegiatura: Option<i32>,
    #[validate(range(min = 1, max = 31, message = "El día límite de pago debe estar entre 1 y 31"))]
    pub dia_limite_pago: Option<i32>,
    #[validate(range(min = 1, max = 12, message = "El mes límite de pago debe estar entre 1 y 12"))]
    pub mes_limite_pago: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub monto_preestablecido: Option<Decimal>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

/// Link between a uniform fee and a sellable garment.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RubroUniformeDetalle {
    pub id: i32,
    pub rubro_id: i32,
    pub prenda_uniforme_id: i32,
    pub prenda_descripcion: String,
    pub talla: String,
    pub sexo: String,
    #[schema(value_type = f64)]
    pub precio: Decimal,
    pub fecha_creacion: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RubroUniformeDetalleRequest {
    pub prenda_uniforme_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EliminarDetalleRequest {
    #[validate(length(min = 1, message = "El motivo de eliminación es requerido"))]
    pub motivo: String,
}
