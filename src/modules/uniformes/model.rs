use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PrendaUniforme {
    pub id: i32,
    pub descripcion: String,
    pub sexo: String,
    pub talla: String,
    #[schema(value_type = f64)]
    pub precio: Decimal,
    pub existencia_inicial: i32,
    pub entradas: i32,
    pub salidas: i32,
    /// existencia_inicial + entradas - salidas.
    pub existencia_actual: i32,
    pub notas: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PrendaUniformeRequest {
    #[validate(length(min = 1, message = "La descripción de la prenda es requerida"))]
    pub descripcion: String,
    #[validate(custom(function = "validate_sexo"))]
    pub sexo: String,
    #[validate(length(min = 1, message = "La talla es requerida"))]
    pub talla: String,
    #[schema(value_type = f64)]
    pub precio: Decimal,
    #[validate(range(min = 0, message = "La existencia inicial no puede ser negativa"))]
    #[serde(default)]
    pub existencia_inicial: i32,
    pub notas: Option<String>,
}

fn validate_sexo(sexo: &str) -> Result<(), validator::ValidationError> {
    match sexo {
        "M" | "F" | "Unisex" => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("sexo");
            err.message = Some("El sexo debe ser M, F o Unisex".into());
            Err(err)
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EliminarPrendaRequest {
    #[validate(length(min = 1, message = "El motivo de eliminación es requerido"))]
    pub motivo: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct EntradaUniforme {
    pub id: i32,
    pub fecha_entrada: DateTime<Utc>,
    pub notas: Option<String>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub fecha_creacion: DateTime<Utc>,
    pub usuario_creacion_id: Option<i32>,
    pub es_eliminado: bool,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct EntradaUniformeDetalle {
    pub id: i32,
    pub entrada_uniforme_id: i32,
    pub prenda_uniforme_id: i32,
    pub prenda_descripcion: String,
    pub cantidad: i32,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntradaConDetalles {
    #[serde(flatten)]
    pub entrada: EntradaUniforme,
    pub detalles: Vec<EntradaUniformeDetalle>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct EntradaDetalleRequest {
    pub prenda_uniforme_id: i32,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a cero"))]
    pub cantidad: i32,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EntradaUniformeRequest {
    /// Defaults to now when omitted.
    pub fecha_entrada: Option<DateTime<Utc>>,
    pub notas: Option<String>,
    #[validate(nested, length(min = 1, message = "La entrada requiere al menos un detalle"))]
    pub detalles: Vec<EntradaDetalleRequest>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EliminarEntradaRequest {
    #[validate(length(min = 1, message = "El motivo de eliminación es requerido"))]
    pub motivo: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EntradaFilter {
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
    pub usuario_creacion_id: Option<i32>,
}
