use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CodigoQrPago {
    pub id: i32,
    pub token_unico: Uuid,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_expiracion: DateTime<Utc>,
    pub esta_usado: bool,
    pub pago_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerarQrRequest {
    pub pago_id: i32,
    /// Minutes until expiry. Defaults to one year.
    #[validate(range(min = 1, message = "Los minutos de expiración deben ser mayores a cero"))]
    pub minutos_expiracion: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerarQrResponse {
    pub token_unico: Uuid,
    pub pago_id: i32,
    pub fecha_expiracion: DateTime<Utc>,
    pub pago_info: String,
    /// Base64 PNG data URI of the QR image. The encoded content is the bare
    /// token.
    pub qr_imagen: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidarQrRequest {
    #[validate(length(min = 1, message = "El token es requerido"))]
    pub token: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct QrPagoInfo {
    pub pago_id: i32,
    pub alumno: String,
    pub rubro: String,
    #[schema(value_type = f64)]
    pub monto: Decimal,
    pub fecha: DateTime<Utc>,
    pub es_anulado: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidarQrResponse {
    pub valido: bool,
    pub mensaje: String,
    pub pago: Option<QrPagoInfo>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LimpiezaQrResponse {
    pub eliminados: u64,
}
