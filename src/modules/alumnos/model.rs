use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Alumno {
    pub id: i32,
    pub codigo: String,
    pub primer_nombre: String,
    pub segundo_nombre: Option<String>,
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
    pub sede_id: i32,
    pub grado_id: i32,
    pub seccion: Option<String>,
    pub becado: Option<bool>,
    #[schema(value_type = Option<f64>)]
    pub beca_parcial_porcentaje: Option<Decimal>,
    pub estado: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AlumnoRequest {
    #[validate(length(min = 1, message = "El código del alumno es requerido"))]
    pub codigo: String,
    #[validate(length(min = 1, message = "El primer nombre es requerido"))]
    pub primer_nombre: String,
    pub segundo_nombre: Option<String>,
    #[validate(length(min = 1, message = "El primer apellido es requerido"))]
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
    pub sede_id: i32,
    pub grado_id: i32,
    pub seccion: Option<String>,
    pub becado: Option<bool>,
    #[schema(value_type = Option<f64>)]
    pub beca_parcial_porcentaje: Option<Decimal>,
    #[serde(default = "default_estado")]
    pub estado: String,
}

fn default_estado() -> String {
    "activo".to_string()
}

/// Compact entry for type-ahead pickers.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AlumnoListaItem {
    pub id: i32,
    pub codigo: String,
    pub nombre_completo: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BuscarAlumnoParams {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
}

/// Payment history line without uniform detalles.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PagoHistorialItem {
    pub id: i32,
    pub rubro_id: i32,
    pub rubro_descripcion: String,
    pub ciclo_escolar: i32,
    pub fecha: DateTime<Utc>,
    #[schema(value_type = f64)]
    pub monto: Decimal,
    pub medio_pago: i32,
    pub mes_colegiatura: Option<i32>,
    pub anio_colegiatura: Option<i32>,
    pub es_anulado: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlumnoConPagos {
    #[serde(flatten)]
    pub alumno: Alumno,
    pub pagos: Vec<PagoHistorialItem>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Contacto {
    pub id: i32,
    pub nombre: String,
    pub telefono_trabajo: Option<String>,
    pub celular: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub nit: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactoRequest {
    #[validate(length(min = 1, message = "El nombre del contacto es requerido"))]
    pub nombre: String,
    pub telefono_trabajo: Option<String>,
    pub celular: Option<String>,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub nit: Option<String>,
}

/// Contact together with its relationship to the student.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ContactoDeAlumno {
    pub id: i32,
    pub nombre: String,
    pub telefono_trabajo: Option<String>,
    pub celular: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub nit: Option<String>,
    pub parentesco: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VincularContactoRequest {
    #[validate(length(min = 1, message = "El parentesco es requerido"))]
    pub parentesco: String,
}
