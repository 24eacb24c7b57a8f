use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Sede {
    pub id: i32,
    pub nombre: String,
    pub direccion: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SedeRequest {
    #[validate(length(min = 1, message = "El nombre de la sede es requerido"))]
    pub nombre: String,
    pub direccion: Option<String>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct NivelEducativo {
    pub id: i32,
    pub nombre: String,
    pub activo: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NivelEducativoRequest {
    #[validate(length(min = 1, message = "El nombre del nivel educativo es requerido"))]
    pub nombre: String,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Grado {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub nivel_educativo_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GradoRequest {
    #[validate(length(min = 1, message = "El nombre del grado es requerido"))]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub nivel_educativo_id: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GradoFilter {
    pub nivel_educativo_id: Option<i32>,
}
