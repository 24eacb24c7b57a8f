use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Rol {
    pub id: i32,
    pub nombre: String,
    pub es_admin: bool,
}

/// User record as exposed by the API. The password hash never leaves the
/// service layer.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Usuario {
    pub id: i32,
    pub codigo_usuario: String,
    pub nombres: String,
    pub apellidos: String,
    pub email: String,
    pub celular: Option<String>,
    pub estado: String,
    pub rol_id: i32,
    pub rol_nombre: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUsuarioRequest {
    #[validate(length(min = 3, message = "El código de usuario debe tener al menos 3 caracteres"))]
    pub codigo_usuario: String,
    #[validate(length(min = 1, message = "Los nombres son requeridos"))]
    pub nombres: String,
    #[validate(length(min = 1, message = "Los apellidos son requeridos"))]
    pub apellidos: String,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
    pub celular: Option<String>,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: String,
    pub rol_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUsuarioRequest {
    #[validate(length(min = 1, message = "Los nombres son requeridos"))]
    pub nombres: String,
    #[validate(length(min = 1, message = "Los apellidos son requeridos"))]
    pub apellidos: String,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
    pub celular: Option<String>,
    #[validate(custom(function = "validate_estado"))]
    pub estado: String,
    pub rol_id: i32,
    /// When present, replaces the password.
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: Option<String>,
}

fn validate_estado(estado: &str) -> Result<(), validator::ValidationError> {
    match estado {
        "activo" | "inactivo" | "bloqueado" => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("estado");
            err.message = Some("El estado debe ser activo, inactivo o bloqueado".into());
            Err(err)
        }
    }
}
