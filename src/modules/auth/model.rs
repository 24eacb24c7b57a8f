use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// JWT payload. `sub` carries the numeric user id as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub codigo_usuario: String,
    pub email: String,
    pub es_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El código de usuario es requerido"))]
    pub codigo_usuario: String,
    #[validate(length(min = 1, message = "La contraseña es requerida"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: UsuarioAutenticado,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsuarioAutenticado {
    pub id: i32,
    pub codigo_usuario: String,
    pub nombres: String,
    pub apellidos: String,
    pub email: String,
    pub rol: String,
    pub es_admin: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "El token es requerido"))]
    pub token: String,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub nueva_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub mensaje: String,
}
