pub mod alumnos;
pub mod auth;
pub mod catalogos;
pub mod pagos;
pub mod qr;
pub mod rubros;
pub mod rutas;
pub mod uniformes;
pub mod usuarios;
