use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::modules::alumnos;
use crate::modules::auth;
use crate::modules::catalogos;
use crate::modules::pagos;
use crate::modules::qr;
use crate::modules::rubros;
use crate::modules::rutas;
use crate::modules::uniformes;
use crate::modules::usuarios;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Colegio API",
        description = "Back office administrativo escolar: alumnos, rubros, pagos, rutas de transporte, inventario de uniformes y recibos QR.",
        version = env!("CARGO_PKG_VERSION")
    ),
    paths(
        auth::controller::login,
        auth::controller::forgot_password,
        auth::controller::reset_password,
        usuarios::controller::list_usuarios,
        usuarios::controller::get_usuario,
        usuarios::controller::create_usuario,
        usuarios::controller::update_usuario,
        usuarios::controller::delete_usuario,
        usuarios::controller::list_roles,
        catalogos::controller::list_sedes,
        catalogos::controller::get_sede,
        catalogos::controller::create_sede,
        catalogos::controller::update_sede,
        catalogos::controller::delete_sede,
        catalogos::controller::list_niveles,
        catalogos::controller::list_niveles_activos,
        catalogos::controller::get_nivel,
        catalogos::controller::create_nivel,
        catalogos::controller::update_nivel,
        catalogos::controller::delete_nivel,
        catalogos::controller::list_grados,
        catalogos::controller::get_grado,
        catalogos::controller::create_grado,
        catalogos::controller::update_grado,
        catalogos::controller::delete_grado,
        alumnos::controller::list_alumnos,
        alumnos::controller::lista_alumnos,
        alumnos::controller::buscar_alumnos,
        alumnos::controller::get_alumno_por_codigo,
        alumnos::controller::get_alumno,
        alumnos::controller::get_alumno_con_pagos,
        alumnos::controller::create_alumno,
        alumnos::controller::update_alumno,
        alumnos::controller::delete_alumno,
        alumnos::controller::contactos_de_alumno,
        alumnos::controller::vincular_contacto,
        alumnos::controller::desvincular_contacto,
        alumnos::controller::list_contactos,
        alumnos::controller::get_contacto,
        alumnos::controller::create_contacto,
        alumnos::controller::update_contacto,
        alumnos::controller::delete_contacto,
        rubros::controller::list_rubros,
        rubros::controller::list_rubros_activos,
        rubros::controller::get_rubro,
        rubros::controller::create_rubro,
        rubros::controller::update_rubro,
        rubros::controller::delete_rubro,
        rubros::controller::list_detalles,
        rubros::controller::create_detalle,
        rubros::controller::delete_detalle,
        pagos::controller::create_pago,
        pagos::controller::query_pagos,
        pagos::controller::reporte_mensual,
        pagos::controller::get_pago,
        pagos::controller::anular_pago,
        rutas::controller::list_rutas_de_alumno,
        rutas::controller::get_ruta,
        rutas::controller::create_ruta,
        rutas::controller::update_ruta,
        rutas::controller::delete_ruta,
        rutas::controller::reporte_deudores,
        uniformes::controller::list_prendas,
        uniformes::controller::get_prenda,
        uniformes::controller::create_prenda,
        uniformes::controller::update_prenda,
        uniformes::controller::delete_prenda,
        uniformes::controller::list_entradas,
        uniformes::controller::get_entrada,
        uniformes::controller::create_entrada,
        uniformes::controller::update_entrada,
        uniformes::controller::delete_entrada,
        qr::controller::generar,
        qr::controller::validar,
        qr::controller::info,
        qr::controller::codigos_de_pago,
        qr::controller::limpiar_expirados,
    ),
    components(schemas(
        auth::model::LoginRequest,
        auth::model::LoginResponse,
        auth::model::UsuarioAutenticado,
        auth::model::ForgotPasswordRequest,
        auth::model::ResetPasswordRequest,
        auth::model::MessageResponse,
        usuarios::model::Rol,
        usuarios::model::Usuario,
        usuarios::model::CreateUsuarioRequest,
        usuarios::model::UpdateUsuarioRequest,
        catalogos::model::Sede,
        catalogos::model::SedeRequest,
        catalogos::model::NivelEducativo,
        catalogos::model::NivelEducativoRequest,
        catalogos::model::Grado,
        catalogos::model::GradoRequest,
        alumnos::model::Alumno,
        alumnos::model::AlumnoRequest,
        alumnos::model::AlumnoListaItem,
        alumnos::model::AlumnoConPagos,
        alumnos::model::PagoHistorialItem,
        alumnos::model::Contacto,
        alumnos::model::ContactoRequest,
        alumnos::model::ContactoDeAlumno,
        alumnos::model::VincularContactoRequest,
        rubros::model::TipoRubro,
        rubros::model::Rubro,
        rubros::model::RubroRequest,
        rubros::model::RubroUniformeDetalle,
        rubros::model::RubroUniformeDetalleRequest,
        rubros::model::EliminarDetalleRequest,
        pagos::model::MedioPago,
        pagos::model::Pago,
        pagos::model::PagoDetalle,
        pagos::model::PagoConDetalles,
        pagos::model::CreatePagoRequest,
        pagos::model::CreatePagoDetalleRequest,
        pagos::model::AnularPagoRequest,
        pagos::model::ReporteMensual,
        pagos::model::ReporteMensualItem,
        pagos::model::TotalPorClave,
        rutas::model::AlumnoRuta,
        rutas::model::CreateAlumnoRutaRequest,
        rutas::model::UpdateAlumnoRutaRequest,
        rutas::model::ReporteDeudores,
        rutas::model::DeudorTransporte,
        rutas::model::MesAdeudado,
        rutas::model::ResumenDeudores,
        rutas::model::ConteoPorClave,
        uniformes::model::PrendaUniforme,
        uniformes::model::PrendaUniformeRequest,
        uniformes::model::EliminarPrendaRequest,
        uniformes::model::EntradaUniforme,
        uniformes::model::EntradaUniformeDetalle,
        uniformes::model::EntradaConDetalles,
        uniformes::model::EntradaUniformeRequest,
        uniformes::model::EntradaDetalleRequest,
        uniformes::model::EliminarEntradaRequest,
        qr::model::CodigoQrPago,
        qr::model::GenerarQrRequest,
        qr::model::GenerarQrResponse,
        qr::model::ValidarQrRequest,
        qr::model::ValidarQrResponse,
        qr::model::QrPagoInfo,
        qr::model::LimpiezaQrResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Autenticación y recuperación de contraseña"),
        (name = "usuarios", description = "Gestión de usuarios y roles"),
        (name = "catalogos", description = "Sedes, niveles educativos y grados"),
        (name = "alumnos", description = "Expedientes de alumnos"),
        (name = "contactos", description = "Contactos y parentescos"),
        (name = "rubros", description = "Definiciones de cobros"),
        (name = "pagos", description = "Registro de pagos, anulaciones y reportes"),
        (name = "rutas", description = "Rutas de transporte y deudores"),
        (name = "uniformes", description = "Inventario de uniformes"),
        (name = "qr", description = "Códigos QR de recibos de pago")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
