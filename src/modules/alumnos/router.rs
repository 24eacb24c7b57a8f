use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller;

pub fn init_alumnos_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::list_alumnos).post(controller::create_alumno),
        )
        .route("/lista", get(controller::lista_alumnos))
        .route("/buscar", get(controller::buscar_alumnos))
        .route("/codigo/{codigo}", get(controller::get_alumno_por_codigo))
        .route(
            "/{alumno_id}",
            get(controller::get_alumno)
                .put(controller::update_alumno)
                .delete(controller::delete_alumno),
        )
        .route("/{alumno_id}/pagos", get(controller::get_alumno_con_pagos))
        .route(
            "/{alumno_id}/contactos",
            get(controller::contactos_de_alumno),
        )
        .route(
            "/{alumno_id}/contactos/{contacto_id}",
            post(controller::vincular_contacto).delete(controller::desvincular_contacto),
        )
}

pub fn init_contactos_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::list_contactos).post(controller::create_contacto),
        )
        .route(
            "/{id}",
            get(controller::get_contacto)
                .put(controller::update_contacto)
                .delete(controller::delete_contacto),
        )
}
