mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_json, create_user, request, seed_alumno, seed_catalogo, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn sede_crud_roundtrip(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/sedes",
            Some(&token),
            Some(json!({ "nombre": "Sede Central", "direccion": "Zona 1" })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let body = assert_json(
        request(
            test_app(db.clone()),
            "PUT",
            &format!("/api/sedes/{}", id),
            Some(&token),
            Some(json!({ "nombre": "Sede Norte", "direccion": null })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["nombre"], "Sede Norte");

    let response = request(
        test_app(db.clone()),
        "DELETE",
        &format!("/api/sedes/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = request(
        test_app(db),
        "GET",
        &format!("/api/sedes/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn niveles_activos_excludes_inactive(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;

    for (nombre, activo) in [("Primaria", true), ("Nocturna", false)] {
        sqlx::query("INSERT INTO niveles_educativos (nombre, activo) VALUES ($1, $2)")
            .bind(nombre)
            .bind(activo)
            .execute(&db)
            .await
            .unwrap();
    }

    let body = assert_json(
        request(
            test_app(db.clone()),
            "GET",
            "/api/niveles-educativos/activos",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["nombre"], "Primaria");

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            "/api/niveles-educativos",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn grados_filter_by_nivel(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;
    let (_, nivel_id, _) = seed_catalogo(&db).await;

    let otro_nivel: i32 = sqlx::query_scalar(
        "INSERT INTO niveles_educativos (nombre) VALUES ('Básicos') RETURNING id",
    )
    .fetch_one(&db)
    .await
    .unwrap();
    sqlx::query("INSERT INTO grados (nombre, nivel_educativo_id) VALUES ('Primero básico', $1)")
        .bind(otro_nivel)
        .execute(&db)
        .await
        .unwrap();

    let body = assert_json(
        request(
            test_app(db.clone()),
            "GET",
            &format!("/api/grados?nivel_educativo_id={}", nivel_id),
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["nombre"], "Primero");

    let body = assert_json(
        request(test_app(db), "GET", "/api/grados", Some(&token), None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_grado_with_alumnos_is_conflict(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    seed_alumno(&db, "A001", sede_id, grado_id).await;

    let response = request(
        test_app(db),
        "DELETE",
        &format!("/api/grados/{}", grado_id),
        Some(&token),
        None,
    )
    .await;

    assert_json(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn creating_grado_with_unknown_nivel_is_404(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/grados",
        Some(&token),
        Some(json!({ "nombre": "Primero", "nivel_educativo_id": 999 })),
    )
    .await;

    assert_json(response, StatusCode::NOT_FOUND).await;
}
