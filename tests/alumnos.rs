mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_json, create_user, request, seed_alumno, seed_catalogo, seed_rubro, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn create_and_fetch_alumno(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/alumnos",
            Some(&token),
            Some(json!({
                "codigo": "AL-00001",
                "primer_nombre": "Ana",
                "segundo_nombre": "María",
                "primer_apellido": "Pérez",
                "sede_id": sede_id,
                "grado_id": grado_id,
                "seccion": "A",
                "becado": true,
                "beca_parcial_porcentaje": 50
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["estado"], "activo");

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            &format!("/api/alumnos/{}", id),
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["codigo"], "AL-00001");
    assert_eq!(body["seccion"], "A");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_codigo_is_conflict(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    seed_alumno(&db, "AL-00001", sede_id, grado_id).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/alumnos",
        Some(&token),
        Some(json!({
            "codigo": "AL-00001",
            "primer_nombre": "Luis",
            "primer_apellido": "Gómez",
            "sede_id": sede_id,
            "grado_id": grado_id
        })),
    )
    .await;

    assert_json(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn beca_outside_range_is_unprocessable(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/alumnos",
        Some(&token),
        Some(json!({
            "codigo": "AL-00002",
            "primer_nombre": "Luis",
            "primer_apellido": "Gómez",
            "sede_id": sede_id,
            "grado_id": grado_id,
            "beca_parcial_porcentaje": 150
        })),
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_sede_is_404(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (_, _, grado_id) = seed_catalogo(&db).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/alumnos",
        Some(&token),
        Some(json!({
            "codigo": "AL-00002",
            "primer_nombre": "Luis",
            "primer_apellido": "Gómez",
            "sede_id": 999,
            "grado_id": grado_id
        })),
    )
    .await;

    assert_json(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn buscar_matches_any_name_column(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    sqlx::query(
        r#"
        INSERT INTO alumnos (codigo, primer_nombre, primer_apellido, sede_id, grado_id)
        VALUES ('AL-00002', 'Luis', 'Gómez', $1, $2)
        "#,
    )
    .bind(sede_id)
    .bind(grado_id)
    .execute(&db)
    .await
    .unwrap();

    let body = assert_json(
        request(
            test_app(db.clone()),
            "GET",
            "/api/alumnos/buscar?apellido=g%C3%B3m",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["codigo"], "AL-00002");

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            "/api/alumnos/buscar?nombre=an",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["codigo"], "AL-00001");
}

#[sqlx::test(migrations = "./migrations")]
async fn lista_builds_full_name(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    seed_alumno(&db, "AL-00001", sede_id, grado_id).await;

    let body = assert_json(
        request(test_app(db), "GET", "/api/alumnos/lista", Some(&token), None).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body[0]["nombre_completo"], "Ana Pérez");
}

#[sqlx::test(migrations = "./migrations")]
async fn codigo_lookup_includes_payment_history(db: PgPool) {
    let (user_id, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Inscripción 2026", 1, Some(300)).await;

    sqlx::query(
        r#"
        INSERT INTO pagos (alumno_id, rubro_id, ciclo_escolar, fecha, monto, medio_pago, usuario_creacion_id)
        VALUES ($1, $2, 2026, NOW(), 300, 1, $3)
        "#,
    )
    .bind(alumno_id)
    .bind(rubro_id)
    .bind(user_id)
    .execute(&db)
    .await
    .unwrap();

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            "/api/alumnos/codigo/AL-00001",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["codigo"], "AL-00001");
    assert_eq!(body["pagos"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagos"][0]["rubro_descripcion"], "Inscripción 2026");
}

#[sqlx::test(migrations = "./migrations")]
async fn contacto_link_and_unlink(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/contactos",
            Some(&token),
            Some(json!({ "nombre": "Carmen Pérez", "celular": "5555-1234" })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let contacto_id = body["id"].as_i64().unwrap();

    let response = request(
        test_app(db.clone()),
        "POST",
        &format!("/api/alumnos/{}/contactos/{}", alumno_id, contacto_id),
        Some(&token),
        Some(json!({ "parentesco": "Madre" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Linking twice is rejected.
    let response = request(
        test_app(db.clone()),
        "POST",
        &format!("/api/alumnos/{}/contactos/{}", alumno_id, contacto_id),
        Some(&token),
        Some(json!({ "parentesco": "Madre" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = assert_json(
        request(
            test_app(db.clone()),
            "GET",
            &format!("/api/alumnos/{}/contactos", alumno_id),
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["parentesco"], "Madre");

    let response = request(
        test_app(db.clone()),
        "DELETE",
        &format!("/api/alumnos/{}/contactos/{}", alumno_id, contacto_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            &format!("/api/alumnos/{}/contactos", alumno_id),
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_alumno_with_pagos_is_conflict(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Inscripción 2026", 1, Some(300)).await;

    sqlx::query(
        r#"
        INSERT INTO pagos (alumno_id, rubro_id, ciclo_escolar, fecha, monto, medio_pago)
        VALUES ($1, $2, 2026, NOW(), 300, 1)
        "#,
    )
    .bind(alumno_id)
    .bind(rubro_id)
    .execute(&db)
    .await
    .unwrap();

    let response = request(
        test_app(db),
        "DELETE",
        &format!("/api/alumnos/{}", alumno_id),
        Some(&token),
        None,
    )
    .await;

    assert_json(response, StatusCode::CONFLICT).await;
}
