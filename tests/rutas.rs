mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_json, create_user, request, seed_alumno, seed_catalogo, seed_rubro, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn assign_update_and_remove_route(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Ruta Norte", 8, Some(250)).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/alumnos/rutas",
            Some(&token),
            Some(json!({
                "alumno_id": alumno_id,
                "rubro_transporte_id": rubro_id,
                "fecha_inicio": "2026-01-15"
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(body["fecha_inicio"], "2026-01-15");
    assert!(body["fecha_fin"].is_null());

    let body = assert_json(
        request(
            test_app(db.clone()),
            "PUT",
            &format!("/api/alumnos/{}/rutas/{}", alumno_id, rubro_id),
            Some(&token),
            Some(json!({ "fecha_inicio": "2026-01-15", "fecha_fin": "2026-10-31" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["fecha_fin"], "2026-10-31");

    let response = request(
        test_app(db.clone()),
        "DELETE",
        &format!("/api/alumnos/{}/rutas/{}", alumno_id, rubro_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            &format!("/api/alumnos/{}/rutas", alumno_id),
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
async fn assignment_rejects_non_transport_rubro(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Inscripción", 1, Some(300)).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/alumnos/rutas",
        Some(&token),
        Some(json!({
            "alumno_id": alumno_id,
            "rubro_transporte_id": rubro_id,
            "fecha_inicio": "2026-01-15"
        })),
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn assignment_rejects_end_before_start(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Ruta Norte", 8, Some(250)).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/alumnos/rutas",
        Some(&token),
        Some(json!({
            "alumno_id": alumno_id,
            "rubro_transporte_id": rubro_id,
            "fecha_inicio": "2026-06-01",
            "fecha_fin": "2026-05-01"
        })),
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_assignment_is_conflict(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let alumno_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Ruta Norte", 8, Some(250)).await;

    let payload = json!({
        "alumno_id": alumno_id,
        "rubro_transporte_id": rubro_id,
        "fecha_inicio": "2026-01-15"
    });

    let response = request(
        test_app(db.clone()),
        "POST",
        "/api/alumnos/rutas",
        Some(&token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(
        test_app(db),
        "POST",
        "/api/alumnos/rutas",
        Some(&token),
        Some(payload),
    )
    .await;
    assert_json(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn debtor_report_flags_unpaid_months(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let (sede_id, _, grado_id) = seed_catalogo(&db).await;
    let deudor_id = seed_alumno(&db, "AL-00001", sede_id, grado_id).await;
    let al_dia_id = seed_alumno(&db, "AL-00002", sede_id, grado_id).await;
    let rubro_id = seed_rubro(&db, "Ruta Norte", 8, Some(250)).await;

    for alumno_id in [deudor_id, al_dia_id] {
        sqlx::query(
            r#"
            INSERT INTO alumno_rutas (alumno_id, rubro_transporte_id, fecha_inicio)
            VALUES ($1, $2, '2025-01-01')
            "#,
        )
        .bind(alumno_id)
        .bind(rubro_id)
        .execute(&db)
        .await
        .unwrap();
    }

    // The second student paid January and February, the first paid nothing.
    for mes in [1, 2] {
        sqlx::query(
            r#"
            INSERT INTO pagos (alumno_id, rubro_id, ciclo_escolar, fecha, monto, medio_pago,
                               es_pago_de_transporte, mes_colegiatura, anio_colegiatura)
            VALUES ($1, $2, 2025, NOW(), 250, 1, TRUE, $3, 2025)
            "#,
        )
        .bind(al_dia_id)
        .bind(rubro_id)
        .bind(mes)
        .execute(&db)
        .await
        .unwrap();
    }

    let body = assert_json(
        request(
            test_app(db.clone()),
            "GET",
            "/api/rutas/deudores?anio=2025&mes=2&incluir_mes_actual=true",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let deudores = body["deudores"].as_array().unwrap();
    assert_eq!(deudores.len(), 1);
    assert_eq!(deudores[0]["codigo"], "AL-00001");
    assert_eq!(deudores[0]["meses_atraso"], 2);
    assert_eq!(deudores[0]["total_deuda"], "500.00");
    assert_eq!(body["resumen"]["total_deudores"], 1);
    assert_eq!(body["resumen"]["con_dos_meses"], 1);

    // min_meses above the student's debt filters them out.
    let body = assert_json(
        request(
            test_app(db),
            "GET",
            "/api/rutas/deudores?anio=2025&mes=2&min_meses=3",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert!(body["deudores"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn debtor_report_rejects_invalid_month(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;

    let response = request(
        test_app(db),
        "GET",
        "/api/rutas/deudores?anio=2026&mes=13",
        Some(&token),
        None,
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}
