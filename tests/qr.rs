mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_json, create_user, request, seed_alumno, seed_catalogo, seed_rubro, test_app};

async fn seed_pago(db: &PgPool) -> i32 {
    let (sede_id, _, grado_id) = seed_catalogo(db).await;
    let alumno_id = seed_alumno(db, "AL-00001", sede_id, grado_id).await;
    let rubro_id = seed_rubro(db, "Inscripción", 1, Some(300)).await;

    sqlx::query_scalar(
        r#"
        INSERT INTO pagos (alumno_id, rubro_id, ciclo_escolar, fecha, monto, medio_pago)
        VALUES ($1, $2, 2026, NOW(), 300, 1)
        RETURNING id
        "#,
    )
    .bind(alumno_id)
    .bind(rubro_id)
    .fetch_one(db)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn generar_is_idempotent_for_live_codes(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let pago_id = seed_pago(&db).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/generar",
            Some(&token),
            Some(json!({ "pago_id": pago_id })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let primer_token = body["token_unico"].as_str().unwrap().to_string();
    assert!(body["qr_imagen"].as_str().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(
        body["pago_info"],
        format!("Pago #{} - Monto Q300.00", pago_id)
    );

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/generar",
            Some(&token),
            Some(json!({ "pago_id": pago_id })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(body["token_unico"], primer_token.as_str());

    let body = assert_json(
        request(
            test_app(db),
            "GET",
            &format!("/api/qr/pago/{}", pago_id),
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn generar_rejects_unknown_or_voided_payment(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let pago_id = seed_pago(&db).await;

    let response = request(
        test_app(db.clone()),
        "POST",
        "/api/qr/generar",
        Some(&token),
        Some(json!({ "pago_id": 999 })),
    )
    .await;
    assert_json(response, StatusCode::NOT_FOUND).await;

    sqlx::query("UPDATE pagos SET es_anulado = TRUE WHERE id = $1")
        .bind(pago_id)
        .execute(&db)
        .await
        .unwrap();

    let response = request(
        test_app(db),
        "POST",
        "/api/qr/generar",
        Some(&token),
        Some(json!({ "pago_id": pago_id })),
    )
    .await;
    assert_json(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn validar_consumes_the_code_once(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let pago_id = seed_pago(&db).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/generar",
            Some(&token),
            Some(json!({ "pago_id": pago_id })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let qr_token = body["token_unico"].as_str().unwrap().to_string();

    // Info does not consume.
    let body = assert_json(
        request(
            test_app(db.clone()),
            "GET",
            &format!("/api/qr/info/{}", qr_token),
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["valido"], true);
    assert_eq!(body["pago"]["alumno"], "Ana Pérez");

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": qr_token })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["valido"], true);
    assert_eq!(body["mensaje"], "Pago verificado correctamente");

    let body = assert_json(
        request(
            test_app(db),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": qr_token })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["valido"], false);
    assert_eq!(body["mensaje"], "El código QR ya fue utilizado");
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_scans_consume_the_code_once(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let pago_id = seed_pago(&db).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/generar",
            Some(&token),
            Some(json!({ "pago_id": pago_id })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let qr_token = body["token_unico"].as_str().unwrap().to_string();

    let (primero, segundo) = tokio::join!(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": qr_token })),
        ),
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": qr_token })),
        ),
    );

    let primero = assert_json(primero, StatusCode::OK).await;
    let segundo = assert_json(segundo, StatusCode::OK).await;
    let aceptados = [&primero, &segundo]
        .iter()
        .filter(|body| body["valido"] == true)
        .count();
    assert_eq!(aceptados, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn validar_reports_specific_failures(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let pago_id = seed_pago(&db).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": "no-es-un-uuid" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["valido"], false);
    assert_eq!(body["mensaje"], "El formato del código QR no es válido");

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": "00000000-0000-0000-0000-000000000000" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["mensaje"], "El código QR no existe");

    // Voided payment: rejected but with the payment snapshot attached.
    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/generar",
            Some(&token),
            Some(json!({ "pago_id": pago_id })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let qr_token = body["token_unico"].as_str().unwrap().to_string();

    sqlx::query("UPDATE pagos SET es_anulado = TRUE WHERE id = $1")
        .bind(pago_id)
        .execute(&db)
        .await
        .unwrap();

    let body = assert_json(
        request(
            test_app(db),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": qr_token })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["valido"], false);
    assert_eq!(body["mensaje"], "El pago asociado al código QR fue anulado");
    assert_eq!(body["pago"]["es_anulado"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_codes_are_rejected_and_purgeable(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let pago_id = seed_pago(&db).await;

    let qr_token = uuid::Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO codigos_qr_pagos (token_unico, fecha_expiracion, pago_id)
        VALUES ($1, NOW() - INTERVAL '1 day', $2)
        "#,
    )
    .bind(qr_token)
    .bind(pago_id)
    .execute(&db)
    .await
    .unwrap();

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/qr/validar",
            Some(&token),
            Some(json!({ "token": qr_token.to_string() })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["valido"], false);
    assert_eq!(body["mensaje"], "El código QR ha expirado");

    let body = assert_json(
        request(
            test_app(db.clone()),
            "DELETE",
            "/api/qr/expirados",
            Some(&token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["eliminados"], 1);

    let restantes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM codigos_qr_pagos")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(restantes, 0);
}
