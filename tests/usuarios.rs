mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_json, create_user, request, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn user_management_is_admin_only(db: PgPool) {
    create_user(&db, "admin1", true).await;
    let (_, operador_token) = create_user(&db, "op1", false).await;

    let response = request(
        test_app(db.clone()),
        "GET",
        "/api/usuarios",
        Some(&operador_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = request(
        test_app(db),
        "POST",
        "/api/usuarios",
        Some(&operador_token),
        Some(json!({
            "codigo_usuario": "intruso",
            "nombres": "X",
            "apellidos": "Y",
            "email": "x@colegio.gt",
            "password": "password123",
            "rol_id": 1
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_creates_and_updates_user(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;
    let rol_id: i32 = sqlx::query_scalar("SELECT id FROM roles WHERE nombre = 'OPERADOR'")
        .fetch_one(&db)
        .await
        .unwrap();

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/usuarios",
            Some(&token),
            Some(json!({
                "codigo_usuario": "mlopez",
                "nombres": "María",
                "apellidos": "López",
                "email": "mlopez@colegio.gt",
                "password": "password123",
                "rol_id": rol_id
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["rol_nombre"], "OPERADOR");
    assert!(body.get("password").is_none());

    let body = assert_json(
        request(
            test_app(db.clone()),
            "PUT",
            &format!("/api/usuarios/{}", id),
            Some(&token),
            Some(json!({
                "nombres": "María José",
                "apellidos": "López",
                "email": "mlopez@colegio.gt",
                "estado": "inactivo",
                "rol_id": rol_id
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["nombres"], "María José");
    assert_eq!(body["estado"], "inactivo");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_codigo_usuario_is_conflict(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;
    let rol_id: i32 = sqlx::query_scalar("SELECT id FROM roles WHERE nombre = 'OPERADOR'")
        .fetch_one(&db)
        .await
        .unwrap();

    let payload = json!({
        "codigo_usuario": "mlopez",
        "nombres": "María",
        "apellidos": "López",
        "email": "mlopez@colegio.gt",
        "password": "password123",
        "rol_id": rol_id
    });

    let response = request(
        test_app(db.clone()),
        "POST",
        "/api/usuarios",
        Some(&token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut dup = payload;
    dup["email"] = json!("otra@colegio.gt");
    let response = request(test_app(db), "POST", "/api/usuarios", Some(&token), Some(dup)).await;
    assert_json(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn short_password_is_unprocessable(db: PgPool) {
    let (_, token) = create_user(&db, "admin1", true).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/usuarios",
        Some(&token),
        Some(json!({
            "codigo_usuario": "mlopez",
            "nombres": "María",
            "apellidos": "López",
            "email": "mlopez@colegio.gt",
            "password": "corta",
            "rol_id": 1
        })),
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn roles_listing_includes_seeded_roles(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;

    let body = assert_json(
        request(test_app(db), "GET", "/api/roles", Some(&token), None).await,
        StatusCode::OK,
    )
    .await;

    let nombres: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|rol| rol["nombre"].as_str().unwrap())
        .collect();
    assert!(nombres.contains(&"ADMIN"));
    assert!(nombres.contains(&"OPERADOR"));
}
