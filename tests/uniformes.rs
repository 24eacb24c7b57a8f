mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_json, create_user, request, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn prenda_crud_and_soft_delete(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/uniformes/prendas",
            Some(&token),
            Some(json!({
                "descripcion": "Playera deportiva",
                "sexo": "Unisex",
                "talla": "M",
                "precio": 80,
                "existencia_inicial": 10
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["existencia_actual"], 10);

    let response = request(
        test_app(db.clone()),
        "DELETE",
        &format!("/api/uniformes/prendas/{}", id),
        Some(&token),
        Some(json!({ "motivo": "Modelo descontinuado" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from the API but kept in the table.
    let response = request(
        test_app(db.clone()),
        "GET",
        &format!("/api/uniformes/prendas/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (es_eliminado, motivo): (bool, Option<String>) = sqlx::query_as(
        "SELECT es_eliminado, motivo_eliminacion FROM prendas_uniforme WHERE id = $1",
    )
    .bind(id as i32)
    .fetch_one(&db)
    .await
    .unwrap();
    assert!(es_eliminado);
    assert_eq!(motivo.as_deref(), Some("Modelo descontinuado"));
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_sexo_is_unprocessable(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/uniformes/prendas",
        Some(&token),
        Some(json!({
            "descripcion": "Playera",
            "sexo": "X",
            "talla": "M",
            "precio": 80
        })),
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}

async fn crear_prenda(db: &PgPool, token: &str, descripcion: &str) -> i64 {
    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/uniformes/prendas",
            Some(token),
            Some(json!({
                "descripcion": descripcion,
                "sexo": "Unisex",
                "talla": "M",
                "precio": 80,
                "existencia_inicial": 5
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    body["id"].as_i64().unwrap()
}

async fn existencia(db: &PgPool, prenda_id: i64) -> (i32, i32) {
    sqlx::query_as("SELECT entradas, salidas FROM prendas_uniforme WHERE id = $1")
        .bind(prenda_id as i32)
        .fetch_one(db)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn entrada_adds_stock_and_totals_lines(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let prenda_id = crear_prenda(&db, &token, "Playera").await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/uniformes/entradas",
            Some(&token),
            Some(json!({
                "notas": "Compra de agosto",
                "detalles": [
                    { "prenda_uniforme_id": prenda_id, "cantidad": 12, "subtotal": 960 }
                ]
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(body["total"], "960.00");
    assert_eq!(body["detalles"][0]["cantidad"], 12);

    assert_eq!(existencia(&db, prenda_id).await, (12, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn entrada_without_lines_is_unprocessable(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;

    let response = request(
        test_app(db),
        "POST",
        "/api/uniformes/entradas",
        Some(&token),
        Some(json!({ "detalles": [] })),
    )
    .await;

    assert_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn entrada_update_reapplies_stock(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let prenda_id = crear_prenda(&db, &token, "Playera").await;
    let otra_prenda_id = crear_prenda(&db, &token, "Pantalón").await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/uniformes/entradas",
            Some(&token),
            Some(json!({
                "detalles": [
                    { "prenda_uniforme_id": prenda_id, "cantidad": 12, "subtotal": 960 }
                ]
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let entrada_id = body["id"].as_i64().unwrap();

    let body = assert_json(
        request(
            test_app(db.clone()),
            "PUT",
            &format!("/api/uniformes/entradas/{}", entrada_id),
            Some(&token),
            Some(json!({
                "detalles": [
                    { "prenda_uniforme_id": otra_prenda_id, "cantidad": 4, "subtotal": 320 }
                ]
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["total"], "320.00");

    assert_eq!(existencia(&db, prenda_id).await, (0, 0));
    assert_eq!(existencia(&db, otra_prenda_id).await, (4, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn entrada_delete_reverts_stock(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let prenda_id = crear_prenda(&db, &token, "Playera").await;

    let body = assert_json(
        request(
            test_app(db.clone()),
            "POST",
            "/api/uniformes/entradas",
            Some(&token),
            Some(json!({
                "detalles": [
                    { "prenda_uniforme_id": prenda_id, "cantidad": 12, "subtotal": 960 }
                ]
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let entrada_id = body["id"].as_i64().unwrap();

    let response = request(
        test_app(db.clone()),
        "DELETE",
        &format!("/api/uniformes/entradas/{}", entrada_id),
        Some(&token),
        Some(json!({ "motivo": "Error de captura" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(existencia(&db, prenda_id).await, (0, 0));

    let response = request(
        test_app(db),
        "GET",
        &format!("/api/uniformes/entradas/{}", entrada_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn entrada_with_deleted_prenda_is_404(db: PgPool) {
    let (_, token) = create_user(&db, "op1", false).await;
    let prenda_id = crear_prenda(&db, &token, "Playera").await;

    request(
        test_app(db.clone()),
        "DELETE",
        &format!("/api/uniformes/prendas/{}", prenda_id),
        Some(&token),
        Some(json!({ "motivo": "Descontinuada" })),
    )
    .await;

    let response = request(
        test_app(db),
        "POST",
        "/api/uniformes/entradas",
        Some(&token),
        Some(json!({
            "detalles": [
                { "prenda_uniforme_id": prenda_id, "cantidad": 1, "subtotal": 80 }
            ]
        })),
    )
    .await;

    assert_json(response, StatusCode::NOT_FOUND).await;
}
