use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use colegio::config::cors::CorsConfig;
use colegio::config::email::EmailConfig;
use colegio::config::jwt::JwtConfig;
use colegio::config::rate_limit::RateLimitConfig;
use colegio::router::init_router;
use colegio::state::AppState;
use colegio::utils::jwt::create_access_token;
use colegio::utils::password::hash_password;

pub fn test_state(db: PgPool) -> AppState {
    AppState {
        db,
        jwt_config: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        },
        email_config: EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@colegio.gt".to_string(),
            from_name: "Colegio".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        rate_limit_config: RateLimitConfig {
            general_per_second: 1000,
            general_burst_size: 1000,
            auth_per_second: 1000,
            auth_burst_size: 1000,
        },
    }
}

pub fn test_app(db: PgPool) -> Router {
    init_router(test_state(db))
}

/// Inserts a user with the given role and returns `(user_id, bearer token)`.
pub async fn create_user(db: &PgPool, codigo: &str, es_admin: bool) -> (i32, String) {
    let rol = if es_admin { "ADMIN" } else { "OPERADOR" };
    let rol_id: i32 = sqlx::query_scalar("SELECT id FROM roles WHERE nombre = $1")
        .bind(rol)
        .fetch_one(db)
        .await
        .unwrap();

    let hashed = hash_password("password123").unwrap();
    let email = format!("{}@colegio.gt", codigo);

    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO usuarios (codigo_usuario, nombres, apellidos, email, password, rol_id)
        VALUES ($1, 'Test', 'User', $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(codigo)
    .bind(&email)
    .bind(&hashed)
    .bind(rol_id)
    .fetch_one(db)
    .await
    .unwrap();

    let token = create_access_token(
        id,
        codigo,
        &email,
        es_admin,
        &test_state(db.clone()).jwt_config,
    )
    .unwrap();

    (id, token)
}

pub async fn request(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    // The auth rate limiter keys on the peer IP taken from ConnectInfo.
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9999))));

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn assert_json(response: Response<Body>, expected_status: StatusCode) -> Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected_status, "unexpected status, body: {}", json);
    json
}

// Fixtures

#[allow(dead_code)]
pub async fn seed_catalogo(db: &PgPool) -> (i32, i32, i32) {
    let sede_id: i32 =
        sqlx::query_scalar("INSERT INTO sedes (nombre) VALUES ('Central') RETURNING id")
            .fetch_one(db)
            .await
            .unwrap();

    let nivel_id: i32 = sqlx::query_scalar(
        "INSERT INTO niveles_educativos (nombre) VALUES ('Primaria') RETURNING id",
    )
    .fetch_one(db)
    .await
    .unwrap();

    let grado_id: i32 = sqlx::query_scalar(
        "INSERT INTO grados (nombre, nivel_educativo_id) VALUES ('Primero', $1) RETURNING id",
    )
    .bind(nivel_id)
    .fetch_one(db)
    .await
    .unwrap();

    (sede_id, nivel_id, grado_id)
}

#[allow(dead_code)]
pub async fn seed_alumno(db: &PgPool, codigo: &str, sede_id: i32, grado_id: i32) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO alumnos (codigo, primer_nombre, primer_apellido, sede_id, grado_id)
        VALUES ($1, 'Ana', 'Pérez', $2, $3)
        RETURNING id
        "#,
    )
    .bind(codigo)
    .bind(sede_id)
    .bind(grado_id)
    .fetch_one(db)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn seed_rubro(db: &PgPool, descripcion: &str, tipo: i32, monto: Option<i64>) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO rubros (descripcion, tipo, monto_preestablecido, dia_limite_pago)
        VALUES ($1, $2, $3, 5)
        RETURNING id
        "#,
    )
    .bind(descripcion)
    .bind(tipo)
    .bind(monto.map(rust_decimal::Decimal::from))
    .fetch_one(db)
    .await
    .unwrap()
}
