use std::net::SocketAddr;

use tracing::info;

use colegio::logging::init_tracing;
use colegio::router::init_router;
use colegio::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    info!("Listening on {}", addr);

    // The auth rate limiter keys on the peer IP.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
