use axum::{Router, routing::get};
use dotenvy::dotenv;

use registry_auth::{User, UserStore, hash_password};
use registry_auth_axum::{cors_layer, session_auth_router, token_auth_router};

mod registry;
mod server;

use server::{init_tracing, spawn_http_server};

async fn index() -> &'static str {
    "Clinic registry API. Session endpoints live under /api/auth."
}

/// The account the demo frontend signs in with.
async fn seed_demo_user() -> Result<(), Box<dyn std::error::Error>> {
    if UserStore::get_user_by_email("test@example.com").await?.is_none() {
        let user = User::new(
            uuid::Uuid::new_v4().to_string(),
            "Test User".to_string(),
            "test@example.com".to_string(),
            hash_password("password")?,
        );
        UserStore::upsert_user(user).await?;
        tracing::info!("Seeded demo user test@example.com");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("demo_registry");

    dotenv().ok();
    registry_auth_axum::init().await?;
    seed_demo_user().await?;

    let port = std::env::var("REGISTRY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let api = session_auth_router()
        .merge(token_auth_router())
        .merge(registry::router(registry::RegistryState::new()));

    let app = Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .layer(cors_layer()?);

    let http_server = spawn_http_server(port, app);
    http_server.await?;
    Ok(())
}
