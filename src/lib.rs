pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic entry points
pub use logic::{add_evolutions, create, get_by_id, list, suggest_weak, PokedexError};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::load_seed_data;

// Export store types
pub use store::{MemoryStore, SqliteStore, Store};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    // Connect to SQLite
    let database_url = config.database_url();
    let store = crate::store::SqliteStore::new(&database_url).await?;

    // Run migrations
    store.migrate().await?;

    let store = Arc::new(store);

    // Create router with state
    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
