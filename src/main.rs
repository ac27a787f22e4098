use axum::serve;
use pokedex_api::api::routes::create_router;
use pokedex_api::config::AppConfig;
use pokedex_api::seed;
use pokedex_api::store::SqliteStore;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("Pokedex API: Pokemon Catalog Server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    // The default location lives under ./data, which may not exist yet
    if let Some(parent) = std::path::Path::new(&config.database.location).parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("Connecting to SQLite...");
    let database_url = config.database_url();
    let store = SqliteStore::new(&database_url).await?;

    if config.database.migrate {
        println!("Running database migrations...");
        store.migrate().await?;
    }

    if config.database.seed && store.is_empty().await? {
        println!("Loading seed data...");
        seed::load_seed_data(&store).await?;
        println!("Seed data loaded successfully");
    }

    let store = Arc::new(store);

    run_server(create_router().with_state(store), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Pokedex server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
