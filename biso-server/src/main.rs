use biso_server::{api, config, db, state::AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biso_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = config::Settings::new()?;
    let match_config = settings.matching.match_config()?;
    tracing::info!(
        threshold = match_config.similarity_threshold,
        substring_match = match_config.substring_match,
        "Hashtag matching configured"
    );

    // Initialize database
    let db = db::Database::new(&settings.database.path)?;
    db.initialize()?;

    if settings.database.seed {
        db.seed_test_data()?;
        tracing::info!("Sample feed seeded");
    }

    tracing::info!("Database initialized at {}", settings.database.path);

    let app = api::router(AppState::new(db, match_config));

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
