use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapty::config::Config;
use mapty::geolocation::StaticGeolocation;
use mapty::handlers::workouts::WorkoutsState;
use mapty::map::MapScene;
use mapty::repositories::KeyValueRepository;
use mapty::tracker::Tracker;
use mapty::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapty=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    let mut tracker = Tracker::new(
        MapScene::new(),
        KeyValueRepository::new(pool),
        StaticGeolocation::new(config.home_position),
        config.tracker_settings(),
    );
    match tracker.initialize().await {
        Ok(position) => tracing::info!("Map centered at {}, {}", position.lat, position.lng),
        Err(e) => tracing::warn!("Starting without a map: {}", e),
    }

    let app = routes::create_router(WorkoutsState::new(tracker));

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
