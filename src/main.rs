use reqwest::Client;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stayspot::app::build_router;
use stayspot::services::{database::Database, geocoding::Geocoder, photos::PhotoSearch};
use stayspot::utilities::{app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::init().await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.tracing_level.to_string())),
        )
        .init();

    let database = Database::connect(&config).await?;
    database.migrate().await?;

    // One connection pool shared by both enrichment providers.
    let client = Client::new();
    let geocoder = Geocoder::new(client.clone(), config.location_iq_api_key.clone());
    let photos = PhotoSearch::new(client, config.unsplash_access_key.clone());

    let app_state = AppState {
        database: database.clone(),
        config: config.clone(),
        geocoder,
        photos,
    };

    let router = build_router(app_state);

    let listener = TcpListener::bind(&config.server_address).await?;
    info!("listening on {}", config.server_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    info!("database pool closed, shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
