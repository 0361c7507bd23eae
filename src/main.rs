use anyhow::Result;
use tracing::info;

use brightflow_site::config::Config;
use brightflow_site::i18n::{routes, ContentLibrary};
use brightflow_site::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brightflow_site=info".parse()?),
        )
        .init();

    info!("Starting BrightFlow site");

    // Static configuration is checked before the server binds; a broken
    // slug table or content bundle is fatal here, never at request time.
    routes::verify()?;
    let content = ContentLibrary::load()?;
    info!("Route table and content bundles verified");

    let config = Config::from_env()?;
    let addr = format!("0.0.0.0:{}", config.port);

    let state = AppState::new(config, content);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
