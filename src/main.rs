use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use earnings_analyzer::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting Earnings Call Analyzer Service");
    tracing::info!("Max upload size: {}MB", config.max_file_size_mb);
    tracing::info!("Upload directory: {}", config.upload_dir.display());
    tracing::info!("Inference model: {}", config.groq_model);

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let addr = config.bind_address();
    let app = create_router(AppState::new(config));

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "earnings_analyzer=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_target(false)))
        .init();
}
