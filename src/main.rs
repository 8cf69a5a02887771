//! PCAP threat detector entrypoint. With a capture path argument it classifies that
//! one file and exits; otherwise it serves the prediction API until Ctrl+C.

use pcap_threat_detector::{
    api::{self, AppState},
    config::ServiceConfig,
    detector::Detector,
    logging::StructuredLogger,
};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info};

fn run_once(detector: &Detector, raw_path: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let prediction = detector.predict_capture(raw_path)?;
    let mut out = std::io::stdout().lock();
    StructuredLogger::emit_json(&prediction.verdict, &mut out)?;
    StructuredLogger::emit_json(&prediction.features, &mut out)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("PCAP_DETECTOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = ServiceConfig::load(&config_path).with_env_overrides();

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %config_path.display(), base_dir = ?config.base_dir, "pcap threat detector starting");

    let bind = config.server.bind.clone();
    let detector = Detector::load(config);

    if let Some(raw_path) = std::env::args().nth(1) {
        if let Err(e) = run_once(&detector, &raw_path) {
            error!(path = %raw_path, error = %e, "prediction failed");
            std::process::exit(1);
        }
        return Ok(());
    }

    let app = api::router(AppState::new(detector));
    let listener = TcpListener::bind(&bind).await?;
    info!(bind = %bind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("pcap threat detector stopping");
    Ok(())
}
