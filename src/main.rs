use std::net::SocketAddr;

use pulse_monitoring::routers::create_analyzer_routes;
use pulse_monitoring::{load_config, logging, AnalyzerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    logging::init(&config.logger_level);

    match &config.range_service_url {
        Some(url) => tracing::info!("Range service address: {}", url),
        None => tracing::warn!("Range service address is not configured, every record will be dropped"),
    }

    let state = AnalyzerState::from_config(&config);
    let app = create_analyzer_routes(state);

    let addr: SocketAddr = config.analyzer_addr.parse()?;
    tracing::info!("pulse-values-analyzer listening on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
