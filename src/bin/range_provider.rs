use std::net::SocketAddr;

use pulse_monitoring::routers::create_provider_routes;
use pulse_monitoring::{load_config, logging, ProviderState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    logging::init(&config.logger_level);

    let state = ProviderState::from_config(&config);
    let app = create_provider_routes(state);

    let addr: SocketAddr = config.provider_addr.parse()?;
    tracing::info!("range-provider listening on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
