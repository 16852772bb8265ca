//! `karat serve` - run the local web console.

use super::Context;
use karat_client::{ApiClient, LogNavigator};
use karat_core::DashboardConfig;
use karat_dashboard::DashboardServer;
use std::sync::Arc;

/// Apply `--host`/`--port` over the configured listen address.
pub fn listen_config(
    config: &DashboardConfig,
    host: Option<String>,
    port: Option<u16>,
) -> DashboardConfig {
    DashboardConfig {
        host: host.unwrap_or_else(|| config.host.clone()),
        port: port.unwrap_or(config.port),
    }
}

pub async fn run(ctx: &Context, config: DashboardConfig) -> anyhow::Result<()> {
    // Same session file as the other commands; expiry is logged instead of
    // printed, the browser gets redirected to /login.
    let session = ctx
        .session()
        .clone()
        .with_navigator(Arc::new(LogNavigator));
    let client = ApiClient::new(ctx.client.base_url(), session)?;

    let server = DashboardServer::new(config, client);
    println!("Karat console on http://{}", server.bind_addr());
    server.run().await?;
    Ok(())
}
