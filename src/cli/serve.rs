use crate::clients::Backends;
use crate::models::TriageConfig;
use crate::receiver::{start_server, AppState};
use crate::{Context, Result};
use colored::Colorize;

/// Run the webhook receiver until interrupted
pub async fn run(config: TriageConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let backends = Backends::from_config(&config).context("Failed to build backend clients")?;

    println!("{}", "📡 Starting BGP alert receiver...".cyan().bold());
    println!("   Webhook:   http://0.0.0.0:{}/alerts", port);
    println!("   Health:    http://0.0.0.0:{}/health", port);
    println!(
        "   Handles:   {}",
        config.server.handled_alertnames.join(", ")
    );

    start_server(port, AppState::new(backends, config)).await
}
