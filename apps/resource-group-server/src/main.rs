use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use resource_group::infra::{InMemoryResourceGroupService, StaticEnforcer, StaticUserResolver};
use resource_group::{Collaborators, ResourceGroupModule};
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod logging;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "resource-group-server", version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        let rendered =
            serde_json::to_string_pretty(&config).context("failed to render configuration")?;
        println!("{rendered}");
        return Ok(());
    }

    logging::init(&config.logging)?;

    let module = ResourceGroupModule::new(
        &config.resource_group,
        Collaborators {
            users: Arc::new(StaticUserResolver::from_config(&config.static_authn)),
            enforcer: Arc::new(StaticEnforcer::from_config(&config.static_authz)),
            service: Arc::new(InMemoryResourceGroupService::new()),
        },
    )?;
    let app = module.router().layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Resource group server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Resource group server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
