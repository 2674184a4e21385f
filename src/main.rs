use crate::app::App;
use crate::args::{Cli, Command};
use crate::config::Settings;
use crate::listings::{ExclusionRules, ListingsApi, ListingsClient};
use crate::responses::error_to_response;
use crate::router::handle;
use anyhow::Context;
use astra::Server;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod args;
mod commands;
mod config;
mod errors;
mod format;
mod listings;
mod map;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brokerage_site=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::new(&cli.config).context("Failed to load settings")?;

    // Fails here, before anything is served, when no API key is configured.
    let rules = ExclusionRules::from_settings(&settings.search);
    let client = ListingsClient::new(&settings.api, rules)?;
    let api: Arc<dyn ListingsApi> = Arc::new(client);

    let runtime = Arc::new(tokio::runtime::Runtime::new().context("Failed to start runtime")?);

    match cli.command.unwrap_or(Command::Serve { addr: None }) {
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                settings.server.addr = addr;
            }
            serve(App::new(settings, api, runtime))
        }
        Command::Search { filters, page, json } => runtime.block_on(commands::search(
            api.as_ref(),
            &settings,
            &filters.criteria(),
            page,
            json,
        )),
        Command::Count { filters } => {
            runtime.block_on(commands::count(api.as_ref(), &settings, &filters.criteria()))
        }
        Command::Listing { mls_number } => {
            runtime.block_on(commands::listing(api.as_ref(), &mls_number))
        }
        Command::Viewport { filters } => {
            runtime.block_on(commands::viewport(api.as_ref(), &settings, &filters.criteria()))
        }
    }
}

fn serve(app: App) -> anyhow::Result<()> {
    let addr: SocketAddr = app
        .settings
        .server
        .addr
        .parse()
        .with_context(|| format!("Invalid server.addr {:?}", app.settings.server.addr))?;

    info!(%addr, site = %app.settings.server.site_name, "Starting server");

    let server = Server::bind(&addr).max_workers(app.settings.server.max_workers);

    server
        .serve(move |req, _info| match handle(req, &app) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .context("Server ended with error")?;

    info!("Server shut down cleanly");
    Ok(())
}
