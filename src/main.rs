// MeetGrid desktop client
// Main entry point

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use meetgrid::services::config::{self, AppConfig};
use meetgrid::services::sync::EventApiClient;
use meetgrid::ui_egui::MeetGridApp;

/// Mark your availability for a shared event and see everyone's overlap.
#[derive(Parser)]
#[command(name = "meetgrid", version, about)]
struct Cli {
    /// Slug of the event to open
    slug: String,

    /// Event service base URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut app_config: AppConfig = config::load().context("Failed to load configuration")?;
    if let Some(server) = cli.server {
        app_config.server_url = server;
    }

    log::info!(
        "Starting MeetGrid for event '{}' against {}",
        cli.slug,
        app_config.server_url
    );

    let client = EventApiClient::new(app_config.server_url.clone())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MeetGrid",
        options,
        Box::new(move |cc| {
            Ok(Box::new(MeetGridApp::new(
                cc,
                cli.slug,
                app_config,
                client,
            )))
        }),
    )
    .map_err(|err| anyhow!("Failed to run MeetGrid: {err}"))
}
