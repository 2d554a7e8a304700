use std::{io::Write, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{GatewayConfig, HttpGateway, Notice, Settings, ViewController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod ui;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "devcommits", about = "Post and browse developer commit notes")]
struct Args {
    /// Settings file (defaults to ./devcommits.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    supabase_url: Option<String>,
    #[arg(long)]
    anon_key: Option<String>,
}

fn gateway_config(args: &Args) -> Result<GatewayConfig> {
    let mut settings = Settings::from_file(args.config.as_deref())?;
    settings.apply_env();
    settings.apply_overrides(args.supabase_url.clone(), args.anon_key.clone());
    GatewayConfig::from_settings(settings)
        .context("backend gateway is not configured; set SUPABASE_URL and SUPABASE_ANON_KEY")
}

fn redraw(controller: &ViewController) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\n{}> ", ui::render::render_screen(controller.state()))?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = gateway_config(&args)?;
    info!(url = %config.supabase_url, table = %config.table, "gateway configured");
    let gateway = Arc::new(HttpGateway::new(config)?);
    let mut controller = ViewController::new(gateway).with_observer(ui::render::progress_line);
    controller.start().await;
    redraw(&controller)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                controller.state_mut().notice = None;
                commands::apply(&mut controller, command).await;
            }
            Err(err) => controller.state_mut().notice = Some(Notice::Error(err.to_string())),
        }
        redraw(&controller)?;
    }

    Ok(())
}
