// HomePixel CLI - steuert den LED-Ring über das lokale Netzwerk
//
// Einmal-Kommandos (status, show, color, preset, presets) prüfen zuerst die
// Erreichbarkeit und beenden sich danach. `watch` läuft bis Ctrl-C.

use std::process::ExitCode;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use embassy_futures::select::select3;
use log::{info, warn};

use homepixel::config::{ENV_DEVICE, ENV_PROBE_INTERVAL, ENV_PROBE_TIMEOUT, ENV_REQUEST_TIMEOUT};
use homepixel::render::{render_presets, render_state, status_label};
use homepixel::tasks::{monitor_task, watch_task};
use homepixel::{
    AppConfig, DeviceAddress, HttpTransport, expect_applied, find_preset, warn_unless_applied,
};
use homepixel_core::config::{
    DEFAULT_DEVICE_ADDRESS, PROBE_INTERVAL_SECS, PROBE_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS,
};
use homepixel_core::{DeviceTransport, PixelClient, PixelStore, ShutdownSignal, parse_color};

#[derive(Parser, Debug)]
#[command(name = "homepixel", version, about = "Control a 12-LED ring over the local network")]
struct Cli {
    /// Geräte-Adresse (host, host:port oder http://host:port)
    #[arg(long, short = 'd', env = ENV_DEVICE, default_value = DEFAULT_DEVICE_ADDRESS)]
    device: DeviceAddress,

    #[arg(long, env = ENV_PROBE_INTERVAL, default_value_t = PROBE_INTERVAL_SECS, value_name = "SECONDS")]
    probe_interval: u64,

    #[arg(long, env = ENV_PROBE_TIMEOUT, default_value_t = PROBE_TIMEOUT_SECS, value_name = "SECONDS")]
    probe_timeout: u64,

    #[arg(long, env = ENV_REQUEST_TIMEOUT, default_value_t = REQUEST_TIMEOUT_SECS, value_name = "SECONDS")]
    request_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prüft, ob das Gerät erreichbar ist
    Status,
    /// Zeigt Farben und aktives Preset
    Show,
    /// Setzt alle LEDs auf eine Farbe ("r,g,b", "rgb(r, g, b)" oder "#rrggbb")
    Color { color: String },
    /// Aktiviert ein Preset per Name
    Preset { name: String },
    /// Listet die Presets des Geräts
    Presets,
    /// Beobachtet den Zustand bis Ctrl-C
    Watch,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // .env vor clap laden, damit `env = ...` die Werte sieht
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::new(
        cli.device,
        cli.probe_interval,
        cli.probe_timeout,
        cli.request_timeout,
    )?;
    info!("HomePixel: Using device {}", config.device);

    let transport = HttpTransport::new(config.device.clone());
    let store = PixelStore::new();
    let client = PixelClient::new(&store, &transport, config.sync);

    match cli.command {
        Command::Status => {
            let status = client.check_status().await;
            println!("{}: {}", config.device, status_label(status));
            if !status.is_online() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Show => {
            ensure_online(&client, &config).await?;
            expect_applied(client.refresh().await)?;
            println!("{}", render_state(&client.snapshot()));
        }
        Command::Color { color } => {
            let color = parse_color(&color).map_err(|_| anyhow!("invalid color '{color}'"))?;
            ensure_online(&client, &config).await?;
            expect_applied(client.set_color(color).await)?;
            println!("{}", render_state(&client.snapshot()));
        }
        Command::Preset { name } => {
            ensure_online(&client, &config).await?;
            let presets = client.list_presets().await;
            let preset = find_preset(&presets, &name, client.snapshot().status)?;
            expect_applied(client.set_pixel_preset(preset).await)?;
            println!("{}", render_state(&client.snapshot()));
        }
        Command::Presets => {
            ensure_online(&client, &config).await?;
            // Aktives Preset markieren
            warn_unless_applied("Active preset unknown", client.refresh().await);
            let presets = client.list_presets().await;
            println!("{}", render_presets(&presets, &client.snapshot()));
        }
        Command::Watch => watch(&client).await?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Ein Probe vor jedem Kommando, ohne `online` wird nichts gesendet
async fn ensure_online<T: DeviceTransport>(
    client: &PixelClient<'_, T>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let status = client.check_status().await;
    if !status.is_online() {
        bail!("device {} is {}", config.device, status_label(status));
    }
    Ok(())
}

/// Monitor und Ausgabe parallel, bis Ctrl-C
async fn watch<T: DeviceTransport>(client: &PixelClient<'_, T>) -> anyhow::Result<()> {
    let subscriber = client.subscribe()?;
    let initial = client.snapshot();
    let shutdown = ShutdownSignal::new();

    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("HomePixel: Cannot listen for Ctrl-C: {e}");
            core::future::pending::<()>().await;
        }
        info!("HomePixel: Shutting down");
        shutdown.signal(());
        // Monitor beendet sich selbst und damit das select
        core::future::pending::<()>().await
    };

    select3(
        monitor_task(client, &shutdown),
        watch_task(initial, subscriber),
        stop,
    )
    .await;
    Ok(())
}
