//! Bartender: main entry point
//!
//! Hexagonal architecture: the controller core never touches hardware.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HostHardware        LogEventSink   JsonFileStore              │
//! │  (Pins+Display+      (EventSink)    (ConfigStore)              │
//! │   Clock+Power)                                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            BartenderService (pure logic)               │    │
//! │  │  Menu · Pump registry · Pour scheduler                 │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Input thread: PressFilter · InputGate ──▶ AppCommand queue    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On a host the buttons are stdin lines:
//!
//! | Line              | Button   |
//! |-------------------|----------|
//! | `a`, `l`, `left`  | advance  |
//! | `s`, `r`, `right` | select   |
//! | `q`, `off`        | shutdown |

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use bartender::adapters::hardware::HostHardware;
use bartender::adapters::log_sink::LogEventSink;
use bartender::adapters::shutdown::CommandShutdown;
use bartender::adapters::store::JsonFileStore;
use bartender::adapters::time::SystemClock;
use bartender::app::commands::AppCommand;
use bartender::app::ports::{Level, PinDriver};
use bartender::app::service::BartenderService;
use bartender::catalog::Catalog;
use bartender::config::BartenderConfig;
use bartender::drivers::button::{Button, InputGate, PressFilter};

#[derive(Parser)]
#[command(
    name = "bartender",
    about = "Two-button drink dispenser: pick a drink, pour it",
    version
)]
struct Cli {
    /// Controller settings (JSON).  Defaults are used when omitted.
    #[arg(long, env = "BARTENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Pump configuration file.  Overrides `pump_config_path`.
    #[arg(long, env = "BARTENDER_PUMPS")]
    pumps: Option<PathBuf>,

    /// Drink and ingredient catalog (JSON).  The stock list is used when omitted.
    #[arg(long, env = "BARTENDER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Log the shutdown command instead of running it.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ── Configuration ─────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => BartenderConfig::load(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => BartenderConfig::default(),
    };
    if let Some(pumps) = cli.pumps {
        config.pump_config_path = pumps;
    }

    let catalog = match &cli.catalog {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            Catalog::from_json(&raw).with_context(|| format!("parsing catalog {}", path.display()))?
        }
        None => Catalog::default(),
    };

    // ── Adapters ──────────────────────────────────────────────
    let store = JsonFileStore::new(config.pump_config_path.clone());
    let power = if cli.dry_run {
        CommandShutdown::dry_run(config.shutdown_command.clone())
    } else {
        CommandShutdown::new(config.shutdown_command.clone())
    };
    let mut sink = LogEventSink::new();
    let press_filter = PressFilter::from_config(&config);

    // ── Core ──────────────────────────────────────────────────
    let mut service = BartenderService::load(config, &catalog, &store)
        .with_context(|| format!("loading pump configuration from {}", store.path().display()))?;
    let pins = service.registry().pins();
    let mut hw = HostHardware::simulated(&pins, power);
    service.start(&mut hw, &store, &mut sink);

    // ── Input ─────────────────────────────────────────────────
    let gate = Arc::new(InputGate::new());
    let (tx, rx) = mpsc::channel::<AppCommand>();
    spawn_input_thread(press_filter, Arc::clone(&gate), tx)?;
    info!("Ready: 'a' advance, 's' select, 'q' shut down");

    // ── Main loop ─────────────────────────────────────────────
    for cmd in rx {
        let _reopen = gate.reopen_on_drop();
        debug!("command {:?}", cmd);
        service.handle_command(cmd, &mut hw, &store, &mut sink);
        if hw.power().requested() {
            break;
        }
    }

    hw.set_many(&pins, Level::High);
    info!("Bartender stopped ({} events)", sink.emitted());
    Ok(())
}

fn parse_button(line: &str) -> Option<Button> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "l" | "left" => Some(Button::Advance),
        "s" | "r" | "right" => Some(Button::Select),
        "q" | "off" => Some(Button::Shutdown),
        _ => None,
    }
}

/// Read button presses from stdin and queue the ones that pass both filters.
fn spawn_input_thread(
    mut filter: PressFilter,
    gate: Arc<InputGate>,
    tx: mpsc::Sender<AppCommand>,
) -> Result<()> {
    thread::Builder::new()
        .name("buttons".into())
        .spawn(move || {
            let clock = SystemClock::new();
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("stdin: {}", e);
                        break;
                    }
                };
                let Some(button) = parse_button(&line) else {
                    if !line.trim().is_empty() {
                        warn!("unknown button '{}'", line.trim());
                    }
                    continue;
                };
                if !filter.accept(button, clock.uptime_ms()) {
                    debug!("{:?} bounced", button);
                    continue;
                }
                if !gate.try_close() {
                    debug!("{:?} dropped, busy", button);
                    continue;
                }
                if tx.send(button.command()).is_err() {
                    break;
                }
            }
        })
        .context("starting input thread")?;
    Ok(())
}
