//! # Joint Controller
//!
//! Drive an antagonist robotic joint segment from an Xbox 360 gamepad.
//!
//! Gamepad snapshots are translated into 12-value motor packets and written
//! to the segment MCU over serial, skipping packets identical to the last
//! one sent.

use anyhow::{Context, Result};
use std::path::Path;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use joint_controller::config::{Config, LoggingConfig};
use joint_controller::control::JointController;
use joint_controller::controller::joy::JoyEvent;
use joint_controller::controller::mapper::EventMapper;
use joint_controller::controller::xbox::XboxController;
use joint_controller::error::JointControllerError;
use joint_controller::packet::protocol::MotorPacket;
use joint_controller::serial::McuSerial;

/// Config file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable overriding the config path
const CONFIG_ENV_VAR: &str = "JOINT_CONTROLLER_CONFIG";

/// Snapshots buffered between the gamepad reader and the handler
const EVENT_QUEUE_DEPTH: usize = 1;

/// Main entry point
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, `JOINT_CONTROLLER_CONFIG`, or
///      `config/default.toml`; built-in defaults if none exists)
///    - Set up logging
///    - Open the MCU serial link
///    - Start the gamepad reader thread
///
/// 2. **Main Loop**
///    - Run each snapshot through the joint controller
///    - Write emitted packets to the MCU
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Shutdown**
///    - Send an all-zero packet so both joints brake
///    - Log packet counts
///
/// # Errors
///
/// Returns error if the config is invalid, the serial port cannot be opened,
/// or the gamepad is lost.
#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_source) = load_config()?;
    let _log_guard = init_logging(&config.logging)?;

    info!("Joint Controller v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config_source);

    let mode = config.control_mode()?;
    info!("Control mode: {}", mode.name());

    let mut serial = McuSerial::open(&config.serial.port, config.serial.baud_rate)?;
    info!("MCU serial port opened at: {}", serial.device_path());

    let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let reader = spawn_gamepad_reader(config.gamepad.device_path.clone(), tx)?;

    let mut controller = JointController::new(mode);

    info!("Waiting for gamepad input, press Ctrl+C to exit");

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    error!("Gamepad reader stopped");
                    break;
                };

                match controller.handle(&event) {
                    Ok(Some(packet)) => {
                        if let Err(e) = serial.send_packet(&packet).await {
                            warn!("Failed to send packet: {}", e);
                        }
                    }
                    Ok(None) => {}
                    Err(e @ JointControllerError::UnsupportedMode(_)) => {
                        if controller.stats().rejected == 1 {
                            error!("{}; gamepad input is ignored", e);
                        }
                    }
                    Err(e) => warn!("Dropping gamepad event: {}", e),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    stop_motors(&mut serial, &mut controller).await;

    let stats = controller.stats();
    info!(
        "Packets sent: {}, duplicates suppressed: {}, events rejected: {}",
        stats.emitted, stats.suppressed, stats.rejected
    );

    // A reader still blocked in evdev is left to exit with the process
    if reader.is_finished() {
        reader
            .join()
            .map_err(|_| anyhow::anyhow!("Gamepad reader panicked"))?
            .context("Gamepad input failed")?;
    }

    Ok(())
}

/// Resolve and load the configuration file.
fn load_config() -> Result<(Config, String)> {
    let explicit = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());

    match explicit {
        Some(path) => {
            let config =
                Config::load(&path).with_context(|| format!("Failed to load config {}", path))?;
            Ok((config, path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            let config = Config::load(DEFAULT_CONFIG_PATH)
                .with_context(|| format!("Failed to load config {}", DEFAULT_CONFIG_PATH))?;
            Ok((config, DEFAULT_CONFIG_PATH.to_string()))
        }
        None => Ok((Config::default(), "built-in defaults".to_string())),
    }
}

/// Initialize tracing. `RUST_LOG` takes precedence over the configured level.
///
/// Returns the file writer guard when logging to a directory; it must be
/// held until exit so buffered lines are flushed.
fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.to_ascii_lowercase()))
        .context("Invalid log level")?;

    if config.log_dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let appender = tracing_appender::rolling::daily(&config.log_dir, "joint-controller.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

/// Read the gamepad on a dedicated thread and forward each snapshot.
///
/// The channel is the only path into the handler, so snapshots are handled
/// strictly one at a time in arrival order. The reader waits when the
/// handler has not taken the previous snapshot yet.
fn spawn_gamepad_reader(
    device_path: String,
    tx: mpsc::Sender<JoyEvent>,
) -> Result<JoinHandle<joint_controller::error::Result<()>>> {
    let handle = std::thread::Builder::new()
        .name("gamepad-reader".to_string())
        .spawn(move || -> joint_controller::error::Result<()> {
            let mut gamepad = XboxController::open_configured(&device_path)?;
            info!(
                "Gamepad ready: {} ({})",
                gamepad.name().unwrap_or("unknown"),
                gamepad.device_path()
            );

            let mut mapper = EventMapper::new();
            loop {
                for raw in gamepad.fetch_events()? {
                    if let Some(snapshot) = mapper.process_event(&raw) {
                        if tx.blocking_send(snapshot).is_err() {
                            // Handler has shut down
                            return Ok(());
                        }
                    }
                }
            }
        })
        .context("Failed to start gamepad reader thread")?;

    Ok(handle)
}

/// Brake both joints and forget the last emitted packet.
async fn stop_motors(serial: &mut McuSerial, controller: &mut JointController) {
    if controller.last_emitted() == &MotorPacket::zeroed() {
        return;
    }

    controller.reset();
    match serial.send_packet(&MotorPacket::zeroed()).await {
        Ok(()) => info!("Motors stopped"),
        Err(e) => error!("Failed to stop motors: {}", e),
    }
}
