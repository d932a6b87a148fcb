//! Binary entry point: parses CLI arguments, loads configuration, wires
//! up collaborators, and runs the control cycle.
//!
//! Grounded on `evo_control_unit::main` and the workspace `clap`/
//! `tracing` dependencies.

use std::path::PathBuf;

use clap::Parser;

use cutdown_core::collaborators::{FlightRecorder, RecorderError, ReleaseActuator, SensorFrame, SensorSource, UplinkSource};
use cutdown_core::config;
use cutdown_core::cycle::CycleRunner;
use cutdown_core::log::LogRecord;

#[derive(Parser, Debug)]
#[command(name = "cutdown_core", about = "High-altitude balloon cutdown flight control core")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "cutdown.toml")]
    config: PathBuf,
}

/// Sensor/actuator/uplink/recorder stand-in used until real drivers are
/// wired in. Reports everything invalid/unavailable rather than
/// fabricating plausible-looking telemetry.
struct NullCollaborators;

impl SensorSource for NullCollaborators {
    fn read(&mut self) -> SensorFrame {
        SensorFrame::default()
    }
}

impl UplinkSource for NullCollaborators {
    fn poll_command(&mut self) -> Option<String> {
        None
    }

    fn modem_ok(&self) -> bool {
        false
    }
}

impl ReleaseActuator for NullCollaborators {
    fn fire_release(&mut self) {
        tracing::warn!("release actuator fire requested but no driver is wired in");
    }

    fn wiggle(&mut self) {
        tracing::info!("release actuator wiggle requested but no driver is wired in");
    }
}

impl FlightRecorder for NullCollaborators {
    fn record(&mut self, record: &LogRecord) -> Result<(), RecorderError> {
        tracing::debug!(?record, "log record (no persistent storage wired in)");
        Ok(())
    }

    fn storage_present(&self) -> bool {
        false
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = config::load_config_or_default(&args.config);

    tracing::info!(serial_number = config.serial_number, "cutdown core starting");

    let mut runner = CycleRunner::new(
        config,
        NullCollaborators,
        NullCollaborators,
        NullCollaborators,
        NullCollaborators,
    );
    runner.run();
}
