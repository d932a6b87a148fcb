//! Collaborator boundaries: everything outside the decision core (sensor
//! drivers, the uplink modem, the release actuator, persistent storage,
//! configuration) is consumed only through these traits.
//!
//! Every collaborator is consumed only through a typed boundary rather
//! than by reaching into driver internals, since this is a single-process
//! instrument with no IPC to perform.

use crate::config::SystemConfig;
use crate::log::LogRecord;

/// One tick's raw sensor snapshot. `None`/`false` fields mean "driver
/// reports this unavailable or invalid this tick", not zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorFrame {
    pub gps_alt_m: Option<f32>,
    pub gps_lat_deg: Option<f32>,
    pub gps_lon_deg: Option<f32>,
    pub gps_fix: bool,
    pub gps_link_ok: bool,
    pub pressure_hpa: Option<f32>,
    pub temp_c: Option<f32>,
    pub humidity_pct: Option<f32>,
    pub environmental_sensor_ok: bool,
    pub external_input_raw: [bool; 2],
}

/// Sensor and discrete-input driver boundary.
pub trait SensorSource {
    fn read(&mut self) -> SensorFrame;
}

/// Iridium (or other remote-command) uplink boundary.
pub trait UplinkSource {
    /// Returns the next queued raw command line, if any, this tick.
    fn poll_command(&mut self) -> Option<String>;
    fn modem_ok(&self) -> bool;
}

/// Release actuator boundary.
pub trait ReleaseActuator {
    /// Commands the actuator to release. Called at most once per power
    /// cycle by [`crate::release::ReleaseLatch`].
    fn fire_release(&mut self);
    /// Diagnostic pulse that must never be mistaken for a real release.
    fn wiggle(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderError {
    Io,
}

/// Persistent flight-log boundary.
pub trait FlightRecorder {
    fn record(&mut self, record: &LogRecord) -> Result<(), RecorderError>;
    fn storage_present(&self) -> bool;
}

/// Configuration source boundary, abstracting over where the TOML comes
/// from (local file, ground-station push, etc).
pub trait ConfigSource {
    fn load(&self) -> SystemConfig;
}
