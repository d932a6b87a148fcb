//! Flight log record persisted once per tick.

use serde::{Deserialize, Serialize};

use crate::types::CutReason;

/// One tick's durable log entry. Invalid/unavailable numeric fields are
/// serialized as `NaN` rather than omitted, so a fixed-width downstream
/// reader never has to handle a missing column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogRecord {
    pub t_power_s: u32,
    pub launch_detected: bool,
    pub terminated: bool,
    pub cut_fired: bool,
    pub cut_reason: CutReason,
    pub gps_fix: bool,
    pub gps_lat_deg: f32,
    pub gps_lon_deg: f32,
    pub gps_alt_m: f32,
    pub pressure_hpa: f32,
    pub temp_c: f32,
    pub humidity_pct: f32,
}

impl LogRecord {
    pub const INVALID: f32 = f32::NAN;
}
