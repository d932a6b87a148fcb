//! TOML configuration loading and validation.
//!
//! Parse, then run an explicit `validate()` pass, then fall back to safe
//! defaults rather than running with a config the validator rejected.

use std::fmt;
use std::fs;
use std::path::Path;

use heapless::Vec as HVec;
use serde::{Deserialize, Serialize};

use crate::types::{ComparisonOp, VariableId};

pub const MAX_CONDITIONS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub enabled: bool,
    pub var_id: VariableId,
    pub op: ComparisonOp,
    pub threshold: f32,
    pub for_seconds: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutGates {
    pub require_launch_before_cut: bool,
    pub require_gps_fix_before_cut: bool,
}

impl Default for CutGates {
    fn default() -> Self {
        CutGates {
            require_launch_before_cut: true,
            require_gps_fix_before_cut: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalInputConfig {
    pub enabled: bool,
    pub active_high: bool,
    pub debounce_ms: u32,
}

impl Default for ExternalInputConfig {
    fn default() -> Self {
        ExternalInputConfig {
            enabled: false,
            active_high: true,
            debounce_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCutConfig {
    pub enabled: bool,
    pub token: String,
}

impl Default for RemoteCutConfig {
    fn default() -> Self {
        RemoteCutConfig {
            enabled: false,
            token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationConfig {
    pub enabled: bool,
    pub sustain_s: u16,
    pub gps_drop_m: Option<f32>,
    pub pressure_rise_hpa: Option<f32>,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        TerminationConfig {
            enabled: true,
            sustain_s: 15,
            gps_drop_m: Some(500.0),
            pressure_rise_hpa: Some(3.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub ground_interval_s: u32,
    pub ascent_interval_s: u32,
    pub descent_interval_s: u32,
    pub beacon_interval_s: u32,
    pub descent_duration_s: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            ground_interval_s: 60,
            ascent_interval_s: 10,
            descent_interval_s: 5,
            beacon_interval_s: 30,
            descent_duration_s: 3600,
        }
    }
}

/// Full validated system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub serial_number: u32,
    pub cut_gates: CutGates,
    #[serde(default)]
    pub bucket_a: Vec<Condition>,
    #[serde(default)]
    pub bucket_b: Vec<Condition>,
    pub external_inputs: [ExternalInputConfig; 2],
    pub remote_cut: RemoteCutConfig,
    pub termination: TerminationConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for SystemConfig {
    /// Safe-default fallback used when a loaded configuration is missing
    /// or fails validation: cut rules disabled, external input 0 enabled
    /// active-high with a 50 ms debounce, remote cut disabled, launch
    /// required before cut, fix not required.
    fn default() -> Self {
        SystemConfig {
            serial_number: 0,
            cut_gates: CutGates::default(),
            bucket_a: Vec::new(),
            bucket_b: Vec::new(),
            external_inputs: [
                ExternalInputConfig {
                    enabled: true,
                    active_high: true,
                    debounce_ms: 50,
                },
                ExternalInputConfig::default(),
            ],
            remote_cut: RemoteCutConfig::default(),
            termination: TerminationConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Bucket conditions copied into a fixed-capacity, heap-free vector
    /// for the tick path. Truncates past [`MAX_CONDITIONS`]; `validate()`
    /// rejects configs that would need truncation.
    pub fn bucket_a_fixed(&self) -> HVec<Condition, MAX_CONDITIONS> {
        let mut v = HVec::new();
        for c in self.bucket_a.iter().take(MAX_CONDITIONS) {
            let _ = v.push(c.clone());
        }
        v
    }

    pub fn bucket_b_fixed(&self) -> HVec<Condition, MAX_CONDITIONS> {
        let mut v = HVec::new();
        for c in self.bucket_b.iter().take(MAX_CONDITIONS) {
            let _ = v.push(c.clone());
        }
        v
    }

    /// Validates every field with a meaningful range or cardinality
    /// constraint. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_number > 9_999_999 {
            return Err(ConfigError::Invalid("serial_number exceeds 9,999,999".into()));
        }
        if self.bucket_a.len() > MAX_CONDITIONS {
            return Err(ConfigError::Invalid(format!(
                "bucket_a has {} conditions, max is {MAX_CONDITIONS}",
                self.bucket_a.len()
            )));
        }
        if self.bucket_b.len() > MAX_CONDITIONS {
            return Err(ConfigError::Invalid(format!(
                "bucket_b has {} conditions, max is {MAX_CONDITIONS}",
                self.bucket_b.len()
            )));
        }
        for c in self.bucket_a.iter().chain(self.bucket_b.iter()) {
            validate_condition(c)?;
        }
        if self.remote_cut.enabled && self.remote_cut.token.is_empty() {
            return Err(ConfigError::Invalid(
                "remote_cut.enabled requires a non-empty token".into(),
            ));
        }
        if self.termination.enabled && self.termination.gps_drop_m.is_none()
            && self.termination.pressure_rise_hpa.is_none()
        {
            return Err(ConfigError::Invalid(
                "termination.enabled requires at least one of gps_drop_m/pressure_rise_hpa".into(),
            ));
        }
        for (name, v) in [
            ("ground_interval_s", self.telemetry.ground_interval_s),
            ("ascent_interval_s", self.telemetry.ascent_interval_s),
            ("descent_interval_s", self.telemetry.descent_interval_s),
            ("beacon_interval_s", self.telemetry.beacon_interval_s),
        ] {
            if v != 0 && !(10..=604_800).contains(&v) {
                return Err(ConfigError::Invalid(format!(
                    "telemetry.{name} must be 0 or within [10, 604800] seconds, got {v}"
                )));
            }
        }
        if self.telemetry.descent_duration_s != 0 && self.telemetry.descent_duration_s < 10 {
            return Err(ConfigError::Invalid(
                "telemetry.descent_duration_s must be 0 or at least 10 seconds".into(),
            ));
        }
        Ok(())
    }
}

fn validate_condition(c: &Condition) -> Result<(), ConfigError> {
    if !c.threshold.is_finite() {
        return Err(ConfigError::Invalid("condition threshold must be finite".into()));
    }
    match c.var_id {
        VariableId::GpsLatDeg if !(-90.0..=90.0).contains(&c.threshold) => {
            return Err(ConfigError::Invalid(
                "GpsLatDeg threshold out of [-90, 90]".into(),
            ))
        }
        VariableId::GpsLonDeg if !(-180.0..=180.0).contains(&c.threshold) => {
            return Err(ConfigError::Invalid(
                "GpsLonDeg threshold out of [-180, 180]".into(),
            ))
        }
        VariableId::HumidityPct if !(0.0..=100.0).contains(&c.threshold) => {
            return Err(ConfigError::Invalid(
                "HumidityPct threshold out of [0, 100]".into(),
            ))
        }
        _ => {}
    }
    Ok(())
}

/// Configuration load/validation failure. Hand-written `Display` rather
/// than a `thiserror` derive, since this error never leaves the host
/// process.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "config invalid: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads and validates configuration from `path`. On any failure, logs
/// the reason and returns [`SystemConfig::default`] so the instrument
/// always boots into a safe, known configuration rather than refusing to
/// start.
pub fn load_config_or_default(path: &Path) -> SystemConfig {
    match load_config(path) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, path = %path.display(), "falling back to default configuration");
            SystemConfig::default()
        }
    }
}

pub fn load_config(path: &Path) -> Result<SystemConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    load_config_from_str(&text)
}

pub fn load_config_from_str(text: &str) -> Result<SystemConfig, ConfigError> {
    let cfg: SystemConfig = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}
