//! Core value types shared across the decision pipeline.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the flight. Monotonic: `Ground` → `InFlight` →
/// `Terminated`, never regresses within a power cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlightState {
    Ground = 0,
    InFlight = 1,
    Terminated = 2,
}

impl FlightState {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for FlightState {
    fn default() -> Self {
        FlightState::Ground
    }
}

/// Operating mode, orthogonal to [`FlightState`]. While `Config`, the
/// decision pipeline (launch/termination/rules/cut) does not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemMode {
    Normal,
    Config,
}

impl Default for SystemMode {
    fn default() -> Self {
        SystemMode::Normal
    }
}

/// Why the release actuator was fired. `None` until a cut decision is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutReason {
    None,
    ExternalInput,
    IridiumRemote,
    BucketLogic,
    Manual,
}

impl Default for CutReason {
    fn default() -> Self {
        CutReason::None
    }
}

/// Sensor/derived variable a bucket condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VariableId {
    TPowerS = 0,
    TLaunchS = 1,
    GpsAltM = 2,
    GpsLatDeg = 3,
    GpsLonDeg = 4,
    GpsFix = 5,
    PressureHpa = 6,
    TempC = 7,
    HumidityPct = 8,
}

impl VariableId {
    pub const COUNT: usize = 9;

    pub const ALL: [VariableId; Self::COUNT] = [
        VariableId::TPowerS,
        VariableId::TLaunchS,
        VariableId::GpsAltM,
        VariableId::GpsLatDeg,
        VariableId::GpsLonDeg,
        VariableId::GpsFix,
        VariableId::PressureHpa,
        VariableId::TempC,
        VariableId::HumidityPct,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Variables derived from the power-on clock are always valid; they
    /// have no sensor behind them that can fail.
    pub const fn is_time_domain(self) -> bool {
        matches!(self, VariableId::TPowerS | VariableId::TLaunchS)
    }
}

static_assertions::const_assert_eq!(VariableId::ALL.len(), VariableId::COUNT);

/// Numeric comparison used by a bucket condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl ComparisonOp {
    pub fn evaluate(self, value: f32, threshold: f32) -> bool {
        match self {
            ComparisonOp::Lt => value < threshold,
            ComparisonOp::Le => value <= threshold,
            ComparisonOp::Eq => value == threshold,
            ComparisonOp::Ge => value >= threshold,
            ComparisonOp::Gt => value > threshold,
        }
    }
}
