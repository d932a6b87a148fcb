//! Sticky per-source fault latches with compile-time severity.
//!
//! Grounded on `evo_common::control_unit::error`'s bitflag +
//! `CRITICAL_MASK` + `has_critical()` idiom: once a source is marked, it
//! stays active until explicitly cleared (a fresh reading no longer
//! failing does not self-heal the registry).

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ErrorMask: u8 {
        const ENVIRONMENTAL_SENSOR = 1 << 0;
        const STORAGE_MISSING      = 1 << 1;
        const STORAGE_IO           = 1 << 2;
        const GPS_LINK             = 1 << 3;
        const UPLINK_MODEM         = 1 << 4;
        const UNSPECIFIED          = 1 << 5;
    }
}

/// Sources the instrument actively monitors. Each maps to exactly one bit
/// of [`ErrorMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    EnvironmentalSensor,
    StorageMissing,
    StorageIo,
    GpsLink,
    UplinkModem,
    Unspecified,
}

impl ErrorSource {
    const ALL: [ErrorSource; 6] = [
        ErrorSource::EnvironmentalSensor,
        ErrorSource::StorageMissing,
        ErrorSource::StorageIo,
        ErrorSource::GpsLink,
        ErrorSource::UplinkModem,
        ErrorSource::Unspecified,
    ];

    fn bit(self) -> ErrorMask {
        match self {
            ErrorSource::EnvironmentalSensor => ErrorMask::ENVIRONMENTAL_SENSOR,
            ErrorSource::StorageMissing => ErrorMask::STORAGE_MISSING,
            ErrorSource::StorageIo => ErrorMask::STORAGE_IO,
            ErrorSource::GpsLink => ErrorMask::GPS_LINK,
            ErrorSource::UplinkModem => ErrorMask::UPLINK_MODEM,
            ErrorSource::Unspecified => ErrorMask::UNSPECIFIED,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).expect("exhaustive")
    }

    pub const fn severity(self) -> Severity {
        match self {
            ErrorSource::StorageMissing => Severity::Warn,
            _ => Severity::Critical,
        }
    }
}

/// A storage-missing condition is a logging-capability loss, not a
/// flight-safety one, so it alone never blocks launch/cut/termination
/// logic; every other source is Critical.
const CRITICAL_MASK: ErrorMask = ErrorMask::ENVIRONMENTAL_SENSOR
    .union(ErrorMask::STORAGE_IO)
    .union(ErrorMask::GPS_LINK)
    .union(ErrorMask::UPLINK_MODEM)
    .union(ErrorMask::UNSPECIFIED);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    None,
    Warn,
    Critical,
}

/// Sticky fault registry. `set` latches a source active; only an explicit
/// `clear` (operator action / reinit) removes it.
#[derive(Debug, Clone, Default)]
pub struct ErrorRegistry {
    active: ErrorMask,
    first_seen_ms: [Option<u32>; 6],
}

impl ErrorRegistry {
    pub fn new() -> Self {
        ErrorRegistry {
            active: ErrorMask::empty(),
            first_seen_ms: [None; 6],
        }
    }

    pub fn set(&mut self, source: ErrorSource, now_ms: u32) {
        let idx = source.index();
        if !self.active.contains(source.bit()) {
            self.first_seen_ms[idx] = Some(now_ms);
        }
        self.active.insert(source.bit());
    }

    pub fn clear(&mut self, source: ErrorSource) {
        self.active.remove(source.bit());
        self.first_seen_ms[source.index()] = None;
    }

    pub fn is_active(&self, source: ErrorSource) -> bool {
        self.active.contains(source.bit())
    }

    pub fn first_seen_ms(&self, source: ErrorSource) -> Option<u32> {
        self.first_seen_ms[source.index()]
    }

    pub fn any_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn any_critical(&self) -> bool {
        self.active.intersects(CRITICAL_MASK)
    }

    pub fn severity(&self) -> Severity {
        if self.any_critical() {
            Severity::Critical
        } else if self.any_active() {
            Severity::Warn
        } else {
            Severity::None
        }
    }
}
