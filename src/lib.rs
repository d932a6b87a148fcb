//! # Cutdown Core
//!
//! Flight control core for a high-altitude balloon cutdown instrument.
//! Provides a deterministic 1 Hz tick that reads a validated sensor
//! snapshot, runs the launch/termination detectors and the bucket-based
//! cut rule engine, and drives a one-shot release latch.
//!
//! ## Architecture Levels
//!
//! 1. **FlightState** — Ground → InFlight → Terminated lifecycle.
//! 2. **SystemMode** — Normal / Config, orthogonal to FlightState.
//! 3. **Readings** — per-tick, validity-tagged sensor + input snapshot.
//! 4. **RuleEngine** — Bucket A (AND) / Bucket B (OR) cut triggers.
//! 5. **ReleaseLatch** — one-shot, irreversible-for-the-power-cycle actuator command.
//!
//! ## Zero-Allocation Tick
//!
//! Bucket conditions and their dwell accumulators live in fixed-size
//! `heapless` vectors sized at load time. The tick path performs no heap
//! allocation once a `CycleRunner` is constructed.

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod cut;
pub mod cycle;
pub mod error_registry;
pub mod launch;
pub mod log;
pub mod readings;
pub mod release;
pub mod rules;
pub mod state;
pub mod telemetry;
pub mod termination;
pub mod types;
pub mod uplink;
