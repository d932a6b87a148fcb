//! Ties the per-tick pipeline together: read collaborators, run the
//! decision core, write telemetry/log output.
//!
//! Grounded on `evo_control_unit::cycle::CycleRunner`'s three-phase
//! READ -> PROCESS -> WRITE cycle body and its `run()`/`run_rt_loop()`/
//! `run_sim_loop()` split.

use crate::clock::{MillisClock, Scheduler};
use crate::collaborators::{ConfigSource, FlightRecorder, ReleaseActuator, SensorSource, UplinkSource};
use crate::config::SystemConfig;
use crate::cut::{self, CutInputs};
use crate::error_registry::{ErrorRegistry, ErrorSource};
use crate::launch::LaunchDetector;
use crate::log::LogRecord;
use crate::readings::{Readings, Sample};
use crate::release::{ReleaseLatch, ReleaseOutcome};
use crate::rules::RuleEngine;
use crate::state::FlightStateMachine;
use crate::telemetry;
use crate::termination::TerminationDetector;
use crate::types::{CutReason, FlightState, SystemMode, VariableId};

/// Public, per-tick telemetry/log snapshot. Distinct from the internal
/// detector/latch state: this is what the rest of the system is allowed
/// to observe.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeState {
    pub flight_state: FlightState,
    pub system_mode: SystemMode,
    pub t_power_s: u32,
    pub launch_detected: bool,
    pub launch_ms: Option<u32>,
    pub t_launch_s: u32,
    pub cut_fired: bool,
    pub cut_reason: CutReason,
    pub cut_ms: Option<u32>,
    pub terminated: bool,
    pub terminated_ms: Option<u32>,
    pub t_terminated_s: u32,
    pub peak_alt_m: Option<f32>,
    pub min_pressure_hpa: Option<f32>,
    pub descent_count_s: u16,
}

/// Owns the full decision pipeline and drives it one tick at a time.
/// Generic over its four collaborators so the tick path is monomorphized
/// and allocation-free rather than paying for dynamic dispatch.
pub struct CycleRunner<S, U, A, R> {
    config: SystemConfig,
    scheduler: Scheduler,
    clock: MillisClock,

    sensors: S,
    uplink: U,
    actuator: A,
    recorder: R,

    launch_detector: LaunchDetector,
    termination_detector: TerminationDetector,
    rule_engine: RuleEngine,
    release_latch: ReleaseLatch,
    flight_machine: FlightStateMachine,
    error_registry: ErrorRegistry,

    runtime: RuntimeState,
    seconds_since_last_record: u32,
    pending_manual_cut: bool,
}

impl<S, U, A, R> CycleRunner<S, U, A, R>
where
    S: SensorSource,
    U: UplinkSource,
    A: ReleaseActuator,
    R: FlightRecorder,
{
    pub fn new(config: SystemConfig, sensors: S, uplink: U, actuator: A, recorder: R) -> Self {
        let rule_engine = RuleEngine::new(config.bucket_a_fixed(), config.bucket_b_fixed());
        CycleRunner {
            config,
            scheduler: Scheduler::new(),
            clock: MillisClock::new(),
            sensors,
            uplink,
            actuator,
            recorder,
            launch_detector: LaunchDetector::new(),
            termination_detector: TerminationDetector::new(),
            rule_engine,
            release_latch: ReleaseLatch::new(),
            flight_machine: FlightStateMachine::new(),
            error_registry: ErrorRegistry::new(),
            runtime: RuntimeState::default(),
            seconds_since_last_record: 0,
            pending_manual_cut: false,
        }
    }

    /// Reloads configuration from `source`. Only meaningful while in
    /// `SystemMode::Config` and before flight; the decision pipeline is
    /// fully inactive on that path, so this never runs mid-decision.
    pub fn reload_config(&mut self, source: &dyn ConfigSource) {
        let config = source.load();
        self.rule_engine = RuleEngine::new(config.bucket_a_fixed(), config.bucket_b_fixed());
        self.config = config;
    }

    pub fn set_system_mode(&mut self, mode: SystemMode) {
        self.runtime.system_mode = mode;
    }

    /// Requests a manual cut. Consumed (edge-triggered) by the next
    /// `cycle_body` call regardless of when it was requested.
    pub fn request_manual_cut(&mut self) {
        self.pending_manual_cut = true;
    }

    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    /// Runs forever, blocking on the scheduler between ticks. Exits only
    /// on an unrecoverable collaborator error.
    pub fn run(&mut self) -> ! {
        loop {
            let elapsed_s = self.scheduler.wait_for_next_tick();
            self.cycle_body(elapsed_s as u32);
        }
    }

    /// One READ -> PROCESS -> WRITE pass. `elapsed_s` is the whole number
    /// of seconds the scheduler reports since the previous tick (normally
    /// 1; larger after a stall).
    pub fn cycle_body(&mut self, elapsed_s: u32) {
        self.clock.advance_ms(elapsed_s.saturating_mul(1000));
        let now_ms = self.clock.now_ms();

        // READ
        let frame = self.sensors.read();
        let uplink_line = self.uplink.poll_command();

        // PROCESS
        self.update_error_registry(&frame, now_ms);
        let readings = self.build_readings(&frame, elapsed_s);

        self.runtime.t_power_s = self.runtime.t_power_s.saturating_add(elapsed_s);

        if self.runtime.system_mode == SystemMode::Config {
            // Decision pipeline is fully inactive in Config mode; only the
            // clock/error bookkeeping above still runs so a live UI has
            // something to show.
            return;
        }

        let any_critical = self.error_registry.any_critical();

        let launch_update = self.launch_detector.update(&readings, any_critical);
        if launch_update.just_latched {
            self.runtime.launch_ms = Some(now_ms);
        }
        if let Some(launch_ms) = self.runtime.launch_ms {
            self.runtime.t_launch_s = now_ms.wrapping_sub(launch_ms) / 1000;
        }

        if self.flight_machine.current() == FlightState::InFlight {
            let term_update =
                self.termination_detector
                    .update(&readings, &self.config.termination, any_critical);
            if term_update.just_terminated {
                self.runtime.terminated_ms = Some(now_ms);
            }
        }
        if let Some(terminated_ms) = self.runtime.terminated_ms {
            self.runtime.t_terminated_s = now_ms.wrapping_sub(terminated_ms) / 1000;
        }
        self.runtime.peak_alt_m = self.termination_detector.peak_alt_m();
        self.runtime.min_pressure_hpa = self.termination_detector.min_pressure_hpa();
        self.runtime.descent_count_s = self.termination_detector.descent_ticks();

        let transition = self
            .flight_machine
            .update(self.launch_detector.latched(), self.termination_detector.terminated());
        self.runtime.flight_state = transition.state;
        self.runtime.launch_detected = self.launch_detector.latched();
        self.runtime.terminated = self.termination_detector.terminated();

        let gates_pass = (!self.config.cut_gates.require_launch_before_cut || self.runtime.launch_detected)
            && (!self.config.cut_gates.require_gps_fix_before_cut || readings.gps_fix_present());

        let rule_eval = self.rule_engine.evaluate(&readings, gates_pass);
        let bucket_logic_triggered = gates_pass && rule_eval.bucket_a && rule_eval.bucket_b;

        let external_input_active = self.external_input_active(&readings);

        let remote_cut_requested = self.config.remote_cut.enabled
            && uplink_line
                .as_deref()
                .map(|line| crate::uplink::parse_cut_command(line, self.config.serial_number, &self.config.remote_cut.token))
                .unwrap_or(false);

        let manual_cut_requested = std::mem::take(&mut self.pending_manual_cut);

        if !self.release_latch.released() {
            let decision = cut::decide(CutInputs {
                external_input_active,
                remote_cut_requested,
                bucket_logic_triggered,
                manual_cut_requested,
            });
            if let Some(reason) = decision {
                if self.release_latch.release() == ReleaseOutcome::Fired {
                    self.actuator.fire_release();
                    self.runtime.cut_fired = true;
                    self.runtime.cut_reason = reason;
                    self.runtime.cut_ms = Some(now_ms);

                    // A cut implies termination even if sustained
                    // descent was never independently confirmed.
                    self.termination_detector.force_terminate();
                    self.runtime.terminated = true;
                    self.runtime.terminated_ms.get_or_insert(now_ms);
                    self.runtime.t_terminated_s = 0;
                    let transition = self.flight_machine.update(self.launch_detector.latched(), true);
                    self.runtime.flight_state = transition.state;
                }
            }
        }

        // WRITE
        self.maybe_record(&readings, elapsed_s);
    }

    /// Errors are clearable when the underlying condition resolves: each
    /// source is set or cleared every tick from the current collaborator
    /// health, rather than latched forever once seen. `launch_detected`,
    /// `terminated`, and `cut_fired` never un-latch from this, since they
    /// are driven by `any_critical()` only at the moment they'd latch.
    fn update_error_registry(&mut self, frame: &crate::collaborators::SensorFrame, now_ms: u32) {
        Self::sync_error_source(
            &mut self.error_registry,
            ErrorSource::EnvironmentalSensor,
            frame.environmental_sensor_ok,
            now_ms,
        );
        Self::sync_error_source(&mut self.error_registry, ErrorSource::GpsLink, frame.gps_link_ok, now_ms);
        Self::sync_error_source(
            &mut self.error_registry,
            ErrorSource::UplinkModem,
            self.uplink.modem_ok(),
            now_ms,
        );
        Self::sync_error_source(
            &mut self.error_registry,
            ErrorSource::StorageMissing,
            self.recorder.storage_present(),
            now_ms,
        );
    }

    fn sync_error_source(registry: &mut ErrorRegistry, source: ErrorSource, healthy: bool, now_ms: u32) {
        if healthy {
            registry.clear(source);
        } else {
            registry.set(source, now_ms);
        }
    }

    fn build_readings(&self, frame: &crate::collaborators::SensorFrame, tick_ms_hint: u32) -> Readings {
        let mut readings = Readings::default();
        readings.set(
            VariableId::TPowerS,
            Sample {
                value: self.runtime.t_power_s as f32,
                valid: true,
            },
        );
        readings.set(
            VariableId::TLaunchS,
            Sample {
                value: self.runtime.t_launch_s as f32,
                valid: self.runtime.launch_detected,
            },
        );
        readings.set(VariableId::GpsAltM, optional_sample(frame.gps_alt_m));
        readings.set(VariableId::GpsLatDeg, optional_sample(frame.gps_lat_deg));
        readings.set(VariableId::GpsLonDeg, optional_sample(frame.gps_lon_deg));
        readings.set(
            VariableId::GpsFix,
            Sample {
                value: if frame.gps_fix { 1.0 } else { 0.0 },
                valid: true,
            },
        );
        readings.set(VariableId::PressureHpa, optional_sample(frame.pressure_hpa));
        readings.set(VariableId::TempC, optional_sample(frame.temp_c));
        readings.set(VariableId::HumidityPct, optional_sample(frame.humidity_pct));

        let tick_ms = tick_ms_hint.saturating_mul(1000).max(1000);
        let mut logical_raw = [false; 2];
        for i in 0..2 {
            logical_raw[i] = if self.config.external_inputs[i].active_high {
                frame.external_input_raw[i]
            } else {
                !frame.external_input_raw[i]
            };
        }
        readings.debounce_inputs(logical_raw, &self.config.external_inputs, tick_ms);
        readings
    }

    fn external_input_active(&self, readings: &Readings) -> bool {
        (0..2).any(|i| self.config.external_inputs[i].enabled && readings.inputs[i].debounced_active)
    }

    fn maybe_record(&mut self, readings: &Readings, elapsed_s: u32) {
        let interval = telemetry::select_interval_s(
            self.runtime.launch_detected,
            self.runtime.terminated,
            self.runtime.t_terminated_s,
            &self.config.telemetry,
        );
        if interval == 0 {
            return;
        }
        self.seconds_since_last_record = self.seconds_since_last_record.saturating_add(elapsed_s);
        if self.seconds_since_last_record < interval {
            return;
        }
        self.seconds_since_last_record = 0;

        let record = LogRecord {
            t_power_s: self.runtime.t_power_s,
            launch_detected: self.runtime.launch_detected,
            terminated: self.runtime.terminated,
            cut_fired: self.runtime.cut_fired,
            cut_reason: self.runtime.cut_reason,
            gps_fix: readings.gps_fix_present(),
            gps_lat_deg: sample_or_nan(readings.get(VariableId::GpsLatDeg)),
            gps_lon_deg: sample_or_nan(readings.get(VariableId::GpsLonDeg)),
            gps_alt_m: sample_or_nan(readings.get(VariableId::GpsAltM)),
            pressure_hpa: sample_or_nan(readings.get(VariableId::PressureHpa)),
            temp_c: sample_or_nan(readings.get(VariableId::TempC)),
            humidity_pct: sample_or_nan(readings.get(VariableId::HumidityPct)),
        };
        if let Err(err) = self.recorder.record(&record) {
            tracing::error!(?err, "flight recorder write failed");
            self.error_registry.set(ErrorSource::StorageIo, self.clock.now_ms());
        }
    }
}

fn optional_sample(value: Option<f32>) -> Sample {
    match value {
        Some(v) => Sample { value: v, valid: true },
        None => Sample { value: 0.0, valid: false },
    }
}

fn sample_or_nan(sample: Sample) -> f32 {
    if sample.usable() {
        sample.value
    } else {
        LogRecord::INVALID
    }
}
