//! Deadline-based 1 Hz scheduler.
//!
//! Deadline-advance-and-sleep, but cooperative rather than overrun-fatal:
//! a cutdown instrument tick that runs long must still produce a cut
//! decision next tick, not abort the process.

use std::time::Duration;

#[cfg(not(feature = "rt"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Ticks are nominally 1 Hz; `snap-forward` discards accumulated lag past
/// this many seconds instead of reporting an unbounded catch-up.
const MAX_CATCHUP_S: u32 = 10;

/// Deadline-based scheduler for the 1 Hz control tick.
///
/// `tick` is the literal, free-standing contract: callers drive it with a
/// millisecond clock reading and get back how many whole seconds to apply
/// this cycle, or `None` if the deadline has not yet arrived. Everything
/// else (`wait_for_next_tick`) is just a convenience loop built on top.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    tick_count: u64,
    deadline_ms: Option<u32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            tick_count: 0,
            deadline_ms: None,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// On the first call, primes `deadline_ms = now_ms + 1000` and returns
    /// `None`. After that, compares via signed subtraction
    /// `(now_ms - deadline_ms) as i32` so the comparison survives a 32-bit
    /// millisecond wrap. A negative diff means the deadline has not been
    /// reached. Otherwise computes elapsed whole seconds
    /// `e = 1 + diff / 1000`, advances `deadline_ms += e * 1000`, and
    /// returns `Some(min(e, 0xFFFF))`. When `e > MAX_CATCHUP_S`, snaps
    /// `deadline_ms = now_ms + 1000` instead, so a long stall does not
    /// leave the scheduler owing an unbounded run of catch-up ticks.
    pub fn tick(&mut self, now_ms: u32) -> Option<u16> {
        let deadline = match self.deadline_ms {
            None => {
                self.deadline_ms = Some(now_ms.wrapping_add(1000));
                return None;
            }
            Some(d) => d,
        };

        let diff = now_ms.wrapping_sub(deadline) as i32;
        if diff < 0 {
            return None;
        }

        let e = 1 + (diff as u32) / 1000;
        if e > MAX_CATCHUP_S {
            tracing::warn!(elapsed_s = e, "scheduler deadline snapped forward after a stall");
            self.deadline_ms = Some(now_ms.wrapping_add(1000));
        } else {
            self.deadline_ms = Some(deadline.wrapping_add(e.wrapping_mul(1000)));
        }
        self.tick_count += 1;
        Some(e.min(0xFFFF_u32) as u16)
    }

    /// Milliseconds since the Unix epoch, truncated to `u32` (wraps, the
    /// same domain `tick` is built to survive). Off the `rt` feature this
    /// is a plain wall-clock reading; under `rt` it is `CLOCK_MONOTONIC`.
    #[cfg(not(feature = "rt"))]
    fn now_ms_wall() -> u32 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_millis() as u32
    }

    #[cfg(feature = "rt")]
    fn now_ms_wall() -> u32 {
        use nix::time::{clock_gettime, ClockId};
        let ts = clock_gettime(ClockId::CLOCK_MONOTONIC).expect("CLOCK_MONOTONIC unavailable");
        (ts.tv_sec() as u64 * 1000 + ts.tv_nsec() as u64 / 1_000_000) as u32
    }

    /// Blocks until the next tick boundary and returns the elapsed whole
    /// seconds to apply. Polls `tick` against the wall clock, sleeping
    /// briefly between misses rather than busy-spinning.
    pub fn wait_for_next_tick(&mut self) -> u16 {
        let poll = if cfg!(feature = "rt") {
            Duration::from_millis(5)
        } else {
            Duration::from_millis(20)
        };
        loop {
            let now_ms = Self::now_ms_wall();
            if let Some(elapsed_s) = self.tick(now_ms) {
                return elapsed_s;
            }
            std::thread::sleep(poll);
        }
    }
}

/// Milliseconds-since-power-on counter. Wraps at `u32::MAX` back to 0
/// rather than panicking; downstream consumers that diff timestamps must
/// account for the wrap (see `termination` sustain accounting).
#[derive(Debug, Clone, Copy, Default)]
pub struct MillisClock {
    now_ms: u32,
}

impl MillisClock {
    pub fn new() -> Self {
        MillisClock { now_ms: 0 }
    }

    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    pub fn advance_ms(&mut self, delta_ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(delta_ms);
    }
}
