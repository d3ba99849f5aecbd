//! Elapsed-time display for one exercise instance.
//!
//! The timer never counts ticks. Every tick recomputes `now - start` from
//! the clock, so ticks missed while a tab is throttled fix themselves on the
//! next one. The host drives it: it calls [`Timer::poll`] as often as it
//! likes and the timer only re-renders once per interval boundary.
//!
//! A live tick is represented by a [`TickHandle`]. Starting always cancels the
//! previous handle first, so at most one tick source exists per timer and a
//! tick delivered for a cancelled handle is ignored.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use tracing::debug;

/// Milliseconds on the host clock.
pub type Millis = u64;

/// Source of the current time.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Monotonic wall clock measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Clock whose time only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        ManualClock { now: Rc::new(Cell::new(start)) }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Millis) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Handle of the currently scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    generation: u64,
}

/// Render whole seconds as `M:SS`; minutes are unbounded.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone)]
pub struct Timer {
    interval_ms: Millis,
    started_at: Millis,
    next_tick_at: Millis,
    live: Option<TickHandle>,
    generation: u64,
    frozen_secs: u64,
    display: String,
}

impl Timer {
    pub fn new(interval_ms: Millis) -> Self {
        Timer {
            interval_ms: interval_ms.max(1),
            started_at: 0,
            next_tick_at: 0,
            live: None,
            generation: 0,
            frozen_secs: 0,
            display: format_elapsed(0),
        }
    }

    /// Record `now` as the start and schedule the first tick.
    pub fn start(&mut self, now: Millis) -> TickHandle {
        if let Some(old) = self.live.take() {
            debug!(generation = old.generation, "cancelled live tick before restart");
        }
        self.generation += 1;
        let handle = TickHandle { generation: self.generation };
        self.live = Some(handle);
        self.started_at = now;
        self.next_tick_at = now + self.interval_ms;
        self.frozen_secs = 0;
        self.display = format_elapsed(0);
        handle
    }

    /// Cancel the tick and freeze the display at the current elapsed time.
    pub fn stop(&mut self, now: Millis) {
        if self.live.take().is_some() {
            self.frozen_secs = self.secs_since_start(now);
            self.display = format_elapsed(self.frozen_secs);
        }
    }

    pub fn reset(&mut self, now: Millis) -> TickHandle {
        self.stop(now);
        self.start(now)
    }

    /// Deliver one tick. Returns `false` (and changes nothing) for a handle
    /// that is no longer live.
    pub fn tick(&mut self, handle: TickHandle, now: Millis) -> bool {
        if self.live != Some(handle) {
            return false;
        }
        self.display = format_elapsed(self.secs_since_start(now));
        true
    }

    /// Tick if an interval boundary has passed since the last render.
    pub fn poll(&mut self, now: Millis) -> bool {
        let Some(handle) = self.live else {
            return false;
        };
        if now < self.next_tick_at {
            return false;
        }
        let elapsed = now.saturating_sub(self.started_at);
        self.next_tick_at = self.started_at + (elapsed / self.interval_ms + 1) * self.interval_ms;
        self.tick(handle, now)
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    pub fn handle(&self) -> Option<TickHandle> {
        self.live
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn elapsed_secs(&self, now: Millis) -> u64 {
        if self.is_running() {
            self.secs_since_start(now)
        } else {
            self.frozen_secs
        }
    }

    fn secs_since_start(&self, now: Millis) -> u64 {
        now.saturating_sub(self.started_at) / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(9), "0:09");
        assert_eq!(format_elapsed(61), "1:01");
        assert_eq!(format_elapsed(3600), "60:00");
    }

    #[test]
    fn poll_renders_from_timestamp_delta() {
        let mut t = Timer::new(1000);
        t.start(10_000);
        assert!(!t.poll(10_500));
        assert_eq!(t.display(), "0:00");
        assert!(t.poll(11_000));
        assert_eq!(t.display(), "0:01");
        // A long gap (throttled tab) self-corrects on the next tick.
        assert!(t.poll(135_200));
        assert_eq!(t.display(), "2:05");
        assert!(!t.poll(135_900));
        assert!(t.poll(136_000));
        assert_eq!(t.display(), "2:06");
    }

    #[test]
    fn stop_freezes_the_display() {
        let mut t = Timer::new(1000);
        t.start(0);
        t.stop(42_300);
        assert!(!t.is_running());
        assert_eq!(t.display(), "0:42");
        assert!(!t.poll(99_000));
        assert_eq!(t.display(), "0:42");
        assert_eq!(t.elapsed_secs(99_000), 42);
    }

    #[test]
    fn restart_invalidates_the_old_handle() {
        let mut t = Timer::new(1000);
        let first = t.start(0);
        let second = t.start(5_000);
        assert_ne!(first, second);
        assert!(!t.tick(first, 9_000), "stale handle must be ignored");
        assert_eq!(t.display(), "0:00");
        assert!(t.tick(second, 9_000));
        assert_eq!(t.display(), "0:04");
    }

    #[test]
    fn reset_starts_from_zero() {
        let mut t = Timer::new(1000);
        t.start(0);
        t.poll(30_000);
        let handle = t.reset(30_000);
        assert_eq!(t.handle(), Some(handle));
        assert_eq!(t.display(), "0:00");
        assert_eq!(t.elapsed_secs(31_500), 1);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now_ms(), 150);
        other.set(7);
        assert_eq!(clock.now_ms(), 7);
    }
}
