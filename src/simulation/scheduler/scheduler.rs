//! Frame scheduler: owns the clock subscription and turns host timestamps
//! into frame deltas.

use tracing::trace;

use crate::host::FrameClock;

/// Largest delta handed to a kernel; longer host stalls are clamped
pub const MAX_FRAME_DELTA_SECS: f32 = 0.5;

#[derive(Debug, Default)]
pub struct FrameScheduler {
    running: bool,
    last_tick: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Subscribe to the clock. A no-op while already running.
    pub fn start<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> bool {
        if self.running {
            return false;
        }
        clock.subscribe();
        self.running = true;
        self.last_tick = None;
        trace!("frame scheduler subscribed");
        true
    }

    /// Unsubscribe from the clock. A no-op while already stopped.
    pub fn stop<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> bool {
        if !self.running {
            return false;
        }
        clock.unsubscribe();
        self.running = false;
        self.last_tick = None;
        trace!("frame scheduler unsubscribed");
        true
    }

    /// Seconds since the previous tick, or `None` when stopped.
    ///
    /// The first tick after `start` yields 0. Timestamps going backwards or
    /// non-finite timestamps also yield 0.
    pub fn advance(&mut self, now_secs: f64) -> Option<f32> {
        if !self.running {
            return None;
        }
        if !now_secs.is_finite() {
            return Some(0.0);
        }
        let dt = match self.last_tick {
            Some(prev) => ((now_secs - prev).max(0.0) as f32).min(MAX_FRAME_DELTA_SECS),
            None => 0.0,
        };
        self.last_tick = Some(now_secs);
        Some(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingClock {
        subscribed: u32,
        unsubscribed: u32,
    }

    impl FrameClock for CountingClock {
        fn subscribe(&mut self) {
            self.subscribed += 1;
        }

        fn unsubscribe(&mut self) {
            self.unsubscribed += 1;
        }
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut clock = CountingClock::default();
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.start(&mut clock));
        assert!(!scheduler.start(&mut clock));
        assert_eq!(clock.subscribed, 1);
        assert!(scheduler.stop(&mut clock));
        assert!(!scheduler.stop(&mut clock));
        assert_eq!(clock.unsubscribed, 1);
    }

    #[test]
    fn first_delta_is_zero_and_later_ones_are_clamped() {
        let mut clock = CountingClock::default();
        let mut scheduler = FrameScheduler::new();
        assert_eq!(scheduler.advance(1.0), None);

        scheduler.start(&mut clock);
        assert_eq!(scheduler.advance(10.0), Some(0.0));
        let dt = scheduler.advance(10.016).unwrap();
        assert!((dt - 0.016).abs() < 1e-5);
        assert_eq!(scheduler.advance(30.0), Some(MAX_FRAME_DELTA_SECS));
        assert_eq!(scheduler.advance(29.0), Some(0.0));
        assert_eq!(scheduler.advance(f64::NAN), Some(0.0));
    }

    #[test]
    fn restart_forgets_the_previous_timestamp() {
        let mut clock = CountingClock::default();
        let mut scheduler = FrameScheduler::new();
        scheduler.start(&mut clock);
        scheduler.advance(1.0);
        scheduler.stop(&mut clock);
        scheduler.start(&mut clock);
        assert_eq!(scheduler.advance(5.0), Some(0.0));
    }
}
