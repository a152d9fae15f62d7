//! Rolling velocity estimate over the active pointer's axis position.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const SAMPLE_WINDOW: Duration = Duration::from_millis(90);
const IDLE_CUTOFF: Duration = Duration::from_millis(65);

/// Estimates release velocity from absolute position samples kept inside a
/// short rolling window, so only the tail of the gesture counts.
#[derive(Debug, Default)]
pub(crate) struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
}

impl VelocityTracker {
    pub(crate) fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    /// Records the active pointer's position along the flip axis.
    pub(crate) fn push(&mut self, now: Instant, position: f32) {
        self.samples.push_back((now, position));
        self.prune(now);
    }

    /// Velocity in axis units per second; 0.0 once the pointer has stalled
    /// or fewer than two samples remain in the window.
    pub(crate) fn velocity(&mut self, now: Instant) -> f32 {
        self.prune(now);
        let (Some(&(first_at, first_pos)), Some(&(last_at, last_pos))) =
            (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        if now.duration_since(last_at) >= IDLE_CUTOFF {
            return 0.0;
        }
        let elapsed = last_at.duration_since(first_at).as_secs_f32();
        if elapsed <= 0.0 {
            return 0.0;
        }
        (last_pos - first_pos) / elapsed
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&(at, _)) = self.samples.front() {
            if now.duration_since(at) > SAMPLE_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn steady_motion_resolves_to_slope() {
        let base = Instant::now();
        let mut tracker = VelocityTracker::new();
        for step in 0..6u64 {
            tracker.push(at(base, step * 10), step as f32 * 5.0);
        }
        let velocity = tracker.velocity(at(base, 50));
        assert!((velocity - 500.0).abs() < 1.0, "velocity was {velocity}");
    }

    #[test]
    fn stalled_pointer_reads_zero() {
        let base = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.push(at(base, 0), 0.0);
        tracker.push(at(base, 10), 50.0);
        assert_eq!(tracker.velocity(at(base, 80)), 0.0);
    }

    #[test]
    fn old_samples_fall_out_of_the_window() {
        let base = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.push(at(base, 0), 1000.0);
        for step in 0..5u64 {
            tracker.push(at(base, 200 + step * 10), step as f32 * -2.0);
        }
        let velocity = tracker.velocity(at(base, 240));
        assert!((velocity + 200.0).abs() < 1.0, "velocity was {velocity}");
    }

    #[test]
    fn single_sample_and_cleared_tracker_read_zero() {
        let base = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.push(at(base, 0), 42.0);
        assert_eq!(tracker.velocity(at(base, 1)), 0.0);
        tracker.push(at(base, 10), 84.0);
        tracker.clear();
        assert_eq!(tracker.velocity(at(base, 20)), 0.0);
    }
}
