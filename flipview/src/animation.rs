//! Settle and peek animations driving the flip distance.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::flip_view::FLIP_DISTANCE_PER_PAGE;

const MAX_SINGLE_PAGE_FLIP_ANIM_DURATION: Duration = Duration::from_millis(300);
const PEEK_ANIM_DURATION: Duration = Duration::from_millis(600);

/// Flip duration scaled by the square root of the span; one full page takes
/// the 300 ms single-page duration, shorter flips proportionally less.
pub(crate) fn flip_duration(delta: f32) -> Duration {
    MAX_SINGLE_PAGE_FLIP_ANIM_DURATION.mul_f32((delta.abs() / FLIP_DISTANCE_PER_PAGE).sqrt())
}

#[derive(Debug, Clone, Copy)]
struct Settle {
    start: f32,
    target: f32,
    started_at: Instant,
    duration: Duration,
}

impl Settle {
    fn value_at(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            return (self.target, true);
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.start + (self.target - self.start) * decelerate(t), false)
    }
}

#[derive(Debug, Clone, Copy)]
struct Peek {
    base: f32,
    amplitude: f32,
    once: bool,
    started_at: Instant,
}

impl Peek {
    fn value_at(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        let legs = elapsed.as_secs_f32() / PEEK_ANIM_DURATION.as_secs_f32();
        let leg = legs as u64;
        // "once" is an out leg and a back leg, ending exactly at the base
        if self.once && leg >= 2 {
            return (self.base, true);
        }
        let within = legs - leg as f32;
        let t = if leg % 2 == 0 { within } else { 1.0 - within };
        (self.base + self.amplitude * accelerate_decelerate(t), false)
    }
}

#[derive(Debug, Clone, Copy)]
enum Animation {
    Settle(Settle),
    Peek(Peek),
}

/// Interpolated result of advancing the active animation.
pub(crate) struct AnimationTick {
    pub(crate) distance: f32,
    pub(crate) finished: bool,
}

/// Runs at most one animation; starting either kind replaces the other.
#[derive(Debug, Default)]
pub(crate) struct AnimationScheduler {
    active: Option<Animation>,
}

impl AnimationScheduler {
    pub(crate) fn start_settle(&mut self, start: f32, target: f32, now: Instant) {
        let duration = flip_duration(target - start);
        debug!(start, target, ?duration, "settle animation started");
        self.active = Some(Animation::Settle(Settle {
            start,
            target,
            started_at: now,
            duration,
        }));
    }

    pub(crate) fn start_peek(&mut self, base: f32, amplitude: f32, once: bool, now: Instant) {
        debug!(base, amplitude, once, "peek animation started");
        self.active = Some(Animation::Peek(Peek {
            base,
            amplitude,
            once,
            started_at: now,
        }));
    }

    /// Stops whatever runs; returns whether something was running.
    pub(crate) fn cancel(&mut self) -> bool {
        let was_running = self.active.take().is_some();
        if was_running {
            debug!("animation cancelled");
        }
        was_running
    }

    pub(crate) fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Advances the active animation to `now`, clearing it when it finishes.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<AnimationTick> {
        let (distance, finished) = match self.active? {
            Animation::Settle(settle) => settle.value_at(now),
            Animation::Peek(peek) => peek.value_at(now),
        };
        if finished {
            self.active = None;
        }
        Some(AnimationTick { distance, finished })
    }
}

fn decelerate(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

fn accelerate_decelerate(t: f32) -> f32 {
    (std::f32::consts::PI * (t + 1.0)).cos() / 2.0 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn duration_scales_with_square_root_of_span() {
        assert_eq!(flip_duration(0.0), Duration::ZERO);
        assert_eq!(flip_duration(180.0), Duration::from_millis(300));
        assert_eq!(flip_duration(-180.0), Duration::from_millis(300));
        assert_eq!(flip_duration(45.0), Duration::from_millis(150));
        assert_eq!(flip_duration(720.0), Duration::from_millis(600));
    }

    #[test]
    fn settle_decelerates_to_an_exact_finish() {
        let base = Instant::now();
        let mut scheduler = AnimationScheduler::default();
        scheduler.start_settle(0.0, 180.0, base);

        let early = scheduler.tick(at(base, 75)).expect("running");
        assert!(!early.finished);
        // decelerate curve covers more than linear ground early on
        assert!(early.distance > 45.0 && early.distance < 180.0);

        let later = scheduler.tick(at(base, 200)).expect("running");
        assert!(later.distance > early.distance);

        let done = scheduler.tick(at(base, 300)).expect("running");
        assert!(done.finished);
        assert_eq!(done.distance, 180.0);
        assert!(scheduler.tick(at(base, 310)).is_none());
    }

    #[test]
    fn zero_length_settle_finishes_immediately() {
        let base = Instant::now();
        let mut scheduler = AnimationScheduler::default();
        scheduler.start_settle(90.0, 90.0, base);
        let tick = scheduler.tick(base).expect("running");
        assert!(tick.finished);
        assert_eq!(tick.distance, 90.0);
    }

    #[test]
    fn peek_once_goes_out_and_comes_back() {
        let base = Instant::now();
        let mut scheduler = AnimationScheduler::default();
        scheduler.start_peek(360.0, 45.0, true, base);

        let mid_out = scheduler.tick(at(base, 300)).expect("running");
        assert!((mid_out.distance - 382.5).abs() < 0.1);

        let peak = scheduler.tick(at(base, 600)).expect("running");
        assert!((peak.distance - 405.0).abs() < 0.1);

        let mid_back = scheduler.tick(at(base, 900)).expect("running");
        assert!((mid_back.distance - 382.5).abs() < 0.1);

        let done = scheduler.tick(at(base, 1200)).expect("running");
        assert!(done.finished);
        assert_eq!(done.distance, 360.0);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn repeating_peek_runs_until_cancelled() {
        let base = Instant::now();
        let mut scheduler = AnimationScheduler::default();
        scheduler.start_peek(180.0, -45.0, false, base);

        let third_leg = scheduler.tick(at(base, 1500)).expect("running");
        assert!(!third_leg.finished);
        assert!((third_leg.distance - 157.5).abs() < 0.1);

        assert!(scheduler.cancel());
        assert!(!scheduler.is_running());
        assert!(scheduler.tick(at(base, 1600)).is_none());
    }

    #[test]
    fn starting_one_animation_replaces_the_other() {
        let base = Instant::now();
        let mut scheduler = AnimationScheduler::default();
        scheduler.start_peek(0.0, 45.0, false, base);
        scheduler.start_settle(10.0, 190.0, base);
        let tick = scheduler.tick(at(base, 300)).expect("running");
        assert!(tick.finished);
        assert_eq!(tick.distance, 190.0);
    }
}
