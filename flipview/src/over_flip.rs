//! Boundary damping for drags past the first or last page.

const MAX_OVER_FLIP_DISTANCE: f32 = 70.0;

/// Visual treatment for drags past the collection boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverFlipMode {
    /// Displayed distance stops exactly at the boundary; the push past it is
    /// reported so the host can drive an edge-glow affordance.
    #[default]
    Glow,
    /// Displayed distance trails past the boundary with a bounded, concave
    /// response.
    RubberBand,
}

/// Payload delivered to the over-flip listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverFlipEvent {
    /// Damping mode in effect.
    pub mode: OverFlipMode,
    /// True when the drag pushed past the start boundary, false past the end.
    pub past_start: bool,
    /// Magnitude of the cumulative over-travel; zero in the event that marks
    /// the drag returning in range.
    pub distance: f32,
    /// Distance units per page, for normalizing `distance`.
    pub distance_per_page: f32,
}

/// Tracks cumulative over-travel past a boundary and derives the damped
/// distance to display.
#[derive(Debug)]
pub(crate) struct OverFlipper {
    mode: OverFlipMode,
    total: f32,
}

impl OverFlipper {
    pub(crate) fn new(mode: OverFlipMode) -> Self {
        Self { mode, total: 0.0 }
    }

    pub(crate) fn mode(&self) -> OverFlipMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: OverFlipMode) {
        self.mode = mode;
        self.total = 0.0;
    }

    /// Maps a raw distance onto the damped distance to display.
    ///
    /// In-range input passes through untouched. Out-of-range input folds the
    /// travel since the previous displayed value into the running total and
    /// derives the new displayed value from it.
    pub(crate) fn calculate(&mut self, raw: f32, min: f32, max: f32) -> f32 {
        if (min..=max).contains(&raw) {
            return raw;
        }
        let previous = self
            .displayed(min, max)
            .unwrap_or_else(|| raw.clamp(min, max));
        self.total += raw - previous;
        self.displayed(min, max)
            .unwrap_or_else(|| raw.clamp(min, max))
    }

    /// Signed cumulative over-travel; negative past the start boundary.
    pub(crate) fn total_over_flip(&self) -> f32 {
        self.total
    }

    /// Ends the over-flip interaction and resets the running total.
    pub(crate) fn over_flip_ended(&mut self) {
        self.total = 0.0;
    }

    fn displayed(&self, min: f32, max: f32) -> Option<f32> {
        match self.mode {
            OverFlipMode::Glow => match self.total {
                t if t > 0.0 => Some(max),
                t if t < 0.0 => Some(min),
                _ => None,
            },
            OverFlipMode::RubberBand => match self.total {
                t if t > 0.0 => Some(max + damp_curve(t)),
                t if t < 0.0 => Some(min - damp_curve(-t)),
                _ => None,
            },
        }
    }
}

// Concave response, bounded by MAX_OVER_FLIP_DISTANCE. The bound stays below
// half a page so a damped distance can never round to a neighboring index.
fn damp_curve(excess: f32) -> f32 {
    MAX_OVER_FLIP_DISTANCE * excess / (MAX_OVER_FLIP_DISTANCE + excess)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: f32 = 720.0;

    #[test]
    fn in_range_input_passes_through_unchanged() {
        for mode in [OverFlipMode::Glow, OverFlipMode::RubberBand] {
            let mut flipper = OverFlipper::new(mode);
            for raw in [0.0, 1.0, 90.0, 359.5, MAX] {
                assert_eq!(flipper.calculate(raw, 0.0, MAX), raw);
            }
            assert_eq!(flipper.total_over_flip(), 0.0);
        }
    }

    #[test]
    fn glow_clamps_and_accumulates_travel() {
        let mut flipper = OverFlipper::new(OverFlipMode::Glow);
        assert_eq!(flipper.calculate(MAX + 30.0, 0.0, MAX), MAX);
        assert_eq!(flipper.total_over_flip(), 30.0);
        // the stored distance is now MAX, so further drag arrives on top of it
        assert_eq!(flipper.calculate(MAX + 15.0, 0.0, MAX), MAX);
        assert_eq!(flipper.total_over_flip(), 45.0);
        flipper.over_flip_ended();
        assert_eq!(flipper.total_over_flip(), 0.0);
    }

    #[test]
    fn glow_reports_negative_total_past_start() {
        let mut flipper = OverFlipper::new(OverFlipMode::Glow);
        assert_eq!(flipper.calculate(-25.0, 0.0, MAX), 0.0);
        assert_eq!(flipper.total_over_flip(), -25.0);
    }

    #[test]
    fn rubber_band_is_monotonic_and_sublinear() {
        let samples = [10.0, 40.0, 120.0, 500.0, 4000.0];
        let mut last = 0.0;
        for excess in samples {
            let mut flipper = OverFlipper::new(OverFlipMode::RubberBand);
            let displayed = flipper.calculate(MAX + excess, 0.0, MAX);
            let over = displayed - MAX;
            assert!(over > last, "over {over} at excess {excess}");
            assert!(over < excess, "over {over} not sublinear at {excess}");
            assert!(over < MAX_OVER_FLIP_DISTANCE);
            last = over;
        }
    }

    #[test]
    fn rubber_band_tracks_finger_travel_incrementally() {
        let mut flipper = OverFlipper::new(OverFlipMode::RubberBand);
        let first = flipper.calculate(MAX + 20.0, 0.0, MAX);
        assert!(first > MAX && first < MAX + 20.0);
        assert_eq!(flipper.total_over_flip(), 20.0);
        // next candidate is relative to the damped value, not the raw one
        let second = flipper.calculate(first + 30.0, 0.0, MAX);
        assert!(second > first);
        assert!((flipper.total_over_flip() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn rubber_band_damps_past_start_symmetrically() {
        let mut flipper = OverFlipper::new(OverFlipMode::RubberBand);
        let displayed = flipper.calculate(-20.0, 0.0, MAX);
        assert!(displayed < 0.0 && displayed > -20.0);
        assert_eq!(flipper.total_over_flip(), -20.0);

        let mut mirror = OverFlipper::new(OverFlipMode::RubberBand);
        let mirrored = mirror.calculate(MAX + 20.0, 0.0, MAX);
        assert!((displayed + (mirrored - MAX)).abs() < 1e-3);
    }
}
