//! Pure render cues for drawing the flip illusion.
//!
//! The host splits the viewport into two static halves along the flip axis
//! and draws the mid-flip page rotated over one of them. Everything here is
//! derived from the flip distance and window occupancy; no drawing happens in
//! this crate.

use crate::flip_view::FLIP_DISTANCE_PER_PAGE;

const MAX_SHADOW_ALPHA: f32 = 180.0;
const MAX_SHADE_ALPHA: f32 = 130.0;
const MAX_SHINE_ALPHA: f32 = 100.0;

/// Window slot a rendered half sources its content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    /// The slot behind the current page.
    Previous,
    /// The current page's slot.
    Current,
    /// The slot ahead of the current page.
    Next,
}

/// What the host should draw for the controller's current state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlipFrame {
    /// At rest on a page: draw the current window slot full size, if
    /// occupied.
    Resting,
    /// Mid-flip: draw both static halves, then the current page rotated over
    /// the half [`FlipCues::flipping_over_leading`] selects.
    Flipping(FlipCues),
}

/// Cues for one mid-flip frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipCues {
    /// Rotation of the flipping half, degrees in `[0, 180)`.
    pub degrees: f32,
    /// Slot shown by the leading (top or left) static half.
    pub leading: Option<PageRole>,
    /// Slot shown by the trailing (bottom or right) static half.
    pub trailing: Option<PageRole>,
    /// The flipping half always shows the current slot (skip it when that
    /// slot is empty); true when it covers the leading half.
    pub flipping_over_leading: bool,
    /// Shadow over the static half on the same side as the flipping page.
    pub shadow_alpha: u8,
    /// Shade over the flipping half at and past edge-on (90 degrees).
    pub shade_alpha: u8,
    /// Shine over the flipping half before edge-on.
    pub shine_alpha: u8,
}

/// Rotation of the flipping half for a given distance, in `[0, 180)`.
pub(crate) fn degrees_flipped(distance: f32) -> f32 {
    let local = distance.rem_euclid(FLIP_DISTANCE_PER_PAGE);
    local / FLIP_DISTANCE_PER_PAGE * 180.0
}

pub(crate) fn compute(
    distance: f32,
    mid_flip: bool,
    has_previous: bool,
    has_current: bool,
    has_next: bool,
) -> FlipFrame {
    if !mid_flip {
        return FlipFrame::Resting;
    }
    let degrees = degrees_flipped(distance);
    let over_leading = degrees > 90.0;
    let leading = if over_leading {
        has_previous.then_some(PageRole::Previous)
    } else {
        has_current.then_some(PageRole::Current)
    };
    let trailing = if over_leading {
        has_current.then_some(PageRole::Current)
    } else {
        has_next.then_some(PageRole::Next)
    };
    let shadow = if over_leading {
        (degrees - 90.0) / 90.0 * MAX_SHADOW_ALPHA
    } else {
        (90.0 - degrees) / 90.0 * MAX_SHADOW_ALPHA
    };
    // exactly edge-on belongs to the shade side
    let (shade, shine) = if degrees < 90.0 {
        (0.0, degrees / 90.0 * MAX_SHINE_ALPHA)
    } else {
        ((180.0 - degrees) / 90.0 * MAX_SHADE_ALPHA, 0.0)
    };
    FlipFrame::Flipping(FlipCues {
        degrees,
        leading,
        trailing,
        flipping_over_leading: over_leading,
        shadow_alpha: shadow as u8,
        shade_alpha: shade as u8,
        shine_alpha: shine as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues(frame: FlipFrame) -> FlipCues {
        match frame {
            FlipFrame::Flipping(cues) => cues,
            FlipFrame::Resting => panic!("expected a mid-flip frame"),
        }
    }

    #[test]
    fn degrees_wrap_per_page() {
        assert_eq!(degrees_flipped(0.0), 0.0);
        assert_eq!(degrees_flipped(45.0), 45.0);
        assert_eq!(degrees_flipped(180.0), 0.0);
        assert_eq!(degrees_flipped(630.0), 90.0);
    }

    #[test]
    fn rest_produces_a_resting_frame() {
        assert_eq!(compute(360.0, false, true, true, true), FlipFrame::Resting);
    }

    #[test]
    fn early_flip_shows_current_and_next() {
        let cues = cues(compute(45.0, true, false, true, true));
        assert_eq!(cues.degrees, 45.0);
        assert_eq!(cues.leading, Some(PageRole::Current));
        assert_eq!(cues.trailing, Some(PageRole::Next));
        assert!(!cues.flipping_over_leading);
        assert_eq!(cues.shadow_alpha, 90);
        assert_eq!(cues.shade_alpha, 0);
        assert_eq!(cues.shine_alpha, 50);
    }

    #[test]
    fn edge_on_flip_takes_the_shade_side() {
        let cues = cues(compute(90.0, true, true, true, true));
        assert_eq!(cues.degrees, 90.0);
        // the page halves still split strictly above 90
        assert_eq!(cues.leading, Some(PageRole::Current));
        assert_eq!(cues.trailing, Some(PageRole::Next));
        assert!(!cues.flipping_over_leading);
        assert_eq!(cues.shadow_alpha, 0);
        assert_eq!(cues.shade_alpha, 130);
        assert_eq!(cues.shine_alpha, 0);
    }

    #[test]
    fn late_flip_shows_previous_and_current() {
        let cues = cues(compute(180.0 + 135.0, true, true, true, true));
        assert_eq!(cues.degrees, 135.0);
        assert_eq!(cues.leading, Some(PageRole::Previous));
        assert_eq!(cues.trailing, Some(PageRole::Current));
        assert!(cues.flipping_over_leading);
        assert_eq!(cues.shadow_alpha, 90);
        assert_eq!(cues.shade_alpha, 65);
        assert_eq!(cues.shine_alpha, 0);
    }

    #[test]
    fn empty_neighbor_slots_are_skipped() {
        let early = cues(compute(10.0, true, false, true, false));
        assert_eq!(early.trailing, None);
        let late = cues(compute(170.0, true, false, true, false));
        assert_eq!(late.leading, None);
    }
}
