//! Pointer event stream and the flip gesture state machine.

use std::time::Instant;

use smallvec::SmallVec;
use tracing::debug;

use crate::orientation::Orientation;
use crate::velocity::VelocityTracker;

/// Identifier for one finger across its down/move/up sequence.
pub type PointerId = u32;

/// One active finger's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Stable id for the finger.
    pub id: PointerId,
    /// Horizontal position in host coordinates.
    pub x: f32,
    /// Vertical position in host coordinates.
    pub y: f32,
}

/// Pointer transition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// First finger down; starts a gesture.
    Down,
    /// An additional finger down mid-gesture.
    PointerDown,
    /// A finger moved.
    Move,
    /// A finger lifted while others remain down.
    PointerUp,
    /// The last finger lifted; ends the gesture.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

/// A pointer event carrying the full set of active touch points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Transition this event reports.
    pub action: PointerAction,
    /// Finger the transition applies to.
    pub pointer_id: PointerId,
    /// Every finger currently on the surface, including `pointer_id`.
    pub touches: SmallVec<[TouchPoint; 2]>,
}

impl PointerEvent {
    /// Builds an event from an explicit touch list.
    pub fn with_touches(
        action: PointerAction,
        pointer_id: PointerId,
        touches: impl IntoIterator<Item = TouchPoint>,
    ) -> Self {
        Self {
            action,
            pointer_id,
            touches: touches.into_iter().collect(),
        }
    }

    /// Single-finger event.
    pub fn single(action: PointerAction, id: PointerId, x: f32, y: f32) -> Self {
        Self::with_touches(action, id, [TouchPoint { id, x, y }])
    }

    /// Primary finger down.
    pub fn down(id: PointerId, x: f32, y: f32) -> Self {
        Self::single(PointerAction::Down, id, x, y)
    }

    /// Single-finger move.
    pub fn moved(id: PointerId, x: f32, y: f32) -> Self {
        Self::single(PointerAction::Move, id, x, y)
    }

    /// Last finger up.
    pub fn up(id: PointerId, x: f32, y: f32) -> Self {
        Self::single(PointerAction::Up, id, x, y)
    }

    /// Gesture aborted by the host.
    pub fn cancel(id: PointerId, x: f32, y: f32) -> Self {
        Self::single(PointerAction::Cancel, id, x, y)
    }

    pub(crate) fn touch(&self, id: PointerId) -> Option<TouchPoint> {
        self.touches.iter().copied().find(|touch| touch.id == id)
    }
}

/// What the interpreter concluded from one pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GestureSignal {
    /// Nothing for the controller to act on.
    None,
    /// The gesture became a flip: the drag threshold was crossed, or a down
    /// grabbed a running animation.
    FlipStarted,
    /// A down with nothing to grab retired a flip whose release was never
    /// delivered.
    FlipEnded,
    /// An active flip moved; raw pointer travel along the flip axis,
    /// positive when the pointer moved toward the axis origin.
    FlipDelta(f32),
    /// An active flip released with this axis velocity in units per second.
    FlipReleased(f32),
    /// The gesture ended without ever flipping.
    Tap,
}

/// Axis-locked drag recognition over the pointer stream.
///
/// One instance lives per flip view; state resets when the gesture ends.
#[derive(Debug)]
pub(crate) struct GestureInterpreter {
    orientation: Orientation,
    touch_slop: f32,
    active_pointer: Option<PointerId>,
    last_x: f32,
    last_y: f32,
    flipping: bool,
    locked_out: bool,
    velocity: VelocityTracker,
}

impl GestureInterpreter {
    pub(crate) fn new(orientation: Orientation, touch_slop: f32) -> Self {
        Self {
            orientation,
            touch_slop,
            active_pointer: None,
            last_x: 0.0,
            last_y: 0.0,
            flipping: false,
            locked_out: false,
            velocity: VelocityTracker::new(),
        }
    }

    pub(crate) fn is_flipping(&self) -> bool {
        self.flipping
    }

    /// First finger down. `grab` puts the gesture straight into flipping so
    /// an interrupted animation keeps following the finger.
    pub(crate) fn on_down(
        &mut self,
        event: &PointerEvent,
        now: Instant,
        grab: bool,
    ) -> GestureSignal {
        let Some(touch) = event.touch(event.pointer_id) else {
            return GestureSignal::None;
        };
        self.active_pointer = Some(touch.id);
        self.last_x = touch.x;
        self.last_y = touch.y;
        self.locked_out = false;
        self.velocity.clear();
        self.velocity
            .push(now, self.orientation.along(touch.x, touch.y));
        // re-derived on every down so a dropped release cannot leak a flip
        let was_flipping = self.flipping;
        self.flipping = grab;
        if grab && !was_flipping {
            debug!("pointer down grabbed a running animation");
            return GestureSignal::FlipStarted;
        }
        if was_flipping && !grab {
            debug!("down retired a stale flip");
            return GestureSignal::FlipEnded;
        }
        GestureSignal::None
    }

    pub(crate) fn on_move(&mut self, event: &PointerEvent, now: Instant) -> GestureSignal {
        let Some(active) = self.active_pointer else {
            return GestureSignal::None;
        };
        let Some(touch) = event.touch(active) else {
            // the active finger vanished from the stream
            self.active_pointer = None;
            return GestureSignal::None;
        };
        self.velocity
            .push(now, self.orientation.along(touch.x, touch.y));
        if !self.flipping && !self.locked_out {
            let moved_x = (touch.x - self.last_x).abs();
            let moved_y = (touch.y - self.last_y).abs();
            let along = self.orientation.along(moved_x, moved_y);
            let across = self.orientation.across(moved_x, moved_y);
            if along > self.touch_slop && along > across {
                // the crossing event only re-bases; no distance is applied
                self.flipping = true;
                self.last_x = touch.x;
                self.last_y = touch.y;
                return GestureSignal::FlipStarted;
            }
            if across > self.touch_slop {
                debug!("gesture locked out by cross-axis drag");
                self.locked_out = true;
            }
            return GestureSignal::None;
        }
        if self.flipping {
            let delta = self
                .orientation
                .along(self.last_x - touch.x, self.last_y - touch.y);
            self.last_x = touch.x;
            self.last_y = touch.y;
            return GestureSignal::FlipDelta(delta);
        }
        GestureSignal::None
    }

    /// A second finger landed: it takes over as the active pointer.
    pub(crate) fn on_pointer_down(&mut self, event: &PointerEvent) {
        if let Some(touch) = event.touch(event.pointer_id) {
            self.active_pointer = Some(touch.id);
            self.last_x = touch.x;
            self.last_y = touch.y;
            self.velocity.clear();
        }
    }

    /// A finger lifted while others remain. Losing the active finger hands
    /// the gesture to a surviving one without leaving the flipping state.
    pub(crate) fn on_pointer_up(&mut self, event: &PointerEvent) {
        let Some(active) = self.active_pointer else {
            return;
        };
        if event.pointer_id == active {
            if let Some(touch) = event.touches.iter().find(|touch| touch.id != active) {
                self.active_pointer = Some(touch.id);
                self.last_x = touch.x;
                self.last_y = touch.y;
            } else {
                self.active_pointer = None;
            }
        } else if let Some(touch) = event.touch(active) {
            self.last_x = touch.x;
            self.last_y = touch.y;
        }
        self.velocity.clear();
    }

    /// Last finger lifted or gesture cancelled.
    pub(crate) fn on_up(&mut self, now: Instant, max_velocity: f32) -> GestureSignal {
        let signal = if self.flipping {
            let velocity = self
                .velocity
                .velocity(now)
                .clamp(-max_velocity, max_velocity);
            GestureSignal::FlipReleased(velocity)
        } else {
            GestureSignal::Tap
        };
        self.reset();
        signal
    }

    /// Clears per-gesture state; returns whether a flip was in progress.
    /// Also used when navigation APIs take over mid-gesture.
    pub(crate) fn end_flip(&mut self) -> bool {
        let was_flipping = self.flipping;
        self.reset();
        was_flipping
    }

    fn reset(&mut self) {
        self.flipping = false;
        self.locked_out = false;
        self.active_pointer = None;
        self.velocity.clear();
    }
}
