//! The flip view controller.
//!
//! [`FlipView`] owns a [`PageProvider`], keeps a three-slot window of
//! materialized pages around the current one and maps gestures, navigation
//! calls and animations onto a single flip distance. The host feeds it
//! pointer events and a clock, then draws whatever [`FlipView::frame`]
//! describes.

use std::time::Instant;

use derive_setters::Setters;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    animation::AnimationScheduler,
    frame::{self, FlipFrame},
    gesture::{GestureInterpreter, GestureSignal, PointerAction, PointerEvent},
    orientation::Orientation,
    over_flip::{OverFlipEvent, OverFlipMode, OverFlipper},
    provider::{ItemPosition, PageProvider},
    window::PageWindow,
};

/// Flip distance covered by one full page turn.
pub const FLIP_DISTANCE_PER_PAGE: f32 = 180.0;

const DEFAULT_TOUCH_SLOP: f32 = 16.0;
const DEFAULT_MIN_FLING_VELOCITY: f32 = 50.0;
const DEFAULT_MAX_FLING_VELOCITY: f32 = 8000.0;
const INVALID_FLIP_DISTANCE: f32 = -1.0;
const PEEK_DISTANCE: f32 = FLIP_DISTANCE_PER_PAGE / 4.0;

/// Errors surfaced by the navigation API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlipError {
    /// A page outside `0..page_count` was requested.
    #[error("page {page} is out of range for {count} pages")]
    PageOutOfRange {
        /// The requested page.
        page: isize,
        /// Number of pages currently provided.
        count: usize,
    },
}

/// Interaction phase reported to the flip state listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipScrollState {
    /// A drag crossed the touch slop, or a touch grabbed a running animation.
    Start,
    /// The flip distance is moving under the finger.
    Flipping,
    /// The finger released, or navigation took the gesture over.
    End,
}

/// Construction options for a [`FlipView`].
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct FlipViewArgs {
    /// Axis the pages flip along.
    pub orientation: Orientation,
    /// How dragging past the first or last page is rendered.
    pub over_flip_mode: OverFlipMode,
    /// Pointer travel needed before a drag becomes a flip.
    pub touch_slop: f32,
    /// Release speeds at or below this settle to the nearest page.
    pub min_fling_velocity: f32,
    /// Release speeds are clamped to this before the fling decision.
    pub max_fling_velocity: f32,
}

impl Default for FlipViewArgs {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            over_flip_mode: OverFlipMode::default(),
            touch_slop: DEFAULT_TOUCH_SLOP,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
        }
    }
}

/// Windowed paging controller over a [`PageProvider`].
pub struct FlipView<P: PageProvider> {
    orientation: Orientation,
    provider: Option<P>,
    page_count: usize,
    window: PageWindow<P::Item>,
    flip_distance: f32,
    current_page: Option<usize>,
    last_settled: Option<usize>,
    size: (f32, f32),
    gesture: GestureInterpreter,
    animator: AnimationScheduler,
    over_flipper: OverFlipper,
    over_flipping: bool,
    min_fling_velocity: f32,
    max_fling_velocity: f32,
    needs_redraw: bool,
    on_page_settled: Option<Box<dyn FnMut(usize)>>,
    on_flip_state: Option<Box<dyn FnMut(FlipScrollState)>>,
    on_over_flip: Option<Box<dyn FnMut(OverFlipEvent)>>,
}

impl<P: PageProvider> Default for FlipView<P> {
    fn default() -> Self {
        Self::new(FlipViewArgs::default())
    }
}

impl<P: PageProvider> FlipView<P> {
    /// Creates a detached controller; attach pages with
    /// [`set_provider`](Self::set_provider).
    pub fn new(args: FlipViewArgs) -> Self {
        Self {
            orientation: args.orientation,
            provider: None,
            page_count: 0,
            window: PageWindow::new(),
            flip_distance: 0.0,
            current_page: None,
            last_settled: None,
            size: (0.0, 0.0),
            gesture: GestureInterpreter::new(args.orientation, args.touch_slop),
            animator: AnimationScheduler::default(),
            over_flipper: OverFlipper::new(args.over_flip_mode),
            over_flipping: false,
            min_fling_velocity: args.min_fling_velocity,
            max_fling_velocity: args.max_fling_velocity,
            needs_redraw: false,
            on_page_settled: None,
            on_flip_state: None,
            on_over_flip: None,
        }
    }

    /// Attaches a provider, destroying any pages of the previous one, and
    /// rests on page 0.
    pub fn set_provider(&mut self, provider: P) {
        self.animator.cancel();
        self.gesture.end_flip();
        self.over_flipper.over_flip_ended();
        self.over_flipping = false;
        if let Some(mut old) = self.provider.take() {
            self.window.destroy_all(&mut old);
        } else {
            self.window.clear();
        }
        self.page_count = provider.count();
        self.provider = Some(provider);
        self.current_page = None;
        self.last_settled = None;
        self.flip_distance = INVALID_FLIP_DISTANCE;
        self.set_flip_distance(0.0);
        self.dispatch_settled_at_rest();
    }

    /// The attached provider.
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Mutable access to the attached provider. Call
    /// [`data_set_changed`](Self::data_set_changed) after mutating the
    /// underlying collection.
    pub fn provider_mut(&mut self) -> Option<&mut P> {
        self.provider.as_mut()
    }

    /// Number of pages reported at the last provider sync.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Index of the current page; `None` while no page exists.
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    /// The flip distance the view sits at, 180 per page.
    pub fn flip_distance(&self) -> f32 {
        self.flip_distance
    }

    /// Rotation of the mid-flip page in `[0, 180)` degrees.
    pub fn degrees_flipped(&self) -> f32 {
        frame::degrees_flipped(self.flip_distance)
    }

    /// The window of materialized pages around the current one.
    pub fn window(&self) -> &PageWindow<P::Item> {
        &self.window
    }

    /// Render cues for the current state.
    pub fn frame(&self) -> FlipFrame {
        frame::compute(
            self.flip_distance,
            self.is_flipping() || self.is_animating(),
            self.window.previous().is_some(),
            self.window.current().is_some(),
            self.window.next().is_some(),
        )
    }

    /// Axis the pages flip along.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// How dragging past the first or last page is rendered.
    pub fn over_flip_mode(&self) -> OverFlipMode {
        self.over_flipper.mode()
    }

    /// Switches the over-flip rendering mode.
    pub fn set_over_flip_mode(&mut self, mode: OverFlipMode) {
        self.over_flipper.set_mode(mode);
    }

    /// Whether a drag currently moves the flip distance.
    pub fn is_flipping(&self) -> bool {
        self.gesture.is_flipping()
    }

    /// Whether a settle or peek animation is running.
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Updates the viewport size used to convert pointer travel into flip
    /// distance.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = (width.max(0.0), height.max(0.0));
        self.needs_redraw = true;
    }

    /// Takes the pending redraw request, clearing it.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Replaces the settle listener, called with the page index whenever the
    /// view flips onto a page. The first page after attaching a provider is
    /// not announced.
    pub fn set_on_page_settled(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_page_settled = Some(Box::new(listener));
    }

    /// Replaces the flip state listener.
    pub fn set_on_flip_state(&mut self, listener: impl FnMut(FlipScrollState) + 'static) {
        self.on_flip_state = Some(Box::new(listener));
    }

    /// Replaces the over-flip listener, called while a drag runs past the
    /// first or last page and once with a zero distance when it comes back.
    pub fn set_on_over_flip(&mut self, listener: impl FnMut(OverFlipEvent) + 'static) {
        self.on_over_flip = Some(Box::new(listener));
    }

    /// Moves the view to `distance`, stepping or jumping the page window so
    /// it stays centered on `round(distance / 180)`.
    ///
    /// Negative input is floored to 0. With no pages the view collapses to
    /// the empty state regardless of `distance`.
    pub fn set_flip_distance(&mut self, distance: f32) {
        if self.gesture.is_flipping() {
            self.emit_flip_state(FlipScrollState::Flipping);
        }
        let distance = distance.max(0.0);
        if self.page_count < 1 {
            self.flip_distance = 0.0;
            self.current_page = None;
            if let Some(provider) = self.provider.as_mut() {
                self.window.destroy_all(provider);
            } else {
                self.window.clear();
            }
            self.needs_redraw = true;
            return;
        }
        if distance == self.flip_distance {
            return;
        }
        self.flip_distance = distance;
        let new_index = (distance / FLIP_DISTANCE_PER_PAGE).round() as usize;
        let old_index = self.current_page;
        if old_index != Some(new_index) {
            self.current_page = Some(new_index);
            if let Some(provider) = self.provider.as_mut() {
                match old_index {
                    Some(old) if old + 1 == new_index => {
                        self.window.advance(provider, new_index, self.page_count);
                        self.dispatch_settled(new_index);
                    }
                    Some(old) if new_index + 1 == old => {
                        self.window.retreat(provider, new_index);
                        self.dispatch_settled(new_index);
                    }
                    _ => {
                        debug!(from = ?old_index, to = new_index, "page window jump");
                        self.window
                            .rebuild_around(provider, new_index, self.page_count);
                    }
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Jumps immediately to `page`, ending any gesture or animation.
    pub fn flip_to(&mut self, page: usize) -> Result<(), FlipError> {
        self.ensure_in_range(page as isize)?;
        if self.gesture.end_flip() {
            self.emit_flip_state(FlipScrollState::End);
        }
        self.animator.cancel();
        self.set_flip_distance(page as f32 * FLIP_DISTANCE_PER_PAGE);
        self.dispatch_settled_at_rest();
        Ok(())
    }

    /// Jumps `delta` pages relative to the current page.
    pub fn flip_by(&mut self, delta: isize) -> Result<(), FlipError> {
        let base = self.current_page.map_or(-1, |page| page as isize);
        let target = self.ensure_in_range(base + delta)?;
        self.flip_to(target)
    }

    /// Animates to `page` with the settle curve, ending any gesture.
    pub fn smooth_flip_to(&mut self, page: usize, now: Instant) -> Result<(), FlipError> {
        self.ensure_in_range(page as isize)?;
        if self.gesture.end_flip() {
            self.emit_flip_state(FlipScrollState::End);
        }
        self.animator
            .start_settle(self.flip_distance, page as f32 * FLIP_DISTANCE_PER_PAGE, now);
        self.needs_redraw = true;
        Ok(())
    }

    /// Animates `delta` pages relative to the current page.
    pub fn smooth_flip_by(&mut self, delta: isize, now: Instant) -> Result<(), FlipError> {
        let base = self.current_page.map_or(-1, |page| page as isize);
        let target = self.ensure_in_range(base + delta)?;
        self.smooth_flip_to(target, now)
    }

    /// Reveals a quarter of the next page and eases back. With `once` the
    /// hint runs a single out-and-back cycle, otherwise it repeats until
    /// interrupted. Returns whether the hint started.
    pub fn peek_next(&mut self, once: bool, now: Instant) -> bool {
        let Some(current) = self.current_page else {
            return false;
        };
        if current + 1 >= self.page_count {
            return false;
        }
        self.animator.start_peek(
            current as f32 * FLIP_DISTANCE_PER_PAGE,
            PEEK_DISTANCE,
            once,
            now,
        );
        self.needs_redraw = true;
        true
    }

    /// Mirror of [`peek_next`](Self::peek_next) toward the previous page.
    pub fn peek_previous(&mut self, once: bool, now: Instant) -> bool {
        let Some(current) = self.current_page else {
            return false;
        };
        if current == 0 {
            return false;
        }
        self.animator.start_peek(
            current as f32 * FLIP_DISTANCE_PER_PAGE,
            -PEEK_DISTANCE,
            once,
            now,
        );
        self.needs_redraw = true;
        true
    }

    /// Feeds one pointer event; returns whether the flip gesture consumed it.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent, now: Instant) -> bool {
        if self.page_count < 1 {
            return false;
        }
        match event.action {
            PointerAction::Down => {
                let grab = self.animator.cancel();
                match self.gesture.on_down(event, now, grab) {
                    GestureSignal::FlipStarted => self.emit_flip_state(FlipScrollState::Start),
                    GestureSignal::FlipEnded => self.emit_flip_state(FlipScrollState::End),
                    _ => {}
                }
                grab
            }
            PointerAction::Move => match self.gesture.on_move(event, now) {
                GestureSignal::FlipStarted => {
                    self.emit_flip_state(FlipScrollState::Start);
                    true
                }
                GestureSignal::FlipDelta(travel) => {
                    self.apply_drag(travel);
                    true
                }
                _ => self.gesture.is_flipping(),
            },
            PointerAction::PointerDown => {
                self.gesture.on_pointer_down(event);
                self.gesture.is_flipping()
            }
            PointerAction::PointerUp => {
                self.gesture.on_pointer_up(event);
                self.gesture.is_flipping()
            }
            PointerAction::Up | PointerAction::Cancel => {
                match self.gesture.on_up(now, self.max_fling_velocity) {
                    GestureSignal::FlipReleased(velocity) => {
                        self.emit_flip_state(FlipScrollState::End);
                        let target = self.page_for_velocity(velocity);
                        debug!(velocity, target, "flip released");
                        self.animator.start_settle(
                            self.flip_distance,
                            target as f32 * FLIP_DISTANCE_PER_PAGE,
                            now,
                        );
                        self.over_flipper.over_flip_ended();
                        self.over_flipping = false;
                        self.needs_redraw = true;
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Advances the running animation to `now`; returns whether one is still
    /// running afterwards.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(tick) = self.animator.tick(now) {
            self.set_flip_distance(tick.distance);
            if tick.finished {
                self.dispatch_settled_at_rest();
            }
        }
        self.animator.is_running()
    }

    /// Re-syncs with the provider after its collection changed in place.
    ///
    /// When the current page's item is still present the view follows it to
    /// its new index without animation or settle events; otherwise the view
    /// resets to page 0 and announces that settle.
    pub fn data_set_changed(&mut self) {
        let Some(provider) = self.provider.as_mut() else {
            return;
        };
        self.page_count = provider.count();
        let resolved = self
            .window
            .current()
            .and_then(|page| match provider.position_of(page.item()) {
                ItemPosition::At(index) => Some(index),
                ItemPosition::Unchanged => self.current_page,
                ItemPosition::Removed => None,
            })
            .filter(|&position| position < self.page_count);
        match resolved {
            Some(position) => {
                debug!(position, "current page kept across data set change");
                self.flip_distance = position as f32 * FLIP_DISTANCE_PER_PAGE;
                self.current_page = Some(position);
                self.last_settled = Some(position);
                self.window.set_current_position(position);
                self.window
                    .realign_neighbors(provider, position, self.page_count);
                self.needs_redraw = true;
            }
            None => {
                debug!("current page lost across data set change");
                self.current_page = None;
                self.flip_distance = INVALID_FLIP_DISTANCE;
                self.set_flip_distance(0.0);
                self.dispatch_settled_at_rest();
            }
        }
    }

    /// Detaches the provider, destroying every window page through it, and
    /// collapses to the empty state.
    pub fn data_set_invalidated(&mut self) {
        self.animator.cancel();
        self.gesture.end_flip();
        self.over_flipper.over_flip_ended();
        self.over_flipping = false;
        if let Some(mut provider) = self.provider.take() {
            self.window.destroy_all(&mut provider);
        }
        self.page_count = 0;
        self.current_page = None;
        self.last_settled = None;
        self.flip_distance = 0.0;
        self.needs_redraw = true;
    }

    fn apply_drag(&mut self, travel: f32) {
        let extent = self.orientation.extent(self.size.0, self.size.1);
        if extent <= 0.0 {
            return;
        }
        let delta = travel / (extent / FLIP_DISTANCE_PER_PAGE);
        self.set_flip_distance(self.flip_distance + delta);

        let max = self.max_flip_distance();
        let stored = self.flip_distance;
        if stored < 0.0 || stored > max {
            self.over_flipping = true;
            let damped = self.over_flipper.calculate(stored, 0.0, max);
            self.set_flip_distance(damped);
            let total = self.over_flipper.total_over_flip();
            self.emit_over_flip(OverFlipEvent {
                mode: self.over_flipper.mode(),
                past_start: total < 0.0,
                distance: total.abs(),
                distance_per_page: FLIP_DISTANCE_PER_PAGE,
            });
        } else if self.over_flipping {
            self.over_flipping = false;
            let total = self.over_flipper.total_over_flip();
            self.over_flipper.over_flip_ended();
            self.emit_over_flip(OverFlipEvent {
                mode: self.over_flipper.mode(),
                past_start: total < 0.0,
                distance: 0.0,
                distance_per_page: FLIP_DISTANCE_PER_PAGE,
            });
        }
    }

    /// Page a release should settle on: a fling continues in the finger's
    /// direction, a slow release snaps to the nearest page.
    fn page_for_velocity(&self, velocity: f32) -> usize {
        let pages = self.flip_distance / FLIP_DISTANCE_PER_PAGE;
        let page = if velocity > self.min_fling_velocity {
            pages.floor()
        } else if velocity < -self.min_fling_velocity {
            pages.ceil()
        } else {
            pages.round()
        };
        (page.max(0.0) as usize).min(self.page_count - 1)
    }

    fn max_flip_distance(&self) -> f32 {
        self.page_count.saturating_sub(1) as f32 * FLIP_DISTANCE_PER_PAGE
    }

    fn ensure_in_range(&self, page: isize) -> Result<usize, FlipError> {
        if page < 0 || page as usize >= self.page_count {
            return Err(FlipError::PageOutOfRange {
                page,
                count: self.page_count,
            });
        }
        Ok(page as usize)
    }

    fn dispatch_settled_at_rest(&mut self) {
        if self.page_count < 1 || self.gesture.is_flipping() || self.animator.is_running() {
            return;
        }
        if let Some(page) = self.current_page {
            self.dispatch_settled(page);
        }
    }

    /// One settle notification per page: dedups repeats, commits before the
    /// provider callback and swallows the very first announcement after a
    /// provider attach.
    fn dispatch_settled(&mut self, page: usize) {
        if self.last_settled == Some(page) {
            return;
        }
        let Some(current) = self.window.current() else {
            return;
        };
        let announced_before = self.last_settled.is_some();
        self.last_settled = Some(page);
        if let Some(provider) = self.provider.as_mut() {
            if let Err(error) = provider.set_primary(page, current.item()) {
                warn!(page, %error, "provider rejected the primary page");
                return;
            }
        }
        if announced_before {
            if let Some(listener) = self.on_page_settled.as_mut() {
                listener(page);
            }
        }
    }

    fn emit_flip_state(&mut self, state: FlipScrollState) {
        if let Some(listener) = self.on_flip_state.as_mut() {
            listener(state);
        }
    }

    fn emit_over_flip(&mut self, event: OverFlipEvent) {
        if let Some(listener) = self.on_over_flip.as_mut() {
            listener(event);
        }
    }
}
