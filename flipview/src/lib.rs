//! Windowed paging state machine for page-flip carousel widgets.
//!
//! A [`FlipView`] turns an ordered collection into a stack of pages the user
//! flips through like a calendar: drags, flings, navigation calls and hint
//! animations all drive one flip distance, 180 per page, and a three-slot
//! window keeps only the previous, current and next pages materialized. The
//! crate is renderer-agnostic; the host feeds pointer events and a clock and
//! draws what [`FlipView::frame`] describes.
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use flipview::{FlipView, FlipViewArgs, PageProvider, ProviderError};
//!
//! struct Deck {
//!     titles: Vec<String>,
//! }
//!
//! impl PageProvider for Deck {
//!     type Item = String;
//!
//!     fn count(&self) -> usize {
//!         self.titles.len()
//!     }
//!
//!     fn materialize(&mut self, position: usize) -> Result<String, ProviderError> {
//!         self.titles
//!             .get(position)
//!             .cloned()
//!             .ok_or_else(|| format!("no card at {position}").into())
//!     }
//!
//!     fn destroy(&mut self, _position: usize, _item: String) -> Result<(), ProviderError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut view = FlipView::new(FlipViewArgs::default());
//! view.set_size(540.0, 960.0);
//! view.set_provider(Deck {
//!     titles: (1..=8).map(|n| format!("card {n}")).collect(),
//! });
//!
//! view.flip_to(3)?;
//! assert_eq!(view.current_page(), Some(3));
//!
//! let mut now = Instant::now();
//! view.smooth_flip_to(7, now)?;
//! while view.tick(now) {
//!     now += Duration::from_millis(16);
//! }
//! assert_eq!(view.current_page(), Some(7));
//! # Ok::<(), flipview::FlipError>(())
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

mod animation;
mod velocity;

pub mod flip_view;
pub mod frame;
pub mod gesture;
pub mod orientation;
pub mod over_flip;
pub mod provider;
pub mod window;

pub use flip_view::{FLIP_DISTANCE_PER_PAGE, FlipError, FlipScrollState, FlipView, FlipViewArgs};
pub use frame::{FlipCues, FlipFrame, PageRole};
pub use gesture::{PointerAction, PointerEvent, PointerId, TouchPoint};
pub use orientation::Orientation;
pub use over_flip::{OverFlipEvent, OverFlipMode};
pub use provider::{ItemPosition, PageProvider, ProviderError};
pub use window::{PageWindow, WindowPage};
