//! Item provider contract backing a flip view.
//!
//! ## Usage
//!
//! Implement [`PageProvider`] over any ordered item source. The flip view
//! holds at most three materialized pages (previous/current/next) and goes
//! through this trait whenever the window slides.

use std::error::Error;

/// Error surfaced by provider operations.
///
/// Boxed so providers can fail with their own error types; the flip view
/// logs these failures and leaves the affected slot empty.
pub type ProviderError = Box<dyn Error + Send + Sync>;

/// Where a previously materialized item lives after a data-set change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPosition {
    /// The item now lives at this index.
    At(usize),
    /// The item's index did not change.
    Unchanged,
    /// The item is no longer part of the collection.
    Removed,
}

/// An ordered, mutable page source.
///
/// Implementations own the item collection; the flip view never indexes it
/// directly. After mutating the collection, call
/// [`FlipView::data_set_changed`](crate::FlipView::data_set_changed) so the
/// window can re-resolve its slots through [`position_of`](Self::position_of).
pub trait PageProvider {
    /// Materialized page handed to the flip view.
    type Item;

    /// Number of pages currently available.
    fn count(&self) -> usize;

    /// Reports where a previously materialized item now lives.
    ///
    /// The default claims every item keeps its index, which is correct for
    /// sources that only ever append.
    fn position_of(&self, item: &Self::Item) -> ItemPosition {
        let _ = item;
        ItemPosition::Unchanged
    }

    /// Creates the page for `position`.
    fn materialize(&mut self, position: usize) -> Result<Self::Item, ProviderError>;

    /// Releases a page that left the window.
    fn destroy(&mut self, position: usize, item: Self::Item) -> Result<(), ProviderError>;

    /// Marks the page the view has settled on, before listeners hear of it.
    fn set_primary(&mut self, position: usize, item: &Self::Item) -> Result<(), ProviderError> {
        let _ = (position, item);
        Ok(())
    }
}
