//! Sliding three-slot window of materialized pages.

use tracing::warn;

use crate::provider::{ItemPosition, PageProvider};

const PREVIOUS: usize = 0;
const CURRENT: usize = 1;
const NEXT: usize = 2;

/// A materialized page held by the window.
#[derive(Debug)]
pub struct WindowPage<I> {
    item: I,
    position: usize,
}

impl<I> WindowPage<I> {
    /// The materialized item.
    pub fn item(&self) -> &I {
        &self.item
    }

    /// Collection index this page represents.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The previous/current/next slots kept alive around the current page.
///
/// A slot is `None` when its index falls outside the collection or its
/// materialization failed. Occupied neighbors always sit at
/// `current.position ± 1`.
#[derive(Debug)]
pub struct PageWindow<I> {
    slots: [Option<WindowPage<I>>; 3],
}

impl<I> PageWindow<I> {
    pub(crate) fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    /// Page behind the current one, if materialized.
    pub fn previous(&self) -> Option<&WindowPage<I>> {
        self.slots[PREVIOUS].as_ref()
    }

    /// Page the view rests on or flips around, if materialized.
    pub fn current(&self) -> Option<&WindowPage<I>> {
        self.slots[CURRENT].as_ref()
    }

    /// Page ahead of the current one, if materialized.
    pub fn next(&self) -> Option<&WindowPage<I>> {
        self.slots[NEXT].as_ref()
    }

    /// Drops all slots without notifying any provider. Detached cleanup only.
    pub(crate) fn clear(&mut self) {
        self.slots = [None, None, None];
    }

    /// Destroys every occupied slot through the provider.
    pub(crate) fn destroy_all<P>(&mut self, provider: &mut P)
    where
        P: PageProvider<Item = I>,
    {
        for slot in [PREVIOUS, CURRENT, NEXT] {
            self.destroy_slot(slot, provider);
        }
    }

    /// Rebuilds all three slots around `index`: a jump transition.
    pub(crate) fn rebuild_around<P>(&mut self, provider: &mut P, index: usize, count: usize)
    where
        P: PageProvider<Item = I>,
    {
        self.destroy_all(provider);
        if index > 0 {
            self.fill_slot(PREVIOUS, provider, index - 1);
        }
        if index < count {
            self.fill_slot(CURRENT, provider, index);
        }
        if index + 1 < count {
            self.fill_slot(NEXT, provider, index + 1);
        }
    }

    /// Shifts the window one page forward: a step transition that keeps the
    /// two still-valid pages alive.
    pub(crate) fn advance<P>(&mut self, provider: &mut P, new_index: usize, count: usize)
    where
        P: PageProvider<Item = I>,
    {
        self.destroy_slot(PREVIOUS, provider);
        self.slots.rotate_left(1);
        if new_index + 1 < count {
            self.fill_slot(NEXT, provider, new_index + 1);
        }
    }

    /// Shifts the window one page backward; mirror of [`advance`](Self::advance).
    pub(crate) fn retreat<P>(&mut self, provider: &mut P, new_index: usize)
    where
        P: PageProvider<Item = I>,
    {
        self.destroy_slot(NEXT, provider);
        self.slots.rotate_right(1);
        if new_index > 0 {
            self.fill_slot(PREVIOUS, provider, new_index - 1);
        }
    }

    /// Rewrites the current slot's cached position after a data-set change.
    pub(crate) fn set_current_position(&mut self, position: usize) {
        if let Some(page) = self.slots[CURRENT].as_mut() {
            page.position = position;
        }
    }

    /// Re-resolves both neighbor slots against `current_position ± 1` after a
    /// data-set change: still-adjacent pages are kept (with their cached
    /// position refreshed), everything else is rebuilt or emptied.
    pub(crate) fn realign_neighbors<P>(
        &mut self,
        provider: &mut P,
        current_position: usize,
        count: usize,
    ) where
        P: PageProvider<Item = I>,
    {
        if current_position > 0 {
            self.realign_slot(PREVIOUS, provider, current_position - 1);
        } else {
            self.destroy_slot(PREVIOUS, provider);
        }
        if current_position + 1 < count {
            self.realign_slot(NEXT, provider, current_position + 1);
        } else {
            self.destroy_slot(NEXT, provider);
        }
    }

    fn realign_slot<P>(&mut self, slot: usize, provider: &mut P, wanted: usize)
    where
        P: PageProvider<Item = I>,
    {
        if self.resolved_position(slot, provider) == Some(wanted) {
            if let Some(page) = self.slots[slot].as_mut() {
                page.position = wanted;
            }
        } else {
            self.destroy_slot(slot, provider);
            self.fill_slot(slot, provider, wanted);
        }
    }

    fn resolved_position<P>(&self, slot: usize, provider: &P) -> Option<usize>
    where
        P: PageProvider<Item = I>,
    {
        let page = self.slots[slot].as_ref()?;
        match provider.position_of(&page.item) {
            ItemPosition::At(index) => Some(index),
            ItemPosition::Unchanged => Some(page.position),
            ItemPosition::Removed => None,
        }
    }

    fn fill_slot<P>(&mut self, slot: usize, provider: &mut P, position: usize)
    where
        P: PageProvider<Item = I>,
    {
        self.slots[slot] = match provider.materialize(position) {
            Ok(item) => Some(WindowPage { item, position }),
            Err(error) => {
                warn!(position, %error, "page materialization failed, slot left empty");
                None
            }
        };
    }

    fn destroy_slot<P>(&mut self, slot: usize, provider: &mut P)
    where
        P: PageProvider<Item = I>,
    {
        if let Some(WindowPage { item, position }) = self.slots[slot].take() {
            if let Err(error) = provider.destroy(position, item) {
                warn!(position, %error, "page destroy failed");
            }
        }
    }

    #[cfg(test)]
    fn positions(&self) -> [Option<usize>; 3] {
        [
            self.previous().map(WindowPage::position),
            self.current().map(WindowPage::position),
            self.next().map(WindowPage::position),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    struct JournalProvider {
        count: usize,
        fail_at: Option<usize>,
        journal: Vec<String>,
    }

    impl JournalProvider {
        fn new(count: usize) -> Self {
            Self {
                count,
                fail_at: None,
                journal: Vec::new(),
            }
        }
    }

    impl PageProvider for JournalProvider {
        type Item = String;

        fn count(&self) -> usize {
            self.count
        }

        fn materialize(&mut self, position: usize) -> Result<String, ProviderError> {
            if self.fail_at == Some(position) {
                return Err(format!("no page at {position}").into());
            }
            self.journal.push(format!("make {position}"));
            Ok(format!("page-{position}"))
        }

        fn destroy(&mut self, position: usize, item: String) -> Result<(), ProviderError> {
            self.journal.push(format!("drop {position}:{item}"));
            Ok(())
        }
    }

    #[test]
    fn rebuild_at_start_leaves_previous_empty() {
        let mut provider = JournalProvider::new(3);
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 0, 3);
        assert_eq!(window.positions(), [None, Some(0), Some(1)]);
        assert_eq!(provider.journal, ["make 0", "make 1"]);
    }

    #[test]
    fn rebuild_at_end_leaves_next_empty() {
        let mut provider = JournalProvider::new(5);
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 4, 5);
        assert_eq!(window.positions(), [Some(3), Some(4), None]);
    }

    #[test]
    fn advance_reuses_two_pages() {
        let mut provider = JournalProvider::new(5);
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 1, 5);
        provider.journal.clear();

        window.advance(&mut provider, 2, 5);
        assert_eq!(window.positions(), [Some(1), Some(2), Some(3)]);
        assert_eq!(provider.journal, ["drop 0:page-0", "make 3"]);
    }

    #[test]
    fn retreat_reuses_two_pages() {
        let mut provider = JournalProvider::new(5);
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 2, 5);
        provider.journal.clear();

        window.retreat(&mut provider, 1);
        assert_eq!(window.positions(), [Some(0), Some(1), Some(2)]);
        assert_eq!(provider.journal, ["drop 3:page-3", "make 0"]);
    }

    #[test]
    fn advance_into_last_page_empties_next() {
        let mut provider = JournalProvider::new(3);
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 1, 3);
        window.advance(&mut provider, 2, 3);
        assert_eq!(window.positions(), [Some(1), Some(2), None]);
    }

    #[test]
    fn step_and_jump_converge_to_the_same_window() {
        let mut provider = JournalProvider::new(6);
        let mut stepped = PageWindow::new();
        stepped.rebuild_around(&mut provider, 2, 6);
        stepped.advance(&mut provider, 3, 6);

        let mut jumped = PageWindow::new();
        jumped.rebuild_around(&mut provider, 3, 6);

        assert_eq!(stepped.positions(), jumped.positions());
        let items = |window: &PageWindow<String>| {
            [
                window.previous().map(|p| p.item().clone()),
                window.current().map(|p| p.item().clone()),
                window.next().map(|p| p.item().clone()),
            ]
        };
        assert_eq!(items(&stepped), items(&jumped));
    }

    #[test]
    fn no_two_slots_share_a_position() {
        let mut provider = JournalProvider::new(8);
        let mut window = PageWindow::new();
        let mut at = 4usize;
        window.rebuild_around(&mut provider, at, 8);
        for index in [5usize, 6, 5, 4, 3] {
            if index > at {
                window.advance(&mut provider, index, 8);
            } else {
                window.retreat(&mut provider, index);
            }
            at = index;
            let mut occupied: Vec<usize> = window.positions().iter().flatten().copied().collect();
            occupied.sort_unstable();
            occupied.dedup();
            let total = window.positions().iter().flatten().count();
            assert_eq!(occupied.len(), total);
        }
    }

    #[test]
    fn failed_materialization_leaves_slot_empty() {
        let mut provider = JournalProvider::new(5);
        provider.fail_at = Some(3);
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 2, 5);
        assert_eq!(window.positions(), [Some(1), Some(2), None]);
    }

    #[test]
    fn realign_keeps_adjacent_neighbors_and_rebuilds_the_rest() {
        struct ShiftedProvider {
            inner: JournalProvider,
        }

        impl PageProvider for ShiftedProvider {
            type Item = String;

            fn count(&self) -> usize {
                self.inner.count
            }

            fn position_of(&self, item: &String) -> ItemPosition {
                // one item was prepended: every existing page moved up by one
                let old: usize = item
                    .trim_start_matches("page-")
                    .parse()
                    .expect("test items are page-N");
                ItemPosition::At(old + 1)
            }

            fn materialize(&mut self, position: usize) -> Result<String, ProviderError> {
                self.inner.materialize(position)
            }

            fn destroy(&mut self, position: usize, item: String) -> Result<(), ProviderError> {
                self.inner.destroy(position, item)
            }
        }

        let mut provider = ShiftedProvider {
            inner: JournalProvider::new(5),
        };
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 2, 5);
        provider.inner.journal.clear();
        provider.inner.count = 6;

        // the current item moved from 2 to 3; both neighbors moved with it
        window.set_current_position(3);
        window.realign_neighbors(&mut provider, 3, 6);

        assert_eq!(window.positions(), [Some(2), Some(3), Some(4)]);
        assert!(provider.inner.journal.is_empty(), "{:?}", provider.inner.journal);
        assert_eq!(window.previous().map(|p| p.item().as_str()), Some("page-1"));
        assert_eq!(window.next().map(|p| p.item().as_str()), Some("page-3"));
    }

    #[test]
    fn realign_rebuilds_a_removed_neighbor() {
        struct DropFirstProvider {
            inner: JournalProvider,
        }

        impl PageProvider for DropFirstProvider {
            type Item = String;

            fn count(&self) -> usize {
                self.inner.count
            }

            fn position_of(&self, item: &String) -> ItemPosition {
                let old: usize = item
                    .trim_start_matches("page-")
                    .parse()
                    .expect("test items are page-N");
                match old {
                    0 => ItemPosition::Removed,
                    n => ItemPosition::At(n - 1),
                }
            }

            fn materialize(&mut self, position: usize) -> Result<String, ProviderError> {
                self.inner.materialize(position)
            }

            fn destroy(&mut self, position: usize, item: String) -> Result<(), ProviderError> {
                self.inner.destroy(position, item)
            }
        }

        let mut provider = DropFirstProvider {
            inner: JournalProvider::new(5),
        };
        let mut window = PageWindow::new();
        window.rebuild_around(&mut provider, 1, 5);
        provider.inner.journal.clear();
        provider.inner.count = 4;

        // page-0 was removed; the old page-1 is now current at position 0
        window.set_current_position(0);
        window.realign_neighbors(&mut provider, 0, 4);

        assert_eq!(window.positions(), [None, Some(0), Some(1)]);
        assert_eq!(window.current().map(|p| p.item().as_str()), Some("page-1"));
        assert_eq!(window.next().map(|p| p.item().as_str()), Some("page-2"));
        assert_eq!(provider.inner.journal, ["drop 0:page-0"]);
    }
}
