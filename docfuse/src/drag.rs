//! Two-phase drag gesture handling.
//!
//! `drag_start` only flips a presentation flag. `drag_end` is the single
//! mutating event and turns the gesture into one list reorder:
//!
//! - a plain drag moves one entry to the drop position;
//! - a drag that starts on a member of a multi-selection moves the whole
//!   selection as a block, landing after the target when dragging down and
//!   before it when dragging up;
//! - dropping a group onto another selected entry swaps the two entries.

use tracing::debug;

use crate::document::EntryId;
use crate::list::{DocumentList, reorder};

/// What a finished drag did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing changed.
    Ignored,
    /// One entry moved to the drop position.
    Moved,
    /// The selection moved as a block.
    GroupMoved,
    /// Two selected entries exchanged places.
    Swapped,
}

impl DragOutcome {
    /// Whether the list changed.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Tracks the drag in progress.
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<EntryId>,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging `active`.
    pub fn drag_start(&mut self, active: EntryId) {
        if let Some(previous) = self.active.replace(active) {
            debug!(%previous, "Drag restarted before the previous one ended");
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The entry being dragged.
    pub fn active(&self) -> Option<&EntryId> {
        self.active.as_ref()
    }

    /// Abort the drag without touching the list.
    pub fn drag_cancel(&mut self) {
        self.active = None;
    }

    /// Finish the drag of `active` over `over`, reordering `list`.
    ///
    /// A missing `over`, a drop onto itself, or ids that are no longer in the
    /// list all leave the list untouched.
    pub fn drag_end(
        &mut self,
        list: &mut DocumentList,
        active: &EntryId,
        over: Option<&EntryId>,
    ) -> DragOutcome {
        self.active = None;

        let Some(over) = over.filter(|over| *over != active) else {
            return DragOutcome::Ignored;
        };
        let (Some(from), Some(to)) = (list.index_of(active), list.index_of(over)) else {
            debug!(%active, %over, "Drag ignored for unknown id");
            return DragOutcome::Ignored;
        };

        let outcome = if !list.in_multi_selection(active) {
            let order = reorder::move_element(list.len(), from, to);
            list.apply(order).then_some(DragOutcome::Moved)
        } else if list.is_selected(over) {
            let order = reorder::swap(list.len(), from, to);
            list.apply(order).then_some(DragOutcome::Swapped)
        } else {
            let mask = list.mask(list.selection());
            let order = reorder::drop_group(&mask, from, to);
            list.apply(order).then_some(DragOutcome::GroupMoved)
        };

        outcome.unwrap_or(DragOutcome::Ignored)
    }
}
