//! The ordered document list and its selection set.
//!
//! Insertion order is the authoritative render and merge order. Every
//! mutation is atomic from the caller's point of view: a reorder either
//! applies completely or leaves the list untouched. Unknown ids are treated
//! as no-ops rather than errors, since stale ids can legitimately arrive
//! from UI events that raced with a delete.

pub mod reorder;

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::document::{DocumentEntry, EntryId};

/// Direction of a one-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the list.
    Up,
    /// Towards the end of the list.
    Down,
}

/// Ordered sequence of document entries plus the set of selected ids.
#[derive(Debug, Default)]
pub struct DocumentList {
    entries: Vec<DocumentEntry>,
    selection: HashSet<EntryId>,
}

impl DocumentList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in list order.
    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    /// Iterate over entries in list order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.iter()
    }

    /// Ids in list order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id().clone()).collect()
    }

    /// Position of the entry with `id`.
    pub fn index_of(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &EntryId) -> Option<&DocumentEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Whether an entry with `id` exists.
    pub fn contains(&self, id: &EntryId) -> bool {
        self.index_of(id).is_some()
    }

    /// Add entries at the tail, keeping the order they were supplied in.
    ///
    /// An entry whose id is already present (or repeated within the batch) is
    /// dropped with a warning, so ids stay unique. Returns how many entries
    /// were added.
    pub fn append(&mut self, entries: impl IntoIterator<Item = DocumentEntry>) -> usize {
        let mut known: HashSet<EntryId> = self.entries.iter().map(|e| e.id().clone()).collect();
        let before = self.entries.len();

        for entry in entries {
            if known.insert(entry.id().clone()) {
                self.entries.push(entry);
            } else {
                warn!(id = %entry.id(), name = entry.name(), "Ignoring entry with duplicate id");
            }
        }

        self.entries.len() - before
    }

    /// Advance the rotation of one entry by 90 degrees.
    pub fn rotate(&mut self, id: &EntryId) -> bool {
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => {
                entry.rotate();
                true
            }
            None => {
                debug!(%id, "Rotate ignored for unknown id");
                false
            }
        }
    }

    /// Advance the rotation of every entry whose id is in `ids`.
    ///
    /// Returns how many entries were rotated.
    pub fn bulk_rotate(&mut self, ids: &HashSet<EntryId>) -> usize {
        let mut rotated = 0;
        for entry in self.entries.iter_mut().filter(|e| ids.contains(e.id())) {
            entry.rotate();
            rotated += 1;
        }
        rotated
    }

    /// Rotate every selected entry.
    pub fn rotate_selected(&mut self) -> usize {
        let ids = self.selection.clone();
        self.bulk_rotate(&ids)
    }

    /// Remove one entry, releasing its preview and deselecting it.
    pub fn delete(&mut self, id: &EntryId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(%id, "Delete ignored for unknown id");
            return false;
        };

        self.selection.remove(id);
        drop(self.entries.remove(index));
        true
    }

    /// Remove every entry whose id is in `ids`, then clear the whole selection.
    ///
    /// Returns how many entries were removed.
    pub fn bulk_delete(&mut self, ids: &HashSet<EntryId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !ids.contains(e.id()));
        self.selection.clear();
        before - self.entries.len()
    }

    /// Delete every selected entry.
    pub fn delete_selected(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selection);
        self.bulk_delete(&ids)
    }

    /// Remove all entries and clear the selection.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.selection.clear();
    }

    /// Flip selection membership of `id`.
    ///
    /// Returns whether the entry is selected afterwards. Unknown ids are
    /// never added to the selection.
    pub fn toggle_select(&mut self, id: &EntryId) -> bool {
        if self.selection.remove(id) {
            return false;
        }
        if !self.contains(id) {
            debug!(%id, "Select ignored for unknown id");
            return false;
        }
        self.selection.insert(id.clone());
        true
    }

    /// Select everything, or clear the selection if everything is selected.
    pub fn toggle_select_all(&mut self) {
        if self.is_all_selected() {
            self.selection.clear();
        } else {
            self.selection = self.entries.iter().map(|e| e.id().clone()).collect();
        }
    }

    /// Drop the current selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Whether the selection covers the whole list.
    pub fn is_all_selected(&self) -> bool {
        self.selection.len() == self.entries.len()
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selection.contains(id)
    }

    /// The selection set.
    pub fn selection(&self) -> &HashSet<EntryId> {
        &self.selection
    }

    /// Selected ids in list order.
    pub fn selected_ids(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|e| self.selection.contains(e.id()))
            .map(|e| e.id().clone())
            .collect()
    }

    /// Whether `id` is part of a selection of more than one entry.
    pub fn in_multi_selection(&self, id: &EntryId) -> bool {
        self.selection.len() > 1 && self.selection.contains(id)
    }

    /// Swap one entry with its neighbor in `direction`.
    pub fn move_single(&mut self, id: &EntryId, direction: Direction) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.apply(reorder::step(self.len(), index, direction))
    }

    /// Move the entries in `ids` one step as a contiguous block.
    pub fn move_group(&mut self, ids: &HashSet<EntryId>, direction: Direction) -> bool {
        let mask = self.mask(ids);
        self.apply(reorder::move_group(&mask, direction))
    }

    /// Move an entry one step, taking the whole selection along when the entry
    /// belongs to a multi-selection.
    pub fn move_entry(&mut self, id: &EntryId, direction: Direction) -> bool {
        if self.in_multi_selection(id) {
            let ids = self.selection.clone();
            self.move_group(&ids, direction)
        } else {
            self.move_single(id, direction)
        }
    }

    /// Per-position membership of `ids`.
    pub(crate) fn mask(&self, ids: &HashSet<EntryId>) -> Vec<bool> {
        self.entries.iter().map(|e| ids.contains(e.id())).collect()
    }

    /// Rearrange entries according to a permutation of current indices.
    ///
    /// `None` leaves the list untouched and returns `false`.
    pub(crate) fn apply(&mut self, order: Option<Vec<usize>>) -> bool {
        let Some(order) = order else {
            return false;
        };
        debug_assert_eq!(order.len(), self.entries.len());

        let mut slots: Vec<Option<DocumentEntry>> = self.entries.drain(..).map(Some).collect();
        self.entries = order.into_iter().filter_map(|i| slots[i].take()).collect();
        true
    }
}
