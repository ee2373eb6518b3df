// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-type bookmark lists.

use std::collections::HashMap;

use crate::types::{Handle, ObjectType};

/// Ordered bookmark list for one primary type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkList {
    handles: Vec<Handle>,
}

impl BookmarkList {
    /// Bookmarked handles in display order.
    pub fn get(&self) -> &[Handle] {
        &self.handles
    }

    /// Insert at `pos` (clamped to the end). Duplicates are moved, not repeated.
    pub fn insert(&mut self, pos: usize, handle: Handle) {
        self.handles.retain(|h| h != &handle);
        let pos = pos.min(self.handles.len());
        self.handles.insert(pos, handle);
    }

    /// Remove a bookmark; returns whether it was present.
    pub fn remove(&mut self, handle: &Handle) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| h != handle);
        before != self.handles.len()
    }
}

/// Bookmark lists for every primary type.
#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    lists: HashMap<ObjectType, BookmarkList>,
}

impl Bookmarks {
    /// Mutable list for `kind`, created on first use.
    pub fn list_mut(&mut self, kind: ObjectType) -> &mut BookmarkList {
        self.lists.entry(kind).or_default()
    }

    /// Handles bookmarked for `kind`.
    pub fn get(&self, kind: ObjectType) -> &[Handle] {
        self.lists.get(&kind).map(BookmarkList::get).unwrap_or_default()
    }

    /// Forget every list (database closed).
    pub fn clear(&mut self) {
        self.lists.clear();
    }

    /// Drop `handles` from every list (records were deleted).
    pub fn remove_all(&mut self, handles: &[Handle]) {
        for list in self.lists.values_mut() {
            list.handles.retain(|h| !handles.contains(h));
        }
    }
}
