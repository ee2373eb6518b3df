// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-type list-view histories ("shadow" histories).
//!
//! Traditional list views keep one history per primary type. The unified
//! navigation history mirrors its landings into these so both agree on the
//! "current" record of each type.

use std::collections::HashMap;

use crate::types::{Handle, ObjectType};

/// Contract of the per-type histories the navigation core keeps in sync.
pub trait TypeHistories {
    /// Push `handle` onto the history of `kind`.
    fn push(&mut self, kind: ObjectType, handle: Handle);
    /// Current handle of `kind`, if any.
    fn present(&self, kind: ObjectType) -> Option<Handle>;
    /// Forget everything (database change).
    fn clear(&mut self);
}

/// Bounded back-stack of handles for one type.
#[derive(Debug, Clone, Default)]
pub struct ListHistory {
    entries: Vec<Handle>,
}

impl ListHistory {
    /// Most recent entries kept per type.
    pub const MAX_ENTRIES: usize = 100;

    /// Append unless `handle` is already the head.
    pub fn push(&mut self, handle: Handle) -> bool {
        if self.entries.last() == Some(&handle) {
            return false;
        }
        if self.entries.len() == Self::MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(handle);
        true
    }

    /// Head of the history.
    pub fn present(&self) -> Option<&Handle> {
        self.entries.last()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[Handle] {
        &self.entries
    }
}

/// In-memory [`TypeHistories`] keyed by primary type.
#[derive(Debug, Clone, Default)]
pub struct ListViewHistories {
    per_type: HashMap<ObjectType, ListHistory>,
}

impl ListViewHistories {
    /// Create empty histories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the history of one type.
    pub fn get(&self, kind: ObjectType) -> Option<&ListHistory> {
        self.per_type.get(&kind)
    }
}

impl TypeHistories for ListViewHistories {
    fn push(&mut self, kind: ObjectType, handle: Handle) {
        self.per_type.entry(kind).or_default().push(handle);
    }

    fn present(&self, kind: ObjectType) -> Option<Handle> {
        self.per_type.get(&kind).and_then(ListHistory::present).cloned()
    }

    fn clear(&mut self) {
        self.per_type.clear();
    }
}
