// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Unified back/forward history shared by every card view.
//!
//! Besides the locator stack and its cursor, the history keeps a bounded
//! most-recently-used list of primaries and mirrors every landing into the
//! per-type list-view histories. Observers of `active-changed` and
//! `mru-changed` run synchronously, `active-changed` first.

use cardview_model::list_history::TypeHistories;
use cardview_model::{Handle, ObjectType};
use tracing::debug;

use crate::locator::Locator;

/// One MRU entry: a primary type and handle.
pub type MruEntry = (ObjectType, Handle);

/// Default MRU capacity.
pub const DEFAULT_MRU_SIZE: usize = 10;

type ActiveObserver = Box<dyn FnMut(Option<&Locator>)>;
type MruObserver = Box<dyn FnMut(&[MruEntry])>;

/// Locator stack with cursor, MRU list and shadow per-type histories.
pub struct ExtendedHistory {
    stack: Vec<Locator>,
    index: Option<usize>,
    mru: Vec<MruEntry>,
    mru_size: usize,
    lock: bool,
    shadow: Box<dyn TypeHistories>,
    active_observers: Vec<ActiveObserver>,
    mru_observers: Vec<MruObserver>,
}

impl std::fmt::Debug for ExtendedHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedHistory")
            .field("stack", &self.stack)
            .field("index", &self.index)
            .field("mru", &self.mru)
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}

impl ExtendedHistory {
    /// Empty history mirroring into `shadow`.
    pub fn new(shadow: Box<dyn TypeHistories>, mru_size: usize) -> Self {
        Self {
            stack: Vec::new(),
            index: None,
            mru: Vec::new(),
            mru_size: mru_size.max(1),
            lock: false,
            shadow,
            active_observers: Vec::new(),
            mru_observers: Vec::new(),
        }
    }

    /// Observe `active-changed`. `None` means the history emptied.
    pub fn connect_active_changed<F>(&mut self, observer: F)
    where
        F: FnMut(Option<&Locator>) + 'static,
    {
        self.active_observers.push(Box::new(observer));
    }

    /// Observe `mru-changed`; receives the whole list, most recent last.
    pub fn connect_mru_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&[MruEntry]) + 'static,
    {
        self.mru_observers.push(Box::new(observer));
    }

    /// Record a visit to `loc`.
    ///
    /// Forward history is dropped first. Pushing the current locator again
    /// changes nothing and emits nothing. `quiet` suppresses signals and MRU
    /// promotion; `initial` (without `quiet`) touches only the MRU. Returns
    /// whether the stack grew. Refused while the history is locked.
    pub fn push(&mut self, loc: Locator, quiet: bool, initial: bool) -> bool {
        if self.lock {
            debug!(%loc, "history locked, push ignored");
            return false;
        }
        self.prune();
        if self.present() == Some(&loc) {
            return false;
        }
        self.stack.push(loc.clone());
        self.index = Some(self.stack.len() - 1);
        debug!(%loc, depth = self.stack.len(), "history push");

        if quiet {
            if !initial {
                self.sync_shadow(&loc);
            }
            return true;
        }
        if initial {
            self.promote(&loc);
            return true;
        }
        self.land(&loc);
        true
    }

    /// Move the cursor `n` entries back. `None` on underflow.
    pub fn back(&mut self, n: usize) -> Option<Locator> {
        let target = self.index?.checked_sub(n)?;
        self.move_to(target)
    }

    /// Move the cursor `n` entries forward. `None` on overflow.
    pub fn forward(&mut self, n: usize) -> Option<Locator> {
        let target = self.index?.checked_add(n)?;
        if target >= self.stack.len() {
            return None;
        }
        self.move_to(target)
    }

    /// Current locator.
    pub fn present(&self) -> Option<&Locator> {
        self.index.and_then(|i| self.stack.get(i))
    }

    /// Cursor index (`None` when empty).
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whole stack, oldest first.
    pub fn entries(&self) -> &[Locator] {
        &self.stack
    }

    /// Number of stack entries.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// True when the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Most-recently-used primaries, most recent last.
    pub fn mru(&self) -> &[MruEntry] {
        &self.mru
    }

    /// Resize the MRU list, dropping the oldest entries if needed.
    pub fn set_mru_size(&mut self, size: usize) {
        self.mru_size = size.max(1);
        if self.mru.len() > self.mru_size {
            let excess = self.mru.len() - self.mru_size;
            self.mru.drain(..excess);
        }
    }

    /// Cannot go back.
    pub fn at_front(&self) -> bool {
        self.index.is_none_or(|i| i == 0)
    }

    /// Cannot go forward.
    pub fn at_end(&self) -> bool {
        self.index.is_none_or(|i| i + 1 >= self.stack.len())
    }

    /// Drop everything after the cursor.
    pub fn prune(&mut self) {
        match self.index {
            Some(i) => self.stack.truncate(i + 1),
            None => self.stack.clear(),
        }
    }

    /// Reset stack, cursor, MRU and lock.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.index = None;
        self.mru.clear();
        self.lock = false;
    }

    /// Rewrite every entry keyed by `old` to key `new`. Returns whether any changed.
    pub fn replace_secondary(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        for loc in &mut self.stack {
            if loc.secondary_key() == Some(old) {
                *loc = loc.clone().with_secondary_key(new);
                changed = true;
            }
        }
        if changed {
            debug!(old, new, "history secondary key replaced");
        }
        changed
    }

    /// Forget every entry mentioning one of `handles`.
    ///
    /// The cursor follows the entry it pointed at, or the closest earlier
    /// survivor. `active-changed` is skipped when every removed entry was a
    /// tag page; `mru-changed` fires only if the MRU list shrank.
    pub fn handles_removed(&mut self, handles: &[Handle]) {
        let removed = |loc: &Locator| handles.iter().any(|h| loc.mentions(h));
        let mut removed_at_or_before = 0usize;
        let mut any_removed = false;
        let mut only_tags = true;
        for (pos, loc) in self.stack.iter().enumerate() {
            if removed(loc) {
                any_removed = true;
                only_tags &= loc.primary_type() == ObjectType::Tag;
                if self.index.is_some_and(|i| pos <= i) {
                    removed_at_or_before += 1;
                }
            }
        }
        if any_removed {
            let old_index = self.index;
            self.stack.retain(|loc| !removed(loc));
            self.index = match old_index {
                _ if self.stack.is_empty() => None,
                Some(i) => Some((i + 1).saturating_sub(removed_at_or_before).saturating_sub(1)),
                None => None,
            };
            debug!(removed = handles.len(), depth = self.stack.len(), "history entries removed");
        }

        let mru_before = self.mru.len();
        self.mru.retain(|(_, h)| !handles.contains(h));
        let mru_changed = self.mru.len() != mru_before;

        if any_removed && !only_tags {
            let current = self.present().cloned();
            self.emit_active(current.as_ref());
            if let Some(loc) = &current {
                self.sync_shadow(loc);
            }
        }
        if mru_changed {
            self.emit_mru();
        }
    }

    /// A whole type was rebuilt: start over.
    pub fn history_changed(&mut self) {
        self.clear();
        self.emit_mru();
    }

    /// Refuse pushes until [`unlock`](Self::unlock).
    pub fn lock(&mut self) {
        self.lock = true;
    }

    /// Accept pushes again.
    pub fn unlock(&mut self) {
        self.lock = false;
    }

    /// Lock state.
    pub fn is_locked(&self) -> bool {
        self.lock
    }

    /// Head of the shadow history of `kind`.
    pub fn shadow_present(&self, kind: ObjectType) -> Option<Handle> {
        self.shadow.present(kind)
    }

    /// Forget the shadow histories.
    pub fn clear_shadow(&mut self) {
        self.shadow.clear();
    }

    fn move_to(&mut self, target: usize) -> Option<Locator> {
        let loc = self.stack.get(target)?.clone();
        self.index = Some(target);
        debug!(%loc, index = target, "history move");
        self.land(&loc);
        Some(loc)
    }

    fn land(&mut self, loc: &Locator) {
        self.emit_active(Some(loc));
        self.promote(loc);
        self.sync_shadow(loc);
    }

    fn promote(&mut self, loc: &Locator) {
        if loc.primary_type() == ObjectType::Tag {
            return;
        }
        let entry = (loc.primary_type(), loc.primary_handle().clone());
        self.mru.retain(|e| e != &entry);
        self.mru.push(entry);
        if self.mru.len() > self.mru_size {
            self.mru.remove(0);
        }
        self.emit_mru();
    }

    fn sync_shadow(&mut self, loc: &Locator) {
        let kind = loc.primary_type();
        if self.shadow.present(kind).as_ref() != Some(loc.primary_handle()) {
            self.shadow.push(kind, loc.primary_handle().clone());
        }
    }

    fn emit_active(&mut self, loc: Option<&Locator>) {
        for observer in &mut self.active_observers {
            observer(loc);
        }
    }

    fn emit_mru(&mut self) {
        let Self {
            mru, mru_observers, ..
        } = self;
        for observer in mru_observers.iter_mut() {
            observer(mru.as_slice());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cardview_model::list_history::ListViewHistories;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn person(h: &str) -> Locator {
        Locator::primary(ObjectType::Person, h)
    }

    fn history() -> ExtendedHistory {
        ExtendedHistory::new(Box::new(ListViewHistories::new()), 3)
    }

    #[test]
    fn empty_history_returns_sentinels() {
        let mut hist = history();
        assert_eq!(hist.present(), None);
        assert_eq!(hist.back(1), None);
        assert_eq!(hist.forward(1), None);
        assert!(hist.at_front());
        assert!(hist.at_end());
    }

    #[test]
    fn mru_is_bounded_and_promotes() {
        let mut hist = history();
        for h in ["P1", "P2", "P3", "P4"] {
            hist.push(person(h), false, false);
        }
        assert_eq!(hist.mru().len(), 3);
        assert_eq!(hist.mru()[0].1, Handle::new("P2"));
        hist.push(person("P2"), false, false);
        let last: Vec<_> = hist.mru().iter().map(|(_, h)| h.as_str()).collect();
        assert_eq!(last, ["P3", "P4", "P2"]);
    }

    #[test]
    fn quiet_initial_push_emits_nothing() {
        let mut hist = history();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        hist.connect_active_changed(move |_| *counter.borrow_mut() += 1);
        assert!(hist.push(person("P1"), true, true));
        assert_eq!(*seen.borrow(), 0);
        assert!(hist.mru().is_empty());
    }

    #[test]
    fn initial_push_only_touches_mru() {
        let mut hist = history();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        hist.connect_active_changed(move |_| *counter.borrow_mut() += 1);
        hist.push(person("P1"), false, true);
        assert_eq!(*seen.borrow(), 0);
        assert_eq!(hist.mru().len(), 1);
        assert_eq!(hist.shadow_present(ObjectType::Person), None);
    }

    #[test]
    fn lock_refuses_pushes() {
        let mut hist = history();
        hist.lock();
        assert!(!hist.push(person("P1"), false, false));
        hist.unlock();
        assert!(hist.push(person("P1"), false, false));
    }

    #[test]
    fn landings_sync_shadow_history() {
        let mut hist = history();
        hist.push(person("P1"), false, false);
        hist.push(Locator::primary(ObjectType::Family, "F1"), false, false);
        hist.push(person("P2"), false, false);
        assert_eq!(hist.shadow_present(ObjectType::Person), Some(Handle::new("P2")));
        hist.back(2);
        assert_eq!(hist.shadow_present(ObjectType::Person), Some(Handle::new("P1")));
        assert_eq!(hist.shadow_present(ObjectType::Family), Some(Handle::new("F1")));
    }

    #[test]
    fn removal_keeps_cursor_on_survivor() {
        let mut hist = history();
        for h in ["P1", "P2", "P3"] {
            hist.push(person(h), false, false);
        }
        hist.back(1);
        hist.handles_removed(&[Handle::new("P1")]);
        assert_eq!(hist.present(), Some(&person("P2")));
        hist.handles_removed(&[Handle::new("P2")]);
        assert_eq!(hist.present(), Some(&person("P3")));
        hist.handles_removed(&[Handle::new("P3")]);
        assert_eq!(hist.index(), None);
        assert!(hist.is_empty());
    }

    #[test]
    fn tag_only_removal_is_silent_on_active() {
        let mut hist = history();
        hist.push(person("P1"), false, false);
        hist.push(Locator::primary(ObjectType::Tag, "T1"), false, false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        hist.connect_active_changed(move |loc| log.borrow_mut().push(loc.cloned()));
        hist.handles_removed(&[Handle::new("T1")]);
        assert!(seen.borrow().is_empty());
        assert_eq!(hist.present(), Some(&person("P1")));
    }
}
