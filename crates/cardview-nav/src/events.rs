// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Database signal dispatch.

use std::collections::BTreeSet;

use cardview_model::{DbSignal, ObjectType};
use tracing::{debug, info};

use crate::context::Context;
use crate::controller::NavigationController;

const DATABASE_CHANGED: &str = "database-changed";

/// Signal names a controller listens to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalMap {
    names: BTreeSet<String>,
}

impl SignalMap {
    /// No subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `database-changed` plus the per-type signals of every primary type.
    pub fn resubscribe(&mut self) {
        self.names.clear();
        self.names.insert(DATABASE_CHANGED.to_owned());
        for kind in ObjectType::PRIMARY {
            self.names.extend(DbSignal::names_for(kind));
        }
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// True when `name` is subscribed.
    pub fn accepts(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Subscribed names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of subscribed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NavigationController {
    /// React to a database signal.
    ///
    /// `database-changed` resets every shared service and blanks the page;
    /// deletes prune history; rebuilds restart history; adds and updates
    /// rebuild the page.
    pub fn on_db_signal(&mut self, signal: &DbSignal) {
        let name = signal.name();
        if !self.signals.accepts(&name) {
            debug!(%name, "signal not subscribed");
            return;
        }
        debug!(%name, "database signal");
        match signal {
            DbSignal::DatabaseChanged => self.database_changed(),
            DbSignal::Delete(_, handles) => {
                self.services.history.borrow_mut().handles_removed(handles);
                self.services.bookmarks.borrow_mut().remove_all(handles);
                let shown_gone = self
                    .context
                    .locator()
                    .is_some_and(|loc| handles.iter().any(|h| loc.mentions(h)));
                if shown_gone {
                    self.context = Context::empty();
                }
                self.build_tree();
            }
            DbSignal::Rebuild(_) => {
                self.services.history.borrow_mut().history_changed();
                self.build_tree();
            }
            DbSignal::Add(..) | DbSignal::Update(..) => self.build_tree(),
        }
    }

    fn database_changed(&mut self) {
        info!("database changed, resetting navigation state");
        self.services.reset();
        self.signals.resubscribe();
        self.coalescer.borrow_mut().cancel();
        self.context = Context::empty();
        self.tickets.clear();
        self.dirty = true;
        self.page.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resubscribe_covers_every_primary_type() {
        let mut map = SignalMap::new();
        assert!(!map.accepts("person-delete"));
        map.resubscribe();
        assert_eq!(map.len(), 1 + 4 * ObjectType::PRIMARY.len());
        assert!(map.accepts("person-delete"));
        assert!(map.accepts("repository-rebuild"));
        assert!(map.accepts(DATABASE_CHANGED));
        assert!(!map.accepts("name-update"));
        map.clear();
        assert!(map.is_empty());
    }
}
