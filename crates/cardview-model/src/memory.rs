// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory [`Database`] used by tests and the developer CLI.
//!
//! Records live in per-type ordered maps; signals from closed transactions
//! queue in an outbox until the host drains them. Interior mutability keeps
//! the read path `&self`, matching the single cooperative UI thread model.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use serde::Deserialize;
use tracing::debug;

use crate::db::{Database, DbError, DbSignal, Transaction};
use crate::primary::{
    Citation, Event, Family, Media, Note, Person, Place, PrimaryRecord, Repository, Source, Tag,
};
use crate::types::{Handle, ObjectType};

type TypeTable = BTreeMap<Handle, PrimaryRecord>;

/// JSON fixture layout: `{ "records": [ { "type": "Person", ... }, ... ] }`.
#[derive(Debug, Deserialize)]
struct Fixture {
    records: Vec<PrimaryRecord>,
}

/// Single-threaded in-memory database.
#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: RefCell<BTreeMap<ObjectType, TypeTable>>,
    outbox: RefCell<VecDeque<DbSignal>>,
}

macro_rules! typed_getter {
    ($name:ident, $kind:ident, $ty:ty) => {
        fn $name(&self, handle: &Handle) -> Result<$ty, DbError> {
            match self.lookup(ObjectType::$kind, handle)? {
                PrimaryRecord::$kind(rec) => Ok(rec),
                _ => Err(DbError::NotFound {
                    kind: ObjectType::$kind,
                    handle: handle.clone(),
                }),
            }
        }
    };
}

impl MemoryDb {
    /// Empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Database pre-populated with `records` (no signals are emitted).
    pub fn with_records(records: impl IntoIterator<Item = PrimaryRecord>) -> Self {
        let db = Self::new();
        for record in records {
            db.insert(record);
        }
        db
    }

    /// Load a JSON fixture.
    pub fn from_json(text: &str) -> Result<Self, DbError> {
        let fixture: Fixture =
            serde_json::from_str(text).map_err(|err| DbError::Decode(err.to_string()))?;
        Ok(Self::with_records(fixture.records))
    }

    /// Insert or replace without a transaction (setup only).
    pub fn insert(&self, record: PrimaryRecord) -> bool {
        let kind = record.kind();
        let handle = record.handle().clone();
        self.tables
            .borrow_mut()
            .entry(kind)
            .or_default()
            .insert(handle, record)
            .is_some()
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: ObjectType) -> usize {
        self.tables.borrow().get(&kind).map_or(0, BTreeMap::len)
    }

    /// Take every published signal, oldest first.
    pub fn drain_signals(&self) -> Vec<DbSignal> {
        self.outbox.borrow_mut().drain(..).collect()
    }

    /// Publish a signal directly (rebuilds, database switches).
    pub fn emit(&self, signal: DbSignal) {
        self.outbox.borrow_mut().push_back(signal);
    }

    fn lookup(&self, kind: ObjectType, handle: &Handle) -> Result<PrimaryRecord, DbError> {
        self.tables
            .borrow()
            .get(&kind)
            .and_then(|table| table.get(handle))
            .cloned()
            .ok_or_else(|| DbError::NotFound {
                kind,
                handle: handle.clone(),
            })
    }
}

impl Database for MemoryDb {
    typed_getter!(get_person_from_handle, Person, Person);
    typed_getter!(get_family_from_handle, Family, Family);
    typed_getter!(get_event_from_handle, Event, Event);
    typed_getter!(get_place_from_handle, Place, Place);
    typed_getter!(get_source_from_handle, Source, Source);
    typed_getter!(get_citation_from_handle, Citation, Citation);
    typed_getter!(get_repository_from_handle, Repository, Repository);
    typed_getter!(get_media_from_handle, Media, Media);
    typed_getter!(get_note_from_handle, Note, Note);
    typed_getter!(get_tag_from_handle, Tag, Tag);

    fn find_backlink_handles(&self, handle: &Handle) -> Vec<(ObjectType, Handle)> {
        self.tables
            .borrow()
            .iter()
            .flat_map(|(kind, table)| {
                table
                    .values()
                    .filter(|rec| rec.linked_handles().contains(handle))
                    .map(|rec| (*kind, rec.handle().clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn handles(&self, kind: ObjectType) -> Vec<Handle> {
        self.tables
            .borrow()
            .get(&kind)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn commit(&self, record: PrimaryRecord, txn: &mut Transaction) -> Result<(), DbError> {
        let kind = record.kind();
        let handle = record.handle().clone();
        let replaced = self.insert(record);
        let signal = if replaced {
            DbSignal::Update(kind, vec![handle])
        } else {
            DbSignal::Add(kind, vec![handle])
        };
        txn.record(signal);
        Ok(())
    }

    fn remove(
        &self,
        kind: ObjectType,
        handle: &Handle,
        txn: &mut Transaction,
    ) -> Result<(), DbError> {
        if !kind.is_primary() {
            return Err(DbError::NotPrimary(kind));
        }
        let removed = self
            .tables
            .borrow_mut()
            .get_mut(&kind)
            .and_then(|table| table.remove(handle));
        if removed.is_none() {
            return Err(DbError::NotFound {
                kind,
                handle: handle.clone(),
            });
        }
        txn.record(DbSignal::Delete(kind, vec![handle.clone()]));
        Ok(())
    }

    fn close_transaction(&self, txn: Transaction) {
        debug!(
            description = %txn.description,
            signals = txn.signals.len(),
            "transaction closed"
        );
        self.outbox.borrow_mut().extend(txn.signals);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::EventRef;

    fn seeded() -> MemoryDb {
        MemoryDb::with_records([
            PrimaryRecord::Person(Person {
                handle: Handle::new("P1"),
                event_refs: vec![EventRef {
                    ref_handle: Handle::new("E4"),
                    ..EventRef::default()
                }],
                ..Person::default()
            }),
            PrimaryRecord::Event(Event {
                handle: Handle::new("E4"),
                event_type: "Birth".into(),
                ..Event::default()
            }),
        ])
    }

    #[test]
    fn typed_getters_check_the_type() {
        let db = seeded();
        assert!(db.get_person_from_handle(&Handle::new("P1")).is_ok());
        assert_eq!(
            db.get_family_from_handle(&Handle::new("P1")),
            Err(DbError::NotFound {
                kind: ObjectType::Family,
                handle: Handle::new("P1"),
            })
        );
    }

    #[test]
    fn backlinks_follow_reference_edges() {
        let db = seeded();
        assert_eq!(
            db.find_backlink_handles(&Handle::new("E4")),
            vec![(ObjectType::Person, Handle::new("P1"))]
        );
    }

    #[test]
    fn signals_publish_on_close_only() {
        let db = seeded();
        let mut txn = db.transaction("delete event");
        db.remove(ObjectType::Event, &Handle::new("E4"), &mut txn)
            .unwrap();
        assert!(db.drain_signals().is_empty());
        db.close_transaction(txn);
        assert_eq!(
            db.drain_signals(),
            vec![DbSignal::Delete(ObjectType::Event, vec![Handle::new("E4")])]
        );
    }

    #[test]
    fn commit_distinguishes_add_and_update() {
        let db = seeded();
        let mut txn = db.transaction("edit");
        let person = db.get_person_from_handle(&Handle::new("P1")).unwrap();
        db.commit(PrimaryRecord::Person(person), &mut txn).unwrap();
        db.commit(
            PrimaryRecord::Note(Note {
                handle: Handle::new("N1"),
                ..Note::default()
            }),
            &mut txn,
        )
        .unwrap();
        db.close_transaction(txn);
        let names: Vec<String> = db.drain_signals().iter().map(DbSignal::name).collect();
        assert_eq!(names, ["person-update", "note-add"]);
    }

    #[test]
    fn fixture_loads_tagged_records() {
        let db = MemoryDb::from_json(
            r#"{"records":[{"type":"Tag","handle":"T1","name":"ToDo"},
                           {"type":"Person","handle":"P9","id":"I0009"}]}"#,
        )
        .unwrap();
        assert_eq!(db.count(ObjectType::Tag), 1);
        assert_eq!(db.handles(ObjectType::Person), vec![Handle::new("P9")]);
        assert!(MemoryDb::from_json("{").is_err());
    }
}
