// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Database contract consumed by the navigation core.
//!
//! The database is authoritative; the core only performs point lookups by
//! handle and listens to the change signals described by [`DbSignal`].

use thiserror::Error;

use crate::primary::{
    Citation, Event, Family, Media, Note, Person, Place, PrimaryRecord, Repository, Source, Tag,
};
use crate::types::{Handle, ObjectType};

/// Errors raised by database lookups and writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// No record of that type carries the handle.
    #[error("{kind} {handle} not found")]
    NotFound {
        /// Requested primary type.
        kind: ObjectType,
        /// Requested handle.
        handle: Handle,
    },
    /// The type is not a primary type.
    #[error("{0} is not a primary type")]
    NotPrimary(ObjectType),
    /// Fixture or payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// A change notification emitted by the database.
///
/// Names follow `<type>-add`, `<type>-update`, `<type>-delete`,
/// `<type>-rebuild` (lowercase primary type) plus `database-changed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSignal {
    /// Records were added.
    Add(ObjectType, Vec<Handle>),
    /// Records were updated in place.
    Update(ObjectType, Vec<Handle>),
    /// Records were deleted.
    Delete(ObjectType, Vec<Handle>),
    /// Every record of the type may have changed.
    Rebuild(ObjectType),
    /// A different database was opened (or the current one closed).
    DatabaseChanged,
}

impl DbSignal {
    /// Wire name of the signal, e.g. `"person-delete"`.
    pub fn name(&self) -> String {
        match self {
            DbSignal::Add(kind, _) => format!("{}-add", kind.signal_prefix()),
            DbSignal::Update(kind, _) => format!("{}-update", kind.signal_prefix()),
            DbSignal::Delete(kind, _) => format!("{}-delete", kind.signal_prefix()),
            DbSignal::Rebuild(kind) => format!("{}-rebuild", kind.signal_prefix()),
            DbSignal::DatabaseChanged => "database-changed".to_owned(),
        }
    }

    /// Build a signal from its wire name and handle payload.
    ///
    /// Returns `None` for unknown names or non-primary type prefixes.
    pub fn parse(name: &str, handles: Vec<Handle>) -> Option<Self> {
        if name == "database-changed" {
            return Some(DbSignal::DatabaseChanged);
        }
        let (prefix, action) = name.rsplit_once('-')?;
        let kind = ObjectType::from_signal_prefix(prefix)?;
        match action {
            "add" => Some(DbSignal::Add(kind, handles)),
            "update" => Some(DbSignal::Update(kind, handles)),
            "delete" => Some(DbSignal::Delete(kind, handles)),
            "rebuild" => Some(DbSignal::Rebuild(kind)),
            _ => None,
        }
    }

    /// Every per-type signal name for `kind`.
    pub fn names_for(kind: ObjectType) -> [String; 4] {
        let prefix = kind.signal_prefix();
        [
            format!("{prefix}-add"),
            format!("{prefix}-update"),
            format!("{prefix}-delete"),
            format!("{prefix}-rebuild"),
        ]
    }
}

/// A write batch. Signals are accumulated and emitted when the batch closes.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    /// Human description shown in undo history.
    pub description: String,
    pub(crate) signals: Vec<DbSignal>,
}

impl Transaction {
    /// Open a batch with a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            signals: Vec::new(),
        }
    }

    /// Record a signal, merging handles into an existing signal of the same name.
    pub fn record(&mut self, signal: DbSignal) {
        let name = signal.name();
        if let Some(existing) = self.signals.iter_mut().find(|s| s.name() == name) {
            match (existing, signal) {
                (DbSignal::Add(_, have), DbSignal::Add(_, more))
                | (DbSignal::Update(_, have), DbSignal::Update(_, more))
                | (DbSignal::Delete(_, have), DbSignal::Delete(_, more)) => {
                    for handle in more {
                        if !have.contains(&handle) {
                            have.push(handle);
                        }
                    }
                }
                _ => {}
            }
            return;
        }
        self.signals.push(signal);
    }

    /// Signals accumulated so far, in first-recorded order.
    pub fn signals(&self) -> &[DbSignal] {
        &self.signals
    }
}

/// Read/write contract of the genealogical database.
pub trait Database {
    /// Fetch a person.
    fn get_person_from_handle(&self, handle: &Handle) -> Result<Person, DbError>;
    /// Fetch a family.
    fn get_family_from_handle(&self, handle: &Handle) -> Result<Family, DbError>;
    /// Fetch an event.
    fn get_event_from_handle(&self, handle: &Handle) -> Result<Event, DbError>;
    /// Fetch a place.
    fn get_place_from_handle(&self, handle: &Handle) -> Result<Place, DbError>;
    /// Fetch a source.
    fn get_source_from_handle(&self, handle: &Handle) -> Result<Source, DbError>;
    /// Fetch a citation.
    fn get_citation_from_handle(&self, handle: &Handle) -> Result<Citation, DbError>;
    /// Fetch a repository.
    fn get_repository_from_handle(&self, handle: &Handle) -> Result<Repository, DbError>;
    /// Fetch a media object.
    fn get_media_from_handle(&self, handle: &Handle) -> Result<Media, DbError>;
    /// Fetch a note.
    fn get_note_from_handle(&self, handle: &Handle) -> Result<Note, DbError>;
    /// Fetch a tag.
    fn get_tag_from_handle(&self, handle: &Handle) -> Result<Tag, DbError>;

    /// Every `(type, handle)` of a primary that links to `handle`.
    fn find_backlink_handles(&self, handle: &Handle) -> Vec<(ObjectType, Handle)>;

    /// Handles of every record of `kind`, in database order.
    fn handles(&self, kind: ObjectType) -> Vec<Handle>;

    /// Open a write batch.
    fn transaction(&self, description: &str) -> Transaction {
        Transaction::new(description)
    }

    /// Insert or replace a record inside `txn`.
    fn commit(&self, record: PrimaryRecord, txn: &mut Transaction) -> Result<(), DbError>;

    /// Delete a record inside `txn`.
    fn remove(&self, kind: ObjectType, handle: &Handle, txn: &mut Transaction)
        -> Result<(), DbError>;

    /// Close the batch and publish its signals.
    fn close_transaction(&self, txn: Transaction);
}

/// Resolve a `(kind, handle)` pair through the typed getter for `kind`.
pub fn fetch_primary(
    db: &dyn Database,
    kind: ObjectType,
    handle: &Handle,
) -> Result<PrimaryRecord, DbError> {
    Ok(match kind {
        ObjectType::Person => PrimaryRecord::Person(db.get_person_from_handle(handle)?),
        ObjectType::Family => PrimaryRecord::Family(db.get_family_from_handle(handle)?),
        ObjectType::Event => PrimaryRecord::Event(db.get_event_from_handle(handle)?),
        ObjectType::Place => PrimaryRecord::Place(db.get_place_from_handle(handle)?),
        ObjectType::Source => PrimaryRecord::Source(db.get_source_from_handle(handle)?),
        ObjectType::Citation => PrimaryRecord::Citation(db.get_citation_from_handle(handle)?),
        ObjectType::Repository => {
            PrimaryRecord::Repository(db.get_repository_from_handle(handle)?)
        }
        ObjectType::Media => PrimaryRecord::Media(db.get_media_from_handle(handle)?),
        ObjectType::Note => PrimaryRecord::Note(db.get_note_from_handle(handle)?),
        ObjectType::Tag => PrimaryRecord::Tag(db.get_tag_from_handle(handle)?),
        other => return Err(DbError::NotPrimary(other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names_round_trip() {
        let sig = DbSignal::Delete(ObjectType::Person, vec![Handle::new("P2")]);
        assert_eq!(sig.name(), "person-delete");
        assert_eq!(
            DbSignal::parse("person-delete", vec![Handle::new("P2")]),
            Some(sig)
        );
        assert_eq!(
            DbSignal::parse("event-rebuild", Vec::new()),
            Some(DbSignal::Rebuild(ObjectType::Event))
        );
        assert_eq!(
            DbSignal::parse("database-changed", Vec::new()),
            Some(DbSignal::DatabaseChanged)
        );
        assert_eq!(DbSignal::parse("name-add", Vec::new()), None);
        assert_eq!(DbSignal::parse("person-explode", Vec::new()), None);
    }

    #[test]
    fn transaction_merges_same_signal() {
        let mut txn = Transaction::new("edit");
        txn.record(DbSignal::Update(ObjectType::Person, vec![Handle::new("P1")]));
        txn.record(DbSignal::Update(
            ObjectType::Person,
            vec![Handle::new("P1"), Handle::new("P2")],
        ));
        txn.record(DbSignal::Delete(ObjectType::Person, vec![Handle::new("P3")]));
        assert_eq!(txn.signals().len(), 2);
        assert_eq!(
            txn.signals()[0],
            DbSignal::Update(ObjectType::Person, vec![Handle::new("P1"), Handle::new("P2")])
        );
    }
}
