// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Primary records: the top-level entities that own a handle.
//!
//! Cross-entity links are always [`Handle`]s; nothing here holds another
//! record by value, so person ↔ family cycles never become ownership cycles.

use serde::{Deserialize, Serialize};

use crate::records::{
    Address, Attribute, ChildRef, EventRef, LdsOrd, MediaRef, Name, PersonRef, PlaceRef,
    Reference, RepoRef, Secondary, SubRecordHolder, Url,
};
use crate::types::{Handle, ObjectType};

/// A person.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id ("I0001").
    pub id: String,
    /// Gender text.
    pub gender: String,
    /// Primary name first, then alternates.
    pub names: Vec<Name>,
    /// Events the person takes part in.
    pub event_refs: Vec<EventRef>,
    /// Families where the person is a parent.
    pub families: Vec<Handle>,
    /// Families where the person is a child.
    pub parent_families: Vec<Handle>,
    /// Media attached to the person.
    pub media_refs: Vec<MediaRef>,
    /// Addresses.
    pub addresses: Vec<Address>,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Web links.
    pub urls: Vec<Url>,
    /// LDS ordinances.
    pub lds_ords: Vec<LdsOrd>,
    /// Associations with other people.
    pub person_refs: Vec<PersonRef>,
    /// Citations.
    pub citations: Vec<Handle>,
    /// Notes.
    pub notes: Vec<Handle>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A family.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Family {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Father, when known.
    pub father: Option<Handle>,
    /// Mother, when known.
    pub mother: Option<Handle>,
    /// Children.
    pub child_refs: Vec<ChildRef>,
    /// Family events.
    pub event_refs: Vec<EventRef>,
    /// Media.
    pub media_refs: Vec<MediaRef>,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// LDS ordinances.
    pub lds_ords: Vec<LdsOrd>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// An event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Event type ("Birth", "Marriage", ...).
    pub event_type: String,
    /// Date text.
    pub date: String,
    /// Description.
    pub description: String,
    /// Place of the event.
    pub place: Option<Handle>,
    /// Media.
    pub media_refs: Vec<MediaRef>,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Place name.
    pub name: String,
    /// Enclosing places.
    pub place_refs: Vec<PlaceRef>,
    /// Web links.
    pub urls: Vec<Url>,
    /// Media.
    pub media_refs: Vec<MediaRef>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Repositories holding the source.
    pub repo_refs: Vec<RepoRef>,
    /// Media.
    pub media_refs: Vec<MediaRef>,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A citation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Citation {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Volume/page text.
    pub page: String,
    /// Cited source.
    pub source: Option<Handle>,
    /// Media.
    pub media_refs: Vec<MediaRef>,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Repository type ("Library", "Archive", ...).
    pub repo_type: String,
    /// Addresses.
    pub addresses: Vec<Address>,
    /// Web links.
    pub urls: Vec<Url>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A media object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// File path, absolute or relative to the media base directory.
    pub path: String,
    /// MIME type.
    pub mime: String,
    /// Description.
    pub description: String,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A note.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    /// Database handle.
    pub handle: Handle,
    /// User-visible id.
    pub id: String,
    /// Note text.
    pub text: String,
    /// Note type ("General", "Research", ...).
    pub note_type: String,
    /// Tags.
    pub tags: Vec<Handle>,
}

/// A tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Database handle.
    pub handle: Handle,
    /// Tag name.
    pub name: String,
    /// Display color ("#RRGGBB").
    pub color: String,
    /// Sort priority.
    pub priority: u32,
}

/// Any primary record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PrimaryRecord {
    /// A person.
    Person(Person),
    /// A family.
    Family(Family),
    /// An event.
    Event(Event),
    /// A place.
    Place(Place),
    /// A source.
    Source(Source),
    /// A citation.
    Citation(Citation),
    /// A repository.
    Repository(Repository),
    /// A media object.
    Media(Media),
    /// A note.
    Note(Note),
    /// A tag.
    Tag(Tag),
}

fn wrap<T: Clone>(items: &[T], f: fn(T) -> Reference) -> Vec<Reference> {
    items.iter().cloned().map(f).collect()
}

fn wrap_secondary<T: Clone>(items: &[T], f: fn(T) -> Secondary) -> Vec<Secondary> {
    items.iter().cloned().map(f).collect()
}

impl PrimaryRecord {
    /// Primary type of the record.
    pub fn kind(&self) -> ObjectType {
        match self {
            PrimaryRecord::Person(_) => ObjectType::Person,
            PrimaryRecord::Family(_) => ObjectType::Family,
            PrimaryRecord::Event(_) => ObjectType::Event,
            PrimaryRecord::Place(_) => ObjectType::Place,
            PrimaryRecord::Source(_) => ObjectType::Source,
            PrimaryRecord::Citation(_) => ObjectType::Citation,
            PrimaryRecord::Repository(_) => ObjectType::Repository,
            PrimaryRecord::Media(_) => ObjectType::Media,
            PrimaryRecord::Note(_) => ObjectType::Note,
            PrimaryRecord::Tag(_) => ObjectType::Tag,
        }
    }

    /// Database handle.
    pub fn handle(&self) -> &Handle {
        match self {
            PrimaryRecord::Person(r) => &r.handle,
            PrimaryRecord::Family(r) => &r.handle,
            PrimaryRecord::Event(r) => &r.handle,
            PrimaryRecord::Place(r) => &r.handle,
            PrimaryRecord::Source(r) => &r.handle,
            PrimaryRecord::Citation(r) => &r.handle,
            PrimaryRecord::Repository(r) => &r.handle,
            PrimaryRecord::Media(r) => &r.handle,
            PrimaryRecord::Note(r) => &r.handle,
            PrimaryRecord::Tag(r) => &r.handle,
        }
    }

    /// Short human label used in status lines and window titles.
    pub fn display_label(&self) -> String {
        match self {
            PrimaryRecord::Person(p) => p
                .names
                .first()
                .map(Name::display)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| p.id.clone()),
            PrimaryRecord::Family(f) => f.id.clone(),
            PrimaryRecord::Event(e) if !e.description.is_empty() => e.description.clone(),
            PrimaryRecord::Event(e) => format!("{} {}", e.event_type, e.id).trim().to_owned(),
            PrimaryRecord::Place(p) => p.name.clone(),
            PrimaryRecord::Source(s) => s.title.clone(),
            PrimaryRecord::Citation(c) if !c.page.is_empty() => c.page.clone(),
            PrimaryRecord::Citation(c) => c.id.clone(),
            PrimaryRecord::Repository(r) => r.name.clone(),
            PrimaryRecord::Media(m) if !m.description.is_empty() => m.description.clone(),
            PrimaryRecord::Media(m) => m.path.clone(),
            PrimaryRecord::Note(n) => n.text.lines().next().unwrap_or_default().to_owned(),
            PrimaryRecord::Tag(t) => t.name.clone(),
        }
    }

    /// Reference edges of `kind` held by this record, in stored order.
    pub fn references(&self, kind: ObjectType) -> Vec<Reference> {
        match (self, kind) {
            (PrimaryRecord::Person(p), ObjectType::EventRef) => {
                wrap(&p.event_refs, Reference::EventRef)
            }
            (PrimaryRecord::Person(p), ObjectType::MediaRef) => {
                wrap(&p.media_refs, Reference::MediaRef)
            }
            (PrimaryRecord::Person(p), ObjectType::PersonRef) => {
                wrap(&p.person_refs, Reference::PersonRef)
            }
            (PrimaryRecord::Family(f), ObjectType::ChildRef) => {
                wrap(&f.child_refs, Reference::ChildRef)
            }
            (PrimaryRecord::Family(f), ObjectType::EventRef) => {
                wrap(&f.event_refs, Reference::EventRef)
            }
            (PrimaryRecord::Family(f), ObjectType::MediaRef) => {
                wrap(&f.media_refs, Reference::MediaRef)
            }
            (PrimaryRecord::Event(e), ObjectType::MediaRef) => {
                wrap(&e.media_refs, Reference::MediaRef)
            }
            (PrimaryRecord::Place(p), ObjectType::PlaceRef) => {
                wrap(&p.place_refs, Reference::PlaceRef)
            }
            (PrimaryRecord::Place(p), ObjectType::MediaRef) => {
                wrap(&p.media_refs, Reference::MediaRef)
            }
            (PrimaryRecord::Source(s), ObjectType::RepoRef) => {
                wrap(&s.repo_refs, Reference::RepoRef)
            }
            (PrimaryRecord::Source(s), ObjectType::MediaRef) => {
                wrap(&s.media_refs, Reference::MediaRef)
            }
            (PrimaryRecord::Citation(c), ObjectType::MediaRef) => {
                wrap(&c.media_refs, Reference::MediaRef)
            }
            _ => Vec::new(),
        }
    }

    /// Every handle this record links to, used for backlink scans.
    pub fn linked_handles(&self) -> Vec<Handle> {
        let mut out: Vec<Handle> = ObjectType::ALL
            .iter()
            .filter(|kind| kind.is_reference())
            .flat_map(|kind| self.references(*kind))
            .map(|edge| edge.target().clone())
            .collect();
        out.extend(self.tag_list().iter().cloned());
        match self {
            PrimaryRecord::Person(p) => {
                out.extend(p.families.iter().cloned());
                out.extend(p.parent_families.iter().cloned());
                out.extend(p.citations.iter().cloned());
                out.extend(p.notes.iter().cloned());
            }
            PrimaryRecord::Family(f) => {
                out.extend(f.father.iter().cloned());
                out.extend(f.mother.iter().cloned());
            }
            PrimaryRecord::Event(e) => out.extend(e.place.iter().cloned()),
            PrimaryRecord::Citation(c) => out.extend(c.source.iter().cloned()),
            _ => {}
        }
        out
    }
}

impl SubRecordHolder for PrimaryRecord {
    fn secondaries(&self, kind: ObjectType) -> Vec<Secondary> {
        match (self, kind) {
            (PrimaryRecord::Person(p), ObjectType::Name) => wrap_secondary(&p.names, Secondary::Name),
            (PrimaryRecord::Person(p), ObjectType::Address) => {
                wrap_secondary(&p.addresses, Secondary::Address)
            }
            (PrimaryRecord::Person(p), ObjectType::Attribute) => {
                wrap_secondary(&p.attributes, Secondary::Attribute)
            }
            (PrimaryRecord::Person(p), ObjectType::Url) => wrap_secondary(&p.urls, Secondary::Url),
            (PrimaryRecord::Person(p), ObjectType::LdsOrd) => {
                wrap_secondary(&p.lds_ords, Secondary::LdsOrd)
            }
            (PrimaryRecord::Family(f), ObjectType::Attribute) => {
                wrap_secondary(&f.attributes, Secondary::Attribute)
            }
            (PrimaryRecord::Family(f), ObjectType::LdsOrd) => {
                wrap_secondary(&f.lds_ords, Secondary::LdsOrd)
            }
            (PrimaryRecord::Event(e), ObjectType::Attribute) => {
                wrap_secondary(&e.attributes, Secondary::Attribute)
            }
            (PrimaryRecord::Place(p), ObjectType::Url) => wrap_secondary(&p.urls, Secondary::Url),
            (PrimaryRecord::Source(s), ObjectType::Attribute) => {
                wrap_secondary(&s.attributes, Secondary::Attribute)
            }
            (PrimaryRecord::Citation(c), ObjectType::Attribute) => {
                wrap_secondary(&c.attributes, Secondary::Attribute)
            }
            (PrimaryRecord::Repository(r), ObjectType::Address) => {
                wrap_secondary(&r.addresses, Secondary::Address)
            }
            (PrimaryRecord::Repository(r), ObjectType::Url) => {
                wrap_secondary(&r.urls, Secondary::Url)
            }
            (PrimaryRecord::Media(m), ObjectType::Attribute) => {
                wrap_secondary(&m.attributes, Secondary::Attribute)
            }
            _ => Vec::new(),
        }
    }

    fn tag_list(&self) -> &[Handle] {
        match self {
            PrimaryRecord::Person(r) => &r.tags,
            PrimaryRecord::Family(r) => &r.tags,
            PrimaryRecord::Event(r) => &r.tags,
            PrimaryRecord::Place(r) => &r.tags,
            PrimaryRecord::Source(r) => &r.tags,
            PrimaryRecord::Citation(r) => &r.tags,
            PrimaryRecord::Repository(r) => &r.tags,
            PrimaryRecord::Media(r) => &r.tags,
            PrimaryRecord::Note(r) => &r.tags,
            PrimaryRecord::Tag(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PrimaryRecord {
        PrimaryRecord::Person(Person {
            handle: Handle::new("P1"),
            id: "I0001".into(),
            names: vec![Name {
                first_name: "Ada".into(),
                surname: "Lovelace".into(),
                ..Name::default()
            }],
            event_refs: vec![EventRef {
                ref_handle: Handle::new("E4"),
                role: "Primary".into(),
                ..EventRef::default()
            }],
            families: vec![Handle::new("F1")],
            tags: vec![Handle::new("T1")],
            ..Person::default()
        })
    }

    #[test]
    fn person_label_is_primary_name() {
        assert_eq!(person().display_label(), "Ada Lovelace");
    }

    #[test]
    fn references_are_filtered_by_kind() {
        let rec = person();
        assert_eq!(rec.references(ObjectType::EventRef).len(), 1);
        assert!(rec.references(ObjectType::ChildRef).is_empty());
    }

    #[test]
    fn linked_handles_cover_edges_tags_and_families() {
        let links = person().linked_handles();
        for h in ["E4", "F1", "T1"] {
            assert!(links.contains(&Handle::new(h)), "{h}");
        }
    }

    #[test]
    fn tag_record_has_no_tag_list() {
        let tag = PrimaryRecord::Tag(Tag {
            handle: Handle::new("T1"),
            name: "ToDo".into(),
            ..Tag::default()
        });
        assert!(tag.tag_list().is_empty());
        assert_eq!(tag.display_label(), "ToDo");
    }
}
