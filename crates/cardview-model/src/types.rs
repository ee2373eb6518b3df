// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifiers shared by every record: object types and handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of record kinds addressable by a page locator.
///
/// The first ten variants are primary records (own a handle in the database);
/// the rest are sub-records embedded inside a primary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    /// Primary: a person.
    Person,
    /// Primary: a family (couple plus children).
    Family,
    /// Primary: an event.
    Event,
    /// Primary: a place.
    Place,
    /// Primary: a source.
    Source,
    /// Primary: a citation of a source.
    Citation,
    /// Primary: a repository holding sources.
    Repository,
    /// Primary: a media object.
    Media,
    /// Primary: a note.
    Note,
    /// Primary: a tag.
    Tag,
    /// Secondary: a person's name.
    Name,
    /// Secondary: a postal address.
    Address,
    /// Secondary: a typed attribute.
    Attribute,
    /// Secondary: an LDS ordinance.
    LdsOrd,
    /// Secondary: a web link.
    Url,
    /// Reference: family → child person.
    ChildRef,
    /// Reference: record → event.
    EventRef,
    /// Reference: record → media.
    MediaRef,
    /// Reference: person → associated person.
    PersonRef,
    /// Reference: source → repository.
    RepoRef,
    /// Reference: place → enclosing place.
    PlaceRef,
}

impl ObjectType {
    /// Every primary type, in database order.
    pub const PRIMARY: [ObjectType; 10] = [
        ObjectType::Person,
        ObjectType::Family,
        ObjectType::Event,
        ObjectType::Place,
        ObjectType::Source,
        ObjectType::Citation,
        ObjectType::Repository,
        ObjectType::Media,
        ObjectType::Note,
        ObjectType::Tag,
    ];

    /// Every variant.
    pub const ALL: [ObjectType; 21] = [
        ObjectType::Person,
        ObjectType::Family,
        ObjectType::Event,
        ObjectType::Place,
        ObjectType::Source,
        ObjectType::Citation,
        ObjectType::Repository,
        ObjectType::Media,
        ObjectType::Note,
        ObjectType::Tag,
        ObjectType::Name,
        ObjectType::Address,
        ObjectType::Attribute,
        ObjectType::LdsOrd,
        ObjectType::Url,
        ObjectType::ChildRef,
        ObjectType::EventRef,
        ObjectType::MediaRef,
        ObjectType::PersonRef,
        ObjectType::RepoRef,
        ObjectType::PlaceRef,
    ];

    /// True for types that own a handle in the database.
    pub fn is_primary(self) -> bool {
        Self::PRIMARY.contains(&self)
    }

    /// True for reference edges (sub-records pointing at another primary).
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            ObjectType::ChildRef
                | ObjectType::EventRef
                | ObjectType::MediaRef
                | ObjectType::PersonRef
                | ObjectType::RepoRef
                | ObjectType::PlaceRef
        )
    }

    /// True for secondary sub-records addressed by content hash.
    pub fn is_secondary(self) -> bool {
        !self.is_primary() && !self.is_reference()
    }

    /// Canonical name, e.g. `"EventRef"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Person => "Person",
            ObjectType::Family => "Family",
            ObjectType::Event => "Event",
            ObjectType::Place => "Place",
            ObjectType::Source => "Source",
            ObjectType::Citation => "Citation",
            ObjectType::Repository => "Repository",
            ObjectType::Media => "Media",
            ObjectType::Note => "Note",
            ObjectType::Tag => "Tag",
            ObjectType::Name => "Name",
            ObjectType::Address => "Address",
            ObjectType::Attribute => "Attribute",
            ObjectType::LdsOrd => "LdsOrd",
            ObjectType::Url => "Url",
            ObjectType::ChildRef => "ChildRef",
            ObjectType::EventRef => "EventRef",
            ObjectType::MediaRef => "MediaRef",
            ObjectType::PersonRef => "PersonRef",
            ObjectType::RepoRef => "RepoRef",
            ObjectType::PlaceRef => "PlaceRef",
        }
    }

    /// Lowercase prefix used in database signal names (`person-delete`).
    pub fn signal_prefix(self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Inverse of [`signal_prefix`](Self::signal_prefix) for primary types.
    pub fn from_signal_prefix(prefix: &str) -> Option<Self> {
        Self::PRIMARY
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name an [`ObjectType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object type: {0}")]
pub struct UnknownObjectType(pub String);

impl FromStr for ObjectType {
    type Err = UnknownObjectType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownObjectType(s.to_owned()))
    }
}

/// Opaque, globally unique identifier assigned by the database to a primary record.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Wrap a raw handle string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_exactly_one_category() {
        for kind in ObjectType::ALL {
            let count = [kind.is_primary(), kind.is_reference(), kind.is_secondary()]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(count, 1, "{kind}");
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in ObjectType::ALL {
            assert_eq!(kind.as_str().parse::<ObjectType>(), Ok(kind));
        }
        assert!("Dog".parse::<ObjectType>().is_err());
    }

    #[test]
    fn signal_prefix_is_lowercase_primary_name() {
        assert_eq!(ObjectType::Repository.signal_prefix(), "repository");
        assert_eq!(
            ObjectType::from_signal_prefix("citation"),
            Some(ObjectType::Citation)
        );
        assert_eq!(ObjectType::from_signal_prefix("eventref"), None);
    }

    #[test]
    fn default_records_carry_an_empty_handle() {
        let edge = crate::records::EventRef::default();
        assert_eq!(edge.ref_handle, Handle::default());
        assert_eq!(crate::primary::Person::default().handle.as_str(), "");
    }
}
