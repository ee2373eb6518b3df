// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sub-records embedded in primaries: secondaries and reference edges.
//!
//! Secondaries (names, addresses, attributes, ordinances, links) have no
//! identity of their own and are addressed by the hash of their canonical
//! form. Reference edges point at another primary by [`Handle`] and are
//! identified by that target.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_string;
use crate::types::{Handle, ObjectType};

/// A person's name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Name {
    /// Given name(s).
    pub first_name: String,
    /// Family name.
    pub surname: String,
    /// Suffix such as "Jr.".
    pub suffix: String,
    /// Title such as "Dr.".
    pub title: String,
    /// Name type ("Birth Name", "Married Name", ...).
    pub name_type: String,
    /// Citations supporting this name.
    pub citations: Vec<Handle>,
}

impl Name {
    /// "First Surname" with empty parts dropped.
    pub fn display(&self) -> String {
        [self.first_name.as_str(), self.surname.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A postal address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street line.
    pub street: String,
    /// City or town.
    pub city: String,
    /// State or county.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub postal: String,
    /// Date text for when the address applied.
    pub date: String,
}

/// A typed key/value attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    /// Attribute type ("Occupation", "Nickname", ...).
    pub attr_type: String,
    /// Attribute value.
    pub value: String,
    /// Citations supporting this attribute.
    pub citations: Vec<Handle>,
}

/// An LDS ordinance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdsOrd {
    /// Ordinance type ("Baptism", "Endowment", ...).
    pub ord_type: String,
    /// Temple code.
    pub temple: String,
    /// Status text.
    pub status: String,
    /// Date text.
    pub date: String,
    /// Place where it took place.
    pub place: Option<Handle>,
}

/// A web link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Url {
    /// Target address.
    pub path: String,
    /// Human description.
    pub description: String,
    /// Link type ("Web Home", "E-mail", ...).
    pub url_type: String,
}

/// Family → child edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildRef {
    /// Child person.
    pub ref_handle: Handle,
    /// Relation to the father ("Birth", "Adopted", ...).
    pub father_relation: String,
    /// Relation to the mother.
    pub mother_relation: String,
    /// Citations supporting the edge.
    pub citations: Vec<Handle>,
}

/// Record → event edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRef {
    /// Target event.
    pub ref_handle: Handle,
    /// Role of the holder in the event ("Primary", "Witness", ...).
    pub role: String,
    /// Attributes attached to the edge.
    pub attributes: Vec<Attribute>,
    /// Citations supporting the edge.
    pub citations: Vec<Handle>,
}

/// Crop rectangle in percent of the image, `(x1, y1, x2, y2)`.
pub type CropRect = (u8, u8, u8, u8);

/// Record → media edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaRef {
    /// Target media object.
    pub ref_handle: Handle,
    /// Optional region of interest.
    pub rect: Option<CropRect>,
    /// Attributes attached to the edge.
    pub attributes: Vec<Attribute>,
    /// Citations supporting the edge.
    pub citations: Vec<Handle>,
}

/// Person → associated person edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRef {
    /// Associated person.
    pub ref_handle: Handle,
    /// Relationship description ("Godfather", ...).
    pub relation: String,
    /// Citations supporting the edge.
    pub citations: Vec<Handle>,
}

/// Source → repository edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoRef {
    /// Target repository.
    pub ref_handle: Handle,
    /// Call number in the repository.
    pub call_number: String,
    /// Medium ("Book", "Microfilm", ...).
    pub media_type: String,
}

/// Place → enclosing place edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceRef {
    /// Enclosing place.
    pub ref_handle: Handle,
    /// Date range text when the enclosure applied.
    pub date: String,
}

/// A secondary sub-record, or a tag reference in secondary position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Secondary {
    /// A name.
    Name(Name),
    /// An address.
    Address(Address),
    /// An attribute.
    Attribute(Attribute),
    /// An LDS ordinance.
    LdsOrd(LdsOrd),
    /// A web link.
    Url(Url),
    /// A tag reference, addressed by tag handle rather than by hash.
    Tag(Handle),
}

impl Secondary {
    /// Kind of sub-record this is.
    pub fn kind(&self) -> ObjectType {
        match self {
            Secondary::Name(_) => ObjectType::Name,
            Secondary::Address(_) => ObjectType::Address,
            Secondary::Attribute(_) => ObjectType::Attribute,
            Secondary::LdsOrd(_) => ObjectType::LdsOrd,
            Secondary::Url(_) => ObjectType::Url,
            Secondary::Tag(_) => ObjectType::Tag,
        }
    }

    /// Canonical serialization of the inner record (never the enum wrapper).
    pub fn canonical_form(&self) -> Result<String, serde_json::Error> {
        match self {
            Secondary::Name(rec) => canonical_string(rec),
            Secondary::Address(rec) => canonical_string(rec),
            Secondary::Attribute(rec) => canonical_string(rec),
            Secondary::LdsOrd(rec) => canonical_string(rec),
            Secondary::Url(rec) => canonical_string(rec),
            Secondary::Tag(handle) => canonical_string(handle),
        }
    }
}

/// A reference edge embedded in a primary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reference {
    /// Family → child.
    ChildRef(ChildRef),
    /// Record → event.
    EventRef(EventRef),
    /// Record → media.
    MediaRef(MediaRef),
    /// Person → person.
    PersonRef(PersonRef),
    /// Source → repository.
    RepoRef(RepoRef),
    /// Place → place.
    PlaceRef(PlaceRef),
}

impl Reference {
    /// Kind of edge.
    pub fn kind(&self) -> ObjectType {
        match self {
            Reference::ChildRef(_) => ObjectType::ChildRef,
            Reference::EventRef(_) => ObjectType::EventRef,
            Reference::MediaRef(_) => ObjectType::MediaRef,
            Reference::PersonRef(_) => ObjectType::PersonRef,
            Reference::RepoRef(_) => ObjectType::RepoRef,
            Reference::PlaceRef(_) => ObjectType::PlaceRef,
        }
    }

    /// Handle of the primary the edge points at.
    pub fn target(&self) -> &Handle {
        match self {
            Reference::ChildRef(r) => &r.ref_handle,
            Reference::EventRef(r) => &r.ref_handle,
            Reference::MediaRef(r) => &r.ref_handle,
            Reference::PersonRef(r) => &r.ref_handle,
            Reference::RepoRef(r) => &r.ref_handle,
            Reference::PlaceRef(r) => &r.ref_handle,
        }
    }

    /// Primary type of the edge's target.
    pub fn target_type(&self) -> ObjectType {
        match self {
            Reference::ChildRef(_) | Reference::PersonRef(_) => ObjectType::Person,
            Reference::EventRef(_) => ObjectType::Event,
            Reference::MediaRef(_) => ObjectType::Media,
            Reference::RepoRef(_) => ObjectType::Repository,
            Reference::PlaceRef(_) => ObjectType::Place,
        }
    }
}

impl SubRecordHolder for Reference {
    fn secondaries(&self, kind: ObjectType) -> Vec<Secondary> {
        match (self, kind) {
            (Reference::EventRef(r), ObjectType::Attribute) => {
                r.attributes.iter().cloned().map(Secondary::Attribute).collect()
            }
            (Reference::MediaRef(r), ObjectType::Attribute) => {
                r.attributes.iter().cloned().map(Secondary::Attribute).collect()
            }
            _ => Vec::new(),
        }
    }

    fn tag_list(&self) -> &[Handle] {
        &[]
    }
}

/// Anything that embeds secondaries and tag references.
pub trait SubRecordHolder {
    /// Secondaries of `kind`, in stored order. Empty when the holder has none.
    fn secondaries(&self, kind: ObjectType) -> Vec<Secondary>;

    /// Tag handles attached to the holder.
    fn tag_list(&self) -> &[Handle];
}
