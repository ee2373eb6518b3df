// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Composite page locator: the unit of navigation.
//!
//! A locator is a six-tuple
//! `(primary_type, primary_handle, reference_type, reference_handle,
//! secondary_type, secondary_key)`. The primary pair is always present; the
//! reference pair and the secondary pair are independently optional.
//!
//! # Invariants
//!
//! - `secondary_key` is a tag handle when `secondary_type` is `Tag`, and a
//!   64-character lowercase hex SHA-256 digest otherwise ([`Locator::validate`]).
//! - Equality and hashing are structural over all six fields.
//! - The persisted form is the six-element tuple ([`PageTuple`]).

use std::fmt;

use cardview_app_core::prefs::PageTuple;
use cardview_model::{Handle, ObjectType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::is_digest;

/// Errors from building, validating, or decoding a locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// A type field does not name an [`ObjectType`].
    #[error("unknown object type in locator: {0}")]
    UnknownType(String),
    /// The primary type is a sub-record type.
    #[error("{0} cannot anchor a page")]
    NotPrimary(ObjectType),
    /// The reference type is not a reference edge kind.
    #[error("{0} is not a reference type")]
    NotReference(ObjectType),
    /// The secondary key is not a digest (and the secondary is not a tag).
    #[error("secondary key {0:?} is not a sha-256 hex digest")]
    MalformedKey(String),
    /// Byte form could not be decoded.
    #[error("locator decode failed: {0}")]
    Decode(String),
    /// Byte form could not be encoded.
    #[error("locator encode failed: {0}")]
    Encode(String),
}

/// Immutable page address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PageTuple", try_from = "PageTuple")]
pub struct Locator {
    primary_type: ObjectType,
    primary_handle: Handle,
    reference_type: Option<ObjectType>,
    reference_handle: Option<Handle>,
    secondary_type: Option<ObjectType>,
    secondary_key: Option<String>,
}

impl Locator {
    /// Full constructor.
    pub fn new(
        primary_type: ObjectType,
        primary_handle: impl Into<Handle>,
        reference_type: Option<ObjectType>,
        reference_handle: Option<Handle>,
        secondary_type: Option<ObjectType>,
        secondary_key: Option<String>,
    ) -> Self {
        Self {
            primary_type,
            primary_handle: primary_handle.into(),
            reference_type,
            reference_handle,
            secondary_type,
            secondary_key,
        }
    }

    /// Two-field shorthand: primary only.
    pub fn primary(primary_type: ObjectType, primary_handle: impl Into<Handle>) -> Self {
        Self::new(primary_type, primary_handle, None, None, None, None)
    }

    /// Copy with the reference pair set.
    pub fn with_reference(mut self, kind: ObjectType, target: impl Into<Handle>) -> Self {
        self.reference_type = Some(kind);
        self.reference_handle = Some(target.into());
        self
    }

    /// Copy with the secondary pair set.
    pub fn with_secondary(mut self, kind: ObjectType, key: impl Into<String>) -> Self {
        self.secondary_type = Some(kind);
        self.secondary_key = Some(key.into());
        self
    }

    /// Copy with only the secondary key replaced.
    pub fn with_secondary_key(mut self, key: impl Into<String>) -> Self {
        self.secondary_key = Some(key.into());
        self
    }

    /// Copy reduced to the primary pair.
    pub fn to_primary(&self) -> Self {
        Self::primary(self.primary_type, self.primary_handle.clone())
    }

    /// Anchoring primary type.
    pub fn primary_type(&self) -> ObjectType {
        self.primary_type
    }

    /// Anchoring primary handle.
    pub fn primary_handle(&self) -> &Handle {
        &self.primary_handle
    }

    /// Reference edge kind, if any.
    pub fn reference_type(&self) -> Option<ObjectType> {
        self.reference_type
    }

    /// Target of the reference edge, if any.
    pub fn reference_handle(&self) -> Option<&Handle> {
        self.reference_handle.as_ref()
    }

    /// Secondary sub-record kind, if any.
    pub fn secondary_type(&self) -> Option<ObjectType> {
        self.secondary_type
    }

    /// Secondary key (digest, or tag handle for `Tag`), if any.
    pub fn secondary_key(&self) -> Option<&str> {
        self.secondary_key.as_deref()
    }

    /// Both reference fields are set.
    pub fn has_reference(&self) -> bool {
        self.reference_type.is_some() && self.reference_handle.is_some()
    }

    /// Both secondary fields are set.
    pub fn has_secondary(&self) -> bool {
        self.secondary_type.is_some() && self.secondary_key.is_some()
    }

    /// True when `handle` is the primary or the reference target.
    pub fn mentions(&self, handle: &Handle) -> bool {
        &self.primary_handle == handle || self.reference_handle.as_ref() == Some(handle)
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if !self.primary_type.is_primary() {
            return Err(LocatorError::NotPrimary(self.primary_type));
        }
        if let Some(kind) = self.reference_type {
            if !kind.is_reference() {
                return Err(LocatorError::NotReference(kind));
            }
        }
        if let (Some(kind), Some(key)) = (self.secondary_type, self.secondary_key.as_deref()) {
            if kind != ObjectType::Tag && !is_digest(key) {
                return Err(LocatorError::MalformedKey(key.to_owned()));
            }
        }
        Ok(())
    }

    /// CBOR byte form (the persisted six-tuple).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LocatorError> {
        let mut out = Vec::new();
        ciborium::into_writer(self, &mut out).map_err(|e| LocatorError::Encode(e.to_string()))?;
        Ok(out)
    }

    /// Decode the byte form produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LocatorError> {
        ciborium::from_reader(bytes).map_err(|e| LocatorError::Decode(e.to_string()))
    }
}

impl From<Locator> for PageTuple {
    fn from(loc: Locator) -> Self {
        (
            loc.primary_type.as_str().to_owned(),
            loc.primary_handle.into_inner(),
            loc.reference_type.map(|k| k.as_str().to_owned()),
            loc.reference_handle.map(Handle::into_inner),
            loc.secondary_type.map(|k| k.as_str().to_owned()),
            loc.secondary_key,
        )
    }
}

fn parse_type(raw: &str) -> Result<ObjectType, LocatorError> {
    raw.parse()
        .map_err(|_| LocatorError::UnknownType(raw.to_owned()))
}

fn parse_optional_type(raw: Option<String>) -> Result<Option<ObjectType>, LocatorError> {
    raw.filter(|s| !s.is_empty())
        .map(|s| parse_type(&s))
        .transpose()
}

impl TryFrom<PageTuple> for Locator {
    type Error = LocatorError;

    fn try_from(tuple: PageTuple) -> Result<Self, Self::Error> {
        let (ptype, phandle, rtype, rhandle, stype, skey) = tuple;
        Ok(Self {
            primary_type: parse_type(&ptype)?,
            primary_handle: Handle::new(phandle),
            reference_type: parse_optional_type(rtype)?,
            reference_handle: rhandle.filter(|s| !s.is_empty()).map(Handle::new),
            secondary_type: parse_optional_type(stype)?,
            secondary_key: skey.filter(|s| !s.is_empty()),
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(v: Option<T>) -> String {
            v.map_or_else(|| "-".to_owned(), |v| v.to_string())
        }
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.primary_type,
            self.primary_handle,
            opt(self.reference_type),
            opt(self.reference_handle.as_ref()),
            opt(self.secondary_type),
            opt(self.secondary_key.as_deref()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn shorthand_leaves_optional_fields_unset() {
        let loc = Locator::primary(ObjectType::Person, "P1");
        assert!(!loc.has_reference());
        assert!(!loc.has_secondary());
        assert_eq!(loc.to_string(), "(Person, P1, -, -, -, -)");
    }

    #[test]
    fn bytes_round_trip_keeps_all_fields() {
        let loc = Locator::primary(ObjectType::Person, "P1")
            .with_reference(ObjectType::EventRef, "E4")
            .with_secondary(ObjectType::Attribute, DIGEST);
        let back = Locator::from_bytes(&loc.to_bytes().unwrap()).unwrap();
        assert_eq!(back, loc);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            Locator::from_bytes(&[0xff, 0x00, 0x13]),
            Err(LocatorError::Decode(_))
        ));
    }

    #[test]
    fn validate_enforces_key_shape() {
        let tag = Locator::primary(ObjectType::Person, "P1").with_secondary(ObjectType::Tag, "T1");
        assert_eq!(tag.validate(), Ok(()));
        let bad = Locator::primary(ObjectType::Person, "P1").with_secondary(ObjectType::Name, "T1");
        assert_eq!(
            bad.validate(),
            Err(LocatorError::MalformedKey("T1".to_owned()))
        );
        let sub = Locator::primary(ObjectType::Name, "P1");
        assert_eq!(sub.validate(), Err(LocatorError::NotPrimary(ObjectType::Name)));
    }

    #[test]
    fn tuple_form_treats_empty_strings_as_unset() {
        let loc = Locator::try_from((
            "Family".to_owned(),
            "F1".to_owned(),
            Some(String::new()),
            Some(String::new()),
            None,
            None,
        ))
        .unwrap();
        assert_eq!(loc, Locator::primary(ObjectType::Family, "F1"));
    }

    #[test]
    fn json_form_is_six_element_array() {
        let loc = Locator::primary(ObjectType::Tag, "T1");
        assert_eq!(
            serde_json::to_string(&loc).unwrap(),
            r#"["Tag","T1",null,null,null,null]"#
        );
    }
}
