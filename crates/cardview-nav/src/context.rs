// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Materialized view of a locator.

use cardview_model::{PrimaryRecord, Reference, Secondary};

use crate::error::ResolveError;
use crate::locator::Locator;
use crate::resolver::ObjectResolver;

/// The resolved objects behind the current page.
///
/// All four parts are optional so that a page whose reference or secondary
/// vanished can still show what is left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub(crate) primary: Option<PrimaryRecord>,
    pub(crate) reference: Option<Reference>,
    pub(crate) reference_base: Option<PrimaryRecord>,
    pub(crate) secondary: Option<Secondary>,
    pub(crate) secondary_key: Option<String>,
    pub(crate) secondary_index: Option<usize>,
}

impl Context {
    /// Context with nothing resolved.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context showing a primary record only.
    pub fn for_primary(primary: PrimaryRecord) -> Self {
        Self {
            primary: Some(primary),
            ..Self::default()
        }
    }

    /// Anchoring primary record.
    pub fn primary(&self) -> Option<&PrimaryRecord> {
        self.primary.as_ref()
    }

    /// Reference edge, for reference pages.
    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    /// Primary in which the reference edge is embedded.
    pub fn reference_base(&self) -> Option<&PrimaryRecord> {
        self.reference_base.as_ref()
    }

    /// Secondary sub-record, for secondary pages.
    pub fn secondary(&self) -> Option<&Secondary> {
        self.secondary.as_ref()
    }

    /// Key the secondary was resolved by (digest, or tag handle).
    pub fn secondary_key(&self) -> Option<&str> {
        self.secondary_key.as_deref()
    }

    /// True when nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    /// Page type label: the reference kind (plus secondary kind) on reference
    /// pages, else the secondary kind, else the primary kind.
    pub fn page_type(&self) -> String {
        let secondary = self.secondary.as_ref().map(|s| s.kind().as_str());
        match (&self.reference, secondary) {
            (Some(edge), Some(sec)) => format!("{}{}", edge.kind(), sec),
            (Some(edge), None) => edge.kind().as_str().to_owned(),
            (None, Some(sec)) => sec.to_owned(),
            (None, None) => self
                .primary
                .as_ref()
                .map(|p| p.kind().as_str().to_owned())
                .unwrap_or_default(),
        }
    }

    /// String uniquely identifying the page: handles and key joined by `-`.
    pub fn obj_key(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(primary) = &self.primary {
            parts.push(primary.handle().as_str());
        }
        if let Some(edge) = &self.reference {
            parts.push(edge.target().as_str());
        }
        if let Some(key) = &self.secondary_key {
            parts.push(key);
        }
        parts.join("-")
    }

    /// Locator addressing this context (`None` when empty).
    pub fn locator(&self) -> Option<Locator> {
        let primary = self.primary.as_ref()?;
        let mut loc = Locator::primary(primary.kind(), primary.handle().clone());
        if let Some(edge) = &self.reference {
            loc = loc.with_reference(edge.kind(), edge.target().clone());
        }
        if let (Some(sec), Some(key)) = (&self.secondary, &self.secondary_key) {
            loc = loc.with_secondary(sec.kind(), key.clone());
        }
        Some(loc)
    }

    /// Label for status lines: `"[<page_type>] <primary label>"`.
    pub fn status_text(&self) -> String {
        match &self.primary {
            Some(primary) => format!("[{}] {}", self.page_type(), primary.display_label()),
            None => String::new(),
        }
    }

    /// Re-fetch the primary and re-find the reference and secondary so an
    /// external edit is reflected. See [`ObjectResolver::refresh`].
    pub fn refresh(&self, resolver: &ObjectResolver<'_>) -> Result<Context, ResolveError> {
        resolver.refresh(self)
    }
}
