// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error kinds of the navigation core.

use cardview_model::{Handle, ObjectType};
use thiserror::Error;

use crate::caches::ThumbnailError;
use crate::context::Context;
use crate::locator::LocatorError;

/// Failure to materialize a locator.
///
/// The reference and secondary variants carry the partial context that did
/// resolve, so callers can degrade to it without a second lookup.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The anchoring primary is not in the database.
    #[error("[PRIMARY_MISSING] {kind} {handle}")]
    PrimaryMissing {
        /// Requested primary type.
        kind: ObjectType,
        /// Requested handle.
        handle: Handle,
    },
    /// No edge of `kind` targets `target` any more.
    #[error("[REFERENCE_MISSING] {kind} -> {target}")]
    ReferenceMissing {
        /// Edge kind.
        kind: ObjectType,
        /// Edge target handle.
        target: Handle,
        /// Primary-only context.
        fallback: Box<Context>,
    },
    /// No sub-record of `kind` matches `key` any more.
    #[error("[SECONDARY_MISSING] {kind} {key}")]
    SecondaryMissing {
        /// Secondary kind.
        kind: ObjectType,
        /// Digest (or tag handle) that no longer matches.
        key: String,
        /// Primary-or-reference context.
        fallback: Box<Context>,
    },
}

impl ResolveError {
    /// Partial context to fall back to, if any part resolved.
    pub fn into_fallback(self) -> Option<Context> {
        match self {
            ResolveError::PrimaryMissing { .. } => None,
            ResolveError::ReferenceMissing { fallback, .. }
            | ResolveError::SecondaryMissing { fallback, .. } => Some(*fallback),
        }
    }
}

/// Errors surfaced by navigation services.
#[derive(Debug, Error)]
pub enum NavError {
    /// Context resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A page handed over by a child widget could not be decoded.
    #[error("[DECODE_FAILURE] {0}")]
    DecodeFailure(String),
    /// An auxiliary window with this key is already open.
    #[error("[WINDOW_ACTIVE] window {key:?} is already open")]
    WindowActive {
        /// Registry key of the open window.
        key: String,
    },
    /// Locator failed validation.
    #[error(transparent)]
    Locator(#[from] LocatorError),
    /// Thumbnail could not be produced.
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),
}
