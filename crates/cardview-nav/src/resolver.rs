// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Locator → [`Context`] resolution.

use cardview_model::{Database, Handle, ObjectType, Secondary, SubRecordHolder};
use tracing::{debug, warn};

use crate::caches::LookupTable;
use crate::context::Context;
use crate::error::ResolveError;
use crate::hash::hash_secondary;
use crate::locator::Locator;

/// Materializes locators against a database.
#[derive(Clone, Copy)]
pub struct ObjectResolver<'a> {
    db: &'a dyn Database,
    lookup: &'a LookupTable,
}

impl<'a> ObjectResolver<'a> {
    /// Resolver reading `db` through `lookup`.
    pub fn new(db: &'a dyn Database, lookup: &'a LookupTable) -> Self {
        Self { db, lookup }
    }

    /// Resolve every part of `loc`.
    ///
    /// The reference is the first edge of the given kind targeting the
    /// handle; the secondary is the first sub-record of the given kind whose
    /// digest equals the key (or, for tags, whose handle equals it). Sub-records
    /// are looked up inside the reference when one resolved.
    pub fn resolve(&self, loc: &Locator) -> Result<Context, ResolveError> {
        let kind = loc.primary_type();
        let handle = loc.primary_handle();
        let primary = self.lookup.fetch(self.db, kind, handle).map_err(|err| {
            debug!(%kind, %handle, %err, "primary lookup failed");
            ResolveError::PrimaryMissing {
                kind,
                handle: handle.clone(),
            }
        })?;
        let mut ctx = Context::for_primary(primary);

        if let (Some(ref_kind), Some(target)) = (loc.reference_type(), loc.reference_handle()) {
            let edge = ctx
                .primary
                .as_ref()
                .and_then(|p| p.references(ref_kind).into_iter().find(|e| e.target() == target));
            match edge {
                Some(edge) => {
                    ctx.reference_base = ctx.primary.clone();
                    ctx.reference = Some(edge);
                }
                None => {
                    return Err(ResolveError::ReferenceMissing {
                        kind: ref_kind,
                        target: target.clone(),
                        fallback: Box::new(ctx),
                    })
                }
            }
        }

        if let (Some(sec_kind), Some(key)) = (loc.secondary_type(), loc.secondary_key()) {
            match find_secondary(&ctx, sec_kind, key) {
                Some((index, found)) => {
                    ctx.secondary = Some(found);
                    ctx.secondary_key = Some(key.to_owned());
                    ctx.secondary_index = Some(index);
                }
                None => {
                    return Err(ResolveError::SecondaryMissing {
                        kind: sec_kind,
                        key: key.to_owned(),
                        fallback: Box::new(ctx),
                    })
                }
            }
        }
        Ok(ctx)
    }

    /// Re-resolve `ctx` after an external edit.
    ///
    /// When the secondary's digest no longer matches, the sub-record stored at
    /// the same position (and of the same kind) is taken instead, and the
    /// returned context carries its new key.
    pub fn refresh(&self, ctx: &Context) -> Result<Context, ResolveError> {
        let Some(loc) = ctx.locator() else {
            return Ok(Context::empty());
        };
        match self.resolve(&loc) {
            Err(ResolveError::SecondaryMissing {
                kind,
                key,
                fallback,
            }) => {
                let Some(index) = ctx.secondary_index else {
                    return Err(ResolveError::SecondaryMissing {
                        kind,
                        key,
                        fallback,
                    });
                };
                let mut repaired = *fallback;
                let Some(found) = secondary_at(&repaired, kind, index) else {
                    return Err(ResolveError::SecondaryMissing {
                        kind,
                        key,
                        fallback: Box::new(repaired),
                    });
                };
                let new_key = key_of(&found).unwrap_or_default();
                debug!(%kind, old = %key, new = %new_key, "secondary re-keyed after edit");
                repaired.secondary = Some(found);
                repaired.secondary_key = Some(new_key);
                repaired.secondary_index = Some(index);
                Ok(repaired)
            }
            other => other,
        }
    }
}

fn holder_secondaries(ctx: &Context, kind: ObjectType) -> Vec<Secondary> {
    if kind == ObjectType::Tag {
        let tags: &[Handle] = match (&ctx.reference, &ctx.primary) {
            (Some(edge), _) => edge.tag_list(),
            (None, Some(primary)) => primary.tag_list(),
            (None, None) => &[],
        };
        return tags.iter().cloned().map(Secondary::Tag).collect();
    }
    match (&ctx.reference, &ctx.primary) {
        (Some(edge), _) => edge.secondaries(kind),
        (None, Some(primary)) => primary.secondaries(kind),
        (None, None) => Vec::new(),
    }
}

fn key_of(record: &Secondary) -> Option<String> {
    match record {
        Secondary::Tag(handle) => Some(handle.as_str().to_owned()),
        other => match hash_secondary(other) {
            Ok(digest) => Some(digest),
            Err(err) => {
                warn!(%err, kind = %other.kind(), "cannot digest secondary");
                None
            }
        },
    }
}

fn find_secondary(ctx: &Context, kind: ObjectType, key: &str) -> Option<(usize, Secondary)> {
    holder_secondaries(ctx, kind)
        .into_iter()
        .enumerate()
        .find(|(_, candidate)| key_of(candidate).as_deref() == Some(key))
}

fn secondary_at(ctx: &Context, kind: ObjectType, index: usize) -> Option<Secondary> {
    holder_secondaries(ctx, kind).into_iter().nth(index)
}
