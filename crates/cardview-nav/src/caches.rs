// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Caches the resolver and card rendering depend on.
//!
//! Both caches are initialized when a database opens and cleared wholesale
//! when it changes.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cardview_model::records::CropRect;
use cardview_model::{fetch_primary, Database, DbError, Handle, ObjectType, PrimaryRecord};
use thiserror::Error;
use tracing::debug;

/// Per-type handle→record lookup, bound while a database is open.
#[derive(Debug, Default, Clone)]
pub struct LookupTable {
    bound: BTreeSet<ObjectType>,
}

impl LookupTable {
    /// Empty table (no database open).
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every primary type to its typed getter.
    pub fn populate(&mut self) {
        self.bound = ObjectType::PRIMARY.into_iter().collect();
    }

    /// Forget every binding (database closed).
    pub fn clear(&mut self) {
        self.bound.clear();
    }

    /// True once [`populate`](Self::populate) ran.
    pub fn is_populated(&self) -> bool {
        !self.bound.is_empty()
    }

    /// Fetch `(kind, handle)` through the typed getter for `kind`.
    pub fn fetch(
        &self,
        db: &dyn Database,
        kind: ObjectType,
        handle: &Handle,
    ) -> Result<PrimaryRecord, DbError> {
        if !self.bound.contains(&kind) {
            return Err(DbError::NotPrimary(kind));
        }
        fetch_primary(db, kind, handle)
    }
}

/// Thumbnail size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    /// Card-sized thumbnail.
    Small,
    /// Preview-sized thumbnail.
    Large,
}

impl SizeBucket {
    /// Bucket named by the `media.thumbnail-size` setting (unknown → small).
    pub fn from_setting(name: &str) -> Self {
        match name {
            "large" => SizeBucket::Large,
            _ => SizeBucket::Small,
        }
    }

    /// Longest edge in pixels.
    pub fn max_edge(self) -> u32 {
        match self {
            SizeBucket::Small => 96,
            SizeBucket::Large => 256,
        }
    }
}

/// A decoded thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data.
    pub rgba: Arc<[u8]>,
}

/// Image decoding failure reported by an [`ImageLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot load thumbnail for {path}: {reason}")]
pub struct ThumbnailError {
    /// Path that failed.
    pub path: PathBuf,
    /// Loader-specific reason.
    pub reason: String,
}

/// External image decoder.
pub trait ImageLoader {
    /// Decode `path`, crop to `crop` (percent rectangle) and scale to `size`.
    fn load(
        &self,
        path: &Path,
        crop: Option<CropRect>,
        size: SizeBucket,
    ) -> Result<Thumbnail, ThumbnailError>;
}

type ThumbKey = (PathBuf, Option<CropRect>, SizeBucket);

/// Thumbnail cache keyed by (absolute path, crop rectangle, size bucket).
pub struct ThumbnailCache {
    entries: HashMap<ThumbKey, Arc<Thumbnail>>,
    loader: Box<dyn ImageLoader>,
    hits: u64,
    misses: u64,
}

impl std::fmt::Debug for ThumbnailCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

impl ThumbnailCache {
    /// Empty cache backed by `loader`.
    pub fn new(loader: Box<dyn ImageLoader>) -> Self {
        Self {
            entries: HashMap::new(),
            loader,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached thumbnail, decoding on first request. Failures are not cached.
    pub fn fetch(
        &mut self,
        path: &Path,
        crop: Option<CropRect>,
        size: SizeBucket,
    ) -> Result<Arc<Thumbnail>, ThumbnailError> {
        let key = (path.to_path_buf(), crop, size);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(hit));
        }
        self.misses += 1;
        let thumb = Arc::new(self.loader.load(path, crop, size)?);
        self.entries.insert(key, Arc::clone(&thumb));
        Ok(thumb)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "thumbnail cache cleared");
        self.entries.clear();
    }

    /// Number of cached thumbnails.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// Loader that produces a blank thumbnail of the requested bucket size.
///
/// Used when the host has no decoder wired in (headless tools, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderLoader;

impl ImageLoader for PlaceholderLoader {
    fn load(
        &self,
        _path: &Path,
        _crop: Option<CropRect>,
        size: SizeBucket,
    ) -> Result<Thumbnail, ThumbnailError> {
        let edge = size.max_edge();
        let len = usize::try_from(edge * edge * 4).unwrap_or(0);
        Ok(Thumbnail {
            width: edge,
            height: edge,
            rgba: Arc::from(vec![0u8; len]),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cardview_model::primary::Person;
    use cardview_model::MemoryDb;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingLoader(Rc<Cell<u32>>);

    impl ImageLoader for CountingLoader {
        fn load(
            &self,
            path: &Path,
            crop: Option<CropRect>,
            size: SizeBucket,
        ) -> Result<Thumbnail, ThumbnailError> {
            self.0.set(self.0.get() + 1);
            if path.ends_with("missing.jpg") {
                return Err(ThumbnailError {
                    path: path.to_path_buf(),
                    reason: "no such file".into(),
                });
            }
            PlaceholderLoader.load(path, crop, size)
        }
    }

    #[test]
    fn lookup_requires_population() {
        let db = MemoryDb::with_records([PrimaryRecord::Person(Person {
            handle: Handle::new("P1"),
            ..Person::default()
        })]);
        let mut table = LookupTable::new();
        assert_eq!(
            table.fetch(&db, ObjectType::Person, &Handle::new("P1")),
            Err(DbError::NotPrimary(ObjectType::Person))
        );
        table.populate();
        assert!(table.is_populated());
        assert_eq!(
            table.fetch(&db, ObjectType::Person, &Handle::new("P1")),
            fetch_primary(&db, ObjectType::Person, &Handle::new("P1"))
        );
        assert_eq!(
            table.fetch(&db, ObjectType::Name, &Handle::new("P1")),
            Err(DbError::NotPrimary(ObjectType::Name))
        );
        table.clear();
        assert!(!table.is_populated());
    }

    #[test]
    fn thumbnails_are_keyed_by_path_crop_and_size() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = ThumbnailCache::new(Box::new(CountingLoader(Rc::clone(&calls))));
        let path = Path::new("/media/a.jpg");
        cache.fetch(path, None, SizeBucket::Small).unwrap();
        cache.fetch(path, None, SizeBucket::Small).unwrap();
        cache.fetch(path, Some((0, 0, 50, 50)), SizeBucket::Small).unwrap();
        cache.fetch(path, None, SizeBucket::Large).unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(cache.stats(), (1, 3));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_cached() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = ThumbnailCache::new(Box::new(CountingLoader(Rc::clone(&calls))));
        let path = Path::new("/media/missing.jpg");
        assert!(cache.fetch(path, None, SizeBucket::Small).is_err());
        assert!(cache.fetch(path, None, SizeBucket::Small).is_err());
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 0);
    }
}
