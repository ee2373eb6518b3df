// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! State shared by every card view of one open database.
//!
//! One instance is created by the host and handed to each controller as an
//! `Rc`; it is reset, never rebuilt, when the database changes.

use std::cell::RefCell;

use cardview_model::bookmarks::Bookmarks;
use cardview_model::list_history::TypeHistories;

use crate::caches::{ImageLoader, LookupTable, ThumbnailCache};
use crate::history::ExtendedHistory;
use crate::windows::WindowRegistry;

/// History, bookmarks, caches and window registry shared by the card views.
#[derive(Debug)]
pub struct NavServices {
    /// Unified navigation history.
    pub history: RefCell<ExtendedHistory>,
    /// Decoded thumbnails.
    pub thumbnails: RefCell<ThumbnailCache>,
    /// Per-type getter table.
    pub lookup: RefCell<LookupTable>,
    /// Open pinned windows.
    pub windows: RefCell<WindowRegistry>,
    /// Per-type bookmark lists shown in the bookmarks bar.
    pub bookmarks: RefCell<Bookmarks>,
}

impl NavServices {
    /// Services for a freshly opened database.
    pub fn new(shadow: Box<dyn TypeHistories>, loader: Box<dyn ImageLoader>, mru_size: usize) -> Self {
        let mut lookup = LookupTable::new();
        lookup.populate();
        Self {
            history: RefCell::new(ExtendedHistory::new(shadow, mru_size)),
            thumbnails: RefCell::new(ThumbnailCache::new(loader)),
            lookup: RefCell::new(lookup),
            windows: RefCell::new(WindowRegistry::new()),
            bookmarks: RefCell::new(Bookmarks::default()),
        }
    }

    /// Database switched: close windows, empty caches, bookmarks and history.
    pub fn reset(&self) {
        self.windows.borrow_mut().close_all();
        self.thumbnails.borrow_mut().clear();
        self.bookmarks.borrow_mut().clear();
        let mut lookup = self.lookup.borrow_mut();
        lookup.clear();
        lookup.populate();
        let mut history = self.history.borrow_mut();
        history.clear();
        history.clear_shadow();
    }
}
