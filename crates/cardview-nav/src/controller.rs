// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-view navigation controller.
//!
//! A controller owns one card view's current [`Context`] and drives its
//! [`PagePort`]. The history, caches and window registry it touches live in
//! the shared [`NavServices`]. Resolver failures never escape: they become a
//! cleared page, a fallback page, or a status-line message.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cardview_app_core::config::{
    ConfigError, Settings, SubscriptionId, KEY_MRU_SIZE, KEY_SHOW_BOOKMARKS, KEY_THUMBNAIL_SIZE,
};
use cardview_app_core::config_port::ConfigPort;
use cardview_app_core::notice::{NoticeKind, NoticeService, NoticeSurface};
use cardview_model::records::CropRect;
use cardview_model::{Database, Handle, ObjectType, PrimaryRecord};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::actions::Action;
use crate::caches::{SizeBucket, Thumbnail};
use crate::coalescer::RefreshCoalescer;
use crate::context::Context;
use crate::error::{NavError, ResolveError};
use crate::events::SignalMap;
use crate::history::{ExtendedHistory, DEFAULT_MRU_SIZE};
use crate::locator::Locator;
use crate::ports::{CategorySwitch, FirstHandlePolicy, InitialObjectPolicy, PagePort};
use crate::resolver::ObjectResolver;
use crate::services::NavServices;

/// Group key shared by every card view.
pub const NAVIGATION_GROUP: &str = "cardview";

const MAX_TICKETS: usize = 4096;
const DIALOG_TTL: Duration = Duration::from_secs(3600);

/// Opaque handle to a context given to a child widget (a clicked link).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageTicket(u64);

impl PageTicket {
    /// Raw ticket number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Navigation controller of one card view.
pub struct NavigationController {
    nav_type: Option<ObjectType>,
    pub(crate) services: Rc<NavServices>,
    db: Rc<dyn Database>,
    settings: Settings,
    pub(crate) coalescer: Rc<RefCell<RefreshCoalescer>>,
    watch_ids: Vec<SubscriptionId>,
    pub(crate) page: Box<dyn PagePort>,
    category: Box<dyn CategorySwitch>,
    initial: Box<dyn InitialObjectPolicy>,
    config: Option<Box<dyn ConfigPort>>,
    notices: NoticeService,
    pub(crate) context: Context,
    pub(crate) tickets: BTreeMap<PageTicket, Context>,
    next_ticket: u64,
    pub(crate) signals: SignalMap,
    active: bool,
    pub(crate) dirty: bool,
    dirty_redraw_trigger: bool,
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("nav_type", &self.nav_type)
            .field("context", &self.context.locator())
            .field("active", &self.active)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl NavigationController {
    /// Controller for views of `nav_type` (`None` for a dashboard).
    pub fn new(
        nav_type: Option<ObjectType>,
        services: Rc<NavServices>,
        db: Rc<dyn Database>,
        page: Box<dyn PagePort>,
        category: Box<dyn CategorySwitch>,
    ) -> Self {
        let mut settings = Settings::card_view_defaults();
        let coalescer = Rc::new(RefCell::new(RefreshCoalescer::from_settings(&settings)));
        let watch_ids = RefreshCoalescer::watch(&coalescer, &mut settings);
        let mut signals = SignalMap::new();
        signals.resubscribe();
        Self {
            nav_type,
            services,
            db,
            settings,
            coalescer,
            watch_ids,
            page,
            category,
            initial: Box::new(FirstHandlePolicy),
            config: None,
            notices: NoticeService::default(),
            context: Context::empty(),
            tickets: BTreeMap::new(),
            next_ticket: 1,
            signals,
            active: false,
            dirty: true,
            dirty_redraw_trigger: false,
        }
    }

    /// Replace the settings profile (re-subscribing the coalescer).
    pub fn with_settings(mut self, mut settings: Settings) -> Self {
        let coalescer = Rc::new(RefCell::new(RefreshCoalescer::from_settings(&settings)));
        self.watch_ids = RefreshCoalescer::watch(&coalescer, &mut settings);
        self.settings = settings;
        self.coalescer = coalescer;
        self.apply_mru_size();
        self
    }

    /// Use `policy` to pick a page when nothing else is known.
    pub fn with_initial_policy(mut self, policy: Box<dyn InitialObjectPolicy>) -> Self {
        self.initial = policy;
        self
    }

    /// Persist prefs and settings through `port`; stored settings are merged now.
    pub fn with_config(mut self, port: Box<dyn ConfigPort>) -> Self {
        if let Some(stored) = port.load_settings() {
            self.settings.merge(&stored);
            self.rewatch();
            self.apply_mru_size();
            self.apply_refresh_delay();
        }
        self.config = Some(port);
        self
    }

    /// Primary type this view shows (`None` for a dashboard).
    pub fn navigation_type(&self) -> Option<ObjectType> {
        self.nav_type
    }

    /// Navigation group shared by all card views.
    pub fn navigation_group_key(&self) -> &'static str {
        NAVIGATION_GROUP
    }

    /// Shared services.
    pub fn services(&self) -> &Rc<NavServices> {
        &self.services
    }

    /// Settings profile.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Notices raised by the controller.
    pub fn notices(&self) -> &NoticeService {
        &self.notices
    }

    /// True between [`set_active`](Self::set_active) and [`set_inactive`](Self::set_inactive).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True when the page needs a rebuild.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Change one setting at `now`; the rebuild is debounced.
    pub fn set_setting(&mut self, key: &str, value: Value, now: Instant) -> Result<bool, ConfigError> {
        let changed = self.settings.set(key, value, now)?;
        if changed {
            self.apply_refresh_delay();
            if let Some(port) = &self.config {
                port.save_settings(&self.settings.to_value());
            }
        }
        Ok(changed)
    }

    /// Record a visit to `loc` and show it.
    #[instrument(skip(self, loc), fields(loc = %loc))]
    pub fn change_active(&mut self, loc: Locator) {
        if let Err(err) = loc.validate() {
            warn!(%err, "rejecting invalid locator");
            return;
        }
        let pushed = self.services.history.borrow_mut().push(loc.clone(), false, false);
        if pushed {
            self.change_object(loc);
        }
    }

    /// Show the primary `(kind, handle)` unless it is already shown.
    #[instrument(skip(self))]
    pub fn goto_handle(&mut self, kind: ObjectType, handle: Handle) {
        let current = self.context.primary().map(|p| p.handle());
        if current == Some(&handle) {
            return;
        }
        self.change_object(Locator::primary(kind, handle));
    }

    /// Show `loc` without touching history.
    ///
    /// A locator of another primary type goes to the category switch.
    /// Otherwise the page is rebuilt when it is dirty, when a redraw was
    /// requested, or when `loc` is not what is shown.
    #[instrument(skip(self, loc), fields(loc = %loc))]
    pub fn change_object(&mut self, loc: Locator) {
        if let Some(own) = self.nav_type {
            if loc.primary_type() != own {
                debug!(%own, "handing over to category switch");
                self.category.switch_to(loc.primary_type(), &loc);
                return;
            }
        }
        if !self.active {
            self.dirty = true;
            return;
        }
        let same = self.context.locator().as_ref() == Some(&loc);
        if same && !self.dirty && !self.dirty_redraw_trigger {
            return;
        }
        self.render_locator(&loc);
    }

    /// Hand `context` to a child widget as a ticket.
    pub fn issue_ticket(&mut self, context: Context) -> PageTicket {
        let ticket = PageTicket(self.next_ticket);
        self.next_ticket += 1;
        self.tickets.insert(ticket, context);
        while self.tickets.len() > MAX_TICKETS {
            self.tickets.pop_first();
        }
        ticket
    }

    /// A child widget asked for the page behind `ticket`.
    ///
    /// Unknown tickets are dropped. With a pending redraw trigger the page is
    /// shown without recording history.
    #[instrument(skip(self))]
    pub fn load_page(&mut self, ticket: PageTicket) {
        let Some(context) = self.tickets.get(&ticket).cloned() else {
            debug!(err = %NavError::DecodeFailure(format!("unknown ticket {}", ticket.get())), "page request dropped");
            return;
        };
        self.open_context(context);
    }

    /// Byte-form counterpart of [`load_page`](Self::load_page), for hosts that
    /// pass encoded locators. Undecodable input is dropped.
    pub fn load_page_bytes(&mut self, bytes: &[u8]) {
        match Locator::from_bytes(bytes) {
            Ok(loc) if self.dirty_redraw_trigger => self.render_locator(&loc),
            Ok(loc) => self.change_active(loc),
            Err(err) => debug!(err = %NavError::DecodeFailure(err.to_string()), "page request dropped"),
        }
    }

    fn open_context(&mut self, context: Context) {
        if self.dirty_redraw_trigger {
            self.show(context);
            return;
        }
        if let Some(loc) = context.locator() {
            self.change_active(loc);
        }
    }

    /// Rebuild the current page (settings or database changed).
    #[instrument(skip(self))]
    pub fn build_tree(&mut self) {
        self.dirty = true;
        self.apply_mru_size();
        self.apply_refresh_delay();
        self.services.windows.borrow_mut().refresh_all();
        if !self.active {
            return;
        }
        if self.context.is_empty() {
            let nav_type = self.nav_type;
            let present = self
                .services
                .history
                .borrow()
                .present()
                .filter(|loc| nav_type.is_none_or(|t| t == loc.primary_type()))
                .cloned();
            match present {
                Some(loc) => self.render_locator(&loc),
                None => {
                    self.page.clear();
                    self.page.set_status("");
                    self.dirty = false;
                }
            }
            return;
        }
        self.refresh_current();
    }

    /// Context behind the current page.
    pub fn fetch_page_context(&self) -> &Context {
        &self.context
    }

    /// Cached thumbnail of `path`.
    pub fn fetch_thumbnail(
        &self,
        path: &Path,
        crop: Option<CropRect>,
        size: SizeBucket,
    ) -> Result<Arc<Thumbnail>, NavError> {
        Ok(self.services.thumbnails.borrow_mut().fetch(path, crop, size)?)
    }

    /// Size bucket named by `media.thumbnail-size`.
    pub fn thumbnail_size(&self) -> SizeBucket {
        SizeBucket::from_setting(self.settings.get_str(KEY_THUMBNAIL_SIZE, "small"))
    }

    /// A secondary was re-keyed from `old` to `new`: rewrite history and
    /// re-show the page if it was the one affected.
    pub fn update_history_reference(&mut self, old: &str, new: &str) -> bool {
        let changed = self.services.history.borrow_mut().replace_secondary(old, new);
        if changed && self.context.secondary_key() == Some(old) {
            let present = self.services.history.borrow().present().cloned();
            if let Some(loc) = present {
                self.render_locator(&loc);
            }
        }
        changed
    }

    /// Force the next [`load_page`](Self::load_page) or [`change_object`](Self::change_object) to redraw.
    pub fn set_dirty_redraw_trigger(&mut self) {
        self.dirty_redraw_trigger = true;
    }

    /// Copy `data` (taken from `handle`'s record) to the clipboard.
    pub fn clipboard_copy(&mut self, data: &str, handle: &Handle) -> bool {
        self.page.copy_to_clipboard(data, handle);
        true
    }

    /// Bookmark the current primary at the end of its type's list.
    pub fn bookmark_current(&mut self) -> bool {
        let Some(primary) = self.context.primary() else {
            return false;
        };
        let (kind, handle) = (primary.kind(), primary.handle().clone());
        debug!(%kind, %handle, "bookmark added");
        self.services
            .bookmarks
            .borrow_mut()
            .list_mut(kind)
            .insert(usize::MAX, handle);
        self.redraw_bookmarks(kind);
        true
    }

    /// Drop `handle` from the bookmarks of `kind`.
    pub fn remove_bookmark(&mut self, kind: ObjectType, handle: &Handle) -> bool {
        let removed = self.services.bookmarks.borrow_mut().list_mut(kind).remove(handle);
        if removed {
            self.redraw_bookmarks(kind);
        }
        removed
    }

    /// Records linking to the current primary.
    pub fn backlinks(&self) -> Vec<(ObjectType, Handle)> {
        self.context
            .primary()
            .map(|p| self.db.find_backlink_handles(p.handle()))
            .unwrap_or_default()
    }

    /// Step back `n` pages.
    pub fn back(&mut self, n: usize) -> Option<Locator> {
        self.step(|history| history.back(n))
    }

    /// Step forward `n` pages.
    pub fn forward(&mut self, n: usize) -> Option<Locator> {
        self.step(|history| history.forward(n))
    }

    fn step<F>(&mut self, mv: F) -> Option<Locator>
    where
        F: FnOnce(&mut ExtendedHistory) -> Option<Locator>,
    {
        let loc = mv(&mut self.services.history.borrow_mut())?;
        self.services.history.borrow_mut().lock();
        self.change_object(loc.clone());
        self.services.history.borrow_mut().unlock();
        Some(loc)
    }

    /// Run a registered action.
    #[instrument(skip(self))]
    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::ViewHelp => self.page.open_help(),
            Action::Edit => {
                if !self.context.is_empty() {
                    self.page.edit(&self.context);
                }
            }
            Action::PrimaryJ => {
                let target = self.context.locator().map(|loc| loc.to_primary());
                if let Some(target) = target.filter(|t| Some(t) != self.context.locator().as_ref()) {
                    self.change_active(target);
                }
            }
            Action::OpenPinnedView => self.open_pinned(now),
        }
    }

    fn open_pinned(&mut self, now: Instant) {
        if self.context.is_empty() {
            return;
        }
        let Some(window) = self.page.create_pinned_window(&self.context) else {
            return;
        };
        let key = self.context.obj_key();
        let opened = self.services.windows.borrow_mut().open(key, window);
        if let Err(err) = opened {
            warn!(%err, "pinned view not opened");
            let body = err.to_string();
            self.notices.push(
                NoticeKind::Warn,
                NoticeSurface::Dialog,
                "Window already open",
                Some(body.clone()),
                DIALOG_TTL,
                now,
            );
            self.page.show_dialog("Window already open", &body);
        }
    }

    /// Advance timers to `now`. Returns whether a debounced rebuild ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notices.retain_visible(now);
        let due = self.coalescer.borrow_mut().poll(now);
        if due {
            info!("settings changed, rebuilding");
            self.build_tree();
        }
        due
    }

    /// When the next debounced rebuild is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.coalescer.borrow().next_deadline()
    }

    /// View shown: pick a page if history has none for this view.
    ///
    /// Order: history, shadow history, persisted last page, initial policy.
    #[instrument(skip(self))]
    pub fn set_active(&mut self) {
        self.active = true;
        let nav_type = self.nav_type;
        let own = move |loc: &Locator| nav_type.is_none_or(|t| t == loc.primary_type());
        let present = self.services.history.borrow().present().cloned().filter(own);
        if let Some(loc) = present {
            self.change_object(loc);
            return;
        }
        let fallback = self
            .shadow_page()
            .or_else(|| self.persisted_page().filter(own))
            .or_else(|| self.policy_page());
        match fallback {
            Some(loc) => {
                self.services.history.borrow_mut().push(loc.clone(), true, true);
                self.render_locator(&loc);
            }
            None => {
                self.context = Context::empty();
                self.page.clear();
                self.page.set_status("");
                self.dirty = false;
            }
        }
    }

    /// View hidden: remember the page for the next session.
    pub fn set_inactive(&mut self) {
        self.active = false;
        let (Some(port), Some(loc)) = (&self.config, self.context.locator()) else {
            return;
        };
        let mut prefs = port.load_prefs().unwrap_or_default();
        prefs.last_page = Some(loc.into());
        port.save_prefs(&prefs);
    }

    fn shadow_page(&self) -> Option<Locator> {
        let kind = self.nav_type?;
        let handle = self.services.history.borrow().shadow_present(kind)?;
        Some(Locator::primary(kind, handle))
    }

    fn persisted_page(&self) -> Option<Locator> {
        let tuple = self.config.as_ref()?.load_prefs()?.last_page?;
        match Locator::try_from(tuple) {
            Ok(loc) if loc.validate().is_ok() => Some(loc),
            Ok(loc) => {
                debug!(%loc, "ignoring invalid persisted page");
                None
            }
            Err(err) => {
                debug!(%err, "ignoring undecodable persisted page");
                None
            }
        }
    }

    fn policy_page(&self) -> Option<Locator> {
        let kind = self.nav_type?;
        let handle = self.initial.initial_object(&*self.db, kind)?;
        Some(Locator::primary(kind, handle))
    }

    /// Re-resolve the shown page after an edit, re-keying an edited secondary
    /// in history.
    pub fn refresh_current(&mut self) {
        let Some(old) = self.context.locator() else {
            return;
        };
        let result = {
            let lookup = self.services.lookup.borrow();
            self.context.refresh(&ObjectResolver::new(&*self.db, &lookup))
        };
        if let Ok(ctx) = &result {
            if let (Some(before), Some(after)) = (old.secondary_key(), ctx.secondary_key()) {
                if before != after {
                    self.services.history.borrow_mut().replace_secondary(before, after);
                }
            }
        }
        self.apply(result);
    }

    pub(crate) fn render_locator(&mut self, loc: &Locator) {
        let result = {
            let lookup = self.services.lookup.borrow();
            ObjectResolver::new(&*self.db, &lookup).resolve(loc)
        };
        self.apply(result);
    }

    fn apply(&mut self, result: Result<Context, ResolveError>) {
        match result {
            Ok(ctx) => self.show(ctx),
            Err(ResolveError::PrimaryMissing { kind, handle }) => {
                warn!(%kind, %handle, "no active object");
                self.context = Context::empty();
                self.page.clear();
                self.page.set_status(&format!("[{kind}] {handle} not found"));
                self.dirty = false;
                self.dirty_redraw_trigger = false;
            }
            Err(err) => {
                debug!(%err, "showing fallback page");
                if let Some(ctx) = err.into_fallback() {
                    self.show(ctx);
                }
            }
        }
    }

    fn show(&mut self, ctx: Context) {
        let bookmarks = self.bookmark_bar(ctx.primary().map(PrimaryRecord::kind));
        self.page.set_bookmarks(bookmarks.as_deref());
        self.page.render(&ctx);
        self.page.set_status(&ctx.status_text());
        self.context = ctx;
        self.dirty = false;
        self.dirty_redraw_trigger = false;
    }

    /// Bookmarks of `kind` when the bar is shown; never on tag pages.
    fn bookmark_bar(&self, kind: Option<ObjectType>) -> Option<Vec<Handle>> {
        let kind = kind.filter(|k| *k != ObjectType::Tag)?;
        if !self.settings.get_bool(KEY_SHOW_BOOKMARKS, true) {
            return None;
        }
        Some(self.services.bookmarks.borrow().get(kind).to_vec())
    }

    fn redraw_bookmarks(&mut self, kind: ObjectType) {
        let shown = self.context.primary().map(PrimaryRecord::kind);
        if shown == Some(kind) {
            let bookmarks = self.bookmark_bar(shown);
            self.page.set_bookmarks(bookmarks.as_deref());
        }
    }

    fn apply_refresh_delay(&self) {
        let delay = RefreshCoalescer::delay_setting(&self.settings);
        self.coalescer.borrow_mut().set_delay(delay);
    }

    /// Subscribe the coalescer to every key, including keys added by a merge.
    fn rewatch(&mut self) {
        for id in self.watch_ids.drain(..) {
            self.settings.disconnect(id);
        }
        self.watch_ids = RefreshCoalescer::watch(&self.coalescer, &mut self.settings);
    }

    fn apply_mru_size(&self) {
        let default = u64::try_from(DEFAULT_MRU_SIZE).unwrap_or(10);
        let size = usize::try_from(self.settings.get_u64(KEY_MRU_SIZE, default)).unwrap_or(DEFAULT_MRU_SIZE);
        self.services.history.borrow_mut().set_mru_size(size);
    }
}
