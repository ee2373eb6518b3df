// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Navigation core for card-style genealogy views.
//!
//! Every addressable page is named by a six-field [`Locator`]: a primary
//! record, optionally one of its reference edges, optionally one of its
//! secondary sub-records (addressed by the SHA-256 of their canonical form).
//! The [`ExtendedHistory`] records visits, keeps an MRU list and mirrors
//! landings into per-type list histories. A [`NavigationController`] per view
//! resolves locators into a [`Context`] through the [`ObjectResolver`], renders
//! through a [`PagePort`], and reacts to database signals and debounced
//! settings changes ([`RefreshCoalescer`]).
//!
//! Everything runs on the host's single UI thread; shared state lives in an
//! `Rc<NavServices>` handed to each controller.

pub mod actions;
pub mod caches;
pub mod coalescer;
pub mod context;
pub mod controller;
pub mod error;
pub mod events;
pub mod hash;
pub mod history;
pub mod locator;
pub mod ports;
pub mod resolver;
pub mod services;
pub mod windows;

pub use actions::Action;
pub use caches::{ImageLoader, LookupTable, PlaceholderLoader, SizeBucket, Thumbnail, ThumbnailCache};
pub use coalescer::{FireOutcome, RefreshCoalescer};
pub use context::Context;
pub use controller::{NavigationController, PageTicket};
pub use error::{NavError, ResolveError};
pub use events::SignalMap;
pub use hash::{hash_secondary, secondary_key};
pub use history::{ExtendedHistory, MruEntry};
pub use locator::{Locator, LocatorError};
pub use ports::{CategorySwitch, FirstHandlePolicy, InitialObjectPolicy, PagePort};
pub use resolver::ObjectResolver;
pub use services::NavServices;
pub use windows::{AuxWindow, WindowRegistry};
