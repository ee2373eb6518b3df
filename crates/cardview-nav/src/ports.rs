// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ports the controller drives; the host UI implements them.

use cardview_model::{Database, Handle, ObjectType};

use crate::context::Context;
use crate::locator::Locator;
use crate::windows::AuxWindow;

/// Rendering surface of one card view.
pub trait PagePort {
    /// Draw `context`.
    fn render(&mut self, context: &Context);
    /// Blank the page (no active object).
    fn clear(&mut self);
    /// Replace the status-line text.
    fn set_status(&mut self, text: &str);
    /// Show the bookmarks bar listing `bookmarks`, or hide it (`None`).
    fn set_bookmarks(&mut self, bookmarks: Option<&[Handle]>);
    /// Put `data` on the clipboard, tagged with the record it came from.
    fn copy_to_clipboard(&mut self, data: &str, handle: &Handle);
    /// Open the user manual page for this view.
    fn open_help(&mut self);
    /// Open the editor for the current page.
    fn edit(&mut self, context: &Context);
    /// Show a modal message.
    fn show_dialog(&mut self, title: &str, body: &str);
    /// Build a pinned window showing `context`, if the host supports them.
    fn create_pinned_window(&mut self, context: &Context) -> Option<Box<dyn AuxWindow>>;
}

/// Activates the view registered for another primary type.
pub trait CategorySwitch {
    /// Switch to the view for `kind` and show `loc` there.
    fn switch_to(&mut self, kind: ObjectType, loc: &Locator);
}

/// Picks the page to show when a view activates with nothing in history.
pub trait InitialObjectPolicy {
    /// Handle to open for `kind`, if any.
    fn initial_object(&self, db: &dyn Database, kind: ObjectType) -> Option<Handle>;
}

/// First record of the type in database order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstHandlePolicy;

impl InitialObjectPolicy for FirstHandlePolicy {
    fn initial_object(&self, db: &dyn Database, kind: ObjectType) -> Option<Handle> {
        db.handles(kind).into_iter().next()
    }
}
