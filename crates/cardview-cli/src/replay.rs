// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless replay of a navigation script against an in-memory database.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use cardview_model::list_history::ListViewHistories;
use cardview_model::{Database, DbSignal, Handle, MemoryDb, ObjectType, Transaction};
use cardview_nav::{
    AuxWindow, CategorySwitch, Context, Locator, MruEntry, NavServices, NavigationController,
    PagePort, PlaceholderLoader,
};
use tracing::info;

use crate::script::Step;

type Lines = Rc<RefCell<Vec<String>>>;

/// Outcome of a replay.
#[derive(Debug, Default)]
pub struct Report {
    /// Everything the page was asked to do, in order.
    pub transcript: Vec<String>,
    /// History entries after the last step.
    pub history: Vec<Locator>,
    /// Cursor into `history`.
    pub index: Option<usize>,
    /// MRU list, least recent first.
    pub mru: Vec<MruEntry>,
    /// Milliseconds since start at which a debounced rebuild ran.
    pub rebuilds: Vec<u128>,
}

struct TextPage(Lines);

impl TextPage {
    fn say(&self, line: String) {
        self.0.borrow_mut().push(line);
    }
}

impl PagePort for TextPage {
    fn render(&mut self, context: &Context) {
        let loc = context.locator().map_or_else(|| "-".to_owned(), |l| l.to_string());
        self.say(format!("render {loc}"));
    }
    fn clear(&mut self) {
        self.say("clear".to_owned());
    }
    fn set_status(&mut self, text: &str) {
        self.say(format!("status {text}"));
    }
    fn set_bookmarks(&mut self, bookmarks: Option<&[Handle]>) {
        match bookmarks {
            Some(handles) => {
                let list: Vec<&str> = handles.iter().map(Handle::as_str).collect();
                self.say(format!("bookmarks [{}]", list.join(" ")));
            }
            None => self.say("bookmarks hidden".to_owned()),
        }
    }
    fn copy_to_clipboard(&mut self, data: &str, handle: &Handle) {
        self.say(format!("clipboard {handle} {data}"));
    }
    fn open_help(&mut self) {
        self.say("help".to_owned());
    }
    fn edit(&mut self, context: &Context) {
        self.say(format!("edit {}", context.status_text()));
    }
    fn show_dialog(&mut self, title: &str, body: &str) {
        self.say(format!("dialog {title}: {body}"));
    }
    fn create_pinned_window(&mut self, context: &Context) -> Option<Box<dyn AuxWindow>> {
        self.say(format!("pin {}", context.status_text()));
        Some(Box::new(TextWindow(context.status_text())))
    }
}

struct TextWindow(String);

impl AuxWindow for TextWindow {
    fn title(&self) -> String {
        self.0.clone()
    }
    fn close(&mut self) {}
    fn refresh(&mut self) {}
}

struct TextSwitch(Lines);

impl CategorySwitch for TextSwitch {
    fn switch_to(&mut self, kind: ObjectType, loc: &Locator) {
        self.0.borrow_mut().push(format!("switch {kind} {loc}"));
    }
}

/// Run `steps` through a controller for `view` over `db`.
pub fn run(db: &Rc<MemoryDb>, view: ObjectType, steps: &[Step]) -> Result<Report> {
    let lines: Lines = Rc::new(RefCell::new(Vec::new()));
    let services = Rc::new(NavServices::new(
        Box::new(ListViewHistories::new()),
        Box::new(PlaceholderLoader),
        cardview_nav::history::DEFAULT_MRU_SIZE,
    ));
    let mut ctl = NavigationController::new(
        Some(view),
        services,
        Rc::clone(db) as Rc<dyn Database>,
        Box::new(TextPage(Rc::clone(&lines))),
        Box::new(TextSwitch(Rc::clone(&lines))),
    );
    let start = Instant::now();
    let mut now = start;
    let mut rebuilds = Vec::new();
    ctl.set_active();

    for step in steps {
        info!(?step, "replay");
        match step {
            Step::Goto(loc) => ctl.change_active(loc.clone()),
            Step::Back(n) => {
                ctl.back(*n);
            }
            Step::Forward(n) => {
                ctl.forward(*n);
            }
            Step::Delete(kind, handle) => {
                let mut txn = Transaction::new(format!("Delete {kind} {handle}"));
                db.remove(*kind, handle, &mut txn)?;
                db.close_transaction(txn);
            }
            Step::Rebuild(kind) => db.emit(DbSignal::Rebuild(*kind)),
            Step::Set(key, value) => {
                ctl.set_setting(key, value.clone(), now)?;
            }
            Step::Wait(span) => now += *span,
            Step::Action(action) => ctl.handle_action(*action, now),
        }
        for signal in db.drain_signals() {
            ctl.on_db_signal(&signal);
        }
        if let Step::Wait(span) = step {
            rebuilds.extend(settle(&mut ctl, now - *span, now, start));
        }
    }

    let history = ctl.services().history.borrow();
    let report = Report {
        transcript: lines.borrow().clone(),
        history: history.entries().to_vec(),
        index: history.index(),
        mru: history.mru().to_vec(),
        rebuilds,
    };
    Ok(report)
}

/// Walk the clock from `from` to `to`, polling every deadline on the way.
fn settle(ctl: &mut NavigationController, from: Instant, to: Instant, start: Instant) -> Vec<u128> {
    let mut fired = Vec::new();
    let mut clock = from;
    while let Some(deadline) = ctl.next_deadline().filter(|d| *d <= to) {
        clock = clock.max(deadline);
        if ctl.tick(clock) {
            fired.push(clock.duration_since(start).as_millis());
        }
    }
    ctl.tick(to);
    fired
}
