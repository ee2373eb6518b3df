// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use cardview_model::list_history::ListViewHistories;
use cardview_model::primary::{Event, Family, Person, Tag};
use cardview_model::records::{ChildRef, EventRef, Name};
use cardview_model::{Handle, MemoryDb, ObjectType, PrimaryRecord};
use cardview_nav::{
    AuxWindow, CategorySwitch, Context, ExtendedHistory, Locator, MruEntry, NavServices,
    NavigationController, PagePort, PlaceholderLoader,
};

/// Observable events recorded by the fakes below, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Active(Option<Locator>),
    Mru(Vec<MruEntry>),
    Render(Option<Locator>),
    Clear,
    Status(String),
    Bookmarks(Option<Vec<Handle>>),
    Clipboard(String, Handle),
    Help,
    Edit(Option<Locator>),
    Dialog(String),
    Switch(ObjectType, Locator),
    WindowClosed,
}

pub type Log = Rc<RefCell<Vec<Seen>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn ada() -> Name {
    Name {
        first_name: "Ada".into(),
        surname: "Lovelace".into(),
        ..Name::default()
    }
}

/// P1 (Ada, EventRef → E4, tag T1), P2, F1 (child P2), E4, T1 "ToDo".
pub fn fixture_db() -> MemoryDb {
    MemoryDb::with_records([
        PrimaryRecord::Person(Person {
            handle: Handle::new("P1"),
            id: "I0001".into(),
            names: vec![ada()],
            event_refs: vec![EventRef {
                ref_handle: Handle::new("E4"),
                role: "Primary".into(),
                ..EventRef::default()
            }],
            tags: vec![Handle::new("T1")],
            ..Person::default()
        }),
        PrimaryRecord::Person(Person {
            handle: Handle::new("P2"),
            id: "I0002".into(),
            names: vec![Name {
                first_name: "Byron".into(),
                ..Name::default()
            }],
            parent_families: vec![Handle::new("F1")],
            ..Person::default()
        }),
        PrimaryRecord::Family(Family {
            handle: Handle::new("F1"),
            id: "F0001".into(),
            father: Some(Handle::new("P1")),
            child_refs: vec![ChildRef {
                ref_handle: Handle::new("P2"),
                ..ChildRef::default()
            }],
            ..Family::default()
        }),
        PrimaryRecord::Event(Event {
            handle: Handle::new("E4"),
            id: "E0004".into(),
            event_type: "Birth".into(),
            ..Event::default()
        }),
        PrimaryRecord::Tag(Tag {
            handle: Handle::new("T1"),
            name: "ToDo".into(),
            ..Tag::default()
        }),
    ])
}

/// History with both signals recorded into `log`.
pub fn observed_history(log: &Log) -> ExtendedHistory {
    let mut hist = ExtendedHistory::new(Box::new(ListViewHistories::new()), 10);
    let active = Rc::clone(log);
    hist.connect_active_changed(move |loc| active.borrow_mut().push(Seen::Active(loc.cloned())));
    let mru = Rc::clone(log);
    hist.connect_mru_changed(move |list| mru.borrow_mut().push(Seen::Mru(list.to_vec())));
    hist
}

pub fn services(log: &Log) -> Rc<NavServices> {
    let svc = NavServices::new(
        Box::new(ListViewHistories::new()),
        Box::new(PlaceholderLoader),
        10,
    );
    {
        let mut hist = svc.history.borrow_mut();
        let active = Rc::clone(log);
        hist.connect_active_changed(move |loc| active.borrow_mut().push(Seen::Active(loc.cloned())));
        let mru = Rc::clone(log);
        hist.connect_mru_changed(move |list| mru.borrow_mut().push(Seen::Mru(list.to_vec())));
    }
    Rc::new(svc)
}

pub struct RecordingPage(pub Log);

impl PagePort for RecordingPage {
    fn render(&mut self, context: &Context) {
        self.0.borrow_mut().push(Seen::Render(context.locator()));
    }
    fn clear(&mut self) {
        self.0.borrow_mut().push(Seen::Clear);
    }
    fn set_status(&mut self, text: &str) {
        self.0.borrow_mut().push(Seen::Status(text.to_owned()));
    }
    fn set_bookmarks(&mut self, bookmarks: Option<&[Handle]>) {
        self.0
            .borrow_mut()
            .push(Seen::Bookmarks(bookmarks.map(<[Handle]>::to_vec)));
    }
    fn copy_to_clipboard(&mut self, data: &str, handle: &Handle) {
        self.0
            .borrow_mut()
            .push(Seen::Clipboard(data.to_owned(), handle.clone()));
    }
    fn open_help(&mut self) {
        self.0.borrow_mut().push(Seen::Help);
    }
    fn edit(&mut self, context: &Context) {
        self.0.borrow_mut().push(Seen::Edit(context.locator()));
    }
    fn show_dialog(&mut self, title: &str, _body: &str) {
        self.0.borrow_mut().push(Seen::Dialog(title.to_owned()));
    }
    fn create_pinned_window(&mut self, context: &Context) -> Option<Box<dyn AuxWindow>> {
        Some(Box::new(PinnedWindow {
            title: context.status_text(),
            log: Rc::clone(&self.0),
        }))
    }
}

pub struct PinnedWindow {
    title: String,
    log: Log,
}

impl AuxWindow for PinnedWindow {
    fn title(&self) -> String {
        self.title.clone()
    }
    fn close(&mut self) {
        self.log.borrow_mut().push(Seen::WindowClosed);
    }
    fn refresh(&mut self) {}
}

pub struct RecordingSwitch(pub Log);

impl CategorySwitch for RecordingSwitch {
    fn switch_to(&mut self, kind: ObjectType, loc: &Locator) {
        self.0.borrow_mut().push(Seen::Switch(kind, loc.clone()));
    }
}

/// Inactive controller of `kind` over `db`.
pub fn controller(kind: Option<ObjectType>, db: Rc<MemoryDb>, log: &Log) -> NavigationController {
    NavigationController::new(
        kind,
        services(log),
        db,
        Box::new(RecordingPage(Rc::clone(log))),
        Box::new(RecordingSwitch(Rc::clone(log))),
    )
}

pub fn person(h: &str) -> Locator {
    Locator::primary(ObjectType::Person, h)
}

pub fn count(log: &Log, pred: impl Fn(&Seen) -> bool) -> usize {
    log.borrow().iter().filter(|s| pred(s)).count()
}
