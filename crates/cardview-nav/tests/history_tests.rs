// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
mod common;

use cardview_model::{Handle, ObjectType};
use cardview_nav::Locator;
use common::{count, log, observed_history, person, Seen};

const H1: &str = "1111111111111111111111111111111111111111111111111111111111111111";
const H2: &str = "2222222222222222222222222222222222222222222222222222222222222222";

#[test]
fn person_then_event_ref_then_back() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(person("P1"), false, false);
    hist.push(
        person("P1").with_reference(ObjectType::EventRef, "E4"),
        false,
        false,
    );
    let back = hist.back(1);
    assert_eq!(back, Some(person("P1")));
    assert_eq!(hist.present(), Some(&person("P1")));
    assert_eq!(
        hist.mru().last(),
        Some(&(ObjectType::Person, Handle::new("P1")))
    );
}

#[test]
fn pushing_the_same_locator_twice_is_idempotent() {
    let seen = log();
    let mut hist = observed_history(&seen);
    assert!(hist.push(person("P1"), false, false));
    assert!(!hist.push(person("P1"), false, false));
    assert_eq!(hist.len(), 1);
    assert_eq!(count(&seen, |s| matches!(s, Seen::Active(_))), 1);
}

#[test]
fn push_after_back_truncates_forward_history() {
    let seen = log();
    let mut hist = observed_history(&seen);
    for h in ["P1", "P2", "P3", "P4"] {
        hist.push(person(h), false, false);
    }
    hist.back(2);
    let fresh = Locator::primary(ObjectType::Family, "F1");
    hist.push(fresh.clone(), false, false);
    let index = hist.index().unwrap_or_default();
    assert_eq!(hist.entries()[index], fresh);
    assert!(hist.entries()[index + 1..].is_empty());
    assert!(hist.at_end());
}

#[test]
fn revisiting_promotes_without_growing_mru() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(person("P1"), false, false);
    hist.push(person("P2"), false, false);
    let before = hist.mru().len();
    hist.push(person("P1"), false, false);
    assert_eq!(hist.mru().len(), before);
    assert_eq!(
        hist.mru().last(),
        Some(&(ObjectType::Person, Handle::new("P1")))
    );
}

#[test]
fn tag_pages_never_touch_mru() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(Locator::primary(ObjectType::Tag, "T1"), false, false);
    assert!(hist.mru().is_empty());
    assert_eq!(count(&seen, |s| matches!(s, Seen::Active(_))), 1);
    assert_eq!(count(&seen, |s| matches!(s, Seen::Mru(_))), 0);
}

#[test]
fn replace_secondary_rewrites_matching_entries() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(person("P1").with_secondary(ObjectType::Name, H1), false, false);
    hist.push(person("P2"), false, false);
    assert!(hist.replace_secondary(H1, H2));
    assert_eq!(hist.entries()[0].secondary_key(), Some(H2));
    assert!(!hist.replace_secondary(H1, H2));
}

#[test]
fn deleting_a_person_drops_their_pages() {
    let seen = log();
    let mut hist = observed_history(&seen);
    let family = Locator::primary(ObjectType::Family, "F1");
    hist.push(family.clone(), false, false);
    hist.push(person("P2"), false, false);
    hist.handles_removed(&[Handle::new("P2")]);
    assert_eq!(hist.len(), 1);
    assert_eq!(hist.present(), Some(&family));
    assert!(!hist
        .mru()
        .contains(&(ObjectType::Person, Handle::new("P2"))));
    assert!(hist
        .entries()
        .iter()
        .all(|loc| !loc.mentions(&Handle::new("P2"))));
}

#[test]
fn removal_also_matches_reference_targets() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(person("P1"), false, false);
    hist.push(
        person("P1").with_reference(ObjectType::EventRef, "E4"),
        false,
        false,
    );
    hist.handles_removed(&[Handle::new("E4")]);
    assert_eq!(hist.entries(), &[person("P1")]);
    assert_eq!(hist.index(), Some(0));
}

#[test]
fn rebuild_empties_everything_and_announces_it() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(person("P1"), false, false);
    hist.push(person("P2"), false, false);
    seen.borrow_mut().clear();
    hist.history_changed();
    assert!(hist.is_empty());
    assert_eq!(hist.index(), None);
    assert!(hist.mru().is_empty());
    assert_eq!(seen.borrow().as_slice(), &[Seen::Mru(Vec::new())]);
}

#[test]
fn active_changed_precedes_mru_changed() {
    let seen = log();
    let mut hist = observed_history(&seen);
    hist.push(person("P1"), false, false);
    hist.push(person("P2"), false, false);
    hist.back(1);
    let events = seen.borrow();
    let kinds: Vec<char> = events
        .iter()
        .map(|s| match s {
            Seen::Active(_) => 'a',
            Seen::Mru(_) => 'm',
            _ => '?',
        })
        .collect();
    assert_eq!(kinds, ['a', 'm', 'a', 'm', 'a', 'm']);
}
