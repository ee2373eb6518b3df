// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]

use cardview_app_core::prefs::PageTuple;
use cardview_model::records::{Address, Attribute, Name};
use cardview_model::{ObjectType, Secondary};
use cardview_nav::hash::{hash_secondary, is_digest};
use cardview_nav::Locator;
use proptest::prelude::*;

fn any_primary() -> impl Strategy<Value = ObjectType> {
    prop::sample::select(ObjectType::PRIMARY.to_vec())
}

fn any_reference() -> impl Strategy<Value = ObjectType> {
    prop::sample::select(
        ObjectType::ALL
            .iter()
            .copied()
            .filter(|k| k.is_reference())
            .collect::<Vec<_>>(),
    )
}

fn any_locator() -> impl Strategy<Value = Locator> {
    (
        any_primary(),
        "[A-Za-z0-9]{1,12}",
        prop::option::of((any_reference(), "[A-Za-z0-9]{1,12}")),
        prop::option::of("[0-9a-f]{64}"),
    )
        .prop_map(|(kind, handle, reference, key)| {
            let mut loc = Locator::primary(kind, handle);
            if let Some((rkind, target)) = reference {
                loc = loc.with_reference(rkind, target);
            }
            if let Some(key) = key {
                loc = loc.with_secondary(ObjectType::Attribute, key);
            }
            loc
        })
}

fn any_name() -> impl Strategy<Value = Name> {
    ("[A-Za-z ]{0,16}", "[A-Za-z]{0,16}", "[A-Za-z .]{0,4}").prop_map(|(first, surname, suffix)| Name {
        first_name: first,
        surname,
        suffix,
        ..Name::default()
    })
}

proptest! {
    #[test]
    fn bytes_round_trip(loc in any_locator()) {
        let bytes = loc.to_bytes().unwrap();
        prop_assert_eq!(Locator::from_bytes(&bytes).unwrap(), loc);
    }

    #[test]
    fn tuple_round_trip(loc in any_locator()) {
        let tuple: PageTuple = loc.clone().into();
        prop_assert_eq!(Locator::try_from(tuple).unwrap(), loc.clone());
        let json = serde_json::to_string(&loc).unwrap();
        prop_assert_eq!(serde_json::from_str::<Locator>(&json).unwrap(), loc);
    }

    #[test]
    fn generated_locators_validate(loc in any_locator()) {
        prop_assert!(loc.validate().is_ok());
    }

    #[test]
    fn equal_serializations_hash_equal(name in any_name()) {
        let a = Secondary::Name(name.clone());
        let b = Secondary::Name(name);
        prop_assert_eq!(a.canonical_form().unwrap(), b.canonical_form().unwrap());
        let digest = hash_secondary(&a).unwrap();
        prop_assert!(is_digest(&digest));
        prop_assert_eq!(digest, hash_secondary(&b).unwrap());
    }

    #[test]
    fn distinct_serializations_hash_distinct(a in any_name(), b in any_name()) {
        let (a, b) = (Secondary::Name(a), Secondary::Name(b));
        prop_assume!(a.canonical_form().unwrap() != b.canonical_form().unwrap());
        prop_assert_ne!(hash_secondary(&a).unwrap(), hash_secondary(&b).unwrap());
    }
}

#[test]
fn digest_depends_on_content_not_kind_wrapper() {
    let attr = Attribute {
        attr_type: "Nickname".into(),
        value: "Ada".into(),
        citations: Vec::new(),
    };
    let addr = Address::default();
    assert_ne!(
        hash_secondary(&Secondary::Attribute(attr.clone())).unwrap(),
        hash_secondary(&Secondary::Address(addr)).unwrap()
    );
    assert_eq!(
        hash_secondary(&Secondary::Attribute(attr.clone())).unwrap(),
        cardview_nav::hash::digest_text(&cardview_model::canonical_string(&attr).unwrap())
    );
}
