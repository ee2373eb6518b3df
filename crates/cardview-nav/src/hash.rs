// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Secondary sub-record digests.
//!
//! A secondary has no identity, so a page names it by the SHA-256 of its
//! canonical serialization, rendered as lowercase hex. No salt and no type
//! prefix: a digest is always paired with a declared secondary type inside a
//! [`Locator`](crate::Locator).

use cardview_model::Secondary;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Failure to produce the canonical form of a sub-record.
#[derive(Debug, Error)]
#[error("canonical serialization failed: {0}")]
pub struct HashError(#[from] serde_json::Error);

/// SHA-256 of `text` (UTF-8) as lowercase hex.
pub fn digest_text(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Digest of a secondary's canonical serialization.
pub fn hash_secondary(record: &Secondary) -> Result<String, HashError> {
    Ok(digest_text(&record.canonical_form()?))
}

/// Locator key for a secondary: the tag handle for tags, the digest otherwise.
pub fn secondary_key(record: &Secondary) -> Result<String, HashError> {
    match record {
        Secondary::Tag(handle) => Ok(handle.as_str().to_owned()),
        other => hash_secondary(other),
    }
}

/// True when `s` has the shape of a digest produced here.
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cardview_model::records::{Attribute, Name};
    use cardview_model::Handle;

    #[test]
    fn known_vector() {
        assert_eq!(
            digest_text("test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn equal_content_equal_digest() {
        let a = Secondary::Name(Name {
            first_name: "Ada".into(),
            surname: "Lovelace".into(),
            ..Name::default()
        });
        let b = a.clone();
        let h = hash_secondary(&a).unwrap();
        assert_eq!(h, hash_secondary(&b).unwrap());
        assert!(is_digest(&h));
    }

    #[test]
    fn edits_change_the_digest() {
        let mut attr = Attribute {
            attr_type: "Occupation".into(),
            value: "Mathematician".into(),
            citations: Vec::new(),
        };
        let before = hash_secondary(&Secondary::Attribute(attr.clone())).unwrap();
        attr.value = "Writer".into();
        let after = hash_secondary(&Secondary::Attribute(attr)).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn tag_key_is_the_handle() {
        let key = secondary_key(&Secondary::Tag(Handle::new("T1"))).unwrap();
        assert_eq!(key, "T1");
        assert!(!is_digest(&key));
        assert!(!is_digest(&"A".repeat(DIGEST_HEX_LEN)));
    }
}
