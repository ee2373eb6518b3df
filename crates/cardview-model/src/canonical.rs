// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical serialization contract for sub-records.
//!
//! Equal content yields equal text: serde emits struct fields in declaration
//! order and every collection in the model is an ordered `Vec`, so the JSON
//! text is a pure function of the record's value.

use serde::Serialize;

/// Serialize `value` to its canonical text form.
pub fn canonical_string<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::Url;

    #[test]
    fn equal_records_have_equal_text() {
        let a = Url {
            path: "https://example.org".into(),
            description: "home".into(),
            url_type: "Web Home".into(),
        };
        let b = a.clone();
        assert_eq!(canonical_string(&a).unwrap(), canonical_string(&b).unwrap());
    }

    #[test]
    fn field_order_is_declaration_order() {
        let url = Url {
            path: "p".into(),
            description: "d".into(),
            url_type: "t".into(),
        };
        assert_eq!(
            canonical_string(&url).unwrap(),
            r#"{"path":"p","description":"d","url_type":"t"}"#
        );
    }
}
