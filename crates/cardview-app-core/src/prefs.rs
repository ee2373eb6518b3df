// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted navigation state for card views.

use serde::{Deserialize, Serialize};

/// Six-field page tuple as persisted:
/// `(primary_type, primary_handle, reference_type, reference_handle,
/// secondary_type, secondary_key)`.
pub type PageTuple = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Saved navigation preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NavPrefs {
    /// Page shown when the view was last deactivated.
    pub last_page: Option<PageTuple>,
}
