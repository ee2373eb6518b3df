// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Actions a card view registers with the host.

use std::fmt;
use std::str::FromStr;

/// User-invokable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open the manual page.
    ViewHelp,
    /// Pin the current page in its own window.
    OpenPinnedView,
    /// Edit the current page's object.
    Edit,
    /// Jump to the primary page of the current context.
    PrimaryJ,
}

/// Registration data for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    /// The action.
    pub action: Action,
    /// Registered name.
    pub name: &'static str,
    /// Keyboard accelerator in host notation, if any.
    pub accelerator: Option<&'static str>,
}

/// Every action, in registration order.
pub const ACTIONS: [ActionSpec; 4] = [
    ActionSpec {
        action: Action::ViewHelp,
        name: "ViewHelp",
        accelerator: None,
    },
    ActionSpec {
        action: Action::OpenPinnedView,
        name: "OpenPinnedView",
        accelerator: None,
    },
    ActionSpec {
        action: Action::Edit,
        name: "Edit",
        accelerator: Some("<Primary>Return"),
    },
    ActionSpec {
        action: Action::PrimaryJ,
        name: "PRIMARY-J",
        accelerator: Some("<Primary>J"),
    },
];

impl Action {
    /// Registration entry.
    pub fn spec(self) -> &'static ActionSpec {
        match self {
            Action::ViewHelp => &ACTIONS[0],
            Action::OpenPinnedView => &ACTIONS[1],
            Action::Edit => &ACTIONS[2],
            Action::PrimaryJ => &ACTIONS[3],
        }
    }

    /// Registered name.
    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTIONS
            .iter()
            .find(|spec| spec.name == s)
            .map(|spec| spec.action)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}
