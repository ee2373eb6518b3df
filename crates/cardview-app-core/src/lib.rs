// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for card views (config, settings, prefs, notices).
//! Keeps UI/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod config_port;
pub mod notice;
pub mod prefs;
