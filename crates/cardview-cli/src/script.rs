// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Replay script parsing.
//!
//! One step per line, whitespace separated; `#` starts a comment:
//!
//! ```text
//! goto Person P1 [EventRef E4] [Name <key>]
//! back [N]
//! forward [N]
//! delete Person P2
//! rebuild Event
//! set interface.mru-size 4
//! wait 3000
//! action ViewHelp
//! ```

use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use cardview_model::{Handle, ObjectType};
use cardview_nav::{Action, Locator};
use serde_json::Value;

/// One replay step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Navigate to a page.
    Goto(Locator),
    /// Step back.
    Back(usize),
    /// Step forward.
    Forward(usize),
    /// Delete a primary through a transaction.
    Delete(ObjectType, Handle),
    /// Announce a rebuild of every record of a type.
    Rebuild(ObjectType),
    /// Change a setting.
    Set(String, Value),
    /// Advance the clock.
    Wait(Duration),
    /// Trigger a registered action.
    Action(Action),
}

/// Parse a whole script, reporting the 1-based line of the first error.
pub fn parse(text: &str) -> Result<Vec<Step>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then(|| parse_line(line).with_context(|| format!("line {}", i + 1)))
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Step> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (verb, args) = words.split_first().ok_or_else(|| anyhow!("empty step"))?;
    match (*verb, args) {
        ("goto", [kind, handle, rest @ ..]) => goto(kind, handle, rest),
        ("back", _) => Ok(Step::Back(count(args)?)),
        ("forward", _) => Ok(Step::Forward(count(args)?)),
        ("delete", [kind, handle]) => Ok(Step::Delete(primary(kind)?, Handle::new(*handle))),
        ("rebuild", [kind]) => Ok(Step::Rebuild(primary(kind)?)),
        ("set", [key, value @ ..]) if !value.is_empty() => {
            let raw = value.join(" ");
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            Ok(Step::Set((*key).to_owned(), value))
        }
        ("wait", [ms]) => Ok(Step::Wait(Duration::from_millis(ms.parse()?))),
        ("action", [name]) => name.parse().map(Step::Action).map_err(|e: String| anyhow!(e)),
        _ => bail!("cannot parse step: {line}"),
    }
}

fn goto(kind: &str, handle: &str, rest: &[&str]) -> Result<Step> {
    let mut loc = Locator::primary(primary(kind)?, handle);
    for pair in rest.chunks(2) {
        let [kind, value] = pair else {
            bail!("dangling field: {}", pair.join(" "));
        };
        let kind: ObjectType = kind.parse()?;
        loc = if kind.is_reference() {
            loc.with_reference(kind, *value)
        } else if kind.is_secondary() || kind == ObjectType::Tag {
            loc.with_secondary(kind, *value)
        } else {
            bail!("{kind} is neither a reference nor a secondary type");
        };
    }
    loc.validate()?;
    Ok(Step::Goto(loc))
}

fn primary(word: &str) -> Result<ObjectType> {
    let kind: ObjectType = word.parse()?;
    if !kind.is_primary() {
        bail!("{kind} is not a primary type");
    }
    Ok(kind)
}

fn count(args: &[&str]) -> Result<usize> {
    match args {
        [] => Ok(1),
        [n] => Ok(n.parse()?),
        _ => bail!("expected at most one count"),
    }
}
