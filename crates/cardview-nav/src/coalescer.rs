// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Debounced rebuilds after settings changes.
//!
//! A single-shot timer plus a "changed again" flag: the first change arms the
//! timer; further changes only raise the flag. When the timer fires with the
//! flag raised it re-arms for `last_change + delay` instead of rebuilding, so
//! a burst of edits yields one rebuild after the user stops.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use cardview_app_core::config::{Settings, SubscriptionId, KEY_REFRESH_DELAY_MS};
use tracing::debug;

/// Default debounce window.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

/// Token identifying one armed timer.
pub type TimerToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: TimerToken,
    deadline: Instant,
}

/// Result of a timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// Run the rebuild now.
    Rebuild,
    /// More changes arrived; the timer was re-armed for this deadline.
    Rescheduled(Instant),
    /// The token was cancelled or superseded.
    Stale,
}

/// Settings-change debouncer.
#[derive(Debug)]
pub struct RefreshCoalescer {
    delay: Duration,
    pending: Option<Pending>,
    deferred_again: bool,
    last_change: Option<Instant>,
    next_token: TimerToken,
}

impl Default for RefreshCoalescer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl RefreshCoalescer {
    /// Debouncer with the given window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deferred_again: false,
            last_change: None,
            next_token: 1,
        }
    }

    /// Debouncer using `interface.refresh-delay-ms`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Self::delay_setting(settings))
    }

    /// Debounce window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the window. An armed timer keeps its deadline; later arms use `delay`.
    pub fn set_delay(&mut self, delay: Duration) {
        if delay != self.delay {
            debug!(ms = delay.as_millis(), "refresh delay changed");
            self.delay = delay;
        }
    }

    /// Window named by `interface.refresh-delay-ms` in `settings`.
    pub fn delay_setting(settings: &Settings) -> Duration {
        let default_ms = u64::try_from(DEFAULT_DELAY.as_millis()).unwrap_or(3000);
        Duration::from_millis(settings.get_u64(KEY_REFRESH_DELAY_MS, default_ms))
    }

    /// Record a settings change made at `now`.
    pub fn note_change(&mut self, now: Instant) {
        self.last_change = Some(now);
        if self.pending.is_some() {
            self.deferred_again = true;
            return;
        }
        let token = self.arm(now + self.delay);
        debug!(token, "rebuild scheduled");
    }

    /// Timer `token` fired at `now`.
    pub fn fire(&mut self, token: TimerToken, now: Instant) -> FireOutcome {
        match self.pending {
            Some(p) if p.token == token => {}
            _ => return FireOutcome::Stale,
        }
        if self.deferred_again {
            self.deferred_again = false;
            let deadline = self.last_change.unwrap_or(now) + self.delay;
            if deadline > now {
                let token = self.arm(deadline);
                debug!(token, "rebuild deferred again");
                return FireOutcome::Rescheduled(deadline);
            }
        }
        self.pending = None;
        debug!(token, "rebuild due");
        FireOutcome::Rebuild
    }

    /// Fire the armed timer if its deadline passed. Returns whether to rebuild.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(p) if p.deadline <= now => self.fire(p.token, now) == FireOutcome::Rebuild,
            _ => false,
        }
    }

    /// Disarm the timer and forget pending changes.
    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            debug!(token = p.token, "rebuild cancelled");
        }
        self.deferred_again = false;
        self.last_change = None;
    }

    /// Deadline of the armed timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Token of the armed timer.
    pub fn pending_token(&self) -> Option<TimerToken> {
        self.pending.map(|p| p.token)
    }

    /// True while a rebuild is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Subscribe `this` to every settable key of `settings`.
    pub fn watch(this: &Rc<RefCell<Self>>, settings: &mut Settings) -> Vec<SubscriptionId> {
        settings
            .keys()
            .into_iter()
            .map(|key| {
                let weak: Weak<RefCell<Self>> = Rc::downgrade(this);
                settings.connect(&key, move |change| {
                    if let Some(coalescer) = weak.upgrade() {
                        if let Ok(mut c) = coalescer.try_borrow_mut() {
                            c.note_change(change.at);
                        }
                    }
                })
            })
            .collect()
    }

    fn arm(&mut self, deadline: Instant) -> TimerToken {
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(Pending { token, deadline });
        token
    }
}
