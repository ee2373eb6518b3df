// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Status-line and dialog notices with TTL + dedupe.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational note.
    Info,
    /// Warning that may need attention.
    Warn,
    /// Error requiring user awareness.
    Error,
}

/// Where a notice is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSurface {
    /// The view's status line (latest notice wins).
    StatusLine,
    /// A modal dialog the user must dismiss.
    Dialog,
}

/// Identifier for a notice entry.
pub type NoticeId = u64;

/// Notice data stored in the service.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Stable identifier.
    pub id: NoticeId,
    /// Severity.
    pub kind: NoticeKind,
    /// Surface.
    pub surface: NoticeSurface,
    /// Short title line.
    pub title: String,
    /// Optional body text.
    pub body: Option<String>,
    /// Time-to-live duration.
    pub ttl: Duration,
    /// Creation time.
    pub created: Instant,
}

/// In-memory notice queue with TTL and dedupe window.
pub struct NoticeService {
    queue: VecDeque<Notice>,
    max: usize,
    dedupe_window: Duration,
    next_id: NoticeId,
}

impl NoticeService {
    /// Create a new queue with a maximum length.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max,
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a notice, deduping identical recent entries (same kind/surface/title/body within `dedupe_window`).
    pub fn push<S, B>(
        &mut self,
        kind: NoticeKind,
        surface: NoticeSurface,
        title: S,
        body: B,
        ttl: Duration,
        now: Instant,
    ) -> NoticeId
    where
        S: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body_opt = body.into();

        if let Some(existing) = self.queue.iter_mut().find(|n| {
            n.kind == kind
                && n.surface == surface
                && n.title == title
                && n.body == body_opt
                && now.duration_since(n.created) <= self.dedupe_window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            id,
            kind,
            surface,
            title,
            body: body_opt,
            ttl,
            created: now,
        });
        id
    }

    /// Drop expired notices (call once per tick).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|n| now.duration_since(n.created) < n.ttl);
    }

    /// Dismiss a notice (dialog closed by the user).
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        before != self.queue.len()
    }

    /// Live notices on `surface`, oldest first.
    pub fn visible(&self, surface: NoticeSurface, now: Instant) -> Vec<&Notice> {
        self.queue
            .iter()
            .filter(|n| n.surface == surface && now.duration_since(n.created) < n.ttl)
            .collect()
    }

    /// Most recent live notice on `surface`.
    pub fn latest(&self, surface: NoticeSurface, now: Instant) -> Option<&Notice> {
        self.visible(surface, now).pop()
    }

    /// Drop everything (database change).
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl Default for NoticeService {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_notices_within_window_are_deduped() {
        let mut svc = NoticeService::new(4);
        let t0 = Instant::now();
        let a = svc.push(
            NoticeKind::Error,
            NoticeSurface::Dialog,
            "Window active",
            None::<String>,
            Duration::from_secs(5),
            t0,
        );
        let b = svc.push(
            NoticeKind::Error,
            NoticeSurface::Dialog,
            "Window active",
            None::<String>,
            Duration::from_secs(5),
            t0 + Duration::from_millis(100),
        );
        assert_eq!(a, b);
        assert_eq!(svc.visible(NoticeSurface::Dialog, t0).len(), 1);
    }

    #[test]
    fn latest_status_wins_and_expires() {
        let mut svc = NoticeService::default();
        let t0 = Instant::now();
        svc.push(
            NoticeKind::Info,
            NoticeSurface::StatusLine,
            "[Person] Ada",
            None::<String>,
            Duration::from_secs(2),
            t0,
        );
        svc.push(
            NoticeKind::Info,
            NoticeSurface::StatusLine,
            "[Tag] ToDo",
            None::<String>,
            Duration::from_secs(2),
            t0,
        );
        assert_eq!(
            svc.latest(NoticeSurface::StatusLine, t0).map(|n| n.title.as_str()),
            Some("[Tag] ToDo")
        );
        svc.retain_visible(t0 + Duration::from_secs(3));
        assert!(svc.latest(NoticeSurface::StatusLine, t0).is_none());
    }

    #[test]
    fn queue_is_bounded() {
        let mut svc = NoticeService::new(2);
        let t0 = Instant::now();
        for title in ["a", "b", "c"] {
            svc.push(
                NoticeKind::Warn,
                NoticeSurface::StatusLine,
                title,
                None::<String>,
                Duration::from_secs(9),
                t0,
            );
        }
        let titles: Vec<&str> = svc
            .visible(NoticeSurface::StatusLine, t0)
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, ["b", "c"]);
    }
}
