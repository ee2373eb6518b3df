// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Registry of auxiliary (pinned) windows keyed by page.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::NavError;

/// An auxiliary window owned by the host toolkit.
pub trait AuxWindow {
    /// Window title.
    fn title(&self) -> String;
    /// Close the window.
    fn close(&mut self);
    /// Re-render after a data or settings change.
    fn refresh(&mut self);
}

/// Open windows by key.
#[derive(Default)]
pub struct WindowRegistry {
    open: BTreeMap<String, Box<dyn AuxWindow>>,
}

impl std::fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.open.keys()).finish()
    }
}

impl WindowRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `window` under `key`.
    ///
    /// Fails with [`NavError::WindowActive`] if `key` is taken; the offered
    /// window is closed in that case.
    pub fn open(&mut self, key: impl Into<String>, mut window: Box<dyn AuxWindow>) -> Result<(), NavError> {
        let key = key.into();
        if self.open.contains_key(&key) {
            window.close();
            return Err(NavError::WindowActive { key });
        }
        debug!(%key, title = %window.title(), "window opened");
        self.open.insert(key, window);
        Ok(())
    }

    /// Close and forget the window under `key`.
    pub fn close(&mut self, key: &str) -> bool {
        match self.open.remove(key) {
            Some(mut window) => {
                window.close();
                true
            }
            None => false,
        }
    }

    /// Close every window.
    pub fn close_all(&mut self) {
        for (_, mut window) in std::mem::take(&mut self.open) {
            window.close();
        }
    }

    /// Refresh every window.
    pub fn refresh_all(&mut self) {
        for window in self.open.values_mut() {
            window.refresh();
        }
    }

    /// True when `key` is open.
    pub fn is_open(&self, key: &str) -> bool {
        self.open.contains_key(key)
    }

    /// Open window count.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// True when nothing is open.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log(Rc<RefCell<Vec<String>>>);

    impl AuxWindow for Log {
        fn title(&self) -> String {
            "pinned".into()
        }
        fn close(&mut self) {
            self.0.borrow_mut().push("close".into());
        }
        fn refresh(&mut self) {
            self.0.borrow_mut().push("refresh".into());
        }
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = WindowRegistry::new();
        assert!(reg.open("P1", Box::new(Log(Rc::clone(&log)))).is_ok());
        let err = reg.open("P1", Box::new(Log(Rc::clone(&log))));
        assert!(matches!(err, Err(NavError::WindowActive { key }) if key == "P1"));
        assert_eq!(reg.len(), 1);
        assert_eq!(log.borrow().as_slice(), ["close"]);
    }

    #[test]
    fn close_all_closes_each_window() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = WindowRegistry::new();
        reg.open("a", Box::new(Log(Rc::clone(&log)))).ok();
        reg.open("b", Box::new(Log(Rc::clone(&log)))).ok();
        reg.refresh_all();
        reg.close_all();
        assert!(reg.is_empty());
        assert_eq!(log.borrow().len(), 4);
        assert!(!reg.close("a"));
    }
}
