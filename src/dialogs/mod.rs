//! Shared tally of open modal dialogs.
//!
//! The registry is a cheap-to-clone handle onto one set of dialog ids. The
//! app and the shortcut dispatcher hold clones of the same registry, so a
//! dialog opened anywhere suppresses global shortcuts everywhere.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct DialogRegistry {
    open: Rc<RefCell<BTreeSet<String>>>,
}

impl DialogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, id: &str) {
        if self.open.borrow_mut().insert(id.to_string()) {
            trace!(dialog = id, "dialog opened");
        }
    }

    pub fn close(&self, id: &str) {
        if self.open.borrow_mut().remove(id) {
            trace!(dialog = id, "dialog closed");
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.borrow().contains(id)
    }

    pub fn is_any_open(&self) -> bool {
        !self.open.borrow().is_empty()
    }

    pub fn open_ids(&self) -> Vec<String> {
        self.open.borrow().iter().cloned().collect()
    }

    /// Mount a dialog. It starts closed; dropping the handle always unregisters it.
    pub fn mount(&self, id: impl Into<String>) -> DialogHandle {
        DialogHandle {
            registry: self.clone(),
            id: id.into(),
        }
    }
}

/// A mounted dialog's membership in the registry.
#[derive(Debug)]
pub struct DialogHandle {
    registry: DialogRegistry,
    id: String,
}

impl DialogHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_open(&self, open: bool) {
        if open {
            self.registry.open(&self.id);
        } else {
            self.registry.close(&self.id);
        }
    }

    pub fn is_open(&self) -> bool {
        self.registry.is_open(&self.id)
    }
}

impl Drop for DialogHandle {
    fn drop(&mut self) {
        self.registry.close(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let reg = DialogRegistry::new();
        assert!(!reg.is_any_open());

        reg.open("save");
        reg.open("login");
        assert!(reg.is_any_open());
        assert_eq!(reg.open_ids(), vec!["login".to_string(), "save".to_string()]);

        reg.close("save");
        assert!(reg.is_any_open());
        reg.close("login");
        reg.close("login");
        assert!(!reg.is_any_open());
    }

    #[test]
    fn test_clones_share_state() {
        let reg = DialogRegistry::new();
        let other = reg.clone();
        reg.open("delete");
        assert!(other.is_open("delete"));
    }

    #[test]
    fn test_handle_unregisters_on_drop() {
        let reg = DialogRegistry::new();
        {
            let handle = reg.mount("save");
            assert!(!reg.is_any_open());
            handle.set_open(true);
            assert!(reg.is_open("save"));
        }
        assert!(!reg.is_any_open());
    }

    #[test]
    fn test_handle_set_open_false() {
        let reg = DialogRegistry::new();
        let handle = reg.mount("share");
        handle.set_open(true);
        handle.set_open(false);
        assert!(!handle.is_open());
        assert!(!reg.is_any_open());
    }
}
