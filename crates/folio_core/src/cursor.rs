//! Native cursor ownership
//!
//! Custom cursor effects hide the native cursor on the document root and
//! inject a stylesheet rule so interactive elements do not bring it back.
//! Both are global, so they are modelled as one shared resource with
//! acquire/release semantics: the native cursor stays hidden while at least
//! one [`CursorLease`] is alive and is restored when the last one drops.
//!
//! No precedence between simultaneous owners is defined. The resource only
//! reports the most recently acquired live owner.

use crate::host::{Host, WeakHost};
use indexmap::IndexMap;

/// Stylesheet rule id used while the native cursor is hidden
pub const CURSOR_RULE_ID: &str = "folio-cursor-override";

/// Rule injected while the native cursor is hidden
pub const CURSOR_RULE_CSS: &str =
    "a, button, [role=\"button\"], [data-cursor] { cursor: none !important; }";

#[derive(Default)]
pub(crate) struct CursorState {
    next_id: u64,
    leases: IndexMap<u64, String>,
}

/// Keeps the native cursor hidden while alive
pub struct CursorLease {
    host: WeakHost,
    id: u64,
    released: bool,
}

impl CursorLease {
    pub fn owner(&self) -> Option<String> {
        let host = self.host.upgrade()?;
        let owner = host.inner.cursor.borrow().leases.get(&self.id).cloned();
        owner
    }

    /// Release explicitly (also happens on drop)
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let remaining = {
            let mut state = host.inner.cursor.borrow_mut();
            state.leases.shift_remove(&self.id);
            state.leases.len()
        };
        tracing::debug!(remaining, "cursor lease released");
        if remaining == 0 {
            restore_native_cursor(&host);
        }
    }
}

impl Drop for CursorLease {
    fn drop(&mut self) {
        self.release_inner();
    }
}

fn hide_native_cursor(host: &Host) {
    let root = host.root();
    host.document_mut().update_style(root, |style| {
        style
            .properties
            .insert("cursor".to_string(), "none".to_string());
    });
    host.insert_rule(CURSOR_RULE_ID, CURSOR_RULE_CSS);
}

fn restore_native_cursor(host: &Host) {
    let root = host.root();
    host.document_mut().update_style(root, |style| {
        style.properties.shift_remove("cursor");
    });
    host.remove_rule(CURSOR_RULE_ID);
}

impl Host {
    /// Acquire cursor ownership on behalf of `owner`
    pub fn acquire_cursor(&self, owner: &str) -> CursorLease {
        let (id, first) = {
            let mut state = self.inner.cursor.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.leases.insert(id, owner.to_string());
            (id, state.leases.len() == 1)
        };
        if first {
            hide_native_cursor(self);
        }
        tracing::debug!(owner, "cursor lease acquired");
        CursorLease {
            host: self.downgrade(),
            id,
            released: false,
        }
    }

    /// Most recently acquired live owner
    pub fn cursor_owner(&self) -> Option<String> {
        self.inner
            .cursor
            .borrow()
            .leases
            .values()
            .last()
            .cloned()
    }

    /// Whether the native cursor is currently hidden
    pub fn is_native_cursor_hidden(&self) -> bool {
        !self.inner.cursor.borrow().leases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_cursor(host: &Host) -> Option<String> {
        let root = host.root();
        let doc = host.document();
        doc.style(root)
            .and_then(|s| s.property("cursor").map(str::to_string))
    }

    #[test]
    fn test_single_lease_hides_and_restores() {
        let host = Host::default();
        let lease = host.acquire_cursor("dot-cursor");
        assert!(host.is_native_cursor_hidden());
        assert_eq!(root_cursor(&host).as_deref(), Some("none"));
        assert!(host.rule(CURSOR_RULE_ID).is_some());

        drop(lease);
        assert!(!host.is_native_cursor_hidden());
        assert_eq!(root_cursor(&host), None);
        assert!(host.rule(CURSOR_RULE_ID).is_none());
    }

    #[test]
    fn test_last_release_restores() {
        let host = Host::default();
        let first = host.acquire_cursor("a");
        let second = host.acquire_cursor("b");
        assert_eq!(host.cursor_owner().as_deref(), Some("b"));

        second.release();
        assert!(host.is_native_cursor_hidden());
        assert_eq!(host.cursor_owner().as_deref(), Some("a"));

        first.release();
        assert!(!host.is_native_cursor_hidden());
        assert_eq!(host.cursor_owner(), None);
    }
}
