//! Feature flag store
//!
//! Holds the user's preferences for optional UI behaviour (animations,
//! tooltips). The stored preference is mirrored to a [`Storage`] as JSON on
//! every change. Below the mobile breakpoint the animations flag is forced
//! off without touching the stored preference, so widening the viewport
//! again restores whatever the user chose.
//!
//! # Example
//!
//! ```rust
//! use folio_core::flags::{Flag, FlagStore};
//! use folio_core::storage::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let flags = FlagStore::load(storage.clone(), 1280.0);
//! assert!(flags.animations_enabled());
//!
//! flags.toggle(Flag::Animations).unwrap();
//!
//! // A fresh store over the same storage sees the toggled value
//! let reloaded = FlagStore::load(storage, 1280.0);
//! assert!(!reloaded.animations_enabled());
//! ```

use crate::error::Result;
use crate::events::EventKind;
use crate::events::{Event, EventTarget};
use crate::host::Host;
use crate::scope::Scope;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Storage key holding the serialized flags
pub const FLAGS_STORAGE_KEY: &str = "folio.feature-flags";

/// Viewport width (px) below which animations are forced off
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// The persisted flag values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(default = "enabled")]
    pub animations_enabled: bool,
    #[serde(default = "enabled")]
    pub tooltips_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            tooltips_enabled: true,
        }
    }
}

impl FeatureFlags {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Animations => self.animations_enabled,
            Flag::Tooltips => self.tooltips_enabled,
        }
    }

    fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Animations => self.animations_enabled = value,
            Flag::Tooltips => self.tooltips_enabled = value,
        }
    }
}

/// A single toggleable flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    Animations,
    Tooltips,
}

type FlagSubscriber = Rc<dyn Fn(&FeatureFlags)>;

struct FlagStoreInner {
    storage: Box<dyn Storage>,
    stored: Cell<FeatureFlags>,
    viewport_width: Cell<f32>,
    breakpoint: f32,
    next_subscriber: Cell<u64>,
    subscribers: RefCell<Vec<(u64, FlagSubscriber)>>,
}

/// Process-wide feature flag store (cheap to clone)
#[derive(Clone)]
pub struct FlagStore {
    inner: Rc<FlagStoreInner>,
}

impl FlagStore {
    /// Load flags from `storage`, using the default mobile breakpoint
    pub fn load<S: Storage + 'static>(storage: S, viewport_width: f32) -> Self {
        Self::load_with_breakpoint(storage, viewport_width, MOBILE_BREAKPOINT)
    }

    /// Load flags from `storage` with a custom breakpoint
    ///
    /// Missing or unreadable values fall back to the defaults.
    pub fn load_with_breakpoint<S: Storage + 'static>(
        storage: S,
        viewport_width: f32,
        breakpoint: f32,
    ) -> Self {
        let stored = match read_flags(&storage) {
            Ok(Some(flags)) => flags,
            Ok(None) => FeatureFlags::default(),
            Err(e) => {
                tracing::warn!("Failed to read feature flags, using defaults: {}", e);
                FeatureFlags::default()
            }
        };
        tracing::debug!(?stored, viewport_width, "feature flags loaded");

        Self {
            inner: Rc::new(FlagStoreInner {
                storage: Box::new(storage),
                stored: Cell::new(stored),
                viewport_width: Cell::new(viewport_width),
                breakpoint,
                next_subscriber: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The user's stored preference, ignoring the mobile override
    pub fn stored(&self) -> FeatureFlags {
        self.inner.stored.get()
    }

    /// Flags in effect right now
    pub fn effective(&self) -> FeatureFlags {
        let mut flags = self.stored();
        if self.is_mobile() {
            flags.animations_enabled = false;
        }
        flags
    }

    pub fn animations_enabled(&self) -> bool {
        self.effective().animations_enabled
    }

    pub fn tooltips_enabled(&self) -> bool {
        self.effective().tooltips_enabled
    }

    pub fn is_mobile(&self) -> bool {
        self.inner.viewport_width.get() < self.inner.breakpoint
    }

    pub fn breakpoint(&self) -> f32 {
        self.inner.breakpoint
    }

    /// Set a flag's stored value and persist it
    ///
    /// The in-memory value changes even if persisting fails.
    pub fn set(&self, flag: Flag, value: bool) -> Result<()> {
        let before = self.effective();
        let mut stored = self.stored();
        stored.set(flag, value);
        self.inner.stored.set(stored);

        let persisted = self.persist();
        self.notify_if_changed(before);
        persisted
    }

    /// Flip a flag's stored value; returns the new stored value
    pub fn toggle(&self, flag: Flag) -> Result<bool> {
        let value = !self.stored().get(flag);
        self.set(flag, value)?;
        Ok(value)
    }

    pub fn set_animations(&self, enabled: bool) -> Result<()> {
        self.set(Flag::Animations, enabled)
    }

    pub fn set_tooltips(&self, enabled: bool) -> Result<()> {
        self.set(Flag::Tooltips, enabled)
    }

    pub fn toggle_animations(&self) -> Result<bool> {
        self.toggle(Flag::Animations)
    }

    pub fn toggle_tooltips(&self) -> Result<bool> {
        self.toggle(Flag::Tooltips)
    }

    /// Re-evaluate the mobile override for a new viewport width
    pub fn set_viewport_width(&self, width: f32) {
        let before = self.effective();
        self.inner.viewport_width.set(width);
        self.notify_if_changed(before);
    }

    /// Track window resizes; the override is re-evaluated on every resize
    pub fn watch_viewport(&self, host: &Host) -> Scope {
        self.set_viewport_width(host.viewport().width);

        let mut scope = Scope::new(host);
        let weak = Rc::downgrade(&self.inner);
        scope.listen(
            EventTarget::Window,
            EventKind::Resize,
            move |_, event| {
                if let (Some(inner), Event::Resize { width, .. }) = (weak.upgrade(), event) {
                    FlagStore { inner }.set_viewport_width(*width);
                }
            },
        );
        scope
    }

    /// Subscribe to changes of the effective flags
    pub fn subscribe<F>(&self, callback: F) -> FlagSubscription
    where
        F: Fn(&FeatureFlags) + 'static,
    {
        let id = self.inner.next_subscriber.get() + 1;
        self.inner.next_subscriber.set(id);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        FlagSubscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.stored())?;
        self.inner
            .storage
            .set_item(FLAGS_STORAGE_KEY, &json)
            .inspect_err(|e| tracing::warn!("Failed to persist feature flags: {}", e))
    }

    fn notify_if_changed(&self, before: FeatureFlags) {
        let after = self.effective();
        if after == before {
            return;
        }
        tracing::debug!(?after, "feature flags changed");
        let subscribers: Vec<FlagSubscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in subscribers {
            callback(&after);
        }
    }
}

fn read_flags(storage: &dyn Storage) -> Result<Option<FeatureFlags>> {
    match storage.get_item(FLAGS_STORAGE_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Handle for unsubscribing from flag changes; unsubscribes on drop
pub struct FlagSubscription {
    store: Weak<FlagStoreInner>,
    id: u64,
}

impl Drop for FlagSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
