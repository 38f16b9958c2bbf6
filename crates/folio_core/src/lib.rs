//! Folio Core Runtime
//!
//! This crate provides the headless host the rest of the workspace animates
//! against:
//!
//! - **Document**: arena-backed node tree with inline styles and layout rects
//! - **Events**: ordered listener registry for pointer, scroll and resize input
//! - **Frames & Timers**: cancelable one-shot animation frames and timeouts
//! - **Scopes**: RAII ownership of everything a component registers
//! - **Cursor ownership**: shared acquire/release of the native cursor
//! - **Feature Flags**: persisted preferences with a mobile override
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Host, Scope, FrameSlot};
//!
//! let host = Host::default();
//! let node = host.append_element(host.root(), "div");
//! let handle = host.node(node);
//!
//! let mut scope = Scope::new(&host);
//! let frames = FrameSlot::new();
//! scope.own_frames(&frames);
//! frames.schedule(&host, move |_, _| {
//!     handle.set_opacity(0.5);
//! });
//!
//! host.advance(16.0);
//! assert_eq!(host.document().style(node).map(|s| s.opacity), Some(0.5));
//! ```

pub mod cursor;
pub mod dom;
pub mod error;
pub mod events;
pub mod flags;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod scope;
pub mod storage;

pub use cursor::{CursorLease, CURSOR_RULE_ID};
pub use dom::{Document, NodeId, Style, Transform, TEXT_TAG};
pub use error::{FolioError, Result};
pub use events::{Event, EventKind, EventTarget, ListenerId};
pub use flags::{FeatureFlags, Flag, FlagStore, FlagSubscription, MOBILE_BREAKPOINT};
pub use frame::{FrameId, TimerId};
pub use geometry::{Point, Rect, Size, Viewport};
pub use host::{Host, NodeRef, WeakHost};
pub use scope::{AliveToken, FrameSlot, Scope, TimerSlot};
pub use storage::{FileStorage, MemoryStorage, Storage};
