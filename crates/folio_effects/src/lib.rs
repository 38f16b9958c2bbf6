//! Folio Effects
//!
//! Pointer, scroll and text effects built on the headless host. Every effect
//! is mounted against a node, owns a [`folio_core::Scope`] for its listeners,
//! frames and timers, and writes only through [`folio_core::NodeRef`].
//! Unmounting (or dropping) an effect stops all further writes.
//!
//! - [`Magnetic`]: spring-smoothed pull toward a nearby pointer
//! - [`Spotlight`]: pointer position published as CSS custom properties
//! - [`Parallax`]: scroll-linked vertical drift
//! - [`CustomCursor`]: trailing cursor node holding cursor ownership
//! - [`HoverIntent`] and [`Tooltip`]: delayed hover activation
//! - [`TextReveal`] and [`ScrubReveal`]: split text revealed by timeline

pub mod cursor;
pub mod hover;
pub mod magnetic;
pub mod parallax;
pub mod reveal;
pub mod spotlight;
pub mod tooltip;

pub use cursor::{is_interactive, CursorOptions, CustomCursor, CURSOR_OWNER};
pub use hover::{HoverIntent, HOVER_INTENT_DELAY_MS};
pub use magnetic::{Magnetic, MagneticOptions};
pub use parallax::{Parallax, ParallaxOptions};
pub use reveal::{RevealOptions, ScrubReveal, TextReveal};
pub use spotlight::{Spotlight, SpotlightOptions, SPOTLIGHT_OPACITY, SPOTLIGHT_X, SPOTLIGHT_Y};
pub use tooltip::{Tooltip, VISIBLE_ATTR};
