//! Folio Animation System
//!
//! Easing curves, spring smoothing, staggered timelines and scroll triggers
//! driven by the headless host in `folio_core`.
//!
//! # Features
//!
//! - **Easing**: named curves and CSS-style cubic beziers
//! - **Springs**: damped 2D followers for pointer smoothing
//! - **Timelines**: staggered from/to tweens over a list of nodes
//! - **Scroll Triggers**: play once, replay, or scrub with scroll position

pub mod easing;
pub mod spring;
pub mod stagger;
pub mod timeline;
pub mod trigger;
pub mod values;

pub use easing::Easing;
pub use spring::{PointSpring, SpringConfig};
pub use stagger::{StaggerConfig, StaggerDirection};
pub use timeline::{Timeline, TimelineBuilder, TimelinePhase, TimelineSlot};
pub use trigger::{
    Edge, ScrollTrigger, TriggerAction, TriggerConfig, TriggerMode, TriggerPoint, TriggerState,
};
pub use values::{Interpolate, VisualState};
