//! Text segmentation for Folio
//!
//! - [`segment`]: pure split of a string into characters or words
//! - [`SplitText`]: replaces a container's content with one span per segment
//!
//! ```rust
//! use folio_core::Host;
//! use folio_text::{SplitMode, SplitText};
//!
//! let host = Host::default();
//! let heading = host.append_element(host.root(), "h1");
//! let split = SplitText::split(&host, heading, "Hello there", SplitMode::Words);
//!
//! assert_eq!(split.animated().len(), 2);
//! assert_eq!(host.document().text_content(heading), "Hello there");
//! ```

pub mod segment;
pub mod split;

pub use segment::{animated_count, segment, Segment, SplitMode};
pub use split::{SplitOptions, SplitSpan, SplitText, SEGMENT_ATTR, SPACER_ATTR};
