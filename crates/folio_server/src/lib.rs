//! Folio Server
//!
//! Serves the built site with per-page link preview tags, validates contact
//! form submissions and proxies the thoughts feed.

pub mod app;
pub mod config;
pub mod contact;
pub mod meta;
pub mod static_files;
pub mod thoughts;

pub use app::{router, serve, serve_on, AppState};
pub use config::{FolioConfig, PageMeta, CONFIG_FILE};
pub use contact::{ContactError, ContactSubmission};
pub use meta::PreviewMeta;
pub use thoughts::{Thought, ThoughtsError};
