//! Folio configuration file handling
//!
//! The server reads `folio.toml`:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! static_dir = "dist"
//!
//! [site]
//! name = "Jane Doe"
//! base_url = "https://example.com"
//! default_image = "https://example.com/og.png"
//!
//! [thoughts]
//! url = "https://sheets.example.com/api/thoughts"
//!
//! [[pages]]
//! slug = "work/atlas"
//! title = "Atlas"
//! description = "A mapping tool"
//! ```
//!
//! Every field has a default, and a missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub thoughts: ThoughtsConfig,
    #[serde(default)]
    pub pages: Vec<PageMeta>,
}

/// HTTP listener and static files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built site
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// App shell served for unknown paths
    #[serde(default = "default_index")]
    pub index: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_index() -> String {
    "index.html".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            index: default_index(),
        }
    }
}

/// Site-wide link preview defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_image: Option<String>,
}

fn default_site_name() -> String {
    "Folio".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: default_base_url(),
            description: None,
            default_image: None,
        }
    }
}

/// Remote source for the thoughts feed
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThoughtsConfig {
    /// JSON endpoint returning an array of rows; the feed is empty when unset
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for ThoughtsConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Link preview metadata for one content page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageMeta {
    /// Request path without leading or trailing slashes
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl FolioConfig {
    /// Load `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Page metadata for a request path such as `/work/atlas/`
    pub fn page_for_path(&self, path: &str) -> Option<&PageMeta> {
        let wanted = path.trim_matches('/');
        self.pages
            .iter()
            .find(|page| page.slug.trim_matches('/') == wanted)
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
