//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::AuthorProfile;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: AuthorProfile,
    pub language: String,
    pub url: String,

    // Directory
    pub source_dir: String,

    // Writing
    pub new_post_name: String,
    pub default_layout: String,
    pub default_category: String,
    pub render_drafts: bool,

    // Date format used in listings (chrono strftime syntax)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: AuthorProfile {
                name: "John Doe".to_string(),
                ..Default::default()
            },
            language: "en".to_string(),
            url: "http://example.com".to_string(),

            source_dir: "source".to_string(),

            new_post_name: ":year-:month-:day-:title.md".to_string(),
            default_layout: "post".to_string(),
            default_category: "uncategorized".to_string(),
            render_drafts: false,

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }
}
