//! folio: a content store for Markdown blogs
//!
//! Posts and pages live as Markdown files with a front-matter header. This
//! crate loads them into [`content::Document`] values, newest first, and hands
//! them unrendered to whatever site generator builds the blog.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog checkout: its configuration and where its content lives
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
}

impl Folio {
    /// Open a site from a directory. A missing `_config.yml` means defaults.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
        })
    }

    /// The content store over this site's source directory
    pub fn store(&self) -> content::ContentStore {
        content::ContentStore::new(&self.source_dir, (&self.config).into())
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, layout: Option<&str>) -> Result<PathBuf> {
        commands::new::run(self, title, layout)
    }
}
