//! folio-rs: content loader for a Markdown/MDX portfolio and blog
//!
//! This crate reads posts, projects and static pages from a content tree,
//! parses their frontmatter and derives listing metadata such as reading time.
//! Rendering is left to whatever consumes the [`content::ContentRepository`].

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::Path;

/// The main application handle
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content root (holds posts/, projects/, pages/)
    pub content_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Repository over this site's content directories
    pub fn repository(&self) -> content::ContentRepository {
        content::ContentRepository::new(self.config.content_paths(&self.base_dir))
            .with_words_per_minute(self.config.words_per_minute)
    }
}
