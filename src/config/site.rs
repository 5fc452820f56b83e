//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,

    // Directory
    pub content_dir: String,
    pub posts_dir: String,
    pub projects_dir: String,
    pub pages_dir: String,

    // Writing
    pub words_per_minute: usize,

    // Routes
    pub blog_route: String,
    pub projects_route: String,
    /// Static page routes: route name -> page file name (without `.md`)
    pub pages: IndexMap<String, String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut pages = IndexMap::new();
        pages.insert("about".to_string(), "whoami".to_string());
        pages.insert("skills".to_string(), "skills_summary".to_string());
        pages.insert("roadmap".to_string(), "roadmap".to_string());

        Self {
            title: "Packet Guide".to_string(),
            author: String::new(),

            content_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            projects_dir: "projects".to_string(),
            pages_dir: "pages".to_string(),

            words_per_minute: 200,

            blog_route: "blog".to_string(),
            projects_route: "projects".to_string(),
            pages,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the content directories against a base directory
    pub fn content_paths<P: AsRef<Path>>(&self, base_dir: P) -> ContentPaths {
        let root = base_dir.as_ref().join(&self.content_dir);
        ContentPaths {
            posts: root.join(&self.posts_dir),
            projects: root.join(&self.projects_dir),
            pages: root.join(&self.pages_dir),
        }
    }
}

/// Locations of the three content kinds on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPaths {
    /// Searched recursively
    pub posts: PathBuf,
    /// Immediate children only
    pub projects: PathBuf,
    /// Looked up by name
    pub pages: PathBuf,
}

impl ContentPaths {
    /// Standard `posts/`, `projects/`, `pages/` layout under one content root
    pub fn from_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            posts: root.join("posts"),
            projects: root.join("projects"),
            pages: root.join("pages"),
        }
    }
}
