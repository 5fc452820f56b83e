//! Content repository - resolves posts, projects and pages from the content tree
//!
//! Every call re-reads the filesystem; nothing is cached between calls.
//! Listing operations validate the required frontmatter of their kind and
//! skip incomplete files, while slug lookups return whatever is on disk and
//! only warn. Failures are logged and degrade to empty lists or `None`.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::date::parse_date;
use super::discovery::{
    find_markup_files, is_safe_slug, slug_from_path, Depth, MARKUP_EXTENSIONS,
};
use super::reading_time::{reading_time, WORDS_PER_MINUTE};
use super::{
    ContentError, ContentKind, FrontMatter, PageContent, Post, PostSummary,
    Project, ProjectFrontMatter, ProjectSummary,
};
use crate::config::{ContentPaths, SiteConfig};

/// Read-only view over the content directories
#[derive(Debug, Clone)]
pub struct ContentRepository {
    paths: ContentPaths,
    words_per_minute: usize,
}

impl ContentRepository {
    /// Create a repository over explicit content locations
    pub fn new(paths: ContentPaths) -> Self {
        Self {
            paths,
            words_per_minute: WORDS_PER_MINUTE,
        }
    }

    /// Override the reading speed used for reading-time estimates
    pub fn with_words_per_minute(mut self, words_per_minute: usize) -> Self {
        self.words_per_minute = words_per_minute.max(1);
        self
    }

    pub fn paths(&self) -> &ContentPaths {
        &self.paths
    }

    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    /// All post files, recursively
    pub fn post_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        find_markup_files(&self.paths.posts, Depth::Recursive)
    }

    /// Posts with complete frontmatter, newest first
    pub fn list_posts(&self) -> Vec<PostSummary> {
        let files = match self.post_files() {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("{}", e);
                return Vec::new();
            }
        };

        let mut posts = Vec::new();
        for path in files {
            match self.load_post_summary(&path) {
                Ok(summary) => posts.push((path, summary)),
                Err(e) => tracing::warn!("Skipping post: {}", e),
            }
        }

        sort_newest_first(&mut posts, |p| (p.date.clone(), p.slug.clone()));
        posts.into_iter().map(|(_, summary)| summary).collect()
    }

    fn load_post_summary(&self, path: &Path) -> Result<PostSummary, ContentError> {
        let slug = slug_for(path)?;
        let (fm, body) = read_document(path)?;
        let reading_time = reading_time(&body, self.words_per_minute).text;
        PostSummary::from_frontmatter(slug, path.to_path_buf(), &fm, reading_time)
    }

    /// Look up a post by slug, `None` when it does not exist or cannot be read
    pub async fn get_post(&self, slug: &str) -> Option<Post> {
        found_or_log(self.load_post(slug).await)
    }

    /// Look up a post by slug.
    ///
    /// `.mdx` wins over `.md`; among files with the same slug and extension in
    /// different subdirectories the first path in sorted order wins.
    pub async fn load_post(&self, slug: &str) -> Result<Post, ContentError> {
        let not_found = || ContentError::NotFound {
            kind: "Post",
            id: slug.to_string(),
            dir: self.paths.posts.clone(),
        };
        if !is_safe_slug(slug) {
            return Err(not_found());
        }

        // The recursive walk is blocking, keep it off the runtime's worker threads
        let root = self.paths.posts.clone();
        let files =
            match tokio::task::spawn_blocking(move || find_markup_files(&root, Depth::Recursive))
                .await
            {
                Ok(Ok(files)) => files,
                Ok(Err(e)) => {
                    tracing::warn!("{}", e);
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!("Post discovery task failed: {}", e);
                    Vec::new()
                }
            };

        let candidates: Vec<PathBuf> = files
            .into_iter()
            .filter(|p| slug_from_path(p).as_deref() == Some(slug))
            .collect();

        let path = MARKUP_EXTENSIONS
            .iter()
            .find_map(|ext| {
                candidates
                    .iter()
                    .find(|p| p.extension().and_then(|e| e.to_str()) == Some(*ext))
            })
            .cloned()
            .ok_or_else(not_found)?;

        if candidates.len() > 1 {
            tracing::warn!(
                "Post slug \"{}\" matches {} files, using {:?}",
                slug,
                candidates.len(),
                path
            );
        }

        let (fm, body) = read_document_async(&path).await?;
        let post = Post::new(
            slug.to_string(),
            &fm,
            reading_time(&body, self.words_per_minute).text,
            body,
            path,
        )?;
        if !post.missing_fields().is_empty() {
            tracing::warn!(
                "Post \"{}\" (at {:?}) is missing required frontmatter: {}",
                slug,
                post.full_source,
                post.missing_fields().join(", ")
            );
        }

        Ok(post)
    }

    /// Every post slug, without frontmatter validation
    pub fn post_slugs(&self) -> Vec<String> {
        match self.post_files() {
            Ok(files) => files.iter().filter_map(|p| slug_from_path(p)).collect(),
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Tag usage over listed posts, most used first
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for post in self.list_posts() {
            for tag in post.tags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<_> = counts.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Project files directly inside the projects directory
    pub fn project_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        find_markup_files(&self.paths.projects, Depth::Flat)
    }

    /// Projects with complete frontmatter, newest first
    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        let files = match self.project_files() {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("{}", e);
                return Vec::new();
            }
        };

        let mut projects = Vec::new();
        for path in files {
            match self.load_project_summary(&path) {
                Ok(summary) => {
                    if summary.tags.is_empty() {
                        tracing::warn!("Project \"{}\" has an empty tag list", summary.slug);
                    }
                    projects.push((path, summary));
                }
                Err(e) => tracing::warn!("Skipping project: {}", e),
            }
        }

        sort_newest_first(&mut projects, |p| (p.date.clone(), p.slug.clone()));
        projects.into_iter().map(|(_, summary)| summary).collect()
    }

    fn load_project_summary(&self, path: &Path) -> Result<ProjectSummary, ContentError> {
        let slug = slug_for(path)?;
        let (fm, _) = read_document(path)?;
        ProjectSummary::from_frontmatter(slug, path.to_path_buf(), &fm)
    }

    /// Look up a project by slug, `None` when it does not exist or cannot be read
    pub async fn get_project(&self, slug: &str) -> Option<Project> {
        found_or_log(self.load_project(slug).await)
    }

    /// Look up a project by slug, probing `<slug>.mdx` before `<slug>.md`
    pub async fn load_project(&self, slug: &str) -> Result<Project, ContentError> {
        let not_found = || ContentError::NotFound {
            kind: "Project",
            id: slug.to_string(),
            dir: self.paths.projects.clone(),
        };
        if !is_safe_slug(slug) {
            return Err(not_found());
        }

        let mut found = None;
        for ext in MARKUP_EXTENSIONS {
            let candidate = self.paths.projects.join(format!("{}.{}", slug, ext));
            if is_file_async(&candidate).await? {
                found = Some(candidate);
                break;
            }
        }
        let path = found.ok_or_else(not_found)?;

        let (fm, body) = read_document_async(&path).await?;
        let frontmatter: ProjectFrontMatter = typed(&fm, &path)?;
        let missing = fm.missing(ContentKind::Project.required_fields());
        if !missing.is_empty() {
            tracing::warn!(
                "Project \"{}\" is missing required frontmatter: {}",
                slug,
                missing.join(", ")
            );
        }

        Ok(Project {
            slug: slug.to_string(),
            frontmatter,
            source: body,
            full_source: path,
        })
    }

    /// Every project slug, without frontmatter validation
    pub fn project_slugs(&self) -> Vec<String> {
        match self.project_files() {
            Ok(files) => files.iter().filter_map(|p| slug_from_path(p)).collect(),
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Static pages
    // ------------------------------------------------------------------

    fn page_path(&self, name: &str) -> PathBuf {
        self.paths.pages.join(format!("{}.md", name))
    }

    /// Load `<pages>/<name>.md`, `None` when it does not exist or cannot be read
    pub async fn get_page(&self, name: &str) -> Option<PageContent> {
        found_or_log(self.load_page(name).await)
    }

    /// Load a static page; its frontmatter is not validated
    pub async fn load_page(&self, name: &str) -> Result<PageContent, ContentError> {
        let path = self.page_path(name);
        if !is_safe_slug(name) || !is_file_async(&path).await? {
            return Err(ContentError::NotFound {
                kind: "Static page",
                id: format!("{}.md", name),
                dir: self.paths.pages.clone(),
            });
        }

        let (frontmatter, source) = read_document_async(&path).await?;
        Ok(PageContent {
            source,
            frontmatter,
        })
    }

    /// Names of the static pages on disk
    pub fn page_names(&self) -> Vec<String> {
        match find_markup_files(&self.paths.pages, Depth::Flat) {
            Ok(files) => files
                .iter()
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
                .filter_map(|p| slug_from_path(p))
                .collect(),
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Check whether a static page file exists
    pub fn has_page(&self, name: &str) -> bool {
        is_safe_slug(name) && self.page_path(name).is_file()
    }

    // ------------------------------------------------------------------
    // Routes
    // ------------------------------------------------------------------

    /// Every route the site can pre-render
    pub fn routes(&self, config: &SiteConfig) -> Vec<String> {
        let blog = config.blog_route.trim_matches('/');
        let projects = config.projects_route.trim_matches('/');

        let mut routes = vec!["/".to_string()];

        for (route, page) in &config.pages {
            if self.has_page(page) {
                routes.push(format!("/{}", route.trim_matches('/')));
            } else {
                tracing::debug!("Skipping route /{}: page \"{}\" not found", route, page);
            }
        }

        routes.push(format!("/{}", blog));
        routes.extend(
            self.post_slugs()
                .into_iter()
                .map(|slug| format!("/{}/{}", blog, slug)),
        );

        routes.push(format!("/{}", projects));
        routes.extend(
            self.project_slugs()
                .into_iter()
                .map(|slug| format!("/{}/{}", projects, slug)),
        );

        routes
    }
}

/// Read a content file and split it into frontmatter and body
pub fn read_document(path: &Path) -> Result<(FrontMatter, String), ContentError> {
    let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    let (fm, body) = FrontMatter::parse(&content);
    Ok((fm, body.to_string()))
}

async fn read_document_async(path: &Path) -> Result<(FrontMatter, String), ContentError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ContentError::io(path, e))?;
    let (fm, body) = FrontMatter::parse(&content);
    Ok((fm, body.to_string()))
}

async fn is_file_async(path: &Path) -> Result<bool, ContentError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ContentError::io(path, e)),
    }
}

fn slug_for(path: &Path) -> Result<String, ContentError> {
    slug_from_path(path).ok_or_else(|| ContentError::Frontmatter {
        path: path.to_path_buf(),
        message: "file name has no markup extension".to_string(),
    })
}

fn typed<T: serde::de::DeserializeOwned>(fm: &FrontMatter, path: &Path) -> Result<T, ContentError> {
    fm.to_typed().map_err(|e| ContentError::Frontmatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Collapse a lookup result to an option, logging why nothing was found
fn found_or_log<T>(result: Result<T, ContentError>) -> Option<T> {
    match result {
        Ok(item) => Some(item),
        Err(e) if e.is_not_found() => {
            tracing::debug!("{}", e);
            None
        }
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

/// Sort newest first. Unparseable dates go last; ties break by slug, then path.
fn sort_newest_first<T>(items: &mut [(PathBuf, T)], key: impl Fn(&T) -> (String, String)) {
    items.sort_by_cached_key(|(path, item)| {
        let (date, slug) = key(item);
        let parsed = parse_date(&date);
        (parsed.is_none(), Reverse(parsed), slug, path.clone())
    });
}
