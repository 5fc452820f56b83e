//! Validate content and report what listings would skip

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::SiteConfig;
use crate::content::discovery::{is_markup_file, slug_from_path};
use crate::content::{
    parse_date, read_document, scalar_to_string, ContentKind, ContentRepository,
    ProjectFrontMatter,
};
use crate::Folio;

/// Severity of a content issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The file is left out of listings
    Error,
    /// Listed, but probably not as intended
    Warning,
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub path: PathBuf,
    pub message: String,
}

/// Result of checking the whole content tree
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub checked: usize,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    fn push(&mut self, severity: Severity, path: &Path, message: impl Into<String>) {
        self.issues.push(Issue {
            severity,
            path: path.to_path_buf(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.issues.len() - self.errors()
    }
}

/// Check posts, projects and configured pages
pub fn check(repo: &ContentRepository, config: &SiteConfig) -> CheckReport {
    let mut report = CheckReport::default();

    match repo.post_files() {
        Ok(files) => check_kind(&mut report, ContentKind::Post, &files),
        Err(e) => report.push(Severity::Warning, &repo.paths().posts, e.to_string()),
    }

    match repo.project_files() {
        Ok(files) => check_kind(&mut report, ContentKind::Project, &files),
        Err(e) => report.push(Severity::Warning, &repo.paths().projects, e.to_string()),
    }

    for (route, page) in &config.pages {
        if !repo.has_page(page) {
            report.push(
                Severity::Warning,
                &repo.paths().pages.join(format!("{}.md", page)),
                format!("page for route /{} does not exist", route),
            );
        }
    }

    report
}

fn check_kind(report: &mut CheckReport, kind: ContentKind, files: &[PathBuf]) {
    let mut by_slug: BTreeMap<String, Vec<&PathBuf>> = BTreeMap::new();

    for path in files {
        report.checked += 1;
        if let Some(slug) = slug_from_path(path) {
            by_slug.entry(slug).or_default().push(path);
        }

        let fm = match read_document(path) {
            Ok((fm, _)) => fm,
            Err(e) => {
                report.push(Severity::Error, path, e.to_string());
                continue;
            }
        };

        let missing = fm.missing(kind.required_fields());
        if !missing.is_empty() {
            report.push(
                Severity::Error,
                path,
                format!(
                    "{} excluded from listings, missing: {}",
                    kind,
                    missing.join(", ")
                ),
            );
        }

        if let Some(date) = fm.get("date").and_then(scalar_to_string) {
            if parse_date(&date).is_none() {
                report.push(
                    Severity::Warning,
                    path,
                    format!("date \"{}\" cannot be parsed, sorted last", date),
                );
            }
        }

        // Listings coerce tags the same way, so `[~]` ends up as an empty list too
        if kind == ContentKind::Project && fm.is_present("tags") {
            let empty = fm
                .to_typed::<ProjectFrontMatter>()
                .map(|p| p.tags.is_empty())
                .unwrap_or(false);
            if empty {
                report.push(Severity::Warning, path, "project has an empty tag list");
            }
        }
    }

    for (slug, paths) in by_slug {
        if paths.len() > 1 {
            let names: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
            report.push(
                Severity::Warning,
                paths[0],
                format!(
                    "{} slug \"{}\" is shared by {} files: {}",
                    kind,
                    slug,
                    paths.len(),
                    names.join(", ")
                ),
            );
        }
    }
}

fn print_report(report: &CheckReport) {
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}: {}: {}", label, issue.path.display(), issue.message);
    }
    println!(
        "Checked {} files: {} errors, {} warnings",
        report.checked,
        report.errors(),
        report.warnings()
    );
}

/// Run the check command
pub fn run(folio: &Folio, watch_mode: bool) -> Result<()> {
    let report = check(&folio.repository(), &folio.config);
    print_report(&report);

    if watch_mode {
        return watch(folio);
    }

    if report.errors() > 0 {
        anyhow::bail!("{} content files have errors", report.errors());
    }

    Ok(())
}

/// Re-run the check whenever content or configuration changes
fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.content_dir);
    }

    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events
                    .iter()
                    .any(|e| is_markup_file(&e.path) || e.path == config_path);
                if !relevant {
                    continue;
                }

                let folio = match Folio::new(&folio.base_dir) {
                    Ok(reloaded) => reloaded,
                    Err(e) => {
                        tracing::error!("Failed to reload configuration: {}", e);
                        continue;
                    }
                };
                println!();
                print_report(&check(&folio.repository(), &folio.config));
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentPaths;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_check_report() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "posts/ok.md", "---\ntitle: A\ndate: 2024-01-01\nexcerpt: E\n---\n");
        write(root, "posts/x/ok.mdx", "---\ntitle: B\ndate: soon\nexcerpt: E\n---\n");
        write(root, "posts/broken.md", "---\ntitle: C\n---\n");
        write(
            root,
            "projects/p.md",
            "---\ntitle: P\ndate: 2024-01-01\ndescription: D\ntags: []\n---\n",
        );
        write(root, "pages/whoami.md", "About");

        let repo = ContentRepository::new(ContentPaths::from_root(root));
        let report = check(&repo, &SiteConfig::default());

        assert_eq!(report.checked, 4);
        assert_eq!(report.errors(), 1);
        let messages: Vec<_> = report.issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.contains(&"post excluded from listings, missing: date, excerpt"));
        assert!(messages.contains(&"date \"soon\" cannot be parsed, sorted last"));
        assert!(messages.contains(&"project has an empty tag list"));
        assert!(messages
            .iter()
            .any(|m| m.starts_with("post slug \"ok\" is shared by 2 files")));
        assert!(messages.contains(&"page for route /skills does not exist"));
        assert!(messages.contains(&"page for route /roadmap does not exist"));
    }

    #[test]
    fn test_null_only_tags_warn_like_empty_tags() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "projects/nulls.md",
            "---\ntitle: N\ndate: 2024-01-01\ndescription: D\ntags: [~, null]\n---\n",
        );
        write(
            root,
            "projects/tagged.md",
            "---\ntitle: T\ndate: 2024-01-01\ndescription: D\ntags: rust\n---\n",
        );

        let repo = ContentRepository::new(ContentPaths::from_root(root));
        let report = check(&repo, &SiteConfig::default());

        let tag_warnings: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.message == "project has an empty tag list")
            .collect();
        assert_eq!(tag_warnings.len(), 1);
        assert!(tag_warnings[0].path.ends_with("nulls.md"));
        assert_eq!(report.errors(), 0);
    }

    #[test]
    fn test_run_fails_on_errors() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/posts/broken.md", "No frontmatter");

        let folio = Folio::new(dir.path()).unwrap();
        assert!(run(&folio, false).is_err());
    }
}
