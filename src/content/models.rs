//! Post, project and page models

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::frontmatter::{opt_scalar_string, string_or_vec};
use super::{ContentError, FrontMatter};

/// The three kinds of content, each with its own schema and discovery rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Project,
    Page,
}

impl ContentKind {
    /// Required frontmatter fields for listings
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ContentKind::Post => &["title", "date", "excerpt"],
            ContentKind::Project => &["title", "date", "description", "tags"],
            ContentKind::Page => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Project => "project",
            ContentKind::Page => "page",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post front-matter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFrontMatter {
    #[serde(deserialize_with = "opt_scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Project front-matter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectFrontMatter {
    #[serde(deserialize_with = "opt_scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub repo_url: Option<String>,
    #[serde(deserialize_with = "opt_scalar_string")]
    pub demo_url: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// A post as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    /// ISO date string as written in the source
    pub date: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: String,
}

impl PostSummary {
    /// Build a summary, failing when a required field is missing
    pub fn from_frontmatter(
        slug: String,
        path: PathBuf,
        frontmatter: &FrontMatter,
        reading_time: String,
    ) -> Result<Self, ContentError> {
        let missing = frontmatter.missing(ContentKind::Post.required_fields());
        if !missing.is_empty() {
            return Err(ContentError::IncompleteMetadata { path, missing });
        }

        let fm: PostFrontMatter = frontmatter.to_typed().map_err(|e| ContentError::Frontmatter {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let (Some(title), Some(date), Some(excerpt)) = (fm.title, fm.date, fm.excerpt) else {
            return Err(ContentError::Frontmatter {
                path,
                message: "title, date and excerpt must be scalars".to_string(),
            });
        };

        Ok(Self {
            slug,
            title,
            date,
            excerpt,
            author: fm.author,
            tags: fm.tags,
            reading_time,
        })
    }
}

/// A full post, as returned by slug lookup.
///
/// Lookup does not enforce the listing schema, so any frontmatter field may be absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    #[serde(flatten)]
    pub frontmatter: PostFrontMatter,
    pub reading_time: String,
    /// Raw, unrendered markup body
    pub source: String,
    #[serde(skip)]
    pub full_source: PathBuf,
    /// Required listing fields that are absent or falsy
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) missing: Vec<&'static str>,
}

impl Post {
    /// Build a post, recording which listing fields its frontmatter lacks
    pub fn new(
        slug: String,
        frontmatter: &FrontMatter,
        reading_time: String,
        source: String,
        full_source: PathBuf,
    ) -> Result<Self, ContentError> {
        let typed = frontmatter.to_typed().map_err(|e| ContentError::Frontmatter {
            path: full_source.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            slug,
            frontmatter: typed,
            reading_time,
            source,
            missing: frontmatter.missing(ContentKind::Post.required_fields()),
            full_source,
        })
    }

    /// Required listing fields this post lacks; non-empty means listings skip it
    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }
}

/// A project as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

impl ProjectSummary {
    /// Build a summary, failing when a required field is missing
    pub fn from_frontmatter(
        slug: String,
        path: PathBuf,
        frontmatter: &FrontMatter,
    ) -> Result<Self, ContentError> {
        let missing = frontmatter.missing(ContentKind::Project.required_fields());
        if !missing.is_empty() {
            return Err(ContentError::IncompleteMetadata { path, missing });
        }

        let fm: ProjectFrontMatter =
            frontmatter.to_typed().map_err(|e| ContentError::Frontmatter {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let (Some(title), Some(date), Some(description)) = (fm.title, fm.date, fm.description)
        else {
            return Err(ContentError::Frontmatter {
                path,
                message: "title, date and description must be scalars".to_string(),
            });
        };

        Ok(Self {
            slug,
            title,
            date,
            description,
            tags: fm.tags,
            repo_url: fm.repo_url,
            demo_url: fm.demo_url,
        })
    }
}

/// A full project, as returned by slug lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub slug: String,
    #[serde(flatten)]
    pub frontmatter: ProjectFrontMatter,
    /// Raw, unrendered markup body
    pub source: String,
    #[serde(skip)]
    pub full_source: PathBuf,
}

/// A static page: raw body plus open, unvalidated front-matter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent {
    pub source: String,
    pub frontmatter: FrontMatter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(yaml: &str) -> FrontMatter {
        FrontMatter::parse(&format!("---\n{}\n---\n", yaml)).0
    }

    #[test]
    fn test_post_summary() {
        let summary = PostSummary::from_frontmatter(
            "hello".to_string(),
            PathBuf::from("posts/hello.md"),
            &fm("title: Hello\ndate: 2024-01-01\nexcerpt: Hi\ntags: rust"),
            "1 min read".to_string(),
        )
        .unwrap();
        assert_eq!(summary.title, "Hello");
        assert_eq!(summary.author, None);
        assert_eq!(summary.tags, vec!["rust"]);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["readingTime"], "1 min read");
        assert!(json.get("author").is_none());
    }

    #[test]
    fn test_post_summary_missing_fields() {
        let err = PostSummary::from_frontmatter(
            "hello".to_string(),
            PathBuf::from("posts/hello.md"),
            &fm("title: Hello\nexcerpt: \"\""),
            "1 min read".to_string(),
        )
        .unwrap_err();
        match err {
            ContentError::IncompleteMetadata { missing, .. } => {
                assert_eq!(missing, vec!["date", "excerpt"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_project_summary() {
        let summary = ProjectSummary::from_frontmatter(
            "router".to_string(),
            PathBuf::from("projects/router.md"),
            &fm("title: Router\ndate: 2024-02-01\ndescription: BGP lab\ntags: [bgp, frr]\nrepoUrl: https://example.com/r"),
        )
        .unwrap();
        assert_eq!(summary.tags, vec!["bgp", "frr"]);
        assert_eq!(summary.repo_url.as_deref(), Some("https://example.com/r"));
        assert_eq!(summary.demo_url, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["repoUrl"], "https://example.com/r");
    }

    #[test]
    fn test_project_without_tags_is_incomplete() {
        let err = ProjectSummary::from_frontmatter(
            "router".to_string(),
            PathBuf::from("projects/router.md"),
            &fm("title: Router\ndate: 2024-02-01\ndescription: BGP lab"),
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::IncompleteMetadata { .. }));
    }

    #[test]
    fn test_post_missing_fields() {
        let post = Post::new(
            "draft".to_string(),
            &fm("title: Draft\nexcerpt: \"\""),
            "0 min read".to_string(),
            String::new(),
            PathBuf::from("posts/draft.md"),
        )
        .unwrap();
        assert_eq!(post.missing_fields(), ["date", "excerpt"]);

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["missing"], serde_json::json!(["date", "excerpt"]));
    }

    #[test]
    fn test_falsy_scalars_count_as_missing() {
        let raw = fm("title: false\ndate: 2024-01-01\nexcerpt: 0");
        let post = Post::new(
            "falsy".to_string(),
            &raw,
            "0 min read".to_string(),
            String::new(),
            PathBuf::from("posts/falsy.md"),
        )
        .unwrap();

        // Coerced to strings for display, but still excluded from listings
        assert_eq!(post.frontmatter.title.as_deref(), Some("false"));
        assert_eq!(post.missing_fields(), ["title", "excerpt"]);
        assert!(PostSummary::from_frontmatter(
            "falsy".to_string(),
            PathBuf::from("posts/falsy.md"),
            &raw,
            "0 min read".to_string(),
        )
        .is_err());
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let typed: PostFrontMatter = fm("title: T\ncover: img.png").to_typed().unwrap();
        assert_eq!(typed.extra.get("cover"), Some(&serde_yaml::Value::from("img.png")));
    }
}
