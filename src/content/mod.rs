//! Content module - discovers, parses and resolves posts, projects and pages

mod date;
pub mod discovery;
mod error;
mod frontmatter;
mod models;
pub mod reading_time;
mod repository;

pub use date::parse_date;
pub use error::ContentError;
pub use frontmatter::{is_truthy, scalar_to_string, FrontMatter};
pub use models::{
    ContentKind, PageContent, Post, PostFrontMatter, PostSummary, Project, ProjectFrontMatter,
    ProjectSummary,
};
pub use reading_time::ReadingTime;
pub use repository::{read_document, ContentRepository};
