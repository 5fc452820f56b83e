//! List site content

use anyhow::Result;

use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str, json: bool) -> Result<()> {
    let repo = folio.repository();

    match content_type {
        "post" | "posts" => {
            let posts = repo.list_posts();
            if json {
                return super::print_json(&posts);
            }
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] ({})",
                    post.date, post.title, post.slug, post.reading_time
                );
            }
        }
        "project" | "projects" => {
            let projects = repo.list_projects();
            if json {
                return super::print_json(&projects);
            }
            println!("Projects ({}):", projects.len());
            for project in projects {
                println!(
                    "  {} - {} [{}] {}",
                    project.date,
                    project.title,
                    project.slug,
                    project.tags.join(", ")
                );
            }
        }
        "page" | "pages" => {
            let pages = repo.page_names();
            if json {
                return super::print_json(&pages);
            }
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {}", page);
            }
        }
        "tag" | "tags" => {
            let tags = repo.tags();
            if json {
                return super::print_json(&tags);
            }
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "slug" | "slugs" => {
            let posts = repo.post_slugs();
            let projects = repo.project_slugs();
            if json {
                return super::print_json(&serde_json::json!({
                    "posts": posts,
                    "projects": projects,
                }));
            }
            println!("Post slugs ({}):", posts.len());
            for slug in posts {
                println!("  {}", slug);
            }
            println!("Project slugs ({}):", projects.len());
            for slug in projects {
                println!("  {}", slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, projects, pages, tags, slugs",
                content_type
            );
        }
    }

    Ok(())
}
