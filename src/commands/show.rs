//! Show a single post, project or page

use anyhow::Result;

use crate::Folio;

/// Print one content item with its frontmatter and raw body
pub async fn run(folio: &Folio, kind: &str, id: &str, json: bool) -> Result<()> {
    let repo = folio.repository();

    match kind {
        "post" | "posts" => {
            let post = repo.load_post(id).await?;
            if json {
                return super::print_json(&post);
            }
            let fm = &post.frontmatter;
            println!("Title:   {}", fm.title.as_deref().unwrap_or("(missing)"));
            println!("Date:    {}", fm.date.as_deref().unwrap_or("(missing)"));
            if let Some(author) = &fm.author {
                println!("Author:  {}", author);
            }
            if !fm.tags.is_empty() {
                println!("Tags:    {}", fm.tags.join(", "));
            }
            println!("Reading: {}", post.reading_time);
            println!("Source:  {}", post.full_source.display());
            let missing = post.missing_fields();
            if !missing.is_empty() {
                println!("Missing: {} (not listed)", missing.join(", "));
            }
            println!();
            println!("{}", post.source);
        }
        "project" | "projects" => {
            let project = repo.load_project(id).await?;
            if json {
                return super::print_json(&project);
            }
            let fm = &project.frontmatter;
            println!("Title:   {}", fm.title.as_deref().unwrap_or("(missing)"));
            println!("Date:    {}", fm.date.as_deref().unwrap_or("(missing)"));
            println!("Tags:    {}", fm.tags.join(", "));
            if let Some(url) = &fm.repo_url {
                println!("Repo:    {}", url);
            }
            if let Some(url) = &fm.demo_url {
                println!("Demo:    {}", url);
            }
            println!("Source:  {}", project.full_source.display());
            println!();
            println!("{}", project.source);
        }
        "page" | "pages" => {
            let page = repo.load_page(id).await?;
            if json {
                return super::print_json(&page);
            }
            for (key, value) in page.frontmatter.iter() {
                let value = serde_yaml::to_string(value)?;
                println!("{}: {}", key, value.trim_end());
            }
            if !page.frontmatter.is_empty() {
                println!();
            }
            println!("{}", page.source);
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, project, page", kind);
        }
    }

    Ok(())
}
