//! List site content

use anyhow::Result;
use chrono::format::{Item, StrftimeItems};

use crate::Folio;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Lines describing site content of the given type
pub fn lines(folio: &Folio, content_type: &str) -> Result<Vec<String>> {
    let store = folio.store();
    let date_format = date_format(&folio.config.date_format);
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts: Vec<_> = store.posts().collect();
            out.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                out.push(format!(
                    "  {} - {} [{}]",
                    post.date().format(date_format),
                    post.title(),
                    post.source().display()
                ));
            }
        }
        "page" | "pages" => {
            let pages: Vec<_> = store.pages().collect();
            out.push(format!("Pages ({}):", pages.len()));
            for page in pages {
                out.push(format!("  {} [{}]", page.title(), page.source().display()));
            }
        }
        "tag" | "tags" => {
            let tags = store.tags();
            out.push(format!("Tags ({}):", tags.len()));
            for (tag, count) in tags {
                out.push(format!("  {} ({})", tag, count));
            }
        }
        "category" | "categories" => {
            let categories = store.categories();
            out.push(format!("Categories ({}):", categories.len()));
            for (category, count) in categories {
                out.push(format!("  {} ({})", category, count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag, category",
                content_type
            );
        }
    }

    Ok(out)
}

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    for line in lines(folio, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// The configured strftime format, or the fallback if it does not parse
fn date_format(configured: &str) -> &str {
    if StrftimeItems::new(configured).any(|item| item == Item::Error) {
        tracing::warn!(
            "Invalid date_format {:?}, using {:?}",
            configured,
            FALLBACK_DATE_FORMAT
        );
        FALLBACK_DATE_FORMAT
    } else {
        configured
    }
}
