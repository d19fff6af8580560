//! Create a new post or page

use anyhow::{bail, Result};
use chrono::{Local, Timelike};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::loader::{DRAFTS_DIR, POSTS_DIR};
use crate::content::{format_date, Document, DocumentKind};
use crate::Folio;

/// Create a new post/page/draft and return the path written
pub fn create_post(folio: &Folio, title: &str, layout: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = Local::now();
    let now = now.with_nanosecond(0).unwrap_or(now);
    let slug = slug::slugify(title);

    // Generate filename
    let filename = if let Some(p) = path {
        format!("{}.md", p)
    } else {
        folio
            .config
            .new_post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
            .replace(":i_month", &now.format("%-m").to_string())
            .replace(":i_day", &now.format("%-d").to_string())
    };

    // Determine the target location based on layout
    let (kind, relative) = match layout {
        "draft" => (DocumentKind::Post, Path::new(DRAFTS_DIR).join(&filename)),
        "page" => (
            DocumentKind::Page,
            Path::new(path.unwrap_or(&slug)).join("index.md"),
        ),
        _ => (DocumentKind::Post, Path::new(POSTS_DIR).join(&filename)),
    };

    let file_path = folio.source_dir.join(&relative);
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = folio
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", layout));

    if scaffold_path.exists() {
        let scaffold = fs::read_to_string(&scaffold_path)?;
        // Quote the title so values like "Ownership: a guide" stay valid YAML
        let yaml_title = serde_yaml::to_string(title)?;
        let content = scaffold
            .replace("{{ title }}", yaml_title.trim_end())
            .replace("{{ date }}", &format_date(&now));
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;
    } else {
        let layout = if layout == "draft" {
            kind.default_layout()
        } else {
            layout
        };
        let doc = Document::new(kind, title, now, relative, "")?.with_layout(layout);
        folio.store().write_document(&doc)?;
    }

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}

/// Run the new command
pub fn run(folio: &Folio, title: &str, layout: Option<&str>) -> Result<PathBuf> {
    let layout = layout.unwrap_or(&folio.config.default_layout);
    create_post(folio, title, layout, None)
}
