//! Export the ordered documents as a JSON manifest for an external renderer

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::{author, AuthorProfile};
use crate::content::Document;
use crate::Folio;

/// Everything a renderer needs: site metadata, the author and every document
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub site: SiteSummary<'a>,
    pub author: &'a AuthorProfile,
    pub documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct SiteSummary<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub language: &'a str,
}

/// Build the manifest, preferring the installed author profile
pub fn manifest(folio: &Folio) -> Manifest<'_> {
    let config = &folio.config;
    Manifest {
        site: SiteSummary {
            title: &config.title,
            subtitle: &config.subtitle,
            description: &config.description,
            url: &config.url,
            language: &config.language,
        },
        author: author::profile().unwrap_or(&config.author),
        documents: folio.store().list_documents().collect(),
    }
}

/// Write the manifest to `output`, or to stdout
pub fn run(folio: &Folio, output: Option<&Path>) -> Result<()> {
    let manifest = manifest(folio);
    let json = serde_json::to_string_pretty(&manifest)?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            tracing::info!(
                "Exported {} documents to {:?}",
                manifest.documents.len(),
                path
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
