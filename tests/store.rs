//! End-to-end behaviour of the content store against a site on disk

use std::fs;
use std::path::Path;

use chrono::{Local, TimeZone};
use folio::content::{Document, DocumentKind};
use folio::Folio;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn blog() -> (TempDir, Folio) {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "_config.yml",
        r#"title: Notes on Systems
author:
  name: Jane Doe
  role: Staff Engineer
  affiliation: Acme
  links:
    github: https://github.com/janedoe
source_dir: site
"#,
    );
    write(
        tmp.path(),
        "site/_posts/2026-01-05-error-handling.md",
        r#"---
layout: post
title: Error handling without tears
date: 2026-01-05 08:00:00
categories: engineering
tags: [rust, errors]
---
Errors are values.

<!-- more -->

The rest of the essay.
"#,
    );
    write(
        tmp.path(),
        "site/_posts/2026-02-18-backpressure.md",
        r#"---
layout: post
title: Backpressure is a feature
date: 2026-02-18 08:00:00
categories: [engineering]
tags: async
---
Queues fill up.
"#,
    );
    write(
        tmp.path(),
        "site/_posts/broken.md",
        "---\nlayout: post\ndate: 2026-03-01\n---\nNo title here.\n",
    );
    write(
        tmp.path(),
        "site/about.md",
        "---\nlayout: page\ntitle: About\ndate: 2025-12-01\n---\nI build storage engines.\n",
    );
    let folio = Folio::new(tmp.path()).unwrap();
    (tmp, folio)
}

#[test]
fn newest_document_comes_first() {
    let (_tmp, folio) = blog();
    let titles: Vec<_> = folio
        .store()
        .list_documents()
        .map(|d| d.title().to_string())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Backpressure is a feature",
            "Error handling without tears",
            "About"
        ]
    );
}

#[test]
fn malformed_document_does_not_stop_listing() {
    let (_tmp, folio) = blog();
    let docs: Vec<_> = folio.store().list_documents().collect();
    assert_eq!(docs.len(), 3);
    for doc in &docs {
        assert!(!doc.title().is_empty());
    }
    let dates: Vec<_> = docs.iter().map(|d| d.date()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[test]
fn metadata_is_preserved() {
    let (_tmp, folio) = blog();
    let store = folio.store();
    let doc = store
        .posts()
        .find(|d| d.slug() == "error-handling")
        .unwrap();

    assert_eq!(doc.layout(), "post");
    assert_eq!(doc.category(), Some("engineering"));
    assert!(doc.tags().contains("errors"));
    assert_eq!(doc.excerpt(), Some("Errors are values."));
    assert_eq!(
        doc.date(),
        Local.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
    );
    assert!(doc.body().starts_with("Errors are values.\n"));

    let about = store.pages().next().unwrap();
    assert_eq!(about.kind(), DocumentKind::Page);
    assert_eq!(about.body(), "I build storage engines.\n");
}

#[test]
fn written_document_reads_back_identically() {
    let (_tmp, folio) = blog();
    let store = folio.store();
    let doc = Document::new(
        DocumentKind::Post,
        "Lock-free, carefully",
        Local.with_ymd_and_hms(2026, 4, 2, 7, 45, 0).unwrap(),
        "_posts/2026-04-02-lock-free.md",
        "Start with a mutex.\n",
    )
    .unwrap()
    .with_categories(["engineering"])
    .with_tags(["concurrency", "atomics"]);

    store.write_document(&doc).unwrap();
    assert_eq!(store.read_document(doc.source()).unwrap(), doc);
    assert_eq!(store.list_documents().next().unwrap(), doc);
}

#[test]
fn author_profile_comes_from_config() {
    let (_tmp, folio) = blog();
    let author = &folio.config.author;
    assert_eq!(author.byline(), "Jane Doe, Staff Engineer at Acme");
    assert_eq!(
        author.links.get("github").map(String::as_str),
        Some("https://github.com/janedoe")
    );
}
