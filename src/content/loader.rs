//! Content store - loads posts and pages from the source directory

use chrono::{DateTime, Local, NaiveDate};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::document::DATE_PREFIX;
use super::frontmatter::{local_from_naive, parse_date_string};
use super::{ContentError, Document, DocumentKind, FrontMatter};
use crate::config::SiteConfig;

/// Directory holding published posts
pub const POSTS_DIR: &str = "_posts";
/// Directory holding drafts
pub const DRAFTS_DIR: &str = "_drafts";

/// Options controlling which documents the store yields
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Include `_drafts` and documents marked `published: false`
    pub render_drafts: bool,
    /// Category counted for posts that list none
    pub default_category: Option<String>,
}

impl From<&SiteConfig> for StoreOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            render_drafts: config.render_drafts,
            default_category: Some(config.default_category.clone())
                .filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Where a file was discovered; decides its kind and date fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Posts,
    Drafts,
    Pages,
}

impl Origin {
    fn kind(self) -> DocumentKind {
        match self {
            Origin::Posts | Origin::Drafts => DocumentKind::Post,
            Origin::Pages => DocumentKind::Page,
        }
    }

    /// Whether the file modification time may stand in for a missing date
    fn allows_mtime(self) -> bool {
        self != Origin::Posts
    }
}

/// The collection of all documents under a source directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    source_dir: PathBuf,
    options: StoreOptions,
}

impl ContentStore {
    /// Create a store over `source_dir`. Nothing is read until documents are listed.
    pub fn new(source_dir: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            source_dir: source_dir.into(),
            options,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// All documents, newest first.
    ///
    /// The returned iterator reads the disk on its first `next()`; each call
    /// to this method starts a fresh scan.
    pub fn list_documents(&self) -> Documents<'_> {
        Documents {
            store: self,
            loaded: None,
        }
    }

    /// Posts only, newest first
    pub fn posts(&self) -> impl Iterator<Item = Document> + '_ {
        self.list_documents()
            .filter(|doc| doc.kind() == DocumentKind::Post)
    }

    /// Pages only, newest first
    pub fn pages(&self) -> impl Iterator<Item = Document> + '_ {
        self.list_documents()
            .filter(|doc| doc.kind() == DocumentKind::Page)
    }

    /// Tag name to post count, most used first
    pub fn tags(&self) -> IndexMap<String, usize> {
        let mut tags = IndexMap::new();
        for post in self.posts() {
            for tag in post.tags() {
                *tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        tags.sort_by(|_, a, _, b| b.cmp(a));
        tags
    }

    /// Category name to post count, most used first
    pub fn categories(&self) -> IndexMap<String, usize> {
        let mut categories = IndexMap::new();
        for post in self.posts() {
            match post.category() {
                Some(category) => *categories.entry(category.to_string()).or_insert(0) += 1,
                None => {
                    if let Some(default) = &self.options.default_category {
                        *categories.entry(default.clone()).or_insert(0) += 1;
                    }
                }
            }
        }
        categories.sort_by(|_, a, _, b| b.cmp(a));
        categories
    }

    /// Scan, load and sort every document. Malformed files are logged and skipped.
    fn load_all(&self) -> Vec<Document> {
        let mut documents = Vec::new();

        for (path, origin) in self.discover() {
            match self.load_document(&path, origin) {
                Ok(doc) => {
                    if doc.is_published() || self.options.render_drafts {
                        documents.push(doc);
                    } else {
                        tracing::debug!("Skipping unpublished document {:?}", path);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed document {:?}: {}", path, e);
                }
            }
        }

        // Stable: ties keep discovery order
        documents.sort_by(|a, b| b.date().cmp(&a.date()));

        tracing::debug!(
            "Loaded {} documents from {:?}",
            documents.len(),
            self.source_dir
        );
        documents
    }

    /// Markdown files in deterministic order: posts, then drafts, then pages
    fn discover(&self) -> Vec<(PathBuf, Origin)> {
        let mut found = Vec::new();
        if !self.source_dir.is_dir() {
            tracing::debug!("Source directory {:?} does not exist", self.source_dir);
            return found;
        }

        let posts_dir = self.source_dir.join(POSTS_DIR);
        found.extend(walk_markdown(&posts_dir, |_| true).map(|p| (p, Origin::Posts)));

        if self.options.render_drafts {
            let drafts_dir = self.source_dir.join(DRAFTS_DIR);
            found.extend(walk_markdown(&drafts_dir, |_| true).map(|p| (p, Origin::Drafts)));
        }

        // Skip special directories such as _posts, _drafts and _layouts
        let pages = walk_markdown(&self.source_dir, |entry| {
            entry.depth() == 0 || !is_special(entry.file_name().to_str().unwrap_or_default())
        });
        found.extend(pages.map(|p| (p, Origin::Pages)));

        found
    }

    /// Load a single document from a file
    fn load_document(&self, path: &Path, origin: Origin) -> Result<Document, ContentError> {
        let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let title = fm
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ContentError::MissingTitle)?;

        let date = match fm.date.as_deref() {
            Some(raw) => {
                parse_date_string(raw).ok_or_else(|| ContentError::InvalidDate(raw.to_string()))?
            }
            None => date_from_file_name(path)
                .or_else(|| {
                    if origin.allows_mtime() {
                        file_modified(path)
                    } else {
                        None
                    }
                })
                .ok_or(ContentError::MissingDate)?,
        };

        let updated = match fm.updated.as_deref() {
            Some(raw) => Some(
                parse_date_string(raw).ok_or_else(|| ContentError::InvalidDate(raw.to_string()))?,
            ),
            None => None,
        };

        let source = path
            .strip_prefix(&self.source_dir)
            .unwrap_or(path)
            .to_path_buf();
        let kind = origin.kind();

        let doc = Document::new(kind, title, date, source, body)?
            .with_updated(updated)
            .with_categories(fm.categories)
            .with_tags(fm.tags)
            .with_layout(fm.layout.unwrap_or_else(|| kind.default_layout().to_string()))
            .with_published(fm.published)
            .with_extra(fm.extra);

        Ok(doc)
    }

    /// Read one document back from a path relative to the source directory
    pub fn read_document(&self, source: impl AsRef<Path>) -> Result<Document, ContentError> {
        let source = source.as_ref();
        let origin = match source.components().next().and_then(|c| c.as_os_str().to_str()) {
            Some(POSTS_DIR) => Origin::Posts,
            Some(DRAFTS_DIR) => Origin::Drafts,
            _ => Origin::Pages,
        };
        self.load_document(&self.source_dir.join(source), origin)
    }
}

/// Lazy, finite iterator over a store's documents, newest first
pub struct Documents<'a> {
    store: &'a ContentStore,
    loaded: Option<std::vec::IntoIter<Document>>,
}

impl Iterator for Documents<'_> {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        let store = self.store;
        self.loaded
            .get_or_insert_with(|| store.load_all().into_iter())
            .next()
    }
}

fn walk_markdown<P>(root: &Path, keep: P) -> impl Iterator<Item = PathBuf>
where
    P: FnMut(&DirEntry) -> bool,
{
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
        .map(DirEntry::into_path)
}

/// Names starting with `_` or `.` are not pages
fn is_special(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Date from a `YYYY-MM-DD-slug.md` file name, at local midnight
fn date_from_file_name(path: &Path) -> Option<DateTime<Local>> {
    let name = path.file_name()?.to_str()?;
    let prefix = DATE_PREFIX.captures(name)?.get(1)?.as_str();
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    local_from_naive(date.and_hms_opt(0, 0, 0)?)
}

fn file_modified(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}
