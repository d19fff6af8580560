//! Document model

use chrono::{DateTime, Local};
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::frontmatter::{format_date, FrontMatter, RESERVED_KEYS};
use super::loader::{DRAFTS_DIR, POSTS_DIR};
use super::ContentError;

/// Marker separating a post's excerpt from the rest of its body
pub const EXCERPT_MARKER: &str = "<!-- more -->";

lazy_static! {
    /// Jekyll-style `YYYY-MM-DD-` file name prefix
    pub(crate) static ref DATE_PREFIX: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})-").unwrap();
}

/// Whether a document is a dated post or a standalone page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Post,
    Page,
}

impl DocumentKind {
    /// Kind implied by a path relative to the source directory:
    /// `_posts` and `_drafts` hold posts, everything else is a page
    pub fn for_source(source: &Path) -> Self {
        match source.components().next().and_then(|c| c.as_os_str().to_str()) {
            Some(POSTS_DIR) | Some(DRAFTS_DIR) => DocumentKind::Post,
            _ => DocumentKind::Page,
        }
    }

    /// Layout used when the header does not name one
    pub fn default_layout(self) -> &'static str {
        match self {
            DocumentKind::Post => "post",
            DocumentKind::Page => "page",
        }
    }
}

/// A post or page: metadata plus an unrendered body.
///
/// Title and date are fixed at construction and the body has no setter.
/// The `with_*` builders exist for authoring a document before it is written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    title: String,
    date: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<DateTime<Local>>,
    categories: Vec<String>,
    tags: IndexSet<String>,
    layout: String,
    published: bool,
    kind: DocumentKind,
    source: PathBuf,
    body: String,
    #[serde(flatten)]
    extra: IndexMap<String, serde_yaml::Value>,
}

impl Document {
    /// Create a document with the required fields.
    ///
    /// `source` is the path relative to the store's source directory and
    /// must agree with `kind` (see [`DocumentKind::for_source`]).
    pub fn new(
        kind: DocumentKind,
        title: impl Into<String>,
        date: DateTime<Local>,
        source: impl Into<PathBuf>,
        body: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ContentError::MissingTitle);
        }
        let source = source.into();
        if DocumentKind::for_source(&source) != kind {
            return Err(ContentError::KindMismatch {
                kind,
                source_path: source,
            });
        }

        Ok(Self {
            title,
            date,
            updated: None,
            categories: Vec::new(),
            tags: IndexSet::new(),
            layout: kind.default_layout().to_string(),
            published: true,
            kind,
            source,
            body: body.into(),
            extra: IndexMap::new(),
        })
    }

    pub fn with_updated(mut self, updated: Option<DateTime<Local>>) -> Self {
        self.updated = updated;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tags; duplicates collapse and first-seen order is kept
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Set the custom header keys. Keys that have a dedicated field are dropped.
    pub fn with_extra(mut self, mut extra: IndexMap<String, serde_yaml::Value>) -> Self {
        extra.retain(|key, _| {
            let reserved = RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                tracing::warn!("Ignoring extra key {:?} in {:?}", key, self.source);
            }
            !reserved
        });
        self.extra = extra;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publication timestamp
    pub fn date(&self) -> DateTime<Local> {
        self.date
    }

    pub fn updated(&self) -> Option<DateTime<Local>> {
        self.updated
    }

    /// Primary category: the first one listed
    pub fn category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Source path relative to the source directory
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The formatted text exactly as it follows the header
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Header keys without a dedicated field, in source order
    pub fn extra(&self) -> &IndexMap<String, serde_yaml::Value> {
        &self.extra
    }

    /// Body text before the excerpt marker, if the body has one
    pub fn excerpt(&self) -> Option<&str> {
        self.body
            .split_once(EXCERPT_MARKER)
            .map(|(excerpt, _)| excerpt.trim())
    }

    /// File stem with any `YYYY-MM-DD-` prefix removed
    pub fn slug(&self) -> &str {
        let stem = self
            .source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        // `about/index.md` is addressed by its directory
        let stem = if stem == "index" {
            self.source
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .unwrap_or(stem)
        } else {
            stem
        };

        match DATE_PREFIX.find(stem) {
            Some(m) => &stem[m.end()..],
            None => stem,
        }
    }

    /// The header that reproduces this document's metadata
    pub fn front_matter(&self) -> FrontMatter {
        FrontMatter {
            layout: Some(self.layout.clone()),
            title: Some(self.title.clone()),
            date: Some(format_date(&self.date)),
            updated: self.updated.as_ref().map(format_date),
            categories: self.categories.clone(),
            tags: self.tags.iter().cloned().collect(),
            published: self.published,
            extra: self.extra.clone(),
        }
    }
}
