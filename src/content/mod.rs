//! Content module - documents, front-matter and the content store

mod document;
mod error;
mod frontmatter;
pub mod loader;
pub mod writer;

pub use document::{Document, DocumentKind, EXCERPT_MARKER};
pub use error::ContentError;
pub use frontmatter::{format_date, parse_date_string, FrontMatter};
pub use loader::{ContentStore, Documents, StoreOptions};
pub use writer::render_document;
