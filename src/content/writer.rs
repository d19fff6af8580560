//! Writing documents back to the source directory

use std::fs;
use std::path::PathBuf;

use super::loader::ContentStore;
use super::{ContentError, Document};

/// Serialize a document as `header + body`
pub fn render_document(doc: &Document) -> Result<String, ContentError> {
    let mut out = doc.front_matter().render()?;
    out.push_str(doc.body());
    Ok(out)
}

impl ContentStore {
    /// Write a document to `source_dir/<doc.source()>`, replacing any existing file.
    /// Returns the full path written.
    pub fn write_document(&self, doc: &Document) -> Result<PathBuf, ContentError> {
        let path = self.source_dir().join(doc.source());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ContentError::io(parent, e))?;
        }

        let content = render_document(doc)?;
        fs::write(&path, content).map_err(|e| ContentError::io(&path, e))?;
        tracing::debug!("Wrote {:?}", path);

        Ok(path)
    }
}
