//! Show the author profile

use anyhow::Result;

use crate::config::author;
use crate::Folio;

/// Lines describing the author; the installed profile wins over the config
pub fn lines(folio: &Folio) -> Vec<String> {
    let profile = author::profile().unwrap_or(&folio.config.author);
    let mut out = vec![profile.byline()];
    for (label, url) in &profile.links {
        out.push(format!("  {}: {}", label, url));
    }
    out
}

/// Print the author profile
pub fn run(folio: &Folio) -> Result<()> {
    for line in lines(folio) {
        println!("{}", line);
    }
    Ok(())
}
