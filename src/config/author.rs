//! Author profile: who the blog belongs to
//!
//! The profile is read from the `author` key of `_config.yml` and can be
//! installed once as a process-wide, read-only value.

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static PROFILE: OnceLock<AuthorProfile> = OnceLock::new();

/// The blog author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AuthorRepr")]
pub struct AuthorProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// Contact links, label to URL
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, String>,
}

/// `author: Jane Doe` or a full mapping
#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorRepr {
    Name(String),
    Full(AuthorFields),
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AuthorFields {
    name: String,
    role: Option<String>,
    affiliation: Option<String>,
    links: IndexMap<String, String>,
}

impl From<AuthorRepr> for AuthorProfile {
    fn from(repr: AuthorRepr) -> Self {
        match repr {
            AuthorRepr::Name(name) => Self {
                name,
                ..Default::default()
            },
            AuthorRepr::Full(f) => Self {
                name: f.name,
                role: f.role,
                affiliation: f.affiliation,
                links: f.links,
            },
        }
    }
}

impl AuthorProfile {
    /// One-line description, e.g. "Jane Doe, Staff Engineer at Acme"
    pub fn byline(&self) -> String {
        let mut line = self.name.clone();
        if let Some(role) = &self.role {
            line.push_str(", ");
            line.push_str(role);
        }
        if let Some(affiliation) = &self.affiliation {
            line.push_str(if self.role.is_some() { " at " } else { ", " });
            line.push_str(affiliation);
        }
        line
    }
}

/// Install the process-wide profile. Fails if one is already installed.
pub fn install(profile: AuthorProfile) -> Result<&'static AuthorProfile> {
    let mut installed = false;
    let current = PROFILE.get_or_init(|| {
        installed = true;
        profile
    });
    if !installed {
        bail!("Author profile already installed for {:?}", current.name);
    }
    tracing::debug!("Installed author profile for {:?}", current.name);
    Ok(current)
}

/// The installed profile, if any
pub fn profile() -> Option<&'static AuthorProfile> {
    PROFILE.get()
}
