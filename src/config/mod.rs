//! Configuration module

pub mod author;
mod site;

pub use author::AuthorProfile;
pub use site::SiteConfig;
