//! Maintenance commands over the content store

pub mod export;
pub mod list;
pub mod new;
pub mod profile;
