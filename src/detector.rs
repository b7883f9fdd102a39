//! Detection engine: anchor-and-search over project evidence.
//!
//! Structural evidence (dependency manifests, well-known config
//! filenames) anchors the platform cheaply; content scanning and
//! weighted framework scoring fill in whatever the anchor could not
//! supply. The resolver turns the combined evidence into exactly one
//! result or one typed error.

pub mod anchor;
pub mod config;
pub mod manifest;
pub mod resolver;
pub mod scanner;
pub mod scorer;
pub mod types;
