//! Command execution for snapshift.
//!
//! Each subcommand is a thin wrapper over the core: it builds the
//! detection engine, runs it, and renders the result. The core never
//! writes project files; `migrate` only prints proposed changes.

/// Platform, framework, and language detection.
pub mod detect;

/// Detection followed by proposed SmartUI rewrites.
pub mod migrate;
