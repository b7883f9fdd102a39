//! snapshift: visual-testing migration engine.
//!
//! Detects which visual testing platform (Percy, Applitools, or Sauce
//! Labs Visual), test framework, and language ecosystem a project
//! uses, then proposes SmartUI rewrites for its configs, test sources,
//! CI scripts, and package manifests.

pub mod cli;
pub mod command;
pub mod detector;
pub mod error;
pub mod transformer;

pub use error::{Result, SnapshiftError};
