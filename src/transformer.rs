//! Transformation rule engine: rewrites detected platform artifacts
//! into their SmartUI equivalents.
//!
//! Transformers are pure functions of `(text, context)`; the dispatch
//! module routes files and folds outcomes into a report of proposed
//! changes. Nothing here touches the filesystem except reading the
//! files named by detection.

pub mod ci;
pub mod configfile;
pub mod dispatch;
pub mod java;
pub mod js;
pub mod package_manager;
pub mod python;
pub mod rules;
pub mod types;
