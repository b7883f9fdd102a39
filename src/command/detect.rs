//! Detection command implementation.

use log::*;

use crate::cli::Args;
use crate::detector::config::DetectionConfig;
use crate::detector::resolver::DetectionEngine;
use crate::detector::types::{Detection, ProjectContext};
use crate::error::Result;

/// Run detection over the project and print the result as JSON.
pub async fn execute(args: &Args) -> Result<()> {
    let detection = run_detection(args).await?;

    match detection {
        Detection::Resolved(result) => {
            info!(
                "detected {} / {} / {}",
                result.platform, result.framework, result.language
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Detection::Candidates(candidates) => {
            info!("{} detection candidates", candidates.len());
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
    }

    Ok(())
}

pub(crate) async fn run_detection(args: &Args) -> Result<Detection> {
    let engine = DetectionEngine::new(DetectionConfig::default());
    let ctx = ProjectContext {
        root: args.project.clone(),
        multi_detection: args.multi,
    };
    engine.detect(&ctx).await
}
