//! Migration command implementation.

use color_eyre::eyre::eyre;
use log::*;

use crate::cli::Args;
use crate::command::detect;
use crate::detector::types::Detection;
use crate::error::Result;
use crate::transformer::dispatch::TransformationManager;

/// Detect the platform, run every affected file through the rule
/// engine, and print the proposed changes. Nothing is written to disk.
pub async fn execute(args: &Args) -> Result<()> {
    let detection = detect::run_detection(args).await?;

    let result = match detection {
        Detection::Resolved(result) => result,
        Detection::Candidates(_) => {
            return Err(eyre!(
                "migration requires a single resolved platform; rerun without --multi"
            )
            .into());
        }
    };

    info!(
        "detected {} / {} / {}",
        result.platform, result.framework, result.language
    );

    let manager = TransformationManager::new(result);
    let report = manager.run(&args.project).await?;

    for change in &report.changes {
        println!(
            "{}: {} ({} snapshot calls)",
            change.action, change.path, change.snapshot_count
        );
    }

    for warning in &report.warnings {
        warn!("{warning}");
    }

    println!("{}", report.stats());

    Ok(())
}
