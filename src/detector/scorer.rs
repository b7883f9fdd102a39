//! Framework scorer: weighted regex signature matching over scanned
//! source files.
//!
//! Used when the anchor resolver could not supply a framework (cold
//! search, or a config-file-only anchor). A signature contributes its
//! weight at most once per file, so one file full of `describe(` blocks
//! cannot outvote a single library-specific call pattern.

use log::*;
use regex::Regex;
use std::collections::BTreeMap;

use crate::detector::config::DetectionConfig;
use crate::detector::scanner::ScannedFile;
use crate::detector::types::{Framework, FrameworkEvidence, Language};
use crate::error::Result;

/// Scorer output: the winning framework plus the files and signature
/// patterns that contributed to the decision.
#[derive(Debug, Clone)]
pub struct FrameworkScore {
    pub framework: Framework,
    pub evidence: FrameworkEvidence,
    /// True when the framework fell back to the ecosystem default
    /// because of a tie or an all-zero score.
    pub defaulted: bool,
}

pub struct FrameworkScorer {
    config: DetectionConfig,
}

impl FrameworkScorer {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Infer the most likely language from scanned file extensions:
    /// majority wins, ties resolve in enum order for determinism.
    pub fn infer_language(files: &[ScannedFile]) -> Option<Language> {
        let mut counts: BTreeMap<Language, usize> = BTreeMap::new();
        for file in files {
            let ext = file.path.rsplit('.').next().unwrap_or("");
            if let Some(lang) = Language::from_extension(ext) {
                *counts.entry(lang).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(lang, _)| lang)
    }

    /// Score every framework candidate for the ecosystem and pick the
    /// strictly highest aggregate. A tie, or zero across the board,
    /// resolves to the fixed ecosystem default rather than failing:
    /// only platform ambiguity is fatal, never framework ambiguity.
    pub fn score(
        &self,
        files: &[ScannedFile],
        language: Language,
    ) -> Result<FrameworkScore> {
        let signatures = self.config.signatures_for(language);

        let mut totals: BTreeMap<Framework, u32> = BTreeMap::new();
        let mut evidence = FrameworkEvidence::default();

        for signature in &signatures {
            let re = Regex::new(signature.pattern)?;
            for file in files {
                if re.is_match(&file.content) {
                    // Weight counts at most once per file per signature
                    *totals.entry(signature.framework).or_default() +=
                        signature.weight;
                    if !evidence.files.contains(&file.path) {
                        evidence.files.push(file.path.clone());
                    }
                    let pattern = signature.pattern.to_string();
                    if !evidence.signatures.contains(&pattern) {
                        evidence.signatures.push(pattern);
                    }
                }
            }
        }

        let best = totals.iter().max_by_key(|&(_, score)| *score);
        let winner = match best {
            Some((&framework, &score)) if score > 0 => {
                let tied = totals
                    .values()
                    .filter(|&&s| s == score)
                    .count()
                    > 1;
                if tied { None } else { Some(framework) }
            }
            _ => None,
        };

        match winner {
            Some(framework) => {
                debug!(
                    "framework scorer picked {framework} ({:?})",
                    totals
                );
                Ok(FrameworkScore {
                    framework,
                    evidence,
                    defaulted: false,
                })
            }
            None => {
                let framework =
                    self.config.default_framework(language);
                debug!(
                    "framework score tie or zero, defaulting to {framework}"
                );
                Ok(FrameworkScore {
                    framework,
                    evidence,
                    defaulted: true,
                })
            }
        }
    }
}
