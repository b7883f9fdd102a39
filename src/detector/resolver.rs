//! Conflict and error resolver: the state machine that turns combined
//! anchor and content evidence into one terminal `DetectionResult` or one
//! typed detection error.
//!
//! States: NoAnchor -> ColdSearch -> {Resolved | NoPlatform |
//! MismatchedSignals}, with MultipleAnchors reachable directly from
//! evidence collection. Framework ambiguity always resolves (scorer
//! default); platform ambiguity is always fatal.

use log::*;
use std::collections::BTreeMap;
use std::path::Path;

use crate::detector::anchor::{AnchorEvidence, AnchorResolver};
use crate::detector::config::DetectionConfig;
use crate::detector::scanner::{ContentScanner, ScannedFile};
use crate::detector::scorer::FrameworkScorer;
use crate::detector::types::{
    AnchorResult, CONTENT_SCAN_SOURCE, Detection, DetectionCandidate,
    DetectionEvidence, DetectionFiles, DetectionResult, Evidence,
    FrameworkEvidence, Language, Platform, ProjectContext,
};
use crate::error::{Result, SnapshiftError};

/// CI files the dispatcher will route to the CI transformer when
/// present.
const CI_FILES: &[&str] =
    &[".gitlab-ci.yml", ".circleci/config.yml", "Jenkinsfile"];

pub struct DetectionEngine {
    config: DetectionConfig,
    anchors: AnchorResolver,
    scanner: ContentScanner,
    scorer: FrameworkScorer,
}

impl DetectionEngine {
    pub fn new(config: DetectionConfig) -> Self {
        let anchors = AnchorResolver::new(&config);
        let scanner = ContentScanner::new(&config);
        let scorer = FrameworkScorer::new(config.clone());
        Self {
            config,
            anchors,
            scanner,
            scorer,
        }
    }

    /// Run detection over the project root.
    ///
    /// In normal mode this returns exactly one resolved result or one of
    /// the three typed detection errors. In multi-detection mode,
    /// ambiguity returns the full candidate set for external selection
    /// instead of failing.
    pub async fn detect(
        &self,
        ctx: &ProjectContext,
    ) -> Result<Detection> {
        let evidence = self.anchors.collect(&ctx.root).await;

        if ctx.multi_detection {
            return self.detect_candidates(ctx, &evidence).await;
        }

        match self.anchors.resolve(&evidence)? {
            Some(anchor) => {
                self.resolve_anchored(ctx, &evidence, anchor).await
            }
            None => self.resolve_cold(ctx).await,
        }
    }

    /// Anchored path: scan with the anchored platform's full marker
    /// vocabulary, then fill framework/language gaps from content.
    async fn resolve_anchored(
        &self,
        ctx: &ProjectContext,
        evidence: &AnchorEvidence,
        anchor: AnchorResult,
    ) -> Result<Detection> {
        let markers = self.config.markers_for(anchor.platform);
        let scanned = self.scanner.scan(&ctx.root, &markers).await?;

        info!(
            "anchored on {} via {}: {} source files match",
            anchor.platform,
            anchor.evidence.source,
            scanned.len()
        );

        let language = match anchor.language {
            Some(lang) => lang,
            None => FrameworkScorer::infer_language(&scanned)
                .unwrap_or(Language::JavaScript),
        };

        let (framework, framework_evidence) = match anchor.framework {
            Some(framework) => {
                // Framework came from the dependency itself; record the
                // matched files and the anchoring dependency as the
                // signature trail.
                let fe = FrameworkEvidence {
                    files: scanned
                        .iter()
                        .map(|f| f.path.clone())
                        .collect(),
                    signatures: vec![anchor.evidence.r#match.clone()],
                };
                (framework, fe)
            }
            None => {
                let score = self.scorer.score(&scanned, language)?;
                (score.framework, score.evidence)
            }
        };

        let result = DetectionResult {
            platform: anchor.platform,
            framework,
            language,
            test_type: framework.test_type(),
            files: DetectionFiles {
                config: evidence.config_files.clone(),
                source: scanned
                    .iter()
                    .map(|f| f.path.clone())
                    .collect(),
                ci: find_ci_files(&ctx.root).await,
                package_manager: evidence
                    .package_manager_files
                    .clone(),
            },
            evidence: DetectionEvidence {
                platform: anchor.evidence,
                framework: framework_evidence,
            },
        };

        Ok(Detection::Resolved(result))
    }

    /// Cold path: no structural anchor anywhere. Scan with the union of
    /// all platforms' markers. Zero matches is a terminal
    /// no-detection; any match means the code assumes a platform whose
    /// package was never installed, which is a mismatched-signal
    /// conflict, not a detection.
    async fn resolve_cold(
        &self,
        ctx: &ProjectContext,
    ) -> Result<Detection> {
        let markers = self.config.all_markers();
        let scanned = self.scanner.scan(&ctx.root, &markers).await?;

        if scanned.is_empty() {
            return Err(SnapshiftError::PlatformNotDetected);
        }

        let platform = self.score_platforms(&scanned)?;
        warn!(
            "{} API usage found in {} files without a dependency anchor",
            platform,
            scanned.len()
        );

        Err(SnapshiftError::mismatched_signals(platform.name()))
    }

    /// Score platforms by total marker-occurrence count across matched
    /// files. A strict maximum wins; a tie escalates to the same fatal
    /// conflict as two simultaneous dependency anchors.
    fn score_platforms(
        &self,
        scanned: &[ScannedFile],
    ) -> Result<Platform> {
        let mut totals: BTreeMap<Platform, usize> = BTreeMap::new();

        for platform in Platform::all() {
            let markers = self.config.markers_for(platform);
            let total: usize = scanned
                .iter()
                .flat_map(|f| f.hits.iter())
                .filter(|(marker, _)| markers.contains(marker))
                .map(|(_, count)| count)
                .sum();
            if total > 0 {
                totals.insert(platform, total);
            }
        }

        debug!("cold-search platform scores: {totals:?}");

        let max = totals.values().copied().max().unwrap_or(0);
        let leaders: Vec<Platform> = totals
            .iter()
            .filter(|&(_, &score)| score == max)
            .map(|(&platform, _)| platform)
            .collect();

        match leaders.as_slice() {
            [single] => Ok(*single),
            _ => Err(SnapshiftError::multiple_platforms(
                leaders.iter().map(|p| p.name()),
            )),
        }
    }

    /// Multi-detection mode: return every plausible `(platform,
    /// framework, language)` candidate with confidence and evidence,
    /// and let the caller disambiguate.
    async fn detect_candidates(
        &self,
        ctx: &ProjectContext,
        evidence: &AnchorEvidence,
    ) -> Result<Detection> {
        let mut candidates = Vec::new();

        for anchor in evidence.all_anchors() {
            let confidence = if anchor.framework.is_some() {
                0.9
            } else if anchor.language.is_some() {
                0.8
            } else {
                // Config-file anchor only
                0.6
            };
            candidates.push(DetectionCandidate {
                platform: anchor.platform,
                framework: anchor.framework,
                language: anchor.language,
                confidence,
                evidence: anchor.evidence.clone(),
            });
        }

        if candidates.is_empty() {
            // Fall back to content evidence so the caller still gets a
            // candidate list when only source markers exist.
            let markers = self.config.all_markers();
            let scanned =
                self.scanner.scan(&ctx.root, &markers).await?;
            if scanned.is_empty() {
                return Err(SnapshiftError::PlatformNotDetected);
            }

            let language = FrameworkScorer::infer_language(&scanned);
            for platform in Platform::all() {
                let markers = self.config.markers_for(platform);
                let hit = scanned.iter().find(|f| {
                    f.hits.iter().any(|(m, _)| markers.contains(m))
                });
                if let Some(file) = hit {
                    let marker = file
                        .hits
                        .iter()
                        .find(|(m, _)| markers.contains(m))
                        .map(|(m, _)| *m)
                        .unwrap_or_default();
                    candidates.push(DetectionCandidate {
                        platform,
                        framework: None,
                        language,
                        confidence: 0.4,
                        evidence: Evidence::new(
                            CONTENT_SCAN_SOURCE,
                            marker,
                        ),
                    });
                }
            }
        }

        Ok(Detection::Candidates(candidates))
    }
}

/// CI files present under the project root, relative paths in
/// deterministic order.
async fn find_ci_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();

    let workflows = root.join(".github/workflows");
    if let Ok(mut entries) = tokio::fs::read_dir(&workflows).await {
        let mut names = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(".yml") || name.ends_with(".yaml") {
                names.push(format!(".github/workflows/{name}"));
            }
        }
        names.sort();
        files.extend(names);
    }

    for ci_file in CI_FILES {
        if tokio::fs::try_exists(root.join(ci_file))
            .await
            .unwrap_or(false)
        {
            files.push((*ci_file).to_string());
        }
    }

    files
}
