//! Content scanner: bounded full-text search for platform marker tokens
//! over candidate source files.
//!
//! The scan is bounded two ways: a fixed ignore list (build output,
//! package caches, version control) and a fixed candidate-extension set
//! for the three supported ecosystems. Output order is sorted by path so
//! the same filesystem snapshot always produces the same result.

use log::*;
use std::path::{Path, PathBuf};

use crate::detector::config::DetectionConfig;
use crate::error::Result;

/// A candidate file whose raw text contained at least one marker.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Path relative to the project root, `/`-separated.
    pub path: String,
    /// Raw file contents, retained so the scorer and transformers do
    /// not re-read the file.
    pub content: String,
    /// `(marker, occurrence count)` for each marker that matched.
    pub hits: Vec<(&'static str, usize)>,
}

impl ScannedFile {
    /// Total marker occurrences in this file, counting repeats.
    pub fn occurrences(&self) -> usize {
        self.hits.iter().map(|(_, n)| n).sum()
    }
}

pub struct ContentScanner {
    ignore_dirs: Vec<&'static str>,
    extensions: Vec<&'static str>,
}

impl ContentScanner {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            ignore_dirs: config.ignore_dirs.clone(),
            extensions: config.candidate_extensions(),
        }
    }

    /// Return exactly the candidate files containing at least one of the
    /// supplied markers. Per-file read failures are logged and skipped,
    /// never aborting the scan.
    pub async fn scan(
        &self,
        root: &Path,
        markers: &[&'static str],
    ) -> Result<Vec<ScannedFile>> {
        let candidates = self.candidate_files(root);
        debug!(
            "scanning {} candidate files for {} markers",
            candidates.len(),
            markers.len()
        );

        let mut matched = Vec::new();

        for path in candidates {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(
                        "skipping unreadable file {}: {e}",
                        path.display()
                    );
                    continue;
                }
            };

            let hits: Vec<(&'static str, usize)> = markers
                .iter()
                .filter_map(|marker| {
                    let count = content.matches(marker).count();
                    (count > 0).then_some((*marker, count))
                })
                .collect();

            if !hits.is_empty() {
                matched.push(ScannedFile {
                    path: relative_path(root, &path),
                    content,
                    hits,
                });
            }
        }

        Ok(matched)
    }

    /// Candidate files under the root, bounded by the ignore list and
    /// extension set, sorted for deterministic traversal order.
    fn candidate_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false);

        // The ignore list is fixed configuration, applied uniformly
        // regardless of any project-level ignore files.
        let mut overrides =
            ignore::overrides::OverrideBuilder::new(root);
        for dir in &self.ignore_dirs {
            let _ = overrides.add(&format!("!{dir}/**"));
            let _ = overrides.add(&format!("!{dir}"));
        }
        if let Ok(built) = overrides.build() {
            builder.overrides(built);
        }

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_some_and(|ft| ft.is_file())
            })
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| {
                        self.extensions.iter().any(|e| *e == ext)
                    })
            })
            .collect();

        files.sort();
        files
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> ContentScanner {
        ContentScanner::new(&DetectionConfig::default())
    }

    #[tokio::test]
    async fn test_finds_marker_in_candidate_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("login.cy.js"),
            "describe('login', () => {\n  cy.percySnapshot('Login');\n});\n",
        )
        .unwrap();

        let files = scanner()
            .scan(temp_dir.path(), &["percySnapshot"])
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "login.cy.js");
        assert_eq!(files[0].hits, vec![("percySnapshot", 1)]);
    }

    #[tokio::test]
    async fn test_skips_ignored_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nm = temp_dir.path().join("node_modules/@percy/cypress");
        fs::create_dir_all(&nm).unwrap();
        fs::write(nm.join("index.js"), "percySnapshot stuff").unwrap();

        let files = scanner()
            .scan(temp_dir.path(), &["percySnapshot"])
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_skips_non_candidate_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("notes.md"),
            "percySnapshot mentioned in docs",
        )
        .unwrap();

        let files = scanner()
            .scan(temp_dir.path(), &["percySnapshot"])
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_output_is_sorted_and_counts_occurrences() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("b.spec.ts"),
            "cy.percySnapshot('one'); cy.percySnapshot('two');",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("a.spec.ts"),
            "cy.percySnapshot('three');",
        )
        .unwrap();

        let files = scanner()
            .scan(temp_dir.path(), &["percySnapshot"])
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "a.spec.ts");
        assert_eq!(files[1].path, "b.spec.ts");
        assert_eq!(files[1].occurrences(), 2);
    }

    #[tokio::test]
    async fn test_robot_files_are_candidates() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("suite.robot"),
            "*** Test Cases ***\nHome\n    Percy Snapshot    home\n",
        )
        .unwrap();

        let files = scanner()
            .scan(temp_dir.path(), &["Percy Snapshot"])
            .await
            .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_no_matches_yields_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("plain.spec.js"),
            "describe('nothing visual here', () => {});",
        )
        .unwrap();

        let files = scanner()
            .scan(temp_dir.path(), &["percySnapshot"])
            .await
            .unwrap();
        assert!(files.is_empty());
    }
}
