//! Core data model for the detection engine.
//!
//! Every value here is either read-only after construction or exclusively
//! owned by the single in-flight run. `DetectionResult` is the terminal,
//! immutable output of detection: its platform is always one of the three
//! enumerated values. "No platform yet" is a valid intermediate state
//! (modeled as an absent anchor) while evidence is being collected, but
//! the resolver converts it into a typed error before returning.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Evidence source marker used when a platform was determined from file
/// contents rather than a dependency manifest.
pub const CONTENT_SCAN_SOURCE: &str = "content-scan";

/// Visual testing platforms this tool can migrate away from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub enum Platform {
    Percy,
    Applitools,
    SauceLabs,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Percy => "Percy",
            Platform::Applitools => "Applitools",
            Platform::SauceLabs => "Sauce Labs Visual",
        }
    }

    /// All supported platforms, in fixed declaration order.
    pub fn all() -> [Platform; 3] {
        [Platform::Percy, Platform::Applitools, Platform::SauceLabs]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Test frameworks recognized by the scorer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub enum Framework {
    Cypress,
    Playwright,
    Puppeteer,
    Selenium,
    WebdriverIO,
    Storybook,
    Appium,
    RobotFramework,
}

impl Framework {
    pub fn name(&self) -> &'static str {
        match self {
            Framework::Cypress => "Cypress",
            Framework::Playwright => "Playwright",
            Framework::Puppeteer => "Puppeteer",
            Framework::Selenium => "Selenium",
            Framework::WebdriverIO => "WebdriverIO",
            Framework::Storybook => "Storybook",
            Framework::Appium => "Appium",
            Framework::RobotFramework => "Robot Framework",
        }
    }

    /// Test type implied by the framework.
    pub fn test_type(&self) -> TestType {
        match self {
            Framework::Storybook => TestType::Storybook,
            Framework::Appium => TestType::Appium,
            _ => TestType::E2e,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Language ecosystems covered by the evidence readers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub enum Language {
    JavaScript,
    Java,
    Python,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript/TypeScript",
            Language::Java => "Java",
            Language::Python => "Python",
        }
    }

    /// Candidate source file extensions for this ecosystem.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => {
                &["js", "jsx", "ts", "tsx", "mjs", "cjs"]
            }
            Language::Java => &["java"],
            // Robot Framework tabular tests live in the Python ecosystem
            Language::Python => &["py", "robot"],
        }
    }

    /// Map a file extension back to its ecosystem.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => {
                Some(Language::JavaScript)
            }
            "java" => Some(Language::Java),
            "py" | "robot" => Some(Language::Python),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of test run the detected project performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestType {
    E2e,
    Storybook,
    Appium,
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestType::E2e => "e2e",
            TestType::Storybook => "storybook",
            TestType::Appium => "appium",
        };
        write!(f, "{s}")
    }
}

/// The `(source, match)` pair recorded to justify a detection decision.
///
/// Immutable: created once per reader invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// File identifier the signal came from, or [`CONTENT_SCAN_SOURCE`].
    pub source: String,
    /// Token or dependency name that matched.
    pub r#match: String,
}

impl Evidence {
    pub fn new(source: impl Into<String>, m: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            r#match: m.into(),
        }
    }
}

/// A single high-confidence anchor produced by one evidence reader.
///
/// Transient: consumed only by the anchor resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorResult {
    pub platform: Platform,
    pub framework: Option<Framework>,
    pub language: Option<Language>,
    pub evidence: Evidence,
}

/// Everything one evidence reader learned about its ecosystem.
#[derive(Debug, Clone, Default)]
pub struct ManifestScan {
    /// All platform anchors found, including conflicting ones. The
    /// resolver decides whether multiple anchors are fatal.
    pub anchors: Vec<AnchorResult>,
    /// Package-manager files that exist (package.json, pom.xml, ...),
    /// relative to the project root.
    pub package_manager_files: Vec<String>,
}

/// The evidence trail attached to the final result and surfaced to the
/// user.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionEvidence {
    pub platform: Evidence,
    pub framework: FrameworkEvidence,
}

/// Files and signature patterns that drove framework selection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameworkEvidence {
    pub files: Vec<String>,
    pub signatures: Vec<String>,
}

/// File sets the transformation dispatcher will route.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionFiles {
    pub config: Vec<String>,
    pub source: Vec<String>,
    pub ci: Vec<String>,
    pub package_manager: Vec<String>,
}

/// Terminal detection output. Immutable once built; owned by the run and
/// consumed by the transformation dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    pub platform: Platform,
    pub framework: Framework,
    pub language: Language,
    pub test_type: TestType,
    pub files: DetectionFiles,
    pub evidence: DetectionEvidence,
}

/// One entry of the candidate set returned in multi-detection mode, for
/// external disambiguation by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionCandidate {
    pub platform: Platform,
    pub framework: Option<Framework>,
    pub language: Option<Language>,
    /// Relative confidence among candidates: dependency anchors score
    /// higher than content-scan hits.
    pub confidence: f32,
    pub evidence: Evidence,
}

/// Outcome of a detection run: either a single resolved result, or (in
/// multi-detection mode) the full candidate set for external selection.
#[derive(Debug, Clone)]
pub enum Detection {
    Resolved(DetectionResult),
    Candidates(Vec<DetectionCandidate>),
}

impl Detection {
    pub fn as_resolved(&self) -> Option<&DetectionResult> {
        match self {
            Detection::Resolved(r) => Some(r),
            Detection::Candidates(_) => None,
        }
    }
}

/// Project root plus detection mode, threaded through the pipeline.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    /// When true, ambiguity returns candidates instead of failing.
    pub multi_detection: bool,
}
