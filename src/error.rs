//! Typed errors for snapshift detection and transformation.
//!
//! The three detection-fatal variants carry fixed, user-facing message
//! templates. The CLI maps them to exit codes and colored output but must
//! not alter the text: tests assert on exact substrings of these messages.

use thiserror::Error;

/// Main error type for snapshift operations.
#[derive(Error, Debug)]
pub enum SnapshiftError {
    // Detection-fatal errors. Each of these aborts the run before any
    // transformation begins.
    #[error(
        "No visual testing platform detected: add a Percy, Applitools, or Sauce Labs Visual dependency, or reference one from your test sources"
    )]
    PlatformNotDetected,

    #[error(
        "Multiple visual testing platforms detected ({platforms}): migrate one platform at a time"
    )]
    MultiplePlatformsDetected { platforms: String },

    #[error(
        "Found {platform} API calls in source files but no {platform} dependency in any manifest: install the {platform} SDK or remove the stale calls before migrating"
    )]
    MismatchedSignals { platform: String },

    // Parsing errors - automatic conversions via #[from]
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using SnapshiftError
pub type Result<T> = std::result::Result<T, SnapshiftError>;

impl SnapshiftError {
    /// Create a multiple-platforms error from the conflicting set.
    pub fn multiple_platforms<I, S>(platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = platforms
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<String>>()
            .join(", ");
        Self::MultiplePlatformsDetected { platforms: joined }
    }

    /// Create a mismatched-signals error naming the platform whose API
    /// calls were found without a dependency anchor.
    pub fn mismatched_signals(platform: impl Into<String>) -> Self {
        Self::MismatchedSignals {
            platform: platform.into(),
        }
    }

    /// True for the detection-fatal variants that must abort the run.
    pub fn is_detection_fatal(&self) -> bool {
        matches!(
            self,
            Self::PlatformNotDetected
                | Self::MultiplePlatformsDetected { .. }
                | Self::MismatchedSignals { .. }
        )
    }
}

// Wrap generic I/O errors in the Other variant
impl From<std::io::Error> for SnapshiftError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}
