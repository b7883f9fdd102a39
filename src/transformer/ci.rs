//! CI and script transformer: line-level rewrites of runner
//! invocations and platform environment variables.
//!
//! Works on raw text, so the same rules apply to GitHub Actions YAML,
//! GitLab CI YAML, and the `scripts` values of a package.json.

use crate::detector::types::Platform;
use crate::error::Result;
use crate::transformer::rules::{RewriteRule, RuleSet};
use crate::transformer::types::{TransformContext, TransformOutcome};

const TOKEN_WARNING: &str = "a platform token variable was renamed to SMARTUI_PROJECT_TOKEN; the token value itself must be re-provisioned";

pub struct CiTransformer {
    rules: RuleSet,
}

impl CiTransformer {
    pub fn new(ctx: &TransformContext) -> Result<Self> {
        Ok(Self {
            rules: script_rules(ctx.platform)?,
        })
    }

    pub fn transform(&self, content: &str) -> TransformOutcome {
        self.rules.apply(content)
    }
}

/// Runner and token rules for one platform. Shared with the
/// package-manager transformer for package.json `scripts` values.
pub fn script_rules(platform: Platform) -> Result<RuleSet> {
    let rewrites = match platform {
        Platform::Percy => vec![
            RewriteRule::new("percy exec --", "smartui exec --")?,
            RewriteRule::new(
                r"\bpercy snapshot\b",
                "smartui capture",
            )?,
            RewriteRule::with_warning(
                r"\bPERCY_TOKEN\b",
                "SMARTUI_PROJECT_TOKEN",
                TOKEN_WARNING,
            )?,
        ],
        Platform::Applitools => vec![
            RewriteRule::new(
                r"\beyes-storybook\b",
                "smartui exec -- storybook",
            )?,
            RewriteRule::with_warning(
                r"\bAPPLITOOLS_API_KEY\b",
                "SMARTUI_PROJECT_TOKEN",
                TOKEN_WARNING,
            )?,
        ],
        Platform::SauceLabs => vec![
            RewriteRule::new(
                r"\bscreener-runner\b",
                "smartui exec --",
            )?,
            RewriteRule::with_warning(
                r"\bSCREENER_API_KEY\b",
                "SMARTUI_PROJECT_TOKEN",
                TOKEN_WARNING,
            )?,
            RewriteRule::with_warning(
                r"\bSAUCE_VISUAL_API_KEY\b",
                "SMARTUI_PROJECT_TOKEN",
                TOKEN_WARNING,
            )?,
        ],
    };

    Ok(RuleSet::new(rewrites, vec![]))
}
