//! Ordered rewrite-rule engine shared by every transformer.
//!
//! A rule set is an ordered list of regex rewrites followed by
//! match-only warning rules. Ordering matters: import rewrites run
//! before call-site rewrites, and call-site rewrites before option
//! translation, so later rules see the output of earlier ones. Every
//! rule's replacement must not re-match its own pattern; that property
//! makes the whole set idempotent.

use regex::Regex;

use crate::error::Result;
use crate::transformer::types::TransformOutcome;

/// A single regex rewrite. When `counts_snapshot` is set, every match
/// is one migrated snapshot call site.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
    counts_snapshot: bool,
    /// Replace only the first match. Used to collapse a family of
    /// import lines into a single replacement import.
    first_only: bool,
    /// Emitted once if the rule fired at all.
    warning: Option<String>,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
            counts_snapshot: false,
            first_only: false,
            warning: None,
        })
    }

    /// A rewrite that replaces only the first match.
    pub fn first(pattern: &str, replacement: &str) -> Result<Self> {
        let mut rule = Self::new(pattern, replacement)?;
        rule.first_only = true;
        Ok(rule)
    }

    /// A rewrite whose matches are counted as snapshot call sites.
    pub fn snapshot(pattern: &str, replacement: &str) -> Result<Self> {
        let mut rule = Self::new(pattern, replacement)?;
        rule.counts_snapshot = true;
        Ok(rule)
    }

    /// A rewrite that also surfaces a warning when it fires.
    pub fn with_warning(
        pattern: &str,
        replacement: &str,
        warning: &str,
    ) -> Result<Self> {
        let mut rule = Self::new(pattern, replacement)?;
        rule.warning = Some(warning.to_string());
        Ok(rule)
    }
}

/// A match-only rule: flags a construct that cannot be carried over.
/// The text is left as-is; the run never silently drops it.
#[derive(Debug, Clone)]
pub struct WarnRule {
    pattern: Regex,
    message: String,
}

impl WarnRule {
    pub fn new(pattern: &str, message: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.to_string(),
        })
    }
}

/// An ordered set of rewrites plus trailing warning rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rewrites: Vec<RewriteRule>,
    warns: Vec<WarnRule>,
}

impl RuleSet {
    pub fn new(
        rewrites: Vec<RewriteRule>,
        warns: Vec<WarnRule>,
    ) -> Self {
        Self { rewrites, warns }
    }

    /// Apply every rule in order. Pure: the same input always yields
    /// the same outcome, and re-applying to the output is a no-op.
    pub fn apply(&self, text: &str) -> TransformOutcome {
        let mut content = text.to_string();
        let mut warnings = Vec::new();
        let mut snapshot_count = 0;

        for rule in &self.rewrites {
            let matches = rule.pattern.find_iter(&content).count();
            if matches == 0 {
                continue;
            }
            if rule.counts_snapshot {
                snapshot_count += matches;
            }
            if let Some(warning) = &rule.warning {
                warnings.push(warning.clone());
            }
            let limit = if rule.first_only { 1 } else { 0 };
            content = rule
                .pattern
                .replacen(&content, limit, rule.replacement.as_str())
                .into_owned();
        }

        for warn in &self.warns {
            if warn.pattern.is_match(&content) {
                warnings.push(warn.message.clone());
            }
        }

        TransformOutcome {
            content,
            snapshot_count,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_set() -> RuleSet {
        RuleSet::new(
            vec![
                RewriteRule::new("@percy/cypress", "@smartui/cypress")
                    .unwrap(),
                RewriteRule::snapshot(
                    r"cy\.percySnapshot\(",
                    "cy.smartuiSnapshot(",
                )
                .unwrap(),
            ],
            vec![
                WarnRule::new(
                    r"percyCSS",
                    "percyCSS has no equivalent and was left in place",
                )
                .unwrap(),
            ],
        )
    }

    #[test]
    fn test_rules_apply_in_order() {
        let outcome = simple_set().apply(
            "import '@percy/cypress';\ncy.percySnapshot('Home');\n",
        );
        assert_eq!(
            outcome.content,
            "import '@smartui/cypress';\ncy.smartuiSnapshot('Home');\n"
        );
        assert_eq!(outcome.snapshot_count, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_snapshot_count_is_per_call_site() {
        let outcome = simple_set().apply(
            "cy.percySnapshot('a');\ncy.percySnapshot('b');\n",
        );
        assert_eq!(outcome.snapshot_count, 2);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let set = simple_set();
        let first = set.apply(
            "import '@percy/cypress';\ncy.percySnapshot('Home');\n",
        );
        let second = set.apply(&first.content);
        assert_eq!(second.content, first.content);
        assert_eq!(second.snapshot_count, 0);
    }

    #[test]
    fn test_warn_rule_does_not_rewrite() {
        let outcome = simple_set().apply(
            "cy.percySnapshot('Home', { percyCSS: '.ad { display: none; }' });",
        );
        assert!(outcome.content.contains("percyCSS"));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("percyCSS"));
    }

    #[test]
    fn test_first_only_collapses_import_family() {
        let set = RuleSet::new(
            vec![
                RewriteRule::first(
                    r"(?m)^import com\.applitools\.eyes[^;\n]*;[ \t]*$",
                    "import io.github.smartui.SmartUISnapshot;",
                )
                .unwrap(),
                RewriteRule::new(
                    r"(?m)^import com\.applitools\.eyes[^;\n]*;[ \t]*\r?\n",
                    "",
                )
                .unwrap(),
            ],
            vec![],
        );
        let outcome = set.apply(
            "import com.applitools.eyes.Eyes;\nimport com.applitools.eyes.TestResults;\nclass T {}\n",
        );
        assert_eq!(
            outcome.content,
            "import io.github.smartui.SmartUISnapshot;\nclass T {}\n"
        );
    }

    #[test]
    fn test_rewrite_warning_emitted_once() {
        let set = RuleSet::new(
            vec![
                RewriteRule::with_warning(
                    r"(?m)^[ \t]*cy\.eyesOpen\(\s*\{.*\);[ \t]*\r?\n",
                    "",
                    "eyesOpen configuration was dropped",
                )
                .unwrap(),
            ],
            vec![],
        );
        let outcome = set.apply(
            "  cy.eyesOpen({ appName: 'x' });\n  cy.eyesOpen({ appName: 'y' });\nrest\n",
        );
        assert_eq!(outcome.content, "rest\n");
        assert_eq!(outcome.warnings.len(), 1);
    }
}
