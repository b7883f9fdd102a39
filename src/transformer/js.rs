//! JavaScript/TypeScript source transformer.
//!
//! Rule order: module-path rewrites first, then snapshot call sites,
//! then lifecycle-call removal and option translation. The call-site
//! rules match only the method name, so any receiver (`cy.`,
//! `browser.`, a bare import binding) is preserved.

use crate::detector::types::Platform;
use crate::error::Result;
use crate::transformer::rules::{RewriteRule, RuleSet, WarnRule};
use crate::transformer::types::{TransformContext, TransformOutcome};

pub struct JsTransformer {
    rules: RuleSet,
}

impl JsTransformer {
    pub fn new(ctx: &TransformContext) -> Result<Self> {
        let rules = match ctx.platform {
            Platform::Percy => percy_rules()?,
            Platform::Applitools => applitools_rules()?,
            Platform::SauceLabs => saucelabs_rules()?,
        };
        Ok(Self { rules })
    }

    pub fn transform(&self, content: &str) -> TransformOutcome {
        self.rules.apply(content)
    }
}

fn percy_rules() -> Result<RuleSet> {
    let module_map: &[(&str, &str)] = &[
        ("@percy/cypress", "@smartui/cypress"),
        ("@percy/playwright", "@smartui/playwright"),
        ("@percy/puppeteer", "@smartui/puppeteer"),
        ("@percy/selenium-webdriver", "@smartui/selenium"),
        ("@percy/storybook", "@smartui/storybook"),
        ("@percy/appium-app", "@smartui/appium"),
        ("@percy/cli", "@smartui/cli"),
    ];

    let mut rewrites = Vec::new();
    for (from, to) in module_map {
        rewrites.push(RewriteRule::new(&regex::escape(from), to)?);
    }

    rewrites.push(RewriteRule::snapshot(
        r"\bpercySnapshot\s*\(",
        "smartuiSnapshot(",
    )?);
    rewrites.push(RewriteRule::snapshot(
        r"\bpercyScreenshot\s*\(",
        "smartuiSnapshot(",
    )?);
    // Leftover identifier uses: import bindings, command registration
    rewrites
        .push(RewriteRule::new(r"\bpercySnapshot\b", "smartuiSnapshot")?);
    rewrites.push(RewriteRule::new(
        r"\bpercyScreenshot\b",
        "smartuiSnapshot",
    )?);
    // Per-snapshot option translation
    rewrites.push(RewriteRule::new(
        r"\bignoreRegions(\s*):",
        "ignoreDOM$1:",
    )?);

    let warns = vec![
        WarnRule::new(
            r"\bpercyCSS\b",
            "percyCSS has no equivalent and was left in place; move the styles into the page under test",
        )?,
        WarnRule::new(
            r"\bminHeight\b",
            "minHeight is not supported; viewport heights are set in .smartui.json",
        )?,
    ];

    Ok(RuleSet::new(rewrites, warns))
}

fn applitools_rules() -> Result<RuleSet> {
    let module_map: &[(&str, &str)] = &[
        ("@applitools/eyes-cypress", "@smartui/cypress"),
        ("@applitools/eyes-playwright", "@smartui/playwright"),
        ("@applitools/eyes-puppeteer", "@smartui/puppeteer"),
        ("@applitools/eyes-selenium", "@smartui/selenium"),
        ("@applitools/eyes-webdriverio", "@smartui/wdio"),
        ("@applitools/eyes-storybook", "@smartui/storybook"),
    ];

    let mut rewrites = Vec::new();
    for (from, to) in module_map {
        rewrites.push(RewriteRule::new(&regex::escape(from), to)?);
    }

    // The open/check/close triple collapses to a single snapshot call.
    rewrites.push(RewriteRule::snapshot(
        r"\beyesCheckWindow\s*\(",
        "smartuiSnapshot(",
    )?);
    rewrites.push(RewriteRule::new(
        r"(?m)^[ \t]*cy\.eyesOpen\(\s*\);?[ \t]*\r?\n",
        "",
    )?);
    rewrites.push(RewriteRule::with_warning(
        r"(?m)^[ \t]*cy\.eyesOpen\(.*\);?[ \t]*\r?\n",
        "",
        "configuration passed to cy.eyesOpen was dropped; set app and project options in .smartui.json",
    )?);
    rewrites.push(RewriteRule::new(
        r"(?m)^[ \t]*cy\.eyesClose\(\s*\);?[ \t]*\r?\n",
        "",
    )?);

    // eyes.check(name, Target.window()) in driver-based suites
    rewrites.push(RewriteRule::snapshot(
        r"\beyes\.check\(\s*([^,]+?),\s*Target\.window\(\)\s*\)",
        "smartuiSnapshot(driver, $1)",
    )?);
    rewrites.push(RewriteRule::with_warning(
        r"(?m)^[ \t]*(?:await\s+)?eyes\.open\(.*\);?[ \t]*\r?\n",
        "",
        "configuration passed to eyes.open was dropped; set app and project options in .smartui.json",
    )?);
    rewrites.push(RewriteRule::new(
        r"(?m)^[ \t]*(?:await\s+)?eyes\.close(?:Async)?\(\s*\);?[ \t]*\r?\n",
        "",
    )?);

    let warns = vec![
        WarnRule::new(
            r"Target\.",
            "Applitools Target settings other than Target.window() have no equivalent and were left in place",
        )?,
        WarnRule::new(
            r"\b(?:setBatch|batchName)\b",
            "Applitools batch settings have no equivalent; grouping is configured on the SmartUI project",
        )?,
        // Lifecycle calls spanning multiple lines survive the removal
        // rules above; flag whatever is still present.
        WarnRule::new(
            r"\beyesOpen\b|\beyes\.open\s*\(",
            "an eyesOpen call was left in place and must be removed manually; SmartUI needs no session setup",
        )?,
        WarnRule::new(
            r"\beyesClose\b|\beyes\.close(?:Async)?\s*\(",
            "an eyesClose call was left in place and must be removed manually",
        )?,
    ];

    Ok(RuleSet::new(rewrites, warns))
}

fn saucelabs_rules() -> Result<RuleSet> {
    let module_map: &[(&str, &str)] = &[
        ("@saucelabs/cypress-visual-plugin", "@smartui/cypress"),
        ("@saucelabs/visual", "@smartui/sdk"),
        ("screener-storybook", "@smartui/storybook"),
        ("screener-runner", "@smartui/cli"),
    ];

    let mut rewrites = Vec::new();
    for (from, to) in module_map {
        rewrites.push(RewriteRule::new(&regex::escape(from), to)?);
    }

    rewrites.push(RewriteRule::snapshot(
        r"\bsauceVisualCheck\s*\(",
        "smartuiSnapshot(",
    )?);
    rewrites.push(RewriteRule::new(
        r"\bsauceVisualCheck\b",
        "smartuiSnapshot",
    )?);

    let warns = vec![
        WarnRule::new(
            r"\bdiffingMethod\b",
            "diffingMethod has no equivalent; SmartUI comparison settings live in .smartui.json",
        )?,
        WarnRule::new(
            r"sauce:visual",
            "sauce:visual capability options were left in place; move them to .smartui.json",
        )?,
    ];

    Ok(RuleSet::new(rewrites, warns))
}
