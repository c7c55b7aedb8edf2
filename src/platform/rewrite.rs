//! Repeated find-and-replace over player script text

use crate::error::SigripError;
use crate::utils::format::fill_template;
use regex::Regex;
use tracing::debug;

/// Maximum passes per pattern before assuming a rewrite is not converging
const MAX_REWRITE_PASSES: usize = 10_000;

/// One named rewrite rule: a pattern, the capture groups to extract, and a
/// `{}`-placeholder template the captures are substituted into.
///
/// Rules are applied to convergence one at a time, in a fixed order, so a
/// pattern that stops matching upstream script revisions can be identified
/// and fixed in isolation.
pub struct RewriteRule {
    name: &'static str,
    pattern: Regex,
    groups: &'static [usize],
    template: &'static str,
}

impl RewriteRule {
    /// Compile a new rewrite rule
    pub fn new(
        name: &'static str,
        pattern: &str,
        groups: &'static [usize],
        template: &'static str,
    ) -> Result<Self, SigripError> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            groups,
            template,
        })
    }

    /// Rule name for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply this rule to convergence over `text`
    pub fn apply(&self, text: &str) -> Result<String, SigripError> {
        let rewritten = rewrite_all(text, &self.pattern, self.groups, self.template)?;
        if rewritten != text {
            debug!("Rewrite rule '{}' folded at least one statement", self.name);
        }
        Ok(rewritten)
    }
}

/// Repeatedly replace the first match of `pattern` in `text` until none remain.
///
/// Each pass extracts the capture groups listed in `group_indices`, fills them
/// into `template`, splices the result over the matched span only, and
/// re-scans the rewritten text from the start. Later matches may depend on
/// earlier replacements, so the re-scan is required, not an optimization.
///
/// A rule whose replacement re-matches its own pattern would never converge;
/// the pass cap turns that into an error instead of a hang.
pub fn rewrite_all(
    text: &str,
    pattern: &Regex,
    group_indices: &[usize],
    template: &str,
) -> Result<String, SigripError> {
    let mut text = text.to_string();
    let mut passes = 0;

    while let Some(caps) = pattern.captures(&text) {
        passes += 1;
        if passes > MAX_REWRITE_PASSES {
            return Err(SigripError::Parse(format!(
                "rewrite of pattern {:?} did not converge after {} passes",
                pattern.as_str(),
                MAX_REWRITE_PASSES
            )));
        }

        // Group 0 always spans the full match
        let matched = caps.get(0).unwrap();

        let mut values = Vec::with_capacity(group_indices.len());
        for &index in group_indices {
            let value = caps.get(index).ok_or_else(|| {
                SigripError::Parse(format!(
                    "pattern {:?} matched without capture group {}",
                    pattern.as_str(),
                    index
                ))
            })?;
            values.push(value.as_str());
        }

        let replacement = fill_template(template, &values);

        let mut next = String::with_capacity(text.len());
        next.push_str(&text[..matched.start()]);
        next.push_str(&replacement);
        next.push_str(&text[matched.end()..]);
        text = next;
    }

    Ok(text)
}
