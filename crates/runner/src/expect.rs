//! Expected-marker expansion and matching.
//!
//! Marker templates carry `{section}` and `{hostname}` placeholders so the
//! scenario table stays independent of the host under test. The section name
//! comes from the live `sssd.conf` and is uppercased, matching the realm
//! casing in the ccache principal. For regex markers both substitutions are
//! escaped, so a hostname like `client-1.example.test` cannot change the
//! pattern's meaning.

use regex::Regex;

use fastarmor_core::error::AssertionError;

use crate::scenario::Expect;

/// Per-run values substituted into marker templates.
#[derive(Debug, Clone, Copy)]
pub struct MarkerContext<'a> {
    /// Domain section name as resolved from the live conf (lowercase).
    pub section: &'a str,
    /// Short system hostname of the target.
    pub hostname: &'a str,
}

impl Expect {
    /// Expands the template with the run's section and hostname.
    pub fn expanded(&self, ctx: &MarkerContext<'_>) -> String {
        match self {
            Expect::Contains(template) => template
                .replace("{section}", &ctx.section.to_uppercase())
                .replace("{hostname}", ctx.hostname),
            Expect::Matches(template) => template
                .replace("{section}", &regex::escape(&ctx.section.to_uppercase()))
                .replace("{hostname}", &regex::escape(ctx.hostname)),
        }
    }

    /// Checks whether the marker is present in the artifact output.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidPattern` when an expanded regex marker
    /// fails to compile.
    pub fn is_satisfied_by(
        &self,
        ctx: &MarkerContext<'_>,
        output: &str,
    ) -> Result<bool, AssertionError> {
        let expanded = self.expanded(ctx);
        match self {
            Expect::Contains(_) => Ok(output.contains(&expanded)),
            Expect::Matches(_) => {
                let pattern =
                    Regex::new(&expanded).map_err(|e| AssertionError::InvalidPattern {
                        pattern: expanded.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(pattern.is_match(output))
            }
        }
    }
}
