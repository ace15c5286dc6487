//! Built-in scenario table.
//!
//! Scenarios are data, not code: each entry names the value written for the
//! single SSSD option under test and the marker expected in the resulting
//! FAST armor ccache. The engine in [`crate::runner`] is identical for every
//! entry, so adding a scenario means adding a table row.

use fastarmor_core::error::{ConfigError, FastarmorError};

/// The single sssd.conf option this harness exercises.
pub const OPTION_KEY: &str = "krb5_fast_use_anonymous_pkinit";

/// Expected marker in the klist output of the FAST armor ccache.
///
/// Templates may carry `{section}` (uppercased domain section) and
/// `{hostname}` placeholders, expanded per run in [`crate::expect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Literal substring must appear in the output.
    Contains(&'static str),
    /// Regex pattern must match somewhere in the output.
    Matches(&'static str),
}

/// One scenario: an option value and the marker it must produce.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSpec {
    /// Stable identifier used for selection and reporting.
    pub name: &'static str,
    /// Human-readable one-liner for `fastarmor list`.
    pub title: &'static str,
    /// Value written for [`OPTION_KEY`]. Kept as the literal config string,
    /// not a boolean: it is what actually lands in sssd.conf.
    pub option_value: &'static str,
    /// Marker expected in the armor ccache afterwards.
    pub expect: Expect,
}

/// Returns the built-in scenario table.
///
/// The two markers are mutually exclusive: an armor ccache holds either the
/// anonymous well-known principal or the host principal, never both.
pub fn builtin_scenarios() -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec {
            name: "anonymous-pkinit-enabled",
            title: "FAST armor ccache uses the anonymous PKINIT principal",
            option_value: "True",
            expect: Expect::Contains("WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS"),
        },
        ScenarioSpec {
            name: "anonymous-pkinit-disabled",
            title: "FAST armor ccache falls back to the host principal",
            option_value: "False",
            expect: Expect::Matches("principal:.host.{hostname}@{section}"),
        },
    ]
}

/// Resolves requested scenario names against the built-in table.
///
/// An empty request selects the whole table, in table order. An unknown name
/// is a configuration error, reported before anything touches the host.
pub fn select_scenarios(names: &[String]) -> Result<Vec<ScenarioSpec>, FastarmorError> {
    let table = builtin_scenarios();
    if names.is_empty() {
        return Ok(table);
    }

    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let spec = table
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "run.scenarios".to_owned(),
                reason: format!("unknown scenario '{name}'"),
            })?;
        selected.push(*spec);
    }
    Ok(selected)
}
