//! `fastarmor list` command handler

use std::io::Write;

use serde::Serialize;

use fastarmor_runner::{Expect, builtin_scenarios};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `list` command.
pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    let scenarios = builtin_scenarios()
        .into_iter()
        .map(|spec| {
            let (match_kind, marker) = match spec.expect {
                Expect::Contains(template) => ("contains", template),
                Expect::Matches(template) => ("regex", template),
            };
            ScenarioEntry {
                name: spec.name.to_owned(),
                title: spec.title.to_owned(),
                option_value: spec.option_value.to_owned(),
                match_kind: match_kind.to_owned(),
                marker: marker.to_owned(),
            }
        })
        .collect();

    writer.render(&ScenarioList { scenarios })
}

/// Scenario table listing.
#[derive(Serialize)]
pub struct ScenarioList {
    pub scenarios: Vec<ScenarioEntry>,
}

/// One row of the scenario table.
#[derive(Serialize)]
pub struct ScenarioEntry {
    pub name: String,
    pub title: String,
    /// Value written for krb5_fast_use_anonymous_pkinit.
    pub option_value: String,
    /// Marker match kind (contains, regex).
    pub match_kind: String,
    /// Marker template ({section} and {hostname} expand per run).
    pub marker: String,
}

impl Render for ScenarioList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Built-in scenarios:")?;
        writeln!(w)?;
        for entry in &self.scenarios {
            writeln!(w, "  {}", entry.name.bold())?;
            writeln!(w, "    {}", entry.title)?;
            writeln!(
                w,
                "    option: krb5_fast_use_anonymous_pkinit = {}",
                entry.option_value
            )?;
            writeln!(w, "    expects ({}): {}", entry.match_kind, entry.marker)?;
        }
        Ok(())
    }
}
