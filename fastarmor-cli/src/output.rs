//! Rendering of CLI results in text or JSON form.
//!
//! Listing and config payloads implement [`Render`] for the text form and
//! `Serialize` for JSON, and go through [`OutputWriter::render`]. Run
//! results get their own entry point, [`OutputWriter::render_run`]: in text
//! mode it appends a one-line verdict after the per-scenario rows, so an
//! operator (or a CI log grep) sees the outcome and its failure class
//! without scanning the table. In JSON mode the report itself carries the
//! status fields, and no extra line is emitted to keep stdout valid JSON.

use std::io::Write;

use serde::Serialize;

use fastarmor_runner::{RunReport, ScenarioStatus};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Format-switching writer for CLI output.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        self.render_to(payload, &mut std::io::stdout().lock())
    }

    /// Render a run report to stdout, with a trailing verdict in text mode.
    pub fn render_run(&self, run: &RunReport) -> Result<(), CliError> {
        self.render_run_to(run, &mut std::io::stdout().lock())
    }

    fn render_to<T, W>(&self, payload: &T, w: &mut W) -> Result<(), CliError>
    where
        T: Render + Serialize,
        W: Write,
    {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }

    fn render_run_to<W: Write>(&self, run: &RunReport, w: &mut W) -> Result<(), CliError> {
        self.render_to(&RunView(run), w)?;
        if matches!(self.format, OutputFormat::Text) {
            writeln!(w, "{}", verdict_line(run))?;
        }
        Ok(())
    }
}

/// Renderable view over a run report.
#[derive(Serialize)]
#[serde(transparent)]
struct RunView<'a>(&'a RunReport);

impl Render for RunView<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let run = self.0;
        writeln!(w, "Run {} (started {})", run.run_id, run.started_at)?;
        writeln!(w)?;

        for report in &run.reports {
            let label = match report.status {
                ScenarioStatus::Passed => "PASS".green().bold(),
                ScenarioStatus::AssertionFailed => "FAIL".red().bold(),
                ScenarioStatus::SetupFailed | ScenarioStatus::TransportFailed => {
                    "ERROR".yellow().bold()
                }
            };
            writeln!(
                w,
                "  {} {} ({} ms)",
                label, report.scenario, report.duration_ms
            )?;
            if let Some(ref detail) = report.detail {
                writeln!(w, "        {detail}")?;
            }
        }

        writeln!(w)?;
        Ok(())
    }
}

/// One-line outcome summary for a whole run.
///
/// Distinguishes a verification verdict (PASS/FAIL) from infrastructure
/// faults where no verdict was reached.
fn verdict_line(run: &RunReport) -> String {
    use colored::Colorize;

    let total = run.reports.len();
    match run.worst_failure() {
        None | Some(ScenarioStatus::Passed) => format!(
            "{}: all {} scenario(s) verified",
            "PASS".green().bold(),
            total
        ),
        Some(ScenarioStatus::AssertionFailed) => format!(
            "{}: {} of {} scenario(s) failed verification",
            "FAIL".red().bold(),
            run.failed,
            total
        ),
        Some(ScenarioStatus::SetupFailed) => format!(
            "{}: setup failure on the target host, no verdict ({} of {} scenario(s) failed)",
            "ERROR".yellow().bold(),
            run.failed,
            total
        ),
        Some(ScenarioStatus::TransportFailed) => format!(
            "{}: transport fault, no verdict ({} of {} scenario(s) failed)",
            "ERROR".yellow().bold(),
            run.failed,
            total
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastarmor_core::error::{AssertionError, FastarmorError, TransportError};
    use fastarmor_runner::ScenarioReport;

    #[derive(Serialize)]
    struct TestPayload {
        field1: String,
        field2: u32,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Field1: {}", self.field1)?;
            writeln!(w, "Field2: {}", self.field2)?;
            Ok(())
        }
    }

    fn mixed_run() -> RunReport {
        let mut run = RunReport::new();
        run.push(ScenarioReport::passed("anonymous-pkinit-enabled", 1200));
        let err: FastarmorError = AssertionError::MarkerMismatch {
            scenario: "anonymous-pkinit-disabled".to_owned(),
            expected: "principal:.host.client1@IMPLICIT_FILES".to_owned(),
            output: "Default principal: WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS".to_owned(),
        }
        .into();
        run.push(ScenarioReport::failed("anonymous-pkinit-disabled", &err, 900));
        run
    }

    #[test]
    fn test_text_format_delegates_to_render() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let payload = TestPayload {
            field1: "test value".to_owned(),
            field2: 42,
        };

        let mut buffer = Vec::new();
        writer
            .render_to(&payload, &mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Field1: test value"));
        assert!(output.contains("Field2: 42"));
    }

    #[test]
    fn test_json_format_serializes_payload() {
        let writer = OutputWriter::new(OutputFormat::Json);
        let payload = TestPayload {
            field1: "test".to_owned(),
            field2: 100,
        };

        let mut buffer = Vec::new();
        writer
            .render_to(&payload, &mut buffer)
            .expect("json rendering should succeed");

        let parsed: serde_json::Value =
            serde_json::from_slice(&buffer).expect("stdout should be valid JSON");
        assert_eq!(parsed["field1"].as_str(), Some("test"));
        assert_eq!(parsed["field2"].as_u64(), Some(100));
    }

    #[test]
    fn test_run_text_lists_scenarios_and_fail_verdict() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let run = mixed_run();

        let mut buffer = Vec::new();
        writer
            .render_run_to(&run, &mut buffer)
            .expect("run rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("anonymous-pkinit-enabled"));
        assert!(output.contains("anonymous-pkinit-disabled"));
        assert!(output.contains("FAIL"));
        assert!(
            output.contains("1 of 2 scenario(s) failed verification"),
            "verdict line should name the failure class: {output}"
        );
    }

    #[test]
    fn test_run_text_pass_verdict() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let mut run = RunReport::new();
        run.push(ScenarioReport::passed("anonymous-pkinit-enabled", 1200));

        let mut buffer = Vec::new();
        writer
            .render_run_to(&run, &mut buffer)
            .expect("run rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("all 1 scenario(s) verified"));
    }

    #[test]
    fn test_run_text_transport_fault_has_no_verdict() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let mut run = RunReport::new();
        let err: FastarmorError = TransportError::ChannelClosed("session lost".to_owned()).into();
        run.push(ScenarioReport::failed("anonymous-pkinit-enabled", &err, 50));

        let mut buffer = Vec::new();
        writer
            .render_run_to(&run, &mut buffer)
            .expect("run rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("transport fault"));
        assert!(output.contains("no verdict"));
    }

    #[test]
    fn test_run_json_stays_valid_json() {
        let writer = OutputWriter::new(OutputFormat::Json);
        let run = mixed_run();

        let mut buffer = Vec::new();
        writer
            .render_run_to(&run, &mut buffer)
            .expect("run rendering should succeed");

        // The verdict line must not be appended after the JSON document.
        let parsed: serde_json::Value =
            serde_json::from_slice(&buffer).expect("stdout should be exactly one JSON document");
        assert_eq!(parsed["passed"], 1);
        assert_eq!(parsed["failed"], 1);
        assert_eq!(parsed["reports"].as_array().expect("array").len(), 2);
        assert_eq!(parsed["reports"][1]["status"], "assertion_failed");
    }
}
