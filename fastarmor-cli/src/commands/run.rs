//! `fastarmor run` command handler

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use fastarmor_core::config::FastarmorConfig;
use fastarmor_remote::{SshChannel, SshLogin};
use fastarmor_runner::{RunReport, ScenarioStatus, Session, TimedChannel, select_scenarios};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `run` command.
///
/// Loads the configuration, connects to the target host, runs the selected
/// scenarios sequentially and renders the run report. The exit code reflects
/// the worst failure class of the run.
pub async fn execute(
    args: RunArgs,
    config_path: &Path,
    log_level: Option<&str>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    // Environment-override problems are reported only after the subscriber
    // exists, otherwise the warnings would be dropped.
    let (mut config, env_issues) = FastarmorConfig::load_with_report(config_path).await?;
    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    crate::logging::init_tracing(&config.general).map_err(|e| CliError::Command(e.to_string()))?;
    for issue in &env_issues {
        warn!(
            env_key = %issue.env_key,
            value = %issue.value,
            expected = issue.expected,
            "ignoring malformed environment override"
        );
    }

    // CLI selection beats the config file's [run] scenarios list.
    let requested = if args.scenario.is_empty() {
        config.run.scenarios.clone()
    } else {
        args.scenario
    };
    let specs = select_scenarios(&requested)?;

    info!(
        host = %config.target.address,
        scenarios = specs.len(),
        "starting verification run"
    );

    let host = config.host_info();
    let channel =
        SshChannel::connect(&host, &config.target.ssh_user, &config.target.ssh_password).await?;
    let channel = TimedChannel::new(
        channel,
        Duration::from_secs(config.run.command_timeout_secs),
    );
    let session = Session::new(channel, SshLogin::new(), config);

    let run = session.run_all(&specs).await;
    writer.render_run(&run)?;

    run_outcome(&run)
}

/// Map the worst failure class of a run to the process outcome.
fn run_outcome(run: &RunReport) -> Result<(), CliError> {
    match run.worst_failure() {
        None | Some(ScenarioStatus::Passed) => Ok(()),
        Some(ScenarioStatus::SetupFailed) => Err(CliError::Setup(format!(
            "{} of {} scenarios hit a setup failure",
            run.failed,
            run.reports.len()
        ))),
        Some(ScenarioStatus::TransportFailed) => Err(CliError::Transport(format!(
            "{} of {} scenarios hit a transport fault",
            run.failed,
            run.reports.len()
        ))),
        Some(ScenarioStatus::AssertionFailed) => Err(CliError::Assertion(format!(
            "{} of {} scenarios failed verification",
            run.failed,
            run.reports.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastarmor_core::error::{AssertionError, FastarmorError, SetupError, TransportError};
    use fastarmor_runner::ScenarioReport;

    fn run_with_error(err: FastarmorError) -> RunReport {
        let mut run = RunReport::new();
        run.push(ScenarioReport::passed("anonymous-pkinit-enabled", 1200));
        run.push(ScenarioReport::failed("anonymous-pkinit-disabled", &err, 900));
        run
    }

    #[test]
    fn test_all_passed_run_exits_cleanly() {
        let mut run = RunReport::new();
        run.push(ScenarioReport::passed("anonymous-pkinit-enabled", 1200));
        assert!(run_outcome(&run).is_ok());
    }

    #[test]
    fn test_assertion_failure_maps_to_assertion_exit() {
        let err = AssertionError::ArtifactMissing {
            path: "/var/lib/sss/db/fast_ccache_IMPLICIT_FILES".to_owned(),
            stderr: String::new(),
        }
        .into();
        let cli_err = run_outcome(&run_with_error(err)).expect_err("should fail");
        assert_eq!(cli_err.exit_code(), 1);
    }

    #[test]
    fn test_setup_failure_maps_to_setup_exit() {
        let err = SetupError::MissingPrincipal {
            username: "foobar0".to_owned(),
        }
        .into();
        let cli_err = run_outcome(&run_with_error(err)).expect_err("should fail");
        assert_eq!(cli_err.exit_code(), 3);
    }

    #[test]
    fn test_transport_failure_beats_assertion_failure() {
        let mut run = run_with_error(
            AssertionError::MarkerMismatch {
                scenario: "anonymous-pkinit-disabled".to_owned(),
                expected: "principal:.host.client1@IMPLICIT_FILES".to_owned(),
                output: "Default principal: WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS".to_owned(),
            }
            .into(),
        );
        let transport: FastarmorError =
            TransportError::ChannelClosed("session lost".to_owned()).into();
        run.push(ScenarioReport::failed(
            "anonymous-pkinit-enabled",
            &transport,
            50,
        ));

        let cli_err = run_outcome(&run).expect_err("should fail");
        assert_eq!(cli_err.exit_code(), 4);
    }
}
