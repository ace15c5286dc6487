//! End-to-end scenario flow tests against scripted channels.
//!
//! No real host: a scripted command channel answers the exact shell commands
//! the engine issues, and a recording login channel stands in for the SSH
//! login. The tests pin the observable contract of the step sequence.

use std::collections::VecDeque;
use std::sync::Mutex;

use fastarmor_core::config::FastarmorConfig;
use fastarmor_core::error::{FastarmorError, TransportError};
use fastarmor_core::host::{CommandChannel, LoginChannel};
use fastarmor_core::types::{CommandOutput, HostInfo, Principal};
use fastarmor_runner::{ScenarioRunner, ScenarioSpec, ScenarioStatus, Session, builtin_scenarios};

const SAMPLE_CONF: &str = "[sssd]\ndomains = implicit_files\nservices = nss, pam\n\n[domain/implicit_files]\nid_provider = files\n";

const ANONYMOUS_KLIST: &str = "Ticket cache: FILE:/var/lib/sss/db/fast_ccache_IMPLICIT_FILES\nDefault principal: WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS\n";

const HOST_KLIST: &str = "Ticket cache: FILE:/var/lib/sss/db/fast_ccache_IMPLICIT_FILES\nDefault principal: host/client1@IMPLICIT_FILES\n";

/// Prefix-scripted command channel, recording every issued command.
struct ScriptedChannel {
    scripts: Vec<(String, CommandOutput)>,
    issued: Mutex<Vec<String>>,
}

impl ScriptedChannel {
    fn new() -> Self {
        Self {
            scripts: Vec::new(),
            issued: Mutex::new(Vec::new()),
        }
    }

    fn on(mut self, prefix: &str, returncode: i32, stdout: &str, stderr: &str) -> Self {
        self.scripts.push((
            prefix.to_owned(),
            CommandOutput {
                returncode,
                stdout: stdout.to_owned(),
                stderr: stderr.to_owned(),
            },
        ));
        self
    }

    fn issued_commands(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

impl CommandChannel for ScriptedChannel {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, FastarmorError> {
        self.issued.lock().unwrap().push(command.to_owned());
        for (prefix, output) in &self.scripts {
            if command.starts_with(prefix) {
                return Ok(output.clone());
            }
        }
        Err(TransportError::Exec(format!("unscripted command: {command}")).into())
    }
}

/// Login channel recording calls; optionally fails with queued faults.
struct RecordingLogin {
    calls: Mutex<u32>,
    faults: Mutex<VecDeque<TransportError>>,
}

impl RecordingLogin {
    fn ok() -> Self {
        Self {
            calls: Mutex::new(0),
            faults: Mutex::new(VecDeque::new()),
        }
    }

    fn failing(fault: TransportError) -> Self {
        let login = Self::ok();
        login.faults.lock().unwrap().push_back(fault);
        login
    }

    fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl LoginChannel for RecordingLogin {
    async fn login(&self, _host: &HostInfo, _principal: &Principal) -> Result<(), FastarmorError> {
        *self.calls.lock().unwrap() += 1;
        match self.faults.lock().unwrap().pop_front() {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }
}

fn test_config() -> FastarmorConfig {
    let mut config = FastarmorConfig::default();
    config.target.address = "192.0.2.10".to_owned();
    config.target.hostname = "client1".to_owned();
    config.target.ssh_password = "redhat".to_owned();
    config
}

/// Scripts the full happy path; the klist response is the caller's choice.
fn scripted(kinit_returncode: i32, klist: Option<(i32, &str, &str)>) -> ScriptedChannel {
    let mut channel = ScriptedChannel::new()
        .on("id -u foobar0", 0, "20001\n", "")
        .on("cp -f /etc/sssd/sssd.conf", 0, "", "")
        .on("cat /etc/sssd/sssd.conf", 0, SAMPLE_CONF, "")
        .on("cat > /etc/sssd/sssd.conf", 0, "", "")
        .on("systemctl stop sssd", 0, "", "")
        .on("rm -f", 0, "", "")
        .on("systemctl start sssd", 0, "", "")
        .on("systemctl is-active sssd", 0, "active\n", "")
        .on("kinit -n", kinit_returncode, "", "kinit stderr");
    if let Some((returncode, stdout, stderr)) = klist {
        channel = channel.on("klist", returncode, stdout, stderr);
    }
    channel
}

fn spec(name: &str) -> ScenarioSpec {
    builtin_scenarios()
        .into_iter()
        .find(|s| s.name == name)
        .expect("scenario exists")
}

fn restore_issued(commands: &[String]) -> bool {
    commands.iter().any(|c| {
        c.starts_with("cp -f /etc/sssd/sssd.conf.fastarmor.bak /etc/sssd/sssd.conf")
    })
}

#[tokio::test]
async fn enabled_scenario_passes_on_anonymous_principal() {
    let channel = scripted(0, Some((0, ANONYMOUS_KLIST, "")));
    let login = RecordingLogin::ok();
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    runner
        .execute(&spec("anonymous-pkinit-enabled"))
        .await
        .expect("scenario passes");

    assert_eq!(login.call_count(), 1);
    let commands = channel.issued_commands();
    assert!(restore_issued(&commands), "conf restored after pass");

    let write = commands
        .iter()
        .find(|c| c.starts_with("cat > /etc/sssd/sssd.conf"))
        .expect("option written");
    assert!(write.contains("krb5_fast_use_anonymous_pkinit = True"));

    assert!(
        commands
            .iter()
            .any(|c| c == "klist /var/lib/sss/db/fast_ccache_IMPLICIT_FILES"),
        "klist inspects the uppercased section ccache"
    );
}

#[tokio::test]
async fn enabled_scenario_fails_when_host_principal_is_cached() {
    let channel = scripted(0, Some((0, HOST_KLIST, "")));
    let login = RecordingLogin::ok();
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    let err = runner
        .execute(&spec("anonymous-pkinit-enabled"))
        .await
        .expect_err("marker mismatch");
    assert!(matches!(err, FastarmorError::Assertion(_)));
    assert!(err.to_string().contains("WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS"));

    // Restored even on assertion failure.
    assert!(restore_issued(&channel.issued_commands()));
}

#[tokio::test]
async fn disabled_scenario_passes_on_host_principal() {
    let channel = scripted(0, Some((0, HOST_KLIST, "")));
    let login = RecordingLogin::ok();
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    runner
        .execute(&spec("anonymous-pkinit-disabled"))
        .await
        .expect("scenario passes");

    let write = channel
        .issued_commands()
        .into_iter()
        .find(|c| c.starts_with("cat > /etc/sssd/sssd.conf"))
        .expect("option written");
    assert!(write.contains("krb5_fast_use_anonymous_pkinit = False"));
}

#[tokio::test]
async fn disabled_scenario_fails_on_anonymous_principal() {
    let channel = scripted(0, Some((0, ANONYMOUS_KLIST, "")));
    let login = RecordingLogin::ok();
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    let err = runner
        .execute(&spec("anonymous-pkinit-disabled"))
        .await
        .expect_err("marker mismatch");
    assert!(matches!(err, FastarmorError::Assertion(_)));
}

#[tokio::test]
async fn failed_kinit_is_setup_failure_and_skips_everything_after() {
    // klist deliberately unscripted: issuing it would error differently.
    let channel = scripted(1, None);
    let login = RecordingLogin::ok();
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    let err = runner
        .execute(&spec("anonymous-pkinit-enabled"))
        .await
        .expect_err("kinit failed");
    assert!(matches!(err, FastarmorError::Setup(_)));

    assert_eq!(login.call_count(), 0, "login never attempted");
    let commands = channel.issued_commands();
    assert!(
        !commands.iter().any(|c| c.starts_with("klist")),
        "artifact never inspected"
    );
    assert!(restore_issued(&commands), "conf restored on setup failure");
}

#[tokio::test]
async fn missing_ccache_is_assertion_failure() {
    let channel = scripted(
        0,
        Some((1, "", "klist: No credentials cache found")),
    );
    let login = RecordingLogin::ok();
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    let err = runner
        .execute(&spec("anonymous-pkinit-enabled"))
        .await
        .expect_err("ccache missing");
    assert!(matches!(err, FastarmorError::Assertion(_)));
}

#[tokio::test]
async fn login_fault_is_transport_failure_and_restores_conf() {
    let channel = scripted(0, Some((0, ANONYMOUS_KLIST, "")));
    let login = RecordingLogin::failing(TransportError::Auth {
        username: "foobar0".to_owned(),
        reason: "permission denied".to_owned(),
    });
    let config = test_config();
    let runner = ScenarioRunner::new(&channel, &login, &config);

    let err = runner
        .execute(&spec("anonymous-pkinit-enabled"))
        .await
        .expect_err("login fault");
    assert!(matches!(err, FastarmorError::Transport(_)));
    assert!(restore_issued(&channel.issued_commands()));
}

#[tokio::test]
async fn run_all_aggregates_pass_and_fail() {
    // Enabled passes on the anonymous klist; disabled fails on the same output.
    let channel = scripted(0, Some((0, ANONYMOUS_KLIST, "")));
    let session = Session::new(channel, RecordingLogin::ok(), test_config());

    let run = session.run_all(&builtin_scenarios()).await;
    assert_eq!(run.passed, 1);
    assert_eq!(run.failed, 1);
    assert!(!run.all_passed());
    assert_eq!(run.worst_failure(), Some(ScenarioStatus::AssertionFailed));
    assert_eq!(run.reports[0].scenario, "anonymous-pkinit-enabled");
    assert_eq!(run.reports[0].status, ScenarioStatus::Passed);
    assert_eq!(run.reports[1].scenario, "anonymous-pkinit-disabled");
    assert_eq!(run.reports[1].status, ScenarioStatus::AssertionFailed);
}
