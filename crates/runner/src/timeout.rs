//! Per-command timeout decorator.
//!
//! The remote commands the engine issues are expected to finish quickly;
//! a hang (unreachable KDC, stuck systemd job) would otherwise stall the
//! whole run. [`TimedChannel`] wraps any [`CommandChannel`] and converts an
//! elapsed timeout into a transport fault.

use std::time::Duration;

use fastarmor_core::error::{FastarmorError, TransportError};
use fastarmor_core::host::CommandChannel;
use fastarmor_core::types::CommandOutput;

/// Command channel enforcing a per-command deadline.
pub struct TimedChannel<C: CommandChannel> {
    inner: C,
    timeout: Duration,
}

impl<C: CommandChannel> TimedChannel<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<C: CommandChannel> CommandChannel for TimedChannel<C> {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, FastarmorError> {
        tokio::time::timeout(self.timeout, self.inner.run_command(command))
            .await
            .map_err(|_| {
                TransportError::Exec(format!(
                    "command did not complete within {}s: {command}",
                    self.timeout.as_secs()
                ))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InstantChannel;

    impl CommandChannel for InstantChannel {
        async fn run_command(&self, _command: &str) -> Result<CommandOutput, FastarmorError> {
            Ok(CommandOutput {
                returncode: 0,
                stdout: "ok".to_owned(),
                stderr: String::new(),
            })
        }
    }

    struct StalledChannel;

    impl CommandChannel for StalledChannel {
        async fn run_command(&self, _command: &str) -> Result<CommandOutput, FastarmorError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("sleep outlives every test timeout")
        }
    }

    #[tokio::test]
    async fn fast_command_passes_through() {
        let channel = TimedChannel::new(InstantChannel, Duration::from_secs(300));
        let output = channel.run_command("true").await.unwrap();
        assert_eq!(output.stdout, "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_command_is_transport_fault() {
        let channel = TimedChannel::new(StalledChannel, Duration::from_secs(300));
        let err = channel.run_command("kinit -n").await.unwrap_err();
        assert!(matches!(
            err,
            FastarmorError::Transport(TransportError::Exec(_))
        ));
        assert!(err.to_string().contains("kinit -n"));
    }
}
