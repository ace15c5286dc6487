//! Scenario fixtures: configuration backup/restore and principal checks.
//!
//! The scenario invariant is that the remote `sssd.conf` is left exactly as
//! found, so scenarios stay independent and order-insensitive. [`ConfBackup`]
//! makes the backup/restore pair explicit; the runner restores it on every
//! exit path, pass or fail.

use fastarmor_core::error::{FastarmorError, SetupError};
use fastarmor_core::host::CommandChannel;
use fastarmor_core::types::Principal;

/// Suffix appended to the conf path for the remote backup copy.
const BACKUP_SUFFIX: &str = ".fastarmor.bak";

/// Remote backup of `sssd.conf`, restored explicitly after the scenario.
///
/// Restore is an explicit async operation rather than a `Drop` impl: the
/// copy lives on the remote host, and restoring it requires issuing commands
/// that can fail and must be awaited.
pub struct ConfBackup<'a, C: CommandChannel> {
    channel: &'a C,
    conf_path: String,
    backup_path: String,
}

impl<C: CommandChannel> std::fmt::Debug for ConfBackup<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfBackup")
            .field("conf_path", &self.conf_path)
            .field("backup_path", &self.backup_path)
            .finish_non_exhaustive()
    }
}

impl<'a, C: CommandChannel> ConfBackup<'a, C> {
    /// Copies the remote conf aside before the scenario mutates it.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::CommandFailed` if the copy fails; the scenario
    /// must not proceed without a restorable backup.
    pub async fn create(channel: &'a C, conf_path: &str) -> Result<Self, FastarmorError> {
        let backup_path = format!("{conf_path}{BACKUP_SUFFIX}");
        let command = format!("cp -f {conf_path} {backup_path}");
        let output = channel.run_command(&command).await?;
        if !output.success() {
            return Err(SetupError::CommandFailed {
                step: "backup sssd.conf".to_owned(),
                returncode: output.returncode,
                stderr: output.stderr,
            }
            .into());
        }
        tracing::debug!(conf = %conf_path, backup = %backup_path, "sssd.conf backed up");
        Ok(Self {
            channel,
            conf_path: conf_path.to_owned(),
            backup_path,
        })
    }

    /// Restores the original conf and removes the backup copy.
    pub async fn restore(self) -> Result<(), FastarmorError> {
        let command = format!(
            "cp -f {backup} {conf} && rm -f {backup}",
            backup = self.backup_path,
            conf = self.conf_path,
        );
        let output = self.channel.run_command(&command).await?;
        if !output.success() {
            return Err(SetupError::CommandFailed {
                step: "restore sssd.conf".to_owned(),
                returncode: output.returncode,
                stderr: output.stderr,
            }
            .into());
        }
        tracing::debug!(conf = %self.conf_path, "sssd.conf restored");
        Ok(())
    }
}

/// Verifies that the pre-provisioned test principal exists on the host.
///
/// Account creation is the orchestration layer's responsibility; the harness
/// only checks the precondition and fails with a setup error otherwise.
pub async fn ensure_principal<C: CommandChannel>(
    channel: &C,
    principal: &Principal,
) -> Result<(), FastarmorError> {
    let command = format!("id -u {}", principal.username);
    let output = channel.run_command(&command).await?;
    if !output.success() {
        return Err(SetupError::MissingPrincipal {
            username: principal.username.clone(),
        }
        .into());
    }
    Ok(())
}
