//! SSSD configuration helper driven over a remote command channel.
//!
//! [`SssdTools`] is the harness-side counterpart of the configuration daemon
//! on the target host. It resolves the active domain section from the live
//! `sssd.conf` (never hard-coded), writes option mutations back, and clears
//! the SSSD caches so that a configuration change actually takes effect.
//!
//! All operations are expressed as shell commands issued through the
//! [`CommandChannel`] seam, so they can be exercised against scripted mocks.

use std::collections::BTreeMap;
use std::time::Duration;

use fastarmor_core::config::SssdConfig;
use fastarmor_core::error::{FastarmorError, SetupError};
use fastarmor_core::host::CommandChannel;
use fastarmor_core::types::CommandOutput;

use crate::conf::SssdConf;

/// Heredoc delimiter for the conf write-back. Unquoted expansion is disabled
/// by single-quoting the delimiter, so conf content is written verbatim.
const HEREDOC_TAG: &str = "FASTARMOR_CONF_EOF";

/// Poll interval while waiting for the service to come back after a cache clear.
const SERVICE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// SSSD configuration helper bound to one remote host.
pub struct SssdTools<'a, C: CommandChannel> {
    channel: &'a C,
    sssd: &'a SssdConfig,
}

impl<'a, C: CommandChannel> SssdTools<'a, C> {
    /// Binds the helper to a command channel and the `[sssd]` harness config.
    pub fn new(channel: &'a C, sssd: &'a SssdConfig) -> Self {
        Self { channel, sssd }
    }

    /// Reads and parses the remote `sssd.conf`.
    ///
    /// # Errors
    ///
    /// - `SetupError::CommandFailed` if the file cannot be read
    /// - `SetupError::ConfParseFailed` if the content is not valid sssd.conf
    pub async fn fetch_conf(&self) -> Result<SssdConf, FastarmorError> {
        let command = format!("cat {}", self.sssd.conf_path);
        let output = self.channel.run_command(&command).await?;
        require_success("read sssd.conf", &command, &output)?;

        SssdConf::parse(&output.stdout).map_err(|e| {
            SetupError::ConfParseFailed {
                conf_path: self.sssd.conf_path.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Resolves the active domain section name from the live host state.
    ///
    /// The section name is queried, never assumed: the first entry of the
    /// `[sssd] domains =` list wins, falling back to the first
    /// `[domain/...]` section.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::SectionNotFound` when no domain is configured.
    pub async fn get_domain_section_name(&self) -> Result<String, FastarmorError> {
        let conf = self.fetch_conf().await?;
        let section = conf.first_domain().ok_or_else(|| SetupError::SectionNotFound {
            conf_path: self.sssd.conf_path.clone(),
        })?;
        tracing::debug!(section = %section, "resolved domain section");
        Ok(section)
    }

    /// Writes option values into the given section of the remote `sssd.conf`.
    ///
    /// Read-modify-write: the current conf is fetched, mutated in memory and
    /// written back whole through a quoted heredoc, which keeps the operation
    /// independent of remote editor tooling.
    pub async fn sssd_conf(
        &self,
        section: &str,
        options: &BTreeMap<String, String>,
    ) -> Result<(), FastarmorError> {
        let mut conf = self.fetch_conf().await?;
        for (key, value) in options {
            conf.set_option(section, key, value);
        }

        let command = format!(
            "cat > {path} <<'{tag}'\n{content}{tag}\n",
            path = self.sssd.conf_path,
            tag = HEREDOC_TAG,
            content = conf,
        );
        let output = self.channel.run_command(&command).await?;
        require_success("write sssd.conf", "cat > sssd.conf", &output)?;

        tracing::info!(section = %section, options = options.len(), "sssd.conf updated");
        Ok(())
    }

    /// Invalidates all cached authentication state on the host.
    ///
    /// Stops the service, removes the cache directories' contents, starts the
    /// service again and waits until systemd reports it active. Without the
    /// wait, a scenario could race the daemon's startup and authenticate
    /// against a half-initialized cache.
    pub async fn clear_sssd_cache(&self) -> Result<(), FastarmorError> {
        let service = &self.sssd.service;

        let stop = format!("systemctl stop {service}");
        let output = self.channel.run_command(&stop).await?;
        require_success("stop sssd", &stop, &output)?;

        for dir in &self.sssd.cache_dirs {
            let rm = format!("rm -f {dir}/*");
            let output = self.channel.run_command(&rm).await?;
            require_success("clear sssd cache", &rm, &output)?;
        }

        let start = format!("systemctl start {service}");
        let output = self.channel.run_command(&start).await?;
        require_success("start sssd", &start, &output)?;

        self.wait_until_active().await?;
        tracing::info!(service = %service, "sssd cache cleared and service restarted");
        Ok(())
    }

    /// Returns the FAST armor ccache path for a domain section.
    ///
    /// Path convention: `<db_dir>/fast_ccache_<SECTION_UPPERCASE>`.
    pub fn fast_ccache_path(&self, section: &str) -> String {
        format!(
            "{}/fast_ccache_{}",
            self.sssd.db_dir,
            section.to_uppercase()
        )
    }

    /// Polls `systemctl is-active` until the service reports active.
    async fn wait_until_active(&self) -> Result<(), FastarmorError> {
        let service = &self.sssd.service;
        let probe = format!("systemctl is-active {service}");
        let timeout_secs = self.sssd.service_start_timeout_secs;

        for _ in 0..timeout_secs {
            let output = self.channel.run_command(&probe).await?;
            if output.success() && output.stdout.trim() == "active" {
                return Ok(());
            }
            tokio::time::sleep(SERVICE_POLL_INTERVAL).await;
        }

        Err(SetupError::ServiceNotActive {
            service: service.clone(),
            timeout_secs,
        }
        .into())
    }
}

/// Maps a non-zero exit of a required command to a setup failure.
fn require_success(
    step: &str,
    command: &str,
    output: &CommandOutput,
) -> Result<(), FastarmorError> {
    if output.success() {
        return Ok(());
    }
    tracing::warn!(
        step = step,
        command = command,
        returncode = output.returncode,
        "required remote command failed"
    );
    Err(SetupError::CommandFailed {
        step: step.to_owned(),
        returncode: output.returncode,
        stderr: output.stderr.clone(),
    }
    .into())
}
