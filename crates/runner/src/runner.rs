//! Scenario engine.
//!
//! [`ScenarioRunner`] executes one scenario as a fixed step sequence against
//! a live host. There is no retry and no concurrency: the steps mutate the
//! host's one `sssd.conf` and must observe the cache state their own mutation
//! produced.
//!
//! ```text
//! ensure principal ─ backup conf
//!        │
//!   resolve section ─ write option ─ clear caches
//!        │
//!     kinit -n  (must exit 0, else setup failure)
//!        │
//!   interactive login (release immediately)
//!        │
//!   klist armor ccache ─ marker check
//!        │
//!   restore conf  (on every exit path)
//! ```

use std::collections::BTreeMap;

use fastarmor_core::config::FastarmorConfig;
use fastarmor_core::error::{AssertionError, FastarmorError, SetupError};
use fastarmor_core::host::{CommandChannel, LoginChannel};
use fastarmor_core::types::Principal;
use fastarmor_sssd::fixture::{ConfBackup, ensure_principal};
use fastarmor_sssd::tools::SssdTools;

use crate::expect::MarkerContext;
use crate::scenario::{OPTION_KEY, ScenarioSpec};

/// Executes scenarios over a command channel and a login channel.
pub struct ScenarioRunner<'a, C: CommandChannel, L: LoginChannel> {
    channel: &'a C,
    login: &'a L,
    config: &'a FastarmorConfig,
}

impl<'a, C: CommandChannel, L: LoginChannel> ScenarioRunner<'a, C, L> {
    pub fn new(channel: &'a C, login: &'a L, config: &'a FastarmorConfig) -> Self {
        Self {
            channel,
            login,
            config,
        }
    }

    /// Runs one scenario end to end.
    ///
    /// The remote `sssd.conf` is backed up before the first mutation and
    /// restored on every exit path; a scenario leaves the file as found.
    /// When both the scenario and the restore fail, the scenario error wins:
    /// it is the primary fault.
    pub async fn execute(&self, spec: &ScenarioSpec) -> Result<(), FastarmorError> {
        tracing::info!(scenario = spec.name, option_value = spec.option_value, "scenario start");

        let principal = self.config.test_principal();
        ensure_principal(self.channel, &principal).await?;

        let backup = ConfBackup::create(self.channel, &self.config.sssd.conf_path).await?;
        let result = self.run_steps(spec, &principal).await;
        let restore = backup.restore().await;

        match (result, restore) {
            (Err(e), _) => Err(e),
            (Ok(()), restore) => restore,
        }
    }

    async fn run_steps(
        &self,
        spec: &ScenarioSpec,
        principal: &Principal,
    ) -> Result<(), FastarmorError> {
        let tools = SssdTools::new(self.channel, &self.config.sssd);

        let section = tools.get_domain_section_name().await?;

        let mut options = BTreeMap::new();
        options.insert(OPTION_KEY.to_owned(), spec.option_value.to_owned());
        tools.sssd_conf(&format!("domain/{section}"), &options).await?;

        tools.clear_sssd_cache().await?;

        // Anonymous pre-authentication must succeed regardless of the option
        // value; a failure here is an environment problem, not a verdict.
        let kinit = self.channel.run_command("kinit -n").await?;
        if !kinit.success() {
            return Err(SetupError::CommandFailed {
                step: "kinit -n".to_owned(),
                returncode: kinit.returncode,
                stderr: kinit.stderr,
            }
            .into());
        }

        // The login is what triggers SSSD to build the armor ccache. The
        // session is released right away; only transport faults matter here.
        self.login.login(&self.config.host_info(), principal).await?;

        let ccache = tools.fast_ccache_path(&section);
        let klist = self.channel.run_command(&format!("klist {ccache}")).await?;
        if !klist.success() {
            return Err(AssertionError::ArtifactMissing {
                path: ccache,
                stderr: klist.stderr,
            }
            .into());
        }

        let ctx = MarkerContext {
            section: &section,
            hostname: &self.config.target.hostname,
        };
        if !spec.expect.is_satisfied_by(&ctx, &klist.stdout)? {
            return Err(AssertionError::MarkerMismatch {
                scenario: spec.name.to_owned(),
                expected: spec.expect.expanded(&ctx),
                output: klist.stdout,
            }
            .into());
        }

        tracing::info!(scenario = spec.name, ccache = %ccache, "expected marker found");
        Ok(())
    }
}
