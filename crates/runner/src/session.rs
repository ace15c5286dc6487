//! Run session: channel ownership and serialized scenario execution.
//!
//! One [`Session`] corresponds to one target host. Scenarios share the
//! host's single `sssd.conf` and cache state, so the session serializes them
//! behind an async mutex; two scenarios never interleave their steps.

use std::time::Instant;

use tokio::sync::Mutex;

use fastarmor_core::config::FastarmorConfig;
use fastarmor_core::host::{CommandChannel, LoginChannel};

use crate::report::{RunReport, ScenarioReport};
use crate::runner::ScenarioRunner;
use crate::scenario::ScenarioSpec;

/// Owns the remote channels and harness config for one run.
pub struct Session<C: CommandChannel, L: LoginChannel> {
    channel: C,
    login: L,
    config: FastarmorConfig,
    // Guards host state, not Rust data: the remote conf and caches.
    guard: Mutex<()>,
}

impl<C: CommandChannel, L: LoginChannel> Session<C, L> {
    pub fn new(channel: C, login: L, config: FastarmorConfig) -> Self {
        Self {
            channel,
            login,
            config,
            guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &FastarmorConfig {
        &self.config
    }

    /// Runs one scenario and folds the outcome into a report.
    pub async fn run_scenario(&self, spec: &ScenarioSpec) -> ScenarioReport {
        let _exclusive = self.guard.lock().await;
        let started = Instant::now();

        let runner = ScenarioRunner::new(&self.channel, &self.login, &self.config);
        let duration_ms = |started: Instant| started.elapsed().as_millis() as u64;

        match runner.execute(spec).await {
            Ok(()) => ScenarioReport::passed(spec.name, duration_ms(started)),
            Err(err) => {
                tracing::warn!(scenario = spec.name, error = %err, "scenario failed");
                ScenarioReport::failed(spec.name, &err, duration_ms(started))
            }
        }
    }

    /// Runs the given scenarios sequentially and aggregates a run report.
    pub async fn run_all(&self, specs: &[ScenarioSpec]) -> RunReport {
        let mut run = RunReport::new();
        for spec in specs {
            run.push(self.run_scenario(spec).await);
        }
        tracing::info!(
            run_id = %run.run_id,
            passed = run.passed,
            failed = run.failed,
            "run complete"
        );
        run
    }
}
