//! Remote-collaborator traits for testability.
//!
//! The [`CommandChannel`] and [`LoginChannel`] traits abstract the two
//! channels the harness drives on the target host: a shell command-execution
//! channel and an interactive password login. Production code uses the ssh2
//! implementations in `fastarmor-remote`, while tests substitute scripted
//! mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ ScenarioRunner  │
//! └───────┬─────────┘
//!         │
//!         ▼
//!  ┌───────────────┐   ┌──────────────┐
//!  │CommandChannel │   │ LoginChannel │ (traits)
//!  └───────────────┘   └──────────────┘
//!       │      │            │      │
//!       ▼      ▼            ▼      ▼
//!  ┌────────┐ ┌────┐   ┌────────┐ ┌────┐
//!  │SshChannel│ │Mock│  │SshLogin│ │Mock│
//!  └────────┘ └────┘   └────────┘ └────┘
//! ```

use std::future::Future;

use crate::error::FastarmorError;
use crate::types::{CommandOutput, HostInfo, Principal};

/// Trait abstracting the remote shell command-execution channel.
///
/// Execution is strictly sequential and blocking from the caller's point of
/// view: the returned future resolves only after the remote command has
/// exited and its output has been captured. No retries are performed.
///
/// # Error Handling
///
/// A *non-zero exit code is not an error* at this layer; it is reported in
/// [`CommandOutput::returncode`] and classified by the caller (setup vs
/// assertion failure). Only transport-level faults (connection loss, channel
/// failure) surface as `Err`.
pub trait CommandChannel: Send + Sync + 'static {
    /// Runs a shell command on the target host and captures its output.
    fn run_command(
        &self,
        command: &str,
    ) -> impl Future<Output = Result<CommandOutput, FastarmorError>> + Send;
}

/// Trait abstracting the interactive remote-login channel.
///
/// One call opens an authenticated session as the given principal and
/// releases it immediately. The login's success is deliberately not
/// asserted beyond the absence of a transport fault: the scenario only
/// needs the authentication attempt to have happened so that SSSD produces
/// the FAST armor ccache as a side effect.
pub trait LoginChannel: Send + Sync + 'static {
    /// Performs one interactive password login and releases the connection.
    ///
    /// # Errors
    ///
    /// Returns `FastarmorError::Transport` if the connection or the
    /// authentication exchange raises a transport-level fault.
    fn login(
        &self,
        host: &HostInfo,
        principal: &Principal,
    ) -> impl Future<Output = Result<(), FastarmorError>> + Send;
}
