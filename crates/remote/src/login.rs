//! ssh2-backed interactive login channel.
//!
//! One [`SshLogin::login`] call performs the full connect / authenticate /
//! disconnect cycle as the test principal. The login itself is the point:
//! the authentication attempt makes SSSD build the FAST armor ccache on the
//! target host, after which the connection is released immediately.

use fastarmor_core::error::{FastarmorError, TransportError};
use fastarmor_core::host::LoginChannel;
use fastarmor_core::types::{HostInfo, Principal};

use crate::ssh::open_authenticated_session;

/// Production interactive-login channel.
///
/// Stateless: every login opens a fresh TCP connection, so a previous
/// scenario's session state can never leak into the next attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshLogin;

impl SshLogin {
    pub fn new() -> Self {
        Self
    }
}

impl LoginChannel for SshLogin {
    async fn login(&self, host: &HostInfo, principal: &Principal) -> Result<(), FastarmorError> {
        let addr = host.socket_addr();
        let username = principal.username.clone();
        let password = principal.password.clone();

        tokio::task::spawn_blocking(move || login_once(&addr, &username, &password))
            .await
            .map_err(|e| TransportError::Exec(format!("login task failed: {e}")))??;

        tracing::info!(host = %host, principal = %principal, "interactive login released");
        Ok(())
    }
}

/// Connects, authenticates with a password and disconnects.
fn login_once(addr: &str, username: &str, password: &str) -> Result<(), TransportError> {
    let session = open_authenticated_session(addr, username, password)?;

    // Release immediately; the ccache side effect has already happened.
    session
        .disconnect(None, "fastarmor login complete", None)
        .map_err(|e| TransportError::ChannelClosed(format!("disconnect failed: {e}")))?;

    Ok(())
}
