//! ssh2-backed command-execution channel.
//!
//! [`SshChannel`] holds one authenticated `ssh2::Session` for the whole run
//! and opens a fresh exec channel per command. libssh2 is a blocking C
//! library, so every session operation runs inside
//! `tokio::task::spawn_blocking`; the session is shared behind a standard
//! mutex that is only ever locked from blocking context.

use std::io::Read;
use std::net::TcpStream;
use std::sync::{Arc, Mutex};

use ssh2::Session;

use fastarmor_core::error::{FastarmorError, TransportError};
use fastarmor_core::host::CommandChannel;
use fastarmor_core::types::{CommandOutput, HostInfo};

/// Production command channel over a persistent SSH session.
///
/// # Connection Management
///
/// - One TCP connection + handshake per channel lifetime
/// - One exec channel per command (libssh2 channels are single-shot)
/// - Commands are serialized by the session mutex; the harness issues them
///   sequentially anyway
pub struct SshChannel {
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for SshChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshChannel").finish_non_exhaustive()
    }
}

impl SshChannel {
    /// Connects and authenticates with a password.
    ///
    /// # Errors
    ///
    /// - `TransportError::Connect`: TCP connect or SSH handshake failed
    /// - `TransportError::Auth`: password authentication rejected
    pub async fn connect(
        host: &HostInfo,
        username: &str,
        password: &str,
    ) -> Result<Self, FastarmorError> {
        let addr = host.socket_addr();
        let username = username.to_owned();
        let password = password.to_owned();

        let session = tokio::task::spawn_blocking(move || {
            open_authenticated_session(&addr, &username, &password)
        })
        .await
        .map_err(|e| TransportError::Exec(format!("connect task failed: {e}")))??;

        tracing::info!(host = %host, "ssh command channel established");
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

impl CommandChannel for SshChannel {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, FastarmorError> {
        let session = Arc::clone(&self.session);
        let command = command.to_owned();

        let output = tokio::task::spawn_blocking(move || {
            let session = session
                .lock()
                .map_err(|_| TransportError::ChannelClosed("session mutex poisoned".to_owned()))?;
            exec_once(&session, &command)
        })
        .await
        .map_err(|e| TransportError::Exec(format!("exec task failed: {e}")))??;

        tracing::debug!(
            returncode = output.returncode,
            stdout_bytes = output.stdout.len(),
            "remote command completed"
        );
        Ok(output)
    }
}

/// Opens a TCP connection, performs the SSH handshake and authenticates.
pub(crate) fn open_authenticated_session(
    addr: &str,
    username: &str,
    password: &str,
) -> Result<Session, TransportError> {
    let tcp = TcpStream::connect(addr).map_err(|e| TransportError::Connect {
        address: addr.to_owned(),
        reason: e.to_string(),
    })?;

    let mut session = Session::new().map_err(|e| TransportError::Connect {
        address: addr.to_owned(),
        reason: format!("session init failed: {e}"),
    })?;
    session.set_tcp_stream(tcp);
    session.handshake().map_err(|e| TransportError::Connect {
        address: addr.to_owned(),
        reason: format!("handshake failed: {e}"),
    })?;

    session
        .userauth_password(username, password)
        .map_err(|e| TransportError::Auth {
            username: username.to_owned(),
            reason: e.to_string(),
        })?;

    Ok(session)
}

/// Runs one command on a fresh exec channel and captures its output.
fn exec_once(session: &Session, command: &str) -> Result<CommandOutput, TransportError> {
    let mut channel = session
        .channel_session()
        .map_err(|e| TransportError::Exec(format!("channel open failed: {e}")))?;

    channel
        .exec(command)
        .map_err(|e| TransportError::Exec(format!("exec failed: {e}")))?;

    let mut stdout = String::new();
    channel
        .read_to_string(&mut stdout)
        .map_err(|e| TransportError::Exec(format!("stdout read failed: {e}")))?;

    let mut stderr = String::new();
    channel
        .stderr()
        .read_to_string(&mut stderr)
        .map_err(|e| TransportError::Exec(format!("stderr read failed: {e}")))?;

    channel
        .wait_close()
        .map_err(|e| TransportError::Exec(format!("channel close failed: {e}")))?;

    let returncode = channel
        .exit_status()
        .map_err(|e| TransportError::Exec(format!("exit status unavailable: {e}")))?;

    Ok(CommandOutput {
        returncode,
        stdout,
        stderr,
    })
}
