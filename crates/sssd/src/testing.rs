//! Scripted command-channel mock for unit tests.
//!
//! Commands are matched by prefix against registered scripts; every issued
//! command is recorded so tests can assert on ordering and content.

use std::sync::Mutex;

use fastarmor_core::error::{FastarmorError, TransportError};
use fastarmor_core::host::CommandChannel;
use fastarmor_core::types::CommandOutput;

/// One registered response: commands starting with `prefix` produce `output`.
struct Script {
    prefix: String,
    output: CommandOutput,
}

/// Prefix-matched scripted channel with a recorded command log.
#[derive(Default)]
pub struct ScriptedChannel {
    scripts: Vec<Script>,
    log: Mutex<Vec<String>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a response for commands starting with `prefix`.
    pub fn on(mut self, prefix: &str, returncode: i32, stdout: &str, stderr: &str) -> Self {
        self.scripts.push(Script {
            prefix: prefix.to_owned(),
            output: CommandOutput {
                returncode,
                stdout: stdout.to_owned(),
                stderr: stderr.to_owned(),
            },
        });
        self
    }

    /// Returns every command issued so far, in order.
    pub fn issued_commands(&self) -> Vec<String> {
        self.log.lock().expect("command log poisoned").clone()
    }
}

impl CommandChannel for ScriptedChannel {
    async fn run_command(&self, command: &str) -> Result<CommandOutput, FastarmorError> {
        self.log
            .lock()
            .expect("command log poisoned")
            .push(command.to_owned());

        self.scripts
            .iter()
            .find(|s| command.starts_with(&s.prefix))
            .map(|s| s.output.clone())
            .ok_or_else(|| {
                TransportError::Exec(format!("no scripted response for command: {command}")).into()
            })
    }
}
