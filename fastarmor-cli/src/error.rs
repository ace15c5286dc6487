//! CLI-specific error types and exit code mapping

use fastarmor_core::error::FastarmorError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes, keeping the
/// three failure classes distinguishable for CI consumers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Environment/precondition failure on the target host.
    #[error("setup failure: {0}")]
    Setup(String),

    /// SSH transport fault (connect, auth, exec).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Feature regression: an expected marker was not produced.
    #[error("assertion failure: {0}")]
    Assertion(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | Assertion failure / general error         |
    /// | 2    | Configuration error                       |
    /// | 3    | Setup/environment failure (verdict unknown) |
    /// | 4    | Transport failure (verdict unknown)       |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Setup(_) => 3,
            Self::Transport(_) => 4,
            Self::Io(_) => 10,
            Self::Assertion(_) | Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<FastarmorError> for CliError {
    fn from(e: FastarmorError) -> Self {
        match e {
            FastarmorError::Config(inner) => Self::Config(inner.to_string()),
            FastarmorError::Setup(inner) => Self::Setup(inner.to_string()),
            FastarmorError::Transport(inner) => Self::Transport(inner.to_string()),
            FastarmorError::Assertion(inner) => Self::Assertion(inner.to_string()),
            FastarmorError::Io(inner) => Self::Io(inner),
        }
    }
}
