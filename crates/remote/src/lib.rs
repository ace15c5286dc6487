//! Fastarmor remote channels.
//!
//! # Module Structure
//!
//! - [`ssh`]: persistent ssh2 session for remote command execution
//! - [`login`]: one-shot interactive login as the test principal

pub mod login;
pub mod ssh;

// --- Public API Re-exports ---

pub use login::SshLogin;
pub use ssh::SshChannel;
