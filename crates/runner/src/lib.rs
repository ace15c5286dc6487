//! Fastarmor scenario engine.
//!
//! # Module Structure
//!
//! - [`scenario`]: built-in scenario table and selection
//! - [`expect`]: expected-marker expansion and matching
//! - [`runner`]: the fixed step sequence executed per scenario
//! - [`session`]: channel ownership and serialized execution
//! - [`timeout`]: per-command deadline decorator
//! - [`report`]: per-scenario and per-run result types

pub mod expect;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod timeout;

// --- Public API Re-exports ---

pub use expect::MarkerContext;
pub use report::{RunReport, ScenarioReport, ScenarioStatus};
pub use runner::ScenarioRunner;
pub use scenario::{Expect, OPTION_KEY, ScenarioSpec, builtin_scenarios, select_scenarios};
pub use session::Session;
pub use timeout::TimedChannel;
