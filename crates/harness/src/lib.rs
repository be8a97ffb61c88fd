//! Script-driven front end for the `vmm` simulator.
//!
//! A script is a list of accesses and process switches. The runner replays
//! it against a [`vmm::System`] the way a kernel's trap path would:
//! translate, fault on failure, translate again.

pub mod report;
pub mod runner;
pub mod script;
pub mod trace;

pub use report::SystemReport;
pub use runner::Runner;
pub use script::{parse_script, Command, ScriptLine};
pub use trace::TraceObserver;
