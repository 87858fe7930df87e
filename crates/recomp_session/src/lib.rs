//! Build-session driver for the dependency tracker.
//!
//! A [`BuildSession`] ties the model, differencing engine, usage graph,
//! and snapshot store together: it consumes raw compiled-unit data from
//! the external compiler-output reader, diffs each unit against the
//! persisted snapshot, queries the reverse index for affected dependents,
//! and writes the updated snapshot back atomically. The surrounding build
//! orchestrator turns the resulting [`BuildOutcome`] into a recompilation
//! work list and owns overall timeout/cancellation.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod input;
pub mod outcome;
pub mod session;

pub use config::{load_config, load_config_from_str, SessionConfig};
pub use error::{ConfigError, SessionError};
pub use input::{RawMember, RawUnit, RawUsage};
pub use outcome::{BuildOutcome, UnitOutcome};
pub use session::BuildSession;
