//! Process supervision for quickstart runs
//!
//! A quickstart run launches the staged executable as a child process, waits
//! for its HTTPS health endpoint to answer, and finally shuts it down:
//!
//! ```text
//! launch(exe, args) → poll_health(url, options) → … → terminate(process, grace)
//! ```
//!
//! A [`QuickstartProcess`] that is dropped without [`terminate`] kills its
//! child, so an early return never leaks the process.

pub mod error;
pub mod health;
pub mod process;

pub use error::SupervisorError;
pub use health::{HealthOptions, poll_health};
pub use process::{QuickstartProcess, launch, terminate};

pub type Result<T> = std::result::Result<T, SupervisorError>;
