//! # run-until
//!
//! Run a command until a target string appears in its output.
//!
//! Built for scripts (tests, CI steps) that need to wait for a long-running
//! process to reach a known-ready state, such as `"Server listening on port
//! 3000"`, without polling or sleeping.
//!
//! ## How it works
//!
//! A [`Supervisor`](until::supervisor::Supervisor) spawns the
//! `run-until-runner` binary in its own session, passing the target string
//! through the environment. The runner starts the real command through the
//! shell and relays its output. The supervisor relays that output in turn and
//! scans every chunk for the target string. The run settles exactly once:
//!
//! - **Matched**: the target appeared; the child is killed, or left running
//!   and detached with `leave_alive`
//! - **NotFound**: the child exited first; carries its exit code
//! - **Faulted**: supervision itself failed
//!
//! Matching is exact and case-sensitive, and does not span chunk boundaries:
//! a target split across two reads is not detected.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use run_until::{run_until, until::config::RunUntilConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A bare target string works as the config
//!     run_until("ready", "echo", ["ready"]).await?;
//!
//!     // Leave a server running once it reports it is listening
//!     let config = RunUntilConfig::new("listening").leave_alive(true);
//!     run_until(config, "npm", ["start"]).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `cli` (default): the `run-until` binary and its logging setup
//! - `tracing`: structured logging through `tracing`
//! - `serde`: serialization of the configuration types

pub mod helper;
pub mod until;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod logging;

pub use until::supervisor::run_until;
