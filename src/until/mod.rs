pub mod config;
pub mod env;
pub mod error;
pub mod listener;
pub mod matcher;
pub mod outcome;
pub mod process;
pub mod runner;
pub mod signal;
pub mod state;
pub mod supervisor;

pub(crate) mod stream;

#[cfg(test)]
mod unit_tests;
