//! Core library for the `reqbench` CLI.
//!
//! This crate provides the internal building blocks used by the binary:
//! CLI argument types, configuration parsing, the run contract with its
//! backend adapters, the batch completion disciplines, scheduling mode
//! control, and timing instrumentation. The primary user-facing interface
//! is the `reqbench` command-line application.
pub mod args;
pub mod backends;
pub mod config;
pub mod entry;
pub mod error;
pub mod logger;
pub mod run;
pub mod sched;
pub mod timing;

#[cfg(test)]
pub(crate) mod test_support;
