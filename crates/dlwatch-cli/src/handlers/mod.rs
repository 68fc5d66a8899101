//! Command handlers.
//!
//! Each handler receives the composed [`CliContext`](crate::CliContext) and
//! talks to the backend only through the core ports.

pub mod actions;
pub mod error_detail;
pub mod list;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;
