#![forbid(unsafe_code)]
//! External test dispatcher for the Solidity compiler
//!
//! External tests are standalone shell scripts that exercise a compiler binary end-to-end. This crate discovers
//! them in the `externalTests` directory and runs a selection of them, in order, against a given `solc` binary.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;

pub use cli::test_runner::{TestRegistry, discover_external_tests};
pub use config::DiscoveryConfig;
