//! Command-line interface for prefixpack
//!
//! ## Commands
//!
//! - **build**: Load the configuration, build every selected domain in order,
//!   and overwrite the generated files. The first failure stops the run and is
//!   reported through the host's error stream.
//! - **init**: Write the built-in default configuration to a file for editing.
//!
//! Configuration is a TOML file with a `package` name, a `verify` flag, and an
//! ordered list of `[[domain]]` records (see [`crate::build::DomainConfig`]).

mod build;
mod common;
mod config;
mod host;
mod init;
mod run;

pub use build::{BuildArgs, build_tables};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
