#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for prefixpack
//!
//! This library turns phone number reference data (region codes, timezones,
//! carrier names, geocoding labels) into compact binary prefix tables that are
//! gzip-compressed, base64-encoded, and embedded as constants in generated source.
//!
//! # Module Organization
//!
//! - [`tables`]: Interning, delta-key encoding, and the binary table format
//! - [`embed`]: Compression and generated-source rendering
//! - [`build`]: Domain configuration, input parsing, and build orchestration
//! - [`commands`]: Command-line interface

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod build;
#[cfg(not(any(debug_assertions, test)))]
mod build;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod embed;
#[cfg(not(any(debug_assertions, test)))]
mod embed;

#[cfg(any(debug_assertions, test))]
pub mod tables;
#[cfg(not(any(debug_assertions, test)))]
mod tables;

pub use crate::commands::{Host, run};
