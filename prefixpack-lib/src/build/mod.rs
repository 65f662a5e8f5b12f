//! Build orchestration: raw reference data in, generated source files out.
//!
//! # Domains
//!
//! Each output artifact is described by a [`DomainConfig`] record. The records
//! come from configuration and are processed in order:
//!
//! - **blob**: a pre-serialized file (such as the marshalled metadata collection)
//!   embedded without further processing
//! - **regions** / **region_lists**: the metadata collection reduced to
//!   country calling code -> region code(s)
//! - **timezones**: `prefix|zone&zone...` lines, one multi-value table
//! - **prefixes**: carrier or geocoding data, one label table per language
//!   subdirectory, emitted together as a single map constant
//!
//! # Pipeline
//!
//! For every table the [`Builder`] parses records, interns and serializes them
//! (see [`crate::tables`]), optionally decodes the result again to check it,
//! compresses and renders it (see [`crate::embed`]), and finally overwrites the
//! target file. The first error of any kind aborts the run.

mod builder;
mod domain;
mod parse;
mod regions;
mod source;

pub use builder::{Builder, read_language_tables, write_artifact};
pub use domain::{DomainConfig, DomainKind};
pub use parse::{RawRecord, parse_zone_lines, read_label_lines, records};
pub use regions::{MetadataCollection, TerritoryMetadata, all_regions_by_country_code, main_region_by_country_code};
pub use source::{LocalSource, SourceProvider};
