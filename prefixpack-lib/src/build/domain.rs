use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// How a domain's raw input is turned into an embedded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// A pre-serialized file embedded as-is, without a table.
    Blob,

    /// Metadata collection reduced to country code -> main region code.
    Regions,

    /// Metadata collection reduced to country code -> every region code for it.
    RegionLists,

    /// One pipe-delimited file mapping prefixes to `&`-separated timezone names.
    Timezones,

    /// A directory of language subdirectories, each holding pipe-delimited `*.txt` files.
    Prefixes,
}

/// One output artifact: where its data comes from and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// Name used to select the domain on the command line
    pub name: String,

    pub kind: DomainKind,

    /// File or directory name handed to the source provider
    pub source: String,

    /// Generated file to overwrite, relative to the output directory
    pub target: Utf8PathBuf,

    /// Name of the constant declared in the generated file
    pub variable: String,
}
