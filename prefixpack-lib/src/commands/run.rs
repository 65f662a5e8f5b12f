//! Command dispatch logic for prefixpack

use super::{BuildArgs, InitArgs, build_tables, init_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "prefixpack", author, version, long_about = None)]
#[command(about = "Generate embedded phone number prefix tables")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PrefixpackSubcommand,
}

#[derive(Subcommand, Debug)]
enum PrefixpackSubcommand {
    /// Build the configured tables and overwrite their generated files
    Build(Box<BuildArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match Cli::parse_from(args).command {
        PrefixpackSubcommand::Build(build_args) => build_tables(host, &build_args),
        PrefixpackSubcommand::Init(init_args) => init_config(host, &init_args),
    }
}
