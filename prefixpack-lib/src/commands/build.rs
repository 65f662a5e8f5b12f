use super::Host;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::build::{Builder, LocalSource};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use std::time::Instant;

const LOG_TARGET: &str = "   command";

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Path to configuration file (default is `prefixpack.toml`, falling back to built-in defaults)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory holding the raw source data
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub source_root: Utf8PathBuf,

    /// Directory holding the generated files to overwrite
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: Utf8PathBuf,

    /// Only build the named domain (may be repeated)
    #[arg(long = "domain", value_name = "NAME")]
    pub domains: Vec<String>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

fn build_tables_inner(args: &BuildArgs) -> Result<usize> {
    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let domains = config.select_domains(&args.domains)?;

    let source = LocalSource::new(args.source_root.clone());
    let builder = Builder::new(&source, &config.package, &args.output_dir).with_verify(config.verify);

    builder.build_all(domains)
}

/// Build every selected domain, reporting the outcome to the host
///
/// # Errors
///
/// Returns the first error encountered; nothing after it is built
pub fn build_tables<H: Host>(host: &mut H, args: &BuildArgs) -> Result<()> {
    init_logging(args.log_level);
    let start = Instant::now();

    match build_tables_inner(args) {
        Ok(count) => {
            log::info!(target: LOG_TARGET, "Finished in {:.3}s", start.elapsed().as_secs_f64());
            let _ = writeln!(host.output(), "Generated {count} file(s)");
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Build failed: {e:#}");
            host.exit(1);
            Err(e)
        }
    }
}
