use super::parse::{parse_zone_lines, read_label_lines};
use super::regions::{MetadataCollection, all_regions_by_country_code, main_region_by_country_code};
use super::{DomainConfig, DomainKind, SourceProvider};
use crate::Result;
use crate::embed::{EmbeddedSource, generate_bin_file, generate_map_file};
use crate::tables::{EncodedBuffer, EntryValue, LabelTable, PrefixTable, decode, serialize};
use camino::{Utf8Path, Utf8PathBuf};
use core::fmt::Debug;
use ohno::{IntoAppError, app_err, bail};
use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;
use walkdir::WalkDir;

const LOG_TARGET: &str = "     build";

/// Drives each domain from raw input to a generated source file.
///
/// Every artifact is rendered completely in memory before its target file is
/// touched, so a failed domain never leaves a half-written file behind.
#[derive(Debug)]
pub struct Builder<'a, S: SourceProvider> {
    source: &'a S,
    package: &'a str,
    output_dir: &'a Utf8Path,
    verify: bool,
}

impl<'a, S: SourceProvider> Builder<'a, S> {
    #[must_use]
    pub const fn new(source: &'a S, package: &'a str, output_dir: &'a Utf8Path) -> Self {
        Self {
            source,
            package,
            output_dir,
            verify: true,
        }
    }

    /// Decode every freshly encoded table and compare it against its source before writing.
    #[must_use]
    pub const fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Build the domains in order, stopping at the first failure.
    ///
    /// Returns the number of files written.
    pub fn build_all<'d>(&self, domains: impl IntoIterator<Item = &'d DomainConfig>) -> Result<usize> {
        let mut written = 0;
        for domain in domains {
            self.build_domain(domain)?;
            written += 1;
        }
        Ok(written)
    }

    pub fn build_domain(&self, domain: &DomainConfig) -> Result<()> {
        let start = Instant::now();
        let generated = self.render_domain(domain)?;
        write_artifact(&self.output_dir.join(&domain.target), &generated.source)?;
        log::debug!(
            target: LOG_TARGET,
            "Finished domain '{}' in {:.3}s",
            domain.name,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Produce the generated source for a domain without writing it.
    pub fn render_domain(&self, domain: &DomainConfig) -> Result<EmbeddedSource> {
        match domain.kind {
            DomainKind::Blob => self.render_blob(domain),
            DomainKind::Regions => self.render_regions_with(domain, main_region_by_country_code),
            DomainKind::RegionLists => self.render_regions_with(domain, all_regions_by_country_code),
            DomainKind::Timezones => self.render_timezones(domain),
            DomainKind::Prefixes => self.render_prefixes(domain),
        }
    }

    fn render_blob(&self, domain: &DomainConfig) -> Result<EmbeddedSource> {
        log::info!(target: LOG_TARGET, "Embedding {}", domain.source);
        let data = self.source.read_file(&domain.source)?;
        generate_bin_file(self.package, &domain.variable, &data)
    }

    /// Build a region map using a caller-supplied reduction of the metadata collection.
    pub fn render_regions_with<V, F>(&self, domain: &DomainConfig, extract: F) -> Result<EmbeddedSource>
    where
        V: EntryValue + PartialEq + Debug,
        F: FnOnce(&MetadataCollection) -> Result<PrefixTable<V>>,
    {
        log::info!(target: LOG_TARGET, "Building region map");
        let data = self.source.read_file(&domain.source)?;
        let collection = MetadataCollection::from_json(&data)?;
        let table = extract(&collection)?;
        let buffer = self.encode(&domain.name, &table)?;
        generate_bin_file(self.package, &domain.variable, buffer.as_bytes())
    }

    fn render_timezones(&self, domain: &DomainConfig) -> Result<EmbeddedSource> {
        log::info!(target: LOG_TARGET, "Building timezone map");
        let data = self.source.read_file(&domain.source)?;
        let text = String::from_utf8(data).into_app_err_with(|| format!("source file '{}' is not valid UTF-8", domain.source))?;
        let table = parse_zone_lines(&domain.source, &text)?;
        let buffer = self.encode(&domain.name, &table)?;
        generate_bin_file(self.package, &domain.variable, buffer.as_bytes())
    }

    fn render_prefixes(&self, domain: &DomainConfig) -> Result<EmbeddedSource> {
        log::info!(target: LOG_TARGET, "Building {} prefix maps", domain.name);
        let root = self.source.export_dir(&domain.source)?;
        let languages = read_language_tables(&root)?;

        let mut buffers = Vec::with_capacity(languages.len());
        for (language, table) in &languages {
            buffers.push((language.as_str(), self.encode(language, table)?));
        }

        generate_map_file(self.package, &domain.variable, buffers)
    }

    fn encode<V>(&self, name: &str, table: &PrefixTable<V>) -> Result<EncodedBuffer>
    where
        V: EntryValue + PartialEq + Debug,
    {
        let buffer = serialize(table)?;
        if self.verify {
            let decoded: PrefixTable<V> = decode(buffer.as_bytes())?;
            if decoded != *table {
                bail!("encoded table '{name}' does not decode to its source table");
            }
        }

        log::debug!(target: LOG_TARGET, "Encoded '{name}': {} entries in {} bytes", table.len(), buffer.len());
        Ok(buffer)
    }
}

/// Read one label table per language subdirectory of `root`.
///
/// Every `*.txt` file directly inside a language directory contributes to that
/// language's table; the subdirectory name is the language key. Symbolic links
/// are followed, so a linked language directory or file counts like the real one.
pub fn read_language_tables(root: &Utf8Path) -> Result<BTreeMap<String, LabelTable>> {
    let mut languages = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(true).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.into_app_err_with(|| format!("listing '{root}'"))?;
        let path = utf8_path(entry.path())?;
        if !entry.file_type().is_dir() {
            log::info!(target: LOG_TARGET, "Ignoring non-directory entry: {path}");
            continue;
        }

        let language = path
            .file_name()
            .ok_or_else(|| app_err!("directory '{path}' has no name"))?
            .to_string();
        let table = read_mappings_for_dir(&path)?;
        let _ = languages.insert(language, table);
    }

    Ok(languages)
}

fn read_mappings_for_dir(dir: &Utf8Path) -> Result<LabelTable> {
    log::info!(target: LOG_TARGET, "Building map for: {dir}");
    let mut table = LabelTable::new();

    for entry in WalkDir::new(dir).follow_links(true).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.into_app_err_with(|| format!("listing '{dir}'"))?;
        let path = utf8_path(entry.path())?;
        if !entry.file_type().is_file() || path.extension() != Some("txt") {
            log::debug!(target: LOG_TARGET, "Skipping {path}");
            continue;
        }

        let text = fs::read_to_string(&path).into_app_err_with(|| format!("reading '{path}'"))?;
        let _ = read_label_lines(path.as_str(), &text, &mut table)?;
    }

    log::info!(target: LOG_TARGET, "Read {} mappings in {dir}", table.len());
    Ok(table)
}

fn utf8_path(path: &std::path::Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|p| app_err!("path '{}' is not valid UTF-8", p.display()))
}

/// Overwrite an existing generated file.
///
/// A missing target almost always means the tool is running from the wrong
/// directory, so the file is never created. The existing file is truncated and
/// rewritten in place: a symbolic link keeps pointing at the file it names, and
/// the file keeps its permissions.
pub fn write_artifact(path: &Utf8Path, contents: &str) -> Result<()> {
    if !path.is_file() {
        bail!("no such file: {path}; make sure you are running from the root of the repo directory");
    }

    log::info!(target: LOG_TARGET, "Writing new {path}");
    fs::write(path, contents).into_app_err_with(|| format!("writing '{path}'"))?;
    Ok(())
}
