use crate::Result;
use crate::build::DomainConfig;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "prefixpack.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Package declared at the top of every generated file
    #[serde(default = "default_package")]
    pub package: String,

    /// Decode each encoded table and compare it with its source before writing
    #[serde(default = "default_verify")]
    pub verify: bool,

    /// Artifacts to generate, in build order
    #[serde(default = "default_domains", rename = "domain")]
    pub domains: Vec<DomainConfig>,
}

fn default_package() -> String {
    "phonenumbers".to_string()
}

const fn default_verify() -> bool {
    true
}

fn default_domains() -> Vec<DomainConfig> {
    Config::default().domains
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading prefixpack configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading prefixpack configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The configured domains with the given names, in configuration order.
    ///
    /// An empty selection means every domain.
    pub fn select_domains(&self, names: &[String]) -> Result<Vec<&DomainConfig>> {
        if let Some(unknown) = names.iter().find(|n| !self.domains.iter().any(|d| &d.name == *n)) {
            let known: Vec<_> = self.domains.iter().map(|d| d.name.as_str()).collect();
            return Err(app_err!("unknown domain '{unknown}', expected one of: {}", known.join(", ")));
        }

        Ok(self
            .domains
            .iter()
            .filter(|d| names.is_empty() || names.contains(&d.name))
            .collect())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate domain names, invalid identifiers, or empty paths
    fn validate(&self) -> Result<()> {
        if !is_identifier(&self.package) {
            return Err(app_err!("package must be an identifier, got '{}'", self.package));
        }

        let mut names = HashSet::new();
        for domain in &self.domains {
            if !names.insert(domain.name.as_str()) {
                return Err(app_err!("domain '{}' is defined more than once", domain.name));
            }

            if !is_identifier(&domain.variable) {
                return Err(app_err!(
                    "variable for domain '{}' must be an identifier, got '{}'",
                    domain.name,
                    domain.variable
                ));
            }

            if domain.source.is_empty() {
                return Err(app_err!("source for domain '{}' must not be empty", domain.name));
            }

            if domain.target.as_str().is_empty() {
                return Err(app_err!("target for domain '{}' must not be empty", domain.name));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::DomainKind;

    fn write_config(dir: &tempfile::TempDir, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from(dir.path().to_string_lossy().to_string()).join("prefixpack.toml");
        fs::write(&path, text).expect("Failed to write test config");
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_domains() {
        let config = Config::default();
        let names: Vec<_> = config.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["metadata", "shortnumber", "regions", "timezones", "carrier", "geocoding"]);
        assert_eq!(config.package, "phonenumbers");
        assert!(config.verify);

        let timezones = &config.domains[3];
        assert_eq!(timezones.kind, DomainKind::Timezones);
        assert_eq!(timezones.target, "prefix_to_timezone_bin.go");
        assert_eq!(timezones.variable, "timezoneMapData");
    }

    #[test]
    fn test_default_config_matches_embedded() {
        let default_config = Config::default();
        let parsed_config: Config = toml::from_str(DEFAULT_CONFIG_TOML).expect("DEFAULT_CONFIG_TOML should parse successfully");

        let default_toml = toml::to_string(&default_config).expect("default config should serialize");
        let parsed_toml = toml::to_string(&parsed_config).expect("parsed config should serialize");
        assert_eq!(default_toml, parsed_toml);
    }

    #[test]
    fn test_empty_config_uses_default_domains() {
        let config: Config = toml::from_str("# empty\n").unwrap();
        assert_eq!(config.domains.len(), Config::default().domains.len());
        assert_eq!(config.package, "phonenumbers");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = Utf8PathBuf::from(temp_dir.path().to_string_lossy().to_string());
        let config = Config::load(&base, None).unwrap();
        assert_eq!(config.domains.len(), 6);
    }

    #[test]
    fn test_load_from_base_dir() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let _ = write_config(
            &temp_dir,
            r#"
package = "geodata"
verify = false

[[domain]]
name = "timezones"
kind = "timezones"
source = "map_data.txt"
target = "tz.go"
variable = "tzData"
"#,
        );

        let base = Utf8PathBuf::from(temp_dir.path().to_string_lossy().to_string());
        let config = Config::load(&base, None).unwrap();
        assert_eq!(config.package, "geodata");
        assert!(!config.verify);
        assert_eq!(config.domains.len(), 1);
    }

    #[test]
    fn test_unknown_field() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_config(&temp_dir, "package = \"phonenumbers\"\nunknown_field = 1\n");
        assert!(Config::load(Utf8Path::new("."), Some(&path)).is_err());
    }

    #[test]
    fn test_unknown_kind() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_config(
            &temp_dir,
            "[[domain]]\nname = \"x\"\nkind = \"spreadsheet\"\nsource = \"a\"\ntarget = \"b\"\nvariable = \"c\"\n",
        );
        assert!(Config::load(Utf8Path::new("."), Some(&path)).is_err());
    }

    #[test]
    fn test_duplicate_domain_names() {
        let mut config = Config::default();
        let copy = config.domains[0].clone();
        config.domains.push(copy);
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("defined more than once"), "{msg}");
    }

    #[test]
    fn test_invalid_variable() {
        let mut config = Config::default();
        config.domains[0].variable = "not-an-identifier".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_package() {
        let config = Config {
            package: "1phone".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_source() {
        let mut config = Config::default();
        config.domains[2].source = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_target() {
        let mut config = Config::default();
        config.domains[3].target = Utf8PathBuf::new();
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("target for domain 'timezones' must not be empty"), "{msg}");
    }

    #[test]
    fn test_select_domains() {
        let config = Config::default();
        assert_eq!(config.select_domains(&[]).unwrap().len(), 6);

        let selected = config.select_domains(&["geocoding".to_string(), "timezones".to_string()]).unwrap();
        let names: Vec<_> = selected.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["timezones", "geocoding"]);
    }

    #[test]
    fn test_select_unknown_domain() {
        let config = Config::default();
        let msg = config.select_domains(&["weather".to_string()]).unwrap_err().to_string();
        assert!(msg.contains("unknown domain 'weather'"), "{msg}");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("regionMapData"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("a.b"));
    }
}
