use crate::lens::utils::OutputFormat;
use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Default cap on the number of subnets printed by `split`
pub const DEFAULT_MAX_DISPLAYED_SUBNETS: usize = 50;

pub struct SubnetcalcConfig {
    /// Configuration file that was loaded, if any
    pub config_file: Option<String>,

    /// Maximum number of subnets printed by `split` (default: 50)
    pub max_displayed_subnets: usize,

    /// Output format used when `--format` is not given (default: table)
    pub default_format: OutputFormat,
}

const EMPTY_CONFIG: &str = r#"### subnetcalc configuration file

### maximum number of subnets listed by `subnetcalc split`
# max_displayed_subnets = 50

### output format when --format is not given
### one of: table, markdown, json, json-pretty, json-line, psv
# default_format = "table"
"#;

impl Default for SubnetcalcConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            max_displayed_subnets: DEFAULT_MAX_DISPLAYED_SUBNETS,
            default_format: OutputFormat::default(),
        }
    }
}

impl SubnetcalcConfig {
    /// Function to create and initialize a new configuration
    ///
    /// With an explicit path, the file is read if it exists and a commented
    /// template is written there otherwise. Without one,
    /// `$HOME/.subnetcalc/subnetcalc.toml` is read when present.
    pub fn new(path: &Option<String>) -> Result<SubnetcalcConfig> {
        let mut builder = Config::builder();
        let mut config_file = None;

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                    config_file = Some(path_str.to_string());
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                if let Some(p) = Self::config_file_path() {
                    if Path::new(p.as_str()).exists() {
                        builder = builder.add_source(config::File::with_name(p.as_str()));
                        config_file = Some(p);
                    }
                }
            }
        }

        // Add in settings from the environment (with a prefix of SUBNETCALC)
        // E.g., `SUBNETCALC_MAX_DISPLAYED_SUBNETS=100 ./subnetcalc split ...`
        builder = builder.add_source(config::Environment::with_prefix("SUBNETCALC"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let max_displayed_subnets = match config.get("max_displayed_subnets") {
            Some(s) => s.parse().unwrap_or_else(|_| {
                warn!("invalid max_displayed_subnets '{}', using default", s);
                DEFAULT_MAX_DISPLAYED_SUBNETS
            }),
            None => DEFAULT_MAX_DISPLAYED_SUBNETS,
        };

        let default_format = match config.get("default_format") {
            Some(s) => OutputFormat::from_str(s).unwrap_or_else(|e| {
                warn!("{}, using table", e);
                OutputFormat::default()
            }),
            None => OutputFormat::default(),
        };

        Ok(SubnetcalcConfig {
            config_file,
            max_displayed_subnets,
            default_format,
        })
    }

    /// Default config file path, `$HOME/.subnetcalc/subnetcalc.toml`
    pub fn config_file_path() -> Option<String> {
        dirs::home_dir().map(|h| {
            format!(
                "{}/.subnetcalc/subnetcalc.toml",
                h.to_string_lossy().trim_end_matches('/')
            )
        })
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let config_file = self
            .config_file
            .clone()
            .unwrap_or_else(|| "(none, using defaults)".to_string());
        [
            format!("Config File:            {}", config_file),
            format!("Max Displayed Subnets:  {}", self.max_displayed_subnets),
            format!("Default Format:         {}", self.default_format),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SubnetcalcConfig::default();
        assert_eq!(config.max_displayed_subnets, 50);
        assert_eq!(config.default_format, OutputFormat::Table);
        assert!(config.summary().contains("using defaults"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subnetcalc.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "max_displayed_subnets = 10").unwrap();
        writeln!(file, "default_format = \"json\"").unwrap();

        let path_str = path.to_str().unwrap().to_string();
        let config = SubnetcalcConfig::new(&Some(path_str.clone())).unwrap();
        assert_eq!(config.max_displayed_subnets, 10);
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.config_file, Some(path_str));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subnetcalc.toml");
        std::fs::write(
            &path,
            "max_displayed_subnets = \"lots\"\ndefault_format = \"yaml\"\n",
        )
        .unwrap();

        let config = SubnetcalcConfig::new(&Some(path.to_str().unwrap().to_string())).unwrap();
        assert_eq!(config.max_displayed_subnets, DEFAULT_MAX_DISPLAYED_SUBNETS);
        assert_eq!(config.default_format, OutputFormat::Table);
    }

    #[test]
    fn test_missing_file_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.toml");
        let path_str = path.to_str().unwrap().to_string();

        let config = SubnetcalcConfig::new(&Some(path_str)).unwrap();
        assert_eq!(config.max_displayed_subnets, DEFAULT_MAX_DISPLAYED_SUBNETS);
        assert!(config.config_file.is_none());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# max_displayed_subnets = 50"));
    }
}
