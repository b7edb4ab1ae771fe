//! Configuration for shelfpick.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SHELFPICK_ENDPOINT, SHELFPICK_SUBJECTS,
//!    SHELFPICK_MAX_RESULTS, SHELFPICK_TIMEOUT_SECONDS)
//! 2. Config file (.shelfpick/config.yaml)
//! 3. Defaults (Google Books, "Fiction" and "History", 40 results, 10s)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shelfpick/config.yaml
//! - Falls back to ~/.shelfpick/config.yaml

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::fetcher::{DEFAULT_ENDPOINT, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT_SECONDS};

/// Subjects fetched at startup when nothing else is configured
pub const DEFAULT_SUBJECTS: [&str; 2] = ["Fiction", "History"];

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Volumes search endpoint
    pub endpoint: Option<String>,
    /// Subjects fetched at startup
    pub subjects: Option<Vec<String>>,
    /// Page size requested per subject
    pub max_results: Option<u32>,
    /// Request timeout
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub subjects: Vec<String>,
    pub max_results: u32,
    pub timeout: Duration,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            config_file: None,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_file = find_config_file();
        let file = match config_file {
            Some(ref path) => Some(load_config_file(path)?),
            None => None,
        };

        let mut settings = resolve(file, |key| std::env::var(key).ok())?;
        settings.config_file = config_file;
        Ok(settings)
    }

    /// Replace the startup subjects (e.g. from the command line)
    pub fn with_subjects(mut self, subjects: Vec<String>) -> Result<Self> {
        self.subjects = validate_subjects(subjects)?;
        Ok(self)
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".shelfpick").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let home_config = dirs::home_dir()?.join(".shelfpick").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file values and environment lookups over the defaults
fn resolve<E>(file: Option<ConfigFile>, env: E) -> Result<Settings>
where
    E: Fn(&str) -> Option<String>,
{
    let defaults = Settings::default();
    let catalog = file.map(|f| f.catalog).unwrap_or_default();

    let endpoint = env("SHELFPICK_ENDPOINT")
        .or(catalog.endpoint)
        .unwrap_or(defaults.endpoint);

    let subjects = match env("SHELFPICK_SUBJECTS") {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => catalog.subjects.unwrap_or(defaults.subjects),
    };

    let max_results = match env("SHELFPICK_MAX_RESULTS") {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("SHELFPICK_MAX_RESULTS is not a number: {}", value))?,
        None => catalog.max_results.unwrap_or(defaults.max_results),
    };

    let timeout = match env("SHELFPICK_TIMEOUT_SECONDS") {
        Some(value) => Duration::from_secs(
            value
                .trim()
                .parse()
                .with_context(|| format!("SHELFPICK_TIMEOUT_SECONDS is not a number: {}", value))?,
        ),
        None => catalog
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
    };

    Ok(Settings {
        endpoint,
        subjects: validate_subjects(subjects)?,
        max_results,
        timeout,
        config_file: None,
    })
}

fn validate_subjects(subjects: Vec<String>) -> Result<Vec<String>> {
    if subjects.is_empty() {
        anyhow::bail!("At least one subject must be configured");
    }
    if let Some(pos) = subjects.iter().position(|s| s.trim().is_empty()) {
        anyhow::bail!("Subject #{} is blank", pos + 1);
    }
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = resolve(None, no_env).unwrap();

        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.subjects, vec!["Fiction", "History"]);
        assert_eq!(settings.max_results, 40);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".shelfpick");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
catalog:
  subjects:
    - Poetry
    - Science
  max_results: 20
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");

        let settings = resolve(Some(config), no_env).unwrap();
        assert_eq!(settings.subjects, vec!["Poetry", "Science"]);
        assert_eq!(settings.max_results, 20);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            version: "1.0".to_string(),
            catalog: CatalogConfig {
                endpoint: Some("http://file.invalid/volumes".to_string()),
                subjects: Some(vec!["Poetry".to_string()]),
                max_results: Some(5),
                timeout_seconds: Some(3),
            },
        };
        let env: HashMap<&str, &str> = [
            ("SHELFPICK_SUBJECTS", "Drama, Travel"),
            ("SHELFPICK_TIMEOUT_SECONDS", "30"),
        ]
        .into_iter()
        .collect();

        let settings = resolve(Some(file), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.endpoint, "http://file.invalid/volumes");
        assert_eq!(settings.subjects, vec!["Drama", "Travel"]);
        assert_eq!(settings.max_results, 5);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_env_number() {
        let result = resolve(None, |k| {
            (k == "SHELFPICK_MAX_RESULTS").then(|| "forty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_subject_rejected() {
        assert!(Settings::default()
            .with_subjects(vec!["Fiction".to_string(), " ".to_string()])
            .is_err());
        assert!(Settings::default().with_subjects(Vec::new()).is_err());
    }
}
