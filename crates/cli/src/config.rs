//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# Chemshelf configuration
# See: chemshelf --help for all options

# Disable colored output
no_color = false

# Inventory JSON file used when --inventory is not given
# inventory = "/srv/lab/data.json"

# Only list expired records in inventory reports
expired_only = false
"#;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub no_color: Option<bool>,
    pub inventory: Option<PathBuf>,
    pub expired_only: Option<bool>,
}

impl Config {
    /// Get the config file path.
    ///
    /// `CHEMSHELF_CONFIG` overrides the location; otherwise
    /// - Linux/macOS: `~/.config/chemshelf/config.toml`
    /// - Windows: `%APPDATA%\chemshelf\config.toml`
    pub fn path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CHEMSHELF_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|p| p.join("chemshelf").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Read value from environment variable.
    fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok()?.parse().ok()
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        // NO_COLOR is a standard - presence means disable color
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        Self::env_var("CHEMSHELF_NO_COLOR")
            .or(self.no_color)
            .unwrap_or(false)
    }

    /// Get inventory path with precedence: env > config > none.
    pub fn inventory(&self) -> Option<PathBuf> {
        std::env::var("CHEMSHELF_INVENTORY")
            .ok()
            .map(PathBuf::from)
            .or_else(|| self.inventory.clone())
    }

    /// Get expired_only with precedence: env > config > default.
    pub fn expired_only(&self) -> bool {
        Self::env_var("CHEMSHELF_EXPIRED_ONLY")
            .or(self.expired_only)
            .unwrap_or(false)
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    // Create parent directory
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid_toml() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("DEFAULT_CONFIG should parse");
        assert_eq!(config.no_color, Some(false));
        assert_eq!(config.inventory, None);
        assert_eq!(config.expired_only, Some(false));
    }

    #[test]
    #[serial]
    fn test_partial_config() {
        std::env::remove_var("CHEMSHELF_INVENTORY");
        std::env::remove_var("CHEMSHELF_EXPIRED_ONLY");

        let toml = r#"
inventory = "/srv/lab/data.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.inventory(), Some(PathBuf::from("/srv/lab/data.json")));
        assert_eq!(config.expired_only, None);

        // Getters should use defaults for missing values
        assert!(!config.expired_only());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let config: Config = toml::from_str("expired_only = false").unwrap();

        std::env::set_var("CHEMSHELF_EXPIRED_ONLY", "true");
        std::env::set_var("CHEMSHELF_INVENTORY", "/tmp/other.json");
        let expired_only = config.expired_only();
        let inventory = config.inventory();
        std::env::remove_var("CHEMSHELF_EXPIRED_ONLY");
        std::env::remove_var("CHEMSHELF_INVENTORY");

        assert!(expired_only);
        assert_eq!(inventory, Some(PathBuf::from("/tmp/other.json")));
    }

    #[test]
    #[serial]
    fn test_no_color_env_is_boolean() {
        std::env::remove_var("NO_COLOR");
        let config: Config = toml::from_str("no_color = true").unwrap();

        std::env::set_var("CHEMSHELF_NO_COLOR", "false");
        let disabled_by_env = config.no_color();
        std::env::set_var("CHEMSHELF_NO_COLOR", "true");
        let enabled_by_env = Config::default().no_color();
        std::env::remove_var("CHEMSHELF_NO_COLOR");

        assert!(!disabled_by_env);
        assert!(enabled_by_env);
        assert!(config.no_color());
        assert!(!Config::default().no_color());
    }

    #[test]
    #[serial]
    fn test_no_color_standard_is_presence_only() {
        std::env::remove_var("CHEMSHELF_NO_COLOR");

        std::env::set_var("NO_COLOR", "false");
        let disabled = Config::default().no_color();
        std::env::remove_var("NO_COLOR");

        assert!(disabled);
    }

    #[test]
    #[serial]
    fn test_init_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        std::env::set_var("CHEMSHELF_CONFIG", &path);

        let first = init_config();
        let second = init_config();
        std::env::remove_var("CHEMSHELF_CONFIG");

        assert_eq!(first, Ok(path.clone()));
        assert!(second.unwrap_err().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    #[serial]
    fn test_empty_config() {
        std::env::remove_var("CHEMSHELF_INVENTORY");
        std::env::remove_var("CHEMSHELF_EXPIRED_ONLY");

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.inventory(), None);
        assert!(!config.expired_only());
    }
}
