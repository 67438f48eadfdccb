use crate::error::GotoError;
use crate::error::Result;
use crate::scheduler::SearchLimits;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Tunables for indexing, the incremental scheduler and the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoConfig {
    /// Number of line entries scanned per tick
    #[serde(default = "default_lines_per_group")]
    pub lines_per_group: usize,

    /// Delay between scheduler ticks, in milliseconds
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    /// Results rendered per tick
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Hard cap on rendered results per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Delay before the host focuses the query input after showing the panel
    #[serde(default = "default_focus_delay_ms")]
    pub focus_delay_ms: u64,

    /// Project loading options
    #[serde(default)]
    pub project: ProjectConfig,
}

/// Options for loading a project from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// File extensions to load (without the dot). Empty loads every file.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Files larger than this keep their entry but contribute no lines
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Follow symlinks while walking the project root
    #[serde(default)]
    pub follow_links: bool,
}

fn default_lines_per_group() -> usize {
    20_000
}

fn default_tick_period_ms() -> u64 {
    35
}

fn default_batch_size() -> usize {
    10
}

fn default_max_results() -> usize {
    1000
}

fn default_focus_delay_ms() -> u64 {
    200
}

fn default_extensions() -> Vec<String> {
    vec!["ink".to_string()]
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024
}

impl Default for GotoConfig {
    fn default() -> Self {
        Self {
            lines_per_group: default_lines_per_group(),
            tick_period_ms: default_tick_period_ms(),
            batch_size: default_batch_size(),
            max_results: default_max_results(),
            focus_delay_ms: default_focus_delay_ms(),
            project: ProjectConfig::default(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_file_bytes: default_max_file_bytes(),
            follow_links: false,
        }
    }
}

impl GotoConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: GotoConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.lines_per_group == 0 {
            return Err(GotoError::InvalidConfig(
                "lines_per_group must be > 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(GotoError::InvalidConfig("batch_size must be > 0".to_string()));
        }
        if self.max_results == 0 {
            return Err(GotoError::InvalidConfig(
                "max_results must be > 0".to_string(),
            ));
        }
        if self.tick_period_ms == 0 {
            return Err(GotoError::InvalidConfig(
                "tick_period_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            batch_size: self.batch_size,
            max_results: self.max_results,
        }
    }
}

impl ProjectConfig {
    pub(crate) fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_valid() {
        let config = GotoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lines_per_group, 20_000);
        assert_eq!(config.tick_period(), Duration::from_millis(35));
        assert_eq!(config.limits().batch_size, 10);
        assert_eq!(config.limits().max_results, 1000);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GotoConfig::from_toml_str(
            r#"
batch_size = 25

[project]
extensions = ["ink", "txt"]
"#,
        )
        .unwrap();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.max_results, 1000);
        assert_eq!(config.project.extensions, vec!["ink", "txt"]);
        assert_eq!(config.project.max_file_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn zero_sizes_rejected() {
        let mut config = GotoConfig::default();
        config.lines_per_group = 0;
        assert!(config.validate().is_err());

        let err = GotoConfig::from_toml_str("max_results = 0").unwrap_err();
        assert!(matches!(err, GotoError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GotoConfig::from_toml_str("batch_size = \"ten\"").unwrap_err();
        assert!(matches!(err, GotoError::ConfigParse(_)));
    }

    #[test]
    fn extension_filter() {
        let config = ProjectConfig::default();
        assert!(config.accepts_extension(Path::new("story/main.INK")));
        assert!(!config.accepts_extension(Path::new("README.md")));

        let everything = ProjectConfig {
            extensions: Vec::new(),
            ..Default::default()
        };
        assert!(everything.accepts_extension(Path::new("README")));
    }
}
