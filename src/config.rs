//! Configuration system
//!
//! Reads configuration from:
//! - `.jstylerc.yaml` / `.jstylerc.json` (project-level)
//! - `~/.jstylerc.yaml` (user-level)

use crate::registry::RuleRegistry;
use crate::violation::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown rule id '{0}' referenced in configuration")]
    UnknownRule(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel processing
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,

    /// Per-file evaluation budget in milliseconds (None = unbounded)
    pub timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
            timeout_ms: None,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Grouped,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "grouped" => Ok(OutputFormat::Grouped),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// File handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "**/*.js".to_string(),
                "**/*.cjs".to_string(),
                "**/*.mjs".to_string(),
            ],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/dist/**".to_string(),
                "**/*.min.js".to_string(),
            ],
        }
    }
}

/// Indentation unit enforced by the indent rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentUnit {
    #[default]
    Tabs,
    Spaces,
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,

    /// Per-file rule ignores (glob pattern -> rule IDs, "all" for every rule)
    pub per_file: HashMap<String, Vec<String>>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// File handling settings
    pub files: FilesConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Indentation unit
    pub indent_unit: IndentUnit,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::default()),
            "strict" => Some(Self::preset_strict()),
            "minimal" => Some(Self::preset_minimal()),
            _ => None,
        }
    }

    /// Strict preset - every rule reports at error severity
    fn preset_strict() -> Self {
        let mut config = Self::default();
        for id in crate::rules::builtin_rule_ids() {
            config.rules.severity.insert(id, Severity::Error);
        }
        config
    }

    /// Minimal preset - only the layout rules
    fn preset_minimal() -> Self {
        Self {
            rules: RulesConfig {
                enabled: vec!["brace-style".to_string(), "indent-style".to_string()],
                ..RulesConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent inheritance loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        // Process extends
        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extended = if let Some(preset) = Self::preset(extend) {
                    preset
                } else {
                    let extend_path = if Path::new(extend).is_absolute() {
                        PathBuf::from(extend)
                    } else {
                        base_dir.join(extend)
                    };
                    Self::load_with_depth(&extend_path, depth + 1)?
                };
                base_config.merge(extended);
            }

            base_config.merge(config);
            config = base_config;
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        // Extends are not inherited
        if other.engine.jobs != 0 {
            self.engine.jobs = other.engine.jobs;
        }
        self.engine.parallel = other.engine.parallel;
        if other.engine.timeout_ms.is_some() {
            self.engine.timeout_ms = other.engine.timeout_ms;
        }

        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.verbose {
            self.output.verbose = true;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }

        self.files.include.extend(other.files.include);
        self.files.exclude.extend(other.files.exclude);

        self.rules.disabled.extend(other.rules.disabled);
        if !other.rules.enabled.is_empty() {
            self.rules.enabled = other.rules.enabled;
        }
        self.rules.severity.extend(other.rules.severity);
        for (pattern, rules) in other.rules.per_file {
            self.rules.per_file.entry(pattern).or_default().extend(rules);
        }

        if other.indent_unit != IndentUnit::default() {
            self.indent_unit = other.indent_unit;
        }
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".jstylerc.yaml",
            ".jstylerc.yml",
            ".jstylerc.json",
            "jstyle.yaml",
            "jstyle.yml",
            "jstyle.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
        timeout_ms: Option<u64>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
        if timeout_ms.is_some() {
            self.engine.timeout_ms = timeout_ms;
        }
    }

    /// Verify that every rule id the configuration references exists.
    /// Fatal at startup; a typo must not silently disable nothing.
    pub fn validate(&self, registry: &RuleRegistry) -> Result<(), ConfigError> {
        for id in self.rules.disabled.iter().chain(self.rules.enabled.iter()) {
            if !registry.contains(id) {
                return Err(ConfigError::UnknownRule(id.clone()));
            }
        }
        for id in self.rules.severity.keys() {
            if !registry.contains(id) {
                return Err(ConfigError::UnknownRule(id.clone()));
            }
        }
        for ids in self.rules.per_file.values() {
            for id in ids {
                if id != "all" && !registry.contains(id) {
                    return Err(ConfigError::UnknownRule(id.clone()));
                }
            }
        }
        Ok(())
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|r| r == rule_id) {
            return false;
        }
        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|r| r == rule_id);
        }
        true
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity.get(rule_id).copied()
    }

    /// Check if a rule should be ignored for a file
    pub fn should_ignore_rule_for_file(&self, rule_id: &str, file_path: &Path) -> bool {
        let file_str = file_path.to_string_lossy();

        for (pattern, rules) in &self.rules.per_file {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_str.as_ref())
                    && (rules.iter().any(|r| r == "all") || rules.iter().any(|r| r == rule_id))
                {
                    return true;
                }
            }
        }

        false
    }
}
