//! Configuration primitives and loader for faq-extract.
//!
//! Settings resolve with the precedence
//! override file → working directory `.faq-extract.toml` → built-in defaults.
//! With no files present the defaults reproduce the fixed invocation: level-2
//! headings, the built-in override table, and `Ranna_FAQ_complete.json` in
//! the working directory.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use faq_extract::{
    HeadingPolicy, OverrideRule, OverrideTable, DEFAULT_OUTPUT_FILE, DEFAULT_SECTION_LEVEL,
    DEFAULT_TITLE_PATTERN,
};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".faq-extract.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub output: OutputSettings,
    pub headings: HeadingSettings,
    pub overrides: OverrideSettings,
    pub sources: ConfigSources,
}

#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub path: PathBuf,
}

/// Heading level and title pattern, validated at load time.
#[derive(Clone, Debug)]
pub struct HeadingSettings {
    policy: HeadingPolicy,
}

impl HeadingSettings {
    pub fn level(&self) -> usize {
        self.policy.level()
    }

    pub fn title_pattern(&self) -> &str {
        self.policy.title_pattern()
    }

    pub fn policy(&self) -> &HeadingPolicy {
        &self.policy
    }
}

#[derive(Clone, Debug)]
pub struct OverrideSettings {
    pub builtin: bool,
    /// Configured rules, highest-precedence layer first.
    pub rules: Vec<OverrideRuleSettings>,
}

impl OverrideSettings {
    /// Configured rules come before the built-in table so they can replace it.
    pub fn table(&self) -> OverrideTable {
        let mut table = OverrideTable::new();
        for rule in &self.rules {
            table.push(OverrideRule::new(&rule.question_prefix, rule.answer.clone()));
        }
        if self.builtin {
            table.extend(OverrideTable::builtin());
        }
        table
    }
}

#[derive(Clone, Debug)]
pub struct OverrideRuleSettings {
    pub question_prefix: String,
    pub answer: Vec<String>,
    pub source: ConfigSource,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(default_source.clone());
        let mut source_layers = vec![default_source];

        let local_config_path = working_dir.join(CONFIG_FILE_NAME);
        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            output: resolved.output,
            headings: resolved.headings,
            overrides: resolved.overrides,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    PartialConfig {
        output_path: Some(Located::new(
            PathBuf::from(DEFAULT_OUTPUT_FILE),
            source.clone(),
        )),
        heading_level: Some(Located::new(DEFAULT_SECTION_LEVEL as u8, source.clone())),
        title_pattern: Some(Located::new(DEFAULT_TITLE_PATTERN.to_string(), source.clone())),
        builtin_overrides: Some(Located::new(true, source)),
        rules: Vec::new(),
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    output_path: Option<Located<PathBuf>>,
    heading_level: Option<Located<u8>>,
    title_pattern: Option<Located<String>>,
    builtin_overrides: Option<Located<bool>>,
    rules: Vec<Located<RawOverrideRule>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.output_path.is_some() {
            self.output_path = other.output_path;
        }
        if other.heading_level.is_some() {
            self.heading_level = other.heading_level;
        }
        if other.title_pattern.is_some() {
            self.title_pattern = other.title_pattern;
        }
        if other.builtin_overrides.is_some() {
            self.builtin_overrides = other.builtin_overrides;
        }
        // Later layers take precedence, so their rules go first. File order is
        // kept within a layer.
        let mut rules = other.rules;
        rules.append(&mut self.rules);
        self.rules = rules;
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = || ConfigSource::default(PathBuf::from("."));

        let output_loc = self
            .output_path
            .unwrap_or_else(|| Located::new(PathBuf::from(DEFAULT_OUTPUT_FILE), fallback()));
        if output_loc.value.as_os_str().is_empty() {
            errors.push(
                ConfigValidationError::new(Some(output_loc.source.clone()), "must not be empty".into())
                    .with_context("output.path"),
            );
        }
        let output_path = resolve_path(&output_loc);

        let level = self
            .heading_level
            .unwrap_or_else(|| Located::new(DEFAULT_SECTION_LEVEL as u8, fallback()));
        let pattern = self
            .title_pattern
            .unwrap_or_else(|| Located::new(DEFAULT_TITLE_PATTERN.to_string(), fallback()));

        let policy = if level.value == 0 || level.value > 6 {
            errors.push(ConfigValidationError::new(
                Some(level.source.clone()),
                format!(
                    "headings.level must be between 1 and 6 (received {})",
                    level.value
                ),
            ));
            None
        } else {
            match HeadingPolicy::new(usize::from(level.value), &pattern.value) {
                Ok(policy) => Some(policy),
                Err(err) => {
                    errors.push(
                        ConfigValidationError::new(Some(pattern.source.clone()), err.to_string())
                            .with_context("headings.title_pattern"),
                    );
                    None
                }
            }
        };

        let builtin = self
            .builtin_overrides
            .map(|located| located.value)
            .unwrap_or(true);

        let mut rules = Vec::new();
        for entry in self.rules {
            let Located { value, source } = entry;
            if value.question_prefix.trim().is_empty() {
                errors.push(
                    ConfigValidationError::new(
                        Some(source.clone()),
                        "question_prefix must not be empty".into(),
                    )
                    .with_context("overrides.rules"),
                );
                continue;
            }
            if value.answer.is_empty() {
                errors.push(
                    ConfigValidationError::new(
                        Some(source.clone()),
                        format!(
                            "rule for '{}' must provide at least one answer item",
                            value.question_prefix
                        ),
                    )
                    .with_context("overrides.rules"),
                );
                continue;
            }
            rules.push(OverrideRuleSettings {
                question_prefix: value.question_prefix,
                answer: value.answer,
                source,
            });
        }

        let policy = match policy {
            Some(policy) if errors.is_empty() => policy,
            _ => return Err(ConfigValidationErrors(errors)),
        };

        Ok(ResolvedConfig {
            output: OutputSettings { path: output_path },
            headings: HeadingSettings { policy },
            overrides: OverrideSettings { builtin, rules },
        })
    }
}

struct ResolvedConfig {
    output: OutputSettings,
    headings: HeadingSettings,
    overrides: OverrideSettings,
}

/// Aggregated validation failures.
#[derive(Clone, Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    output: Option<RawOutput>,
    #[serde(default)]
    headings: Option<RawHeadings>,
    #[serde(default)]
    overrides: Option<RawOverrides>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();

        if let Some(output) = self.output {
            partial.output_path = output.path.map(|value| Located::new(value, source.clone()));
        }

        if let Some(headings) = self.headings {
            partial.heading_level = headings
                .level
                .map(|value| Located::new(value, source.clone()));
            partial.title_pattern = headings
                .title_pattern
                .map(|value| Located::new(value, source.clone()));
        }

        if let Some(overrides) = self.overrides {
            partial.builtin_overrides = overrides
                .builtin
                .map(|value| Located::new(value, source.clone()));
            partial.rules = overrides
                .rules
                .into_iter()
                .map(|rule| Located::new(rule, source.clone()))
                .collect();
        }

        partial
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHeadings {
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    title_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOverrides {
    #[serde(default)]
    builtin: Option<bool>,
    #[serde(default)]
    rules: Vec<RawOverrideRule>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOverrideRule {
    question_prefix: String,
    answer: Vec<String>,
}
