//! Configuration and source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizmark_core::scorer::ScorerConfig;
use quizmark_core::traits::QuestionSource;

use crate::file::FileSource;
use crate::http::{HttpSource, DEFAULT_TIMEOUT_SECS};

/// Environment variable that overrides `scoring.length_weight`.
pub const LENGTH_WEIGHT_ENV: &str = "QUIZMARK_LENGTH_WEIGHT";

/// Configuration for a named form source.
///
/// Note: Custom Debug impl masks header values, which often carry tokens.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    File {
        path: PathBuf,
    },
    Http {
        url: String,
        #[serde(default)]
        headers: HashMap<String, String>,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceConfig::File { path } => f.debug_struct("File").field("path", path).finish(),
            SourceConfig::Http {
                url,
                headers,
                timeout_secs,
            } => {
                let masked: Vec<(&String, &str)> =
                    headers.keys().map(|k| (k, "***")).collect();
                f.debug_struct("Http")
                    .field("url", url)
                    .field("headers", &masked)
                    .field("timeout_secs", timeout_secs)
                    .finish()
            }
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level quizmark configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizmarkConfig {
    /// Scorer tunables.
    #[serde(default)]
    pub scoring: ScorerConfig,
    /// Named sources, selectable with `--source`.
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,
    /// Source used when neither `--form` nor `--source` is given.
    #[serde(default)]
    pub default_source: Option<String>,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    resolve_with(s, |name| std::env::var(name).ok())
}

fn resolve_with(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::File { path } => SourceConfig::File {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        SourceConfig::Http {
            url,
            headers,
            timeout_secs,
        } => SourceConfig::Http {
            url: resolve_env_vars(url),
            headers: headers
                .iter()
                .map(|(k, v)| (k.clone(), resolve_env_vars(v)))
                .collect(),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// `QUIZMARK_LENGTH_WEIGHT` overrides `scoring.length_weight`.
pub fn load_config() -> Result<QuizmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizmarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmarkConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config.sources = config
        .sources
        .iter()
        .map(|(k, v)| (k.clone(), resolve_source_config(v)))
        .collect();

    let weight = config.scoring.length_weight;
    if !weight.is_finite() || weight < 0.0 {
        anyhow::bail!("scoring.length_weight must be a non-negative number, got {weight}");
    }

    Ok(config)
}

fn apply_env_overrides(
    config: &mut QuizmarkConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(raw) = lookup(LENGTH_WEIGHT_ENV) {
        config.scoring.length_weight = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {LENGTH_WEIGHT_ENV}: {raw:?}"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}

/// Create a source instance from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn QuestionSource>> {
    match config {
        SourceConfig::File { path } => Ok(Box::new(FileSource::new(path))),
        SourceConfig::Http {
            url,
            headers,
            timeout_secs,
        } => Ok(Box::new(HttpSource::with_options(
            url,
            headers,
            *timeout_secs,
        )?)),
    }
}

/// Pick the source for a command invocation.
///
/// `--source <name>` selects a configured source. Otherwise `--form` is a
/// URL (`http://`, `https://`) or a file path. With neither, the
/// configured `default_source` is used.
pub fn resolve_source(
    form: Option<&str>,
    source: Option<&str>,
    config: &QuizmarkConfig,
) -> Result<Box<dyn QuestionSource>> {
    if let Some(name) = source {
        let source_config = config
            .sources
            .get(name)
            .with_context(|| format!("source '{name}' is not configured"))?;
        return create_source(source_config);
    }

    if let Some(location) = form {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(Box::new(HttpSource::new(location)?));
        }
        return Ok(Box::new(FileSource::new(location)));
    }

    match &config.default_source {
        Some(name) => resolve_source(None, Some(name), config),
        None => anyhow::bail!("no form given: pass --form or --source, or set default_source"),
    }
}
