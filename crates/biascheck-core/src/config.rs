//! Thresholds and tool configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Grade;

/// Limits that decide when an answer set is flagged.
///
/// Every field has a default, so a TOML table may override any subset:
///
/// ```toml
/// [thresholds]
/// max_length_variance_percent = 40.0
/// require_distractor_reason = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Largest allowed deviation of any answer from the mean length, in percent.
    pub max_length_variance_percent: f64,
    /// Correct answers shorter than this fraction of the distractor average are flagged.
    pub min_correct_distractor_ratio: f64,
    /// Correct answers longer than this multiple of the distractor average are flagged.
    pub max_correct_distractor_ratio: f64,
    /// Minimum characters per answer.
    pub min_answer_length: usize,
    /// Whether every distractor must explain why it is tempting.
    pub require_distractor_reason: bool,
    /// Minimum characters for a distractor reason, when one is given.
    pub min_distractor_reason_length: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_length_variance_percent: 50.0,
            min_correct_distractor_ratio: 0.7,
            max_correct_distractor_ratio: 1.3,
            min_answer_length: 10,
            require_distractor_reason: false,
            min_distractor_reason_length: 20,
        }
    }
}

/// Top-level biascheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiascheckConfig {
    /// Bias detection thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Output directory for saved reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default grade floor for `remediate`.
    #[serde(default = "default_min_grade")]
    pub default_min_grade: Grade,
    /// Default number of questions returned by `remediate`.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./biascheck-results")
}
fn default_min_grade() -> Grade {
    Grade::D
}
fn default_limit() -> usize {
    20
}

impl Default for BiascheckConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            output_dir: default_output_dir(),
            default_min_grade: default_min_grade(),
            default_limit: default_limit(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `biascheck.toml` in the current directory
/// 2. `~/.config/biascheck/config.toml`
///
/// Environment variable overrides: `BIASCHECK_REQUIRE_DISTRACTOR_REASON`,
/// `BIASCHECK_MAX_VARIANCE_PERCENT`.
pub fn load_config_from(path: Option<&Path>) -> Result<BiascheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("biascheck.toml");
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
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BiascheckConfig::default(),
    };

    apply_env_overrides(&mut config.thresholds, |name| std::env::var(name).ok())?;

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<BiascheckConfig> {
    Ok(toml::from_str(content)?)
}

fn apply_env_overrides<F>(thresholds: &mut Thresholds, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("BIASCHECK_REQUIRE_DISTRACTOR_REASON") {
        thresholds.require_distractor_reason = match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => anyhow::bail!("invalid BIASCHECK_REQUIRE_DISTRACTOR_REASON: '{other}'"),
        };
    }

    if let Some(value) = lookup("BIASCHECK_MAX_VARIANCE_PERCENT") {
        thresholds.max_length_variance_percent = value
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid BIASCHECK_MAX_VARIANCE_PERCENT: '{value}'"))?;
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("biascheck"))
}
