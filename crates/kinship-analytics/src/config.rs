use std::path::Path;

use anyhow::{Context, Result};
use kinship_core::error::ErrorCode;
use serde::{Deserialize, Serialize};

use crate::community::LabelPropagationConfig;
use crate::pagerank::PageRankConfig;
use crate::recommend::RecommendWeights;

/// Every tunable analysis parameter, loadable from TOML.
///
/// All sections are optional; missing keys take their documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub pagerank: PageRankConfig,
    #[serde(default)]
    pub communities: LabelPropagationConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendConfig {
    #[serde(flatten)]
    pub weights: RecommendWeights,
    /// Keep at most this many recommendations per node.
    #[serde(default)]
    pub top: Option<usize>,
}

/// A parameter value the algorithms cannot honour.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{key} {requirement}, got {value}")]
pub struct InvalidParameter {
    pub key: String,
    pub requirement: &'static str,
    pub value: f64,
}

impl InvalidParameter {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidConfig
    }
}

impl AnalysisConfig {
    /// Reject parameter values the algorithms cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first offending key.
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        let damping = self.pagerank.damping;
        if !(0.0..1.0).contains(&damping) {
            return Err(InvalidParameter {
                key: "pagerank.damping".to_string(),
                requirement: "must lie in [0, 1)",
                value: damping,
            });
        }
        let tolerance = self.pagerank.tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(InvalidParameter {
                key: "pagerank.tolerance".to_string(),
                requirement: "must be positive",
                value: tolerance,
            });
        }

        let w = &self.recommend.weights;
        for (key, value) in [
            ("mutual", w.mutual),
            ("degree", w.degree),
            ("pagerank", w.pagerank),
            ("community_bonus", w.community_bonus),
        ] {
            if !value.is_finite() {
                return Err(InvalidParameter {
                    key: format!("recommend.{key}"),
                    requirement: "must be finite",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Parse and validate a TOML config string.
///
/// # Errors
///
/// Returns an error on TOML syntax errors, unknown value types, or values
/// rejected by [`AnalysisConfig::validate`].
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = toml::from_str(content).context("Failed to parse config")?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or defaults when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Invalid config {}", path.display()))
}
