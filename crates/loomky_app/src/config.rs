//! Site configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file yields the
//! settings the production site ships with:
//!
//! ```toml
//! [reveal]
//! section_threshold = 0.15
//! counter_threshold = 0.5
//!
//! [counter]
//! duration_ms = 2000
//!
//! [navigation]
//! header_demo_delay_ms = 400
//! cta_delay_ms = 500
//! contact_submit_delay_ms = 1500
//!
//! [[stats]]
//! target = 15
//! prefix = "+"
//! suffix = "h"
//! label = "hours saved per week"
//! ```

use crate::error::Result;
use loomky_animation::{CounterSpec, DEFAULT_DURATION_MS};
use loomky_core::Threshold;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level site configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub navigation: NavigationConfig,
    /// Home page stats banner
    pub stats: Vec<StatConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            counter: CounterConfig::default(),
            navigation: NavigationConfig::default(),
            stats: default_stats(),
        }
    }
}

/// Visibility thresholds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    pub section_threshold: f32,
    pub counter_threshold: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            section_threshold: Threshold::SECTION.ratio(),
            counter_threshold: Threshold::COUNTER.ratio(),
        }
    }
}

impl RevealConfig {
    pub fn section(&self) -> Result<Threshold> {
        Ok(Threshold::new(self.section_threshold)?)
    }

    pub fn counter(&self) -> Result<Threshold> {
        Ok(Threshold::new(self.counter_threshold)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// Simulated latency before each kind of navigation completes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub header_demo_delay_ms: u32,
    pub cta_delay_ms: u32,
    pub contact_submit_delay_ms: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            header_demo_delay_ms: 400,
            cta_delay_ms: 500,
            contact_submit_delay_ms: 1500,
        }
    }
}

/// One animated figure in the stats banner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatConfig {
    pub target: u32,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub label: String,
    /// Overrides `counter.duration_ms` for this stat
    #[serde(default)]
    pub duration_ms: Option<u32>,
}

impl StatConfig {
    pub fn counter_spec(&self, defaults: &CounterConfig) -> CounterSpec {
        CounterSpec::new(self.target)
            .prefix(self.prefix.clone())
            .suffix(self.suffix.clone())
            .duration_ms(self.duration_ms.unwrap_or(defaults.duration_ms))
    }
}

fn stat(target: u32, suffix: &str, label: &str) -> StatConfig {
    StatConfig {
        target,
        prefix: "+".to_string(),
        suffix: suffix.to_string(),
        label: label.to_string(),
        duration_ms: None,
    }
}

fn default_stats() -> Vec<StatConfig> {
    vec![
        stat(15, "h", "hours saved per week"),
        stat(35, "%", "average revenue increase"),
        stat(40, "%", "more 5-star reviews on average"),
    ]
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), stats = config.stats.len(), "loaded site config");
        Ok(config)
    }

    /// Check thresholds and counter durations
    pub fn validate(&self) -> Result<()> {
        self.reveal.section()?;
        self.reveal.counter()?;
        for stat in &self.stats {
            stat.counter_spec(&self.counter).validate()?;
        }
        Ok(())
    }

    /// Counter specs for the stats banner, in display order
    pub fn stat_specs(&self) -> Vec<CounterSpec> {
        self.stats
            .iter()
            .map(|s| s.counter_spec(&self.counter))
            .collect()
    }
}
