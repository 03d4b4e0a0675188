//! Summarizer configuration.
//!
//! A [`SummarizerConfig`] carries every tunable of a summarization run. It is
//! loaded from JSON, checked by the [`super::validation::ValidationEngine`]
//! and then turned into the concrete engines the pipeline uses.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "graph": { "min_n": 3, "max_n": 3, "window": 3, "unit": "character" },
//!   "mcl": { "max_iterations": 100, "expansion": 2, "inflation": 2.0 },
//!   "combine": { "blend": 0.5, "schedule": "fixed", "checkpoint_interval": 20 },
//!   "summary": { "redundancy_threshold": 0.2, "max_sentences": 10 },
//!   "runtime": { "parallelism": 4 },
//!   "strict": false
//! }
//! ```
//!
//! Every section and field is optional; omitted values take their defaults.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::combine::BlendSchedule;
use crate::errors::{Result, SummarizerError};
use crate::graph::builder::NGramGraphCreator;
use crate::mcl::engine::MarkovCluster;
use crate::summarizer::SelectorConfig;
use crate::types::GramUnit;

/// Top-level summarizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default)]
    pub graph: GraphSpec,

    #[serde(default)]
    pub mcl: MclSpec,

    #[serde(default)]
    pub combine: CombineSpec,

    #[serde(default)]
    pub summary: SummarySpec,

    #[serde(default)]
    pub runtime: RuntimeSpec,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

// ─── Sections ───────────────────────────────────────────────────────────────

/// N-gram graph construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSpec {
    #[serde(default = "default_n")]
    pub min_n: usize,

    #[serde(default = "default_n")]
    pub max_n: usize,

    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default)]
    pub unit: GramUnit,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for GraphSpec {
    fn default() -> Self {
        Self {
            min_n: default_n(),
            max_n: default_n(),
            window: default_window(),
            unit: GramUnit::default(),
            unknown_fields: HashMap::new(),
        }
    }
}

/// Markov clustering parameters, shared by event and subtopic clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MclSpec {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_expansion")]
    pub expansion: usize,

    #[serde(default = "default_inflation")]
    pub inflation: f64,

    #[serde(default = "default_prune_epsilon")]
    pub prune_epsilon: f64,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for MclSpec {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            expansion: default_expansion(),
            inflation: default_inflation(),
            prune_epsilon: default_prune_epsilon(),
            tolerance: default_tolerance(),
            unknown_fields: HashMap::new(),
        }
    }
}

/// How the blend factor of Intersect/Merge folds is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// The configured `blend` at every step.
    #[default]
    Fixed,
    /// Equal contribution from every folded graph; `blend` is ignored.
    RunningMean,
}

/// Graph combination folds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineSpec {
    #[serde(default = "default_blend")]
    pub blend: f64,

    #[serde(default)]
    pub schedule: ScheduleType,

    /// Folds between accumulator compactions.
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for CombineSpec {
    fn default() -> Self {
        Self {
            blend: default_blend(),
            schedule: ScheduleType::default(),
            checkpoint_interval: default_checkpoint_interval(),
            unknown_fields: HashMap::new(),
        }
    }
}

/// Sentence selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySpec {
    #[serde(default = "default_redundancy_threshold")]
    pub redundancy_threshold: f64,

    #[serde(default)]
    pub max_sentences: Option<usize>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for SummarySpec {
    fn default() -> Self {
        Self {
            redundancy_threshold: default_redundancy_threshold(),
            max_sentences: None,
            unknown_fields: HashMap::new(),
        }
    }
}

/// Execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeSpec {
    /// Worker threads for a dedicated pool; `None` uses the global pool.
    #[serde(default)]
    pub parallelism: Option<usize>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_n() -> usize {
    3
}
fn default_window() -> usize {
    3
}
fn default_max_iterations() -> usize {
    100
}
fn default_expansion() -> usize {
    2
}
fn default_inflation() -> f64 {
    2.0
}
fn default_prune_epsilon() -> f64 {
    0.01
}
fn default_tolerance() -> f64 {
    1e-6
}
fn default_blend() -> f64 {
    0.5
}
fn default_checkpoint_interval() -> usize {
    20
}
fn default_redundancy_threshold() -> f64 {
    0.2
}

// ─── Loading and conversion ─────────────────────────────────────────────────

impl SummarizerConfig {
    /// Parse a configuration from a JSON string (not validated).
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file (not validated).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SummarizerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Run the default validation rules.
    ///
    /// Warnings are logged; any error turns into
    /// [`SummarizerError::InvalidConfig`] listing every problem found.
    pub fn validated(self) -> Result<Self> {
        let engine = ValidationEngine::with_defaults();
        tracing::debug!(rules = ?engine.rule_names(), "validating configuration");
        let report = engine.validate(&self);

        for warning in report.warnings() {
            tracing::warn!(%warning, "configuration warning");
        }

        match report.render_errors() {
            Some(rendered) => Err(SummarizerError::InvalidConfig(rendered)),
            None => Ok(self),
        }
    }

    /// The graph creator described by the `graph` section
    pub fn creator(&self) -> NGramGraphCreator {
        NGramGraphCreator::new()
            .with_range(self.graph.min_n, self.graph.max_n)
            .with_window(self.graph.window)
            .with_unit(self.graph.unit)
    }

    /// The clustering engine described by the `mcl` section
    pub fn engine(&self) -> MarkovCluster {
        MarkovCluster::new()
            .with_max_iterations(self.mcl.max_iterations)
            .with_expansion(self.mcl.expansion)
            .with_inflation(self.mcl.inflation)
            .with_prune_epsilon(self.mcl.prune_epsilon)
            .with_tolerance(self.mcl.tolerance)
    }

    /// The blend schedule described by the `combine` section
    pub fn schedule(&self) -> BlendSchedule {
        match self.combine.schedule {
            ScheduleType::Fixed => BlendSchedule::Fixed(self.combine.blend),
            ScheduleType::RunningMean => BlendSchedule::RunningMean,
        }
    }

    /// The sentence selection settings described by the `summary` section
    pub fn selector(&self) -> SelectorConfig {
        SelectorConfig {
            redundancy_threshold: self.summary.redundancy_threshold,
            max_sentences: self.summary.max_sentences,
        }
    }
}
