//! Validation engine for summarizer configurations.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`SummarizerConfig`] and collects every diagnostic into a
//! [`ValidationReport`]. It never short-circuits on the first error, so
//! users see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_ngg::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&config);
//! if let Some(errors) = report.render_errors() {
//!     eprintln!("{errors}");
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::config::{ScheduleType, SummarizerConfig};
use super::error_code::ErrorCode;
use super::errors::ConfigError;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding with its severity.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: ConfigError,
}

impl ValidationDiagnostic {
    pub fn error(err: ConfigError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: ConfigError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &ConfigError> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &ConfigError> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Every error rendered on its own line, or `None` when there are none
    pub fn render_errors(&self) -> Option<String> {
        let lines: Vec<String> = self.errors().map(|e| e.to_string()).collect();
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`SummarizerConfig`] and returns
/// zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"mcl_params"`).
    fn name(&self) -> &str;

    /// Inspect `config` and return any findings.
    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a [`SummarizerConfig`] and
/// collects all diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine with one rule per config section plus the unknown-field check
    pub fn with_defaults() -> Self {
        Self {
            rules: vec![
                Box::new(NGramRangeRule),
                Box::new(MclParamsRule),
                Box::new(CombineParamsRule),
                Box::new(SummaryParamsRule),
                Box::new(RuntimeRule),
                Box::new(UnknownFieldsRule),
            ],
        }
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `config` and return the collected report.
    pub fn validate(&self, config: &SummarizerConfig) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(config));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn out_of_range(path: &str, message: impl Into<String>, hint: &str) -> ValidationDiagnostic {
    ValidationDiagnostic::error(
        ConfigError::new(ErrorCode::OutOfRange, path, message).with_hint(hint),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. n-gram range and window ─────────────────────────────────────────────

struct NGramRangeRule;

impl ValidationRule for NGramRangeRule {
    fn name(&self) -> &str {
        "ngram_range"
    }

    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic> {
        let graph = &config.graph;
        let mut out = Vec::new();

        if graph.min_n == 0 {
            out.push(out_of_range(
                "/graph/min_n",
                "min_n must be at least 1",
                "Use 3 for character n-grams or 1 for word n-grams",
            ));
        }

        if graph.min_n > graph.max_n {
            out.push(ValidationDiagnostic::error(
                ConfigError::new(
                    ErrorCode::InvalidCombo,
                    "/graph/min_n",
                    format!(
                        "min_n ({}) must not exceed max_n ({})",
                        graph.min_n, graph.max_n
                    ),
                )
                .with_hint("Raise max_n or lower min_n"),
            ));
        }

        if graph.window == 0 {
            out.push(out_of_range(
                "/graph/window",
                "window must be at least 1",
                "Use 3 for the classic setting",
            ));
        }

        out
    }
}

// ─── 2. MCL parameters ──────────────────────────────────────────────────────

struct MclParamsRule;

impl ValidationRule for MclParamsRule {
    fn name(&self) -> &str {
        "mcl_params"
    }

    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic> {
        let mcl = &config.mcl;
        let mut out = Vec::new();

        if mcl.max_iterations == 0 {
            out.push(out_of_range(
                "/mcl/max_iterations",
                "max_iterations must be at least 1",
                "The default is 100",
            ));
        }
        if mcl.expansion < 2 {
            out.push(out_of_range(
                "/mcl/expansion",
                format!("expansion must be at least 2, got {}", mcl.expansion),
                "An expansion of 1 never spreads flow; use 2",
            ));
        }
        if !(mcl.inflation > 1.0) {
            out.push(out_of_range(
                "/mcl/inflation",
                format!("inflation must be greater than 1, got {}", mcl.inflation),
                "Typical values are between 1.4 and 6; the default is 2",
            ));
        }
        if !(0.0..1.0).contains(&mcl.prune_epsilon) {
            out.push(out_of_range(
                "/mcl/prune_epsilon",
                format!("prune_epsilon must be in [0, 1), got {}", mcl.prune_epsilon),
                "The default is 0.01",
            ));
        }
        if !(mcl.tolerance > 0.0) {
            out.push(out_of_range(
                "/mcl/tolerance",
                format!("tolerance must be positive, got {}", mcl.tolerance),
                "The default is 1e-6",
            ));
        }

        out
    }
}

// ─── 3. Combination folds ───────────────────────────────────────────────────

struct CombineParamsRule;

impl ValidationRule for CombineParamsRule {
    fn name(&self) -> &str {
        "combine_params"
    }

    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic> {
        let combine = &config.combine;
        let mut out = Vec::new();

        let blend_ok = combine.blend > 0.0 && combine.blend < 1.0;
        if !blend_ok {
            let diag = ConfigError::new(
                ErrorCode::OutOfRange,
                "/combine/blend",
                format!("blend must be in (0, 1), got {}", combine.blend),
            )
            .with_hint("The default is 0.5");

            // The blend factor is unused by the running mean schedule
            out.push(match combine.schedule {
                ScheduleType::Fixed => ValidationDiagnostic::error(diag),
                ScheduleType::RunningMean => ValidationDiagnostic::warning(diag),
            });
        }

        if combine.checkpoint_interval == 0 {
            out.push(out_of_range(
                "/combine/checkpoint_interval",
                "checkpoint_interval must be at least 1",
                "The default is 20",
            ));
        }

        out
    }
}

// ─── 4. Sentence selection ──────────────────────────────────────────────────

struct SummaryParamsRule;

impl ValidationRule for SummaryParamsRule {
    fn name(&self) -> &str {
        "summary_params"
    }

    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic> {
        let summary = &config.summary;
        let mut out = Vec::new();

        if !(0.0..=1.0).contains(&summary.redundancy_threshold) {
            out.push(out_of_range(
                "/summary/redundancy_threshold",
                format!(
                    "redundancy_threshold must be in [0, 1], got {}",
                    summary.redundancy_threshold
                ),
                "The default is 0.2",
            ));
        }

        if summary.max_sentences == Some(0) {
            out.push(out_of_range(
                "/summary/max_sentences",
                "max_sentences must be greater than 0",
                "Remove max_sentences to disable the cap, or set it to a positive value",
            ));
        }

        out
    }
}

// ─── 5. Runtime ─────────────────────────────────────────────────────────────

struct RuntimeRule;

impl ValidationRule for RuntimeRule {
    fn name(&self) -> &str {
        "runtime"
    }

    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic> {
        if config.runtime.parallelism == Some(0) {
            vec![out_of_range(
                "/runtime/parallelism",
                "parallelism must be greater than 0",
                "Remove parallelism to use the global thread pool",
            )]
        } else {
            vec![]
        }
    }
}

// ─── 6. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Collect unknown-field diagnostics at the given JSON pointer `path`
    /// from a `HashMap` of extra fields captured by `#[serde(flatten)]`.
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();

        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    ConfigError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, config: &SummarizerConfig) -> Vec<ValidationDiagnostic> {
        let strict = config.strict;
        let sections: [(&str, &HashMap<String, serde_json::Value>); 6] = [
            ("", &config.unknown_fields),
            ("/graph", &config.graph.unknown_fields),
            ("/mcl", &config.mcl.unknown_fields),
            ("/combine", &config.combine.unknown_fields),
            ("/summary", &config.summary.unknown_fields),
            ("/runtime", &config.runtime.unknown_fields),
        ];

        sections
            .into_iter()
            .flat_map(|(path, unknowns)| Self::check_unknowns(path, unknowns, strict))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
