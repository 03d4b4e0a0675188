//! Pipeline observer: hooks for logging, profiling and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Event-level stages fire once per run; sentence-level stages
//! fire once per event, in event order.

use std::time::{Duration, Instant};

use crate::graph::ngram::NGramGraph;
use crate::mcl::ClusterAssignment;

// ─── Stage names ────────────────────────────────────────────────────────────

/// Document clustering into events.
pub const STAGE_EVENTS: &str = "events";
/// Sentence splitting and sentence graph construction.
pub const STAGE_SENTENCES: &str = "sentences";
/// Sentence similarity matrix and subtopic clustering.
pub const STAGE_SUBTOPICS: &str = "subtopics";
/// Intersect folds per subtopic and the Merge fold into the essence.
pub const STAGE_ESSENCE: &str = "essence";
/// Scoring, redundancy filtering and the length cap.
pub const STAGE_SELECT: &str = "select";

// ─── Timing ─────────────────────────────────────────────────────────────────

/// Wall-clock timer for a single stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// What a finished stage reports. Only `elapsed` is always present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    nodes: Option<usize>,
    edges: Option<usize>,
    clusters: Option<usize>,
    iterations: Option<usize>,
    converged: Option<bool>,
    delta: Option<f64>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total graph vertices built by the stage
    pub fn nodes(&self) -> Option<usize> {
        self.nodes
    }

    /// Total graph edges built by the stage
    pub fn edges(&self) -> Option<usize> {
        self.edges
    }

    pub fn clusters(&self) -> Option<usize> {
        self.clusters
    }

    /// MCL iterations run
    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn converged(&self) -> Option<bool> {
        self.converged
    }

    /// Final MCL change between iterations
    pub fn delta(&self) -> Option<f64> {
        self.delta
    }
}

/// Builder for reports carrying stage metrics.
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn nodes(mut self, nodes: usize) -> Self {
        self.report.nodes = Some(nodes);
        self
    }

    pub fn edges(mut self, edges: usize) -> Self {
        self.report.edges = Some(edges);
        self
    }

    pub fn clusters(mut self, clusters: usize) -> Self {
        self.report.clusters = Some(clusters);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.report.iterations = Some(iterations);
        self
    }

    pub fn converged(mut self, converged: bool) -> Self {
        self.report.converged = Some(converged);
        self
    }

    pub fn delta(mut self, delta: f64) -> Self {
        self.report.delta = Some(delta);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ─── Observer trait ─────────────────────────────────────────────────────────

/// Receives callbacks during a pipeline run. Every hook defaults to a no-op.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Documents grouped into events (element ids are document positions).
    fn on_events(&mut self, _events: &ClusterAssignment) {}

    /// Sentences of one event grouped into subtopics.
    fn on_subtopics(&mut self, _event_id: usize, _subtopics: &ClusterAssignment) {}

    /// The essence graph of one event.
    fn on_essence(&mut self, _event_id: usize, _essence: &NGramGraph) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records the report of every finished stage, in order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Reports of one stage, in the order they finished
    pub fn reports_for(&self, stage: &str) -> Vec<&StageReport> {
        self.reports
            .iter()
            .filter(|(name, _)| *name == stage)
            .map(|(_, report)| report)
            .collect()
    }

    /// Total time spent in one stage across all events
    pub fn total(&self, stage: &str) -> Duration {
        self.reports_for(stage).iter().map(|r| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder() {
        let report = StageReportBuilder::new(Duration::from_millis(3))
            .clusters(2)
            .iterations(7)
            .converged(true)
            .delta(1e-9)
            .build();

        assert_eq!(report.elapsed(), Duration::from_millis(3));
        assert_eq!(report.clusters(), Some(2));
        assert_eq!(report.iterations(), Some(7));
        assert_eq!(report.converged(), Some(true));
        assert!(report.nodes().is_none());
    }

    #[test]
    fn test_timing_observer_groups_by_stage() {
        let mut obs = StageTimingObserver::new();
        obs.on_stage_end(STAGE_EVENTS, &StageReport::new(Duration::from_millis(1)));
        obs.on_stage_end(STAGE_SELECT, &StageReport::new(Duration::from_millis(2)));
        obs.on_stage_end(STAGE_SELECT, &StageReport::new(Duration::from_millis(4)));

        assert_eq!(obs.reports().len(), 3);
        assert_eq!(obs.reports_for(STAGE_SELECT).len(), 2);
        assert_eq!(obs.total(STAGE_SELECT), Duration::from_millis(6));
        assert_eq!(obs.total(STAGE_ESSENCE), Duration::ZERO);
    }

    #[test]
    fn test_noop_observer_accepts_everything() {
        let mut obs = NoopObserver;
        obs.on_stage_start(STAGE_EVENTS);
        obs.on_events(&ClusterAssignment::singletons(2));
        obs.on_essence(0, &NGramGraph::new());
    }
}
