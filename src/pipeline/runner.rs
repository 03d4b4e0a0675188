//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! [`SummarizationPipeline::run`] detects events among the input documents,
//! then summarizes every event on its own:
//!
//! 1. Split the event's documents into one flat sentence list
//! 2. Cluster the sentences into subtopics (similarity matrix + MCL)
//! 3. Fold Intersect over each subtopic's sentence graphs, in sentence order
//! 4. Fold Merge over the subtopic graphs, in cluster order, into the essence
//! 5. Rank sentences against the essence and drop redundant ones
//!
//! Events never share state. An event that fails is logged and left out of
//! the [`Summary`].
//!
//! # Static dispatch
//!
//! The pipeline is generic over its sentence splitter and event detector, so
//! each combination is monomorphized. Use [`SummarizationPipeline::with_splitter`]
//! and [`SummarizationPipeline::with_detector`] to swap them.

use rayon::prelude::*;

use crate::combine::{BlendSchedule, GraphFold, Intersect, Merge};
use crate::errors::{Result, SummarizerError};
use crate::graph::builder::NGramGraphCreator;
use crate::graph::ngram::NGramGraph;
use crate::mcl::engine::MarkovCluster;
use crate::nlp::splitter::{SentenceSplitter, UnicodeSentenceSplitter};
use crate::pipeline::artifacts::SentenceSet;
use crate::pipeline::config::SummarizerConfig;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_ESSENCE,
    STAGE_EVENTS, STAGE_SELECT, STAGE_SENTENCES, STAGE_SUBTOPICS,
};
use crate::pipeline::traits::{EventDetector, MclEventDetector, Summarizer};
use crate::similarity::matrix::SimilarityMatrixBuilder;
use crate::summarizer::{SelectorConfig, SentenceSelector};
use crate::types::{EventSummary, Summary, TextUnit};

/// Enter a tracing span for a pipeline stage. The span closes at the end of
/// the enclosing block.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// SummarizationPipeline
// ============================================================================

/// The n-gram graph multi-document summarizer.
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `Sp`  | [`SentenceSplitter`] | [`UnicodeSentenceSplitter`] |
/// | `D`   | [`EventDetector`] | [`MclEventDetector`] |
#[derive(Debug, Clone)]
pub struct SummarizationPipeline<Sp = UnicodeSentenceSplitter, D = MclEventDetector> {
    splitter: Sp,
    detector: D,
    creator: NGramGraphCreator,
    engine: MarkovCluster,
    schedule: BlendSchedule,
    checkpoint_interval: usize,
    selector: SelectorConfig,
    parallelism: Option<usize>,
}

impl Default for SummarizationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SummarizationPipeline {
    /// Pipeline with every setting at its default.
    pub fn new() -> Self {
        Self::from_config(&SummarizerConfig::default())
    }

    /// Pipeline described by `config`. The config is taken as is; call
    /// [`SummarizerConfig::validated`] first for user input.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        let creator = config.creator();
        let engine = config.engine();
        Self {
            splitter: UnicodeSentenceSplitter::new(),
            detector: MclEventDetector::new(creator, engine.clone()),
            creator,
            engine,
            schedule: config.schedule(),
            checkpoint_interval: config.combine.checkpoint_interval,
            selector: config.selector(),
            parallelism: config.runtime.parallelism,
        }
    }
}

impl<Sp, D> SummarizationPipeline<Sp, D> {
    /// Replace the sentence splitter.
    pub fn with_splitter<T: SentenceSplitter>(self, splitter: T) -> SummarizationPipeline<T, D> {
        SummarizationPipeline {
            splitter,
            detector: self.detector,
            creator: self.creator,
            engine: self.engine,
            schedule: self.schedule,
            checkpoint_interval: self.checkpoint_interval,
            selector: self.selector,
            parallelism: self.parallelism,
        }
    }

    /// Replace the event detector.
    pub fn with_detector<T: EventDetector>(self, detector: T) -> SummarizationPipeline<Sp, T> {
        SummarizationPipeline {
            splitter: self.splitter,
            detector,
            creator: self.creator,
            engine: self.engine,
            schedule: self.schedule,
            checkpoint_interval: self.checkpoint_interval,
            selector: self.selector,
            parallelism: self.parallelism,
        }
    }

    /// Run on a dedicated pool of `threads` workers.
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
}

// ============================================================================
// Running
// ============================================================================

impl<Sp, D> SummarizationPipeline<Sp, D>
where
    Sp: SentenceSplitter,
    D: EventDetector,
{
    /// Summarize `documents`, notifying `observer` at every stage boundary.
    ///
    /// Only the creation of a dedicated thread pool can fail; failures inside
    /// an event drop that event from the summary.
    pub fn run<O>(&self, documents: &[TextUnit], observer: &mut O) -> Result<Summary>
    where
        O: PipelineObserver + Send,
    {
        match self.parallelism {
            None => Ok(self.summarize_all(documents, observer)),
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SummarizerError::ThreadPool(e.to_string()))?;
                Ok(pool.install(|| self.summarize_all(documents, observer)))
            }
        }
    }

    fn summarize_all(&self, documents: &[TextUnit], observer: &mut impl PipelineObserver) -> Summary {
        let events = {
            trace_stage!(STAGE_EVENTS);
            observer.on_stage_start(STAGE_EVENTS);
            let clock = StageClock::start();
            let events = self.detector.detect(documents);
            let report = StageReportBuilder::new(clock.elapsed())
                .clusters(events.len())
                .build();
            observer.on_stage_end(STAGE_EVENTS, &report);
            events
        };
        observer.on_events(&events);
        tracing::info!(
            documents = documents.len(),
            events = events.len(),
            "detected events"
        );

        let mut summary = Summary::new();
        for (event_id, members) in events.iter() {
            match self.summarize_event(event_id, documents, members, observer) {
                Ok(event) => {
                    summary.events.insert(event_id, event);
                }
                Err(err) => {
                    tracing::warn!(event_id, error = %err, "skipping event");
                }
            }
        }
        summary
    }

    /// Summarize one event given the positions of its documents.
    pub fn summarize_event(
        &self,
        event_id: usize,
        documents: &[TextUnit],
        members: &[usize],
        observer: &mut impl PipelineObserver,
    ) -> Result<EventSummary> {
        let event_docs: Vec<&TextUnit> = members.iter().map(|&i| &documents[i]).collect();

        // Stage 1: sentences and their graphs
        let (sentences, graphs) = {
            trace_stage!(STAGE_SENTENCES);
            observer.on_stage_start(STAGE_SENTENCES);
            let clock = StageClock::start();
            let sentences = SentenceSet::split(&event_docs, &self.splitter);
            let graphs = sentences.graphs(&self.creator);
            let report = StageReportBuilder::new(clock.elapsed())
                .nodes(graphs.total_vertices())
                .edges(graphs.total_edges())
                .build();
            observer.on_stage_end(STAGE_SENTENCES, &report);
            (sentences, graphs)
        };

        if sentences.is_empty() {
            return Err(SummarizerError::EmptyEvent { event_id });
        }

        // Stage 2: subtopic clustering
        let subtopics = {
            trace_stage!(STAGE_SUBTOPICS);
            observer.on_stage_start(STAGE_SUBTOPICS);
            let clock = StageClock::start();
            let matrix = SimilarityMatrixBuilder::new(self.creator).build_from_graphs(graphs.as_slice());
            let result = self.engine.run(&matrix);
            let report = StageReportBuilder::new(clock.elapsed())
                .clusters(result.assignment.len())
                .iterations(result.iterations)
                .converged(result.converged)
                .delta(result.delta)
                .build();
            observer.on_stage_end(STAGE_SUBTOPICS, &report);
            result.assignment
        };
        observer.on_subtopics(event_id, &subtopics);
        tracing::info!(
            event_id,
            documents = members.len(),
            sentences = sentences.len(),
            subtopics = subtopics.len(),
            "clustered subtopics"
        );

        // Stage 3: subtopic graphs and the event essence
        let essence = {
            trace_stage!(STAGE_ESSENCE);
            observer.on_stage_start(STAGE_ESSENCE);
            let clock = StageClock::start();
            let intersect = GraphFold::new(Intersect)
                .with_schedule(self.schedule)
                .with_checkpoint_interval(self.checkpoint_interval);
            let merge = GraphFold::new(Merge)
                .with_schedule(self.schedule)
                .with_checkpoint_interval(self.checkpoint_interval);

            let subtopic_graphs: Vec<NGramGraph> = subtopics
                .clusters()
                .par_iter()
                .map(|positions| intersect.fold(graphs.select(positions)))
                .collect();
            let essence = merge.fold(&subtopic_graphs);

            let report = StageReportBuilder::new(clock.elapsed())
                .nodes(essence.vertex_count())
                .edges(essence.edge_count())
                .build();
            observer.on_stage_end(STAGE_ESSENCE, &report);
            essence
        };
        observer.on_essence(event_id, &essence);

        // Stage 4: scoring and redundancy removal
        let selected = {
            trace_stage!(STAGE_SELECT);
            observer.on_stage_start(STAGE_SELECT);
            let clock = StageClock::start();
            let selected = SentenceSelector::with_config(self.selector.clone()).select(
                &sentences.texts(),
                graphs.as_slice(),
                &essence,
            );
            observer.on_stage_end(STAGE_SELECT, &StageReport::new(clock.elapsed()));
            selected
        };

        Ok(EventSummary {
            event_id,
            document_ids: event_docs.iter().map(|d| d.id.clone()).collect(),
            subtopics: subtopics.len(),
            sentences: selected,
        })
    }
}

impl<Sp, D> Summarizer for SummarizationPipeline<Sp, D>
where
    Sp: SentenceSplitter,
    D: EventDetector,
{
    fn summarize(&self, documents: &[TextUnit]) -> Result<Summary> {
        self.run(documents, &mut NoopObserver)
    }
}

// ============================================================================
// Tests
// ============================================================================
