//! Analysis orchestration
//!
//! Loads and describes every selected sample, folds the per-sample graphs into
//! the master intersection in sample order, and writes the outputs. All state
//! lives in an explicit [`AnalysisContext`].

use crate::clinical::{ClinicalAnnotator, ClinicalTable};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::network::{
    describe, load_network, write_node_link, DescriptionTable, GraphDescription,
    InteractionGraph, MasterGraph,
};
use crate::sample::{load_manifest, select_for_analysis, Sample};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Configuration plus the clinical table, shared read-only by every stage
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub config: AnalysisConfig,
    pub clinical: ClinicalTable,
}

impl AnalysisContext {
    pub fn new(config: AnalysisConfig, clinical: ClinicalTable) -> Self {
        Self { config, clinical }
    }

    /// Build a context, reading the clinical table named by the config
    pub fn load(config: AnalysisConfig) -> AnalysisResult<Self> {
        let clinical = ClinicalTable::load(&config.clinical_annotation)?;
        Ok(Self::new(config, clinical))
    }

    pub fn annotator(&self) -> ClinicalAnnotator<'_> {
        ClinicalAnnotator::new(&self.clinical, &self.config.cohort)
    }

    /// Manifest samples, annotated, before cohort selection
    pub fn annotated_samples(&self) -> AnalysisResult<Vec<Sample>> {
        let mut samples = load_manifest(&self.config.sample_sheet)?;
        self.annotator().annotate(&mut samples)?;
        Ok(samples)
    }

    /// Annotated cohort samples minus the exclusion list, in manifest order
    pub fn prepare_samples(&self) -> AnalysisResult<Vec<Sample>> {
        let samples = self.annotated_samples()?;
        let selected = select_for_analysis(&samples, &self.config.cohort, &self.config.exclude);
        info!(
            "Selected {} of {} samples for network analysis",
            selected.len(),
            samples.len()
        );
        Ok(selected)
    }
}

/// Size of one sample's network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub sample: String,
    pub nodes: usize,
    pub edges: usize,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub samples: Vec<SampleSummary>,
    pub descriptions: DescriptionTable,
    /// Averaged intersection of all sample graphs
    pub master: InteractionGraph,
}

/// Load one sample's network and describe it
pub fn describe_sample(
    config: &AnalysisConfig,
    sample: &Sample,
) -> AnalysisResult<(InteractionGraph, GraphDescription)> {
    let graph = load_network(config.network_path(&sample.name))?;
    let description =
        describe(&graph, &config.centrality).map_err(|source| AnalysisError::Centrality {
            sample: sample.name.clone(),
            source,
        })?;
    info!(
        "Described {} ({} nodes, {} edges)",
        sample.name,
        graph.node_count(),
        graph.edge_count()
    );
    Ok((graph, description))
}

struct Accumulator {
    master: MasterGraph,
    descriptions: DescriptionTable,
    samples: Vec<SampleSummary>,
}

impl Accumulator {
    fn absorb(&mut self, sample: &Sample, graph: InteractionGraph, description: GraphDescription) {
        self.samples.push(SampleSummary {
            sample: sample.name.clone(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        });
        self.descriptions.push_sample(&sample.name, description);
        self.master.merge(graph);
        debug!(
            "Master graph after {} samples: {} edges",
            self.master.merged(),
            self.master.current().map_or(0, |g| g.edge_count())
        );
    }
}

/// Describe every sample and fold the graphs into the averaged master graph.
///
/// The first failing sample (in sample order) aborts the run.
pub fn run_analysis(ctx: &AnalysisContext, samples: &[Sample]) -> AnalysisResult<AnalysisOutcome> {
    if samples.is_empty() {
        return Err(AnalysisError::NoSamples);
    }

    let mut acc = Accumulator {
        master: MasterGraph::new(ctx.config.count_policy),
        descriptions: DescriptionTable::new(),
        samples: Vec::with_capacity(samples.len()),
    };

    if ctx.config.parallel_describe {
        let results: Vec<_> = samples
            .par_iter()
            .map(|sample| describe_sample(&ctx.config, sample))
            .collect();
        for (sample, result) in samples.iter().zip(results) {
            let (graph, description) = result?;
            acc.absorb(sample, graph, description);
        }
    } else {
        for sample in samples {
            let (graph, description) = describe_sample(&ctx.config, sample)?;
            acc.absorb(sample, graph, description);
        }
    }

    let master = acc.master.finish().ok_or(AnalysisError::NoSamples)?;
    info!(
        "Master graph over {} samples: {} nodes, {} edges",
        acc.samples.len(),
        master.node_count(),
        master.edge_count()
    );

    Ok(AnalysisOutcome {
        samples: acc.samples,
        descriptions: acc.descriptions,
        master,
    })
}

/// Write the master graph and, when configured, the description table
pub fn write_outputs(config: &AnalysisConfig, outcome: &AnalysisOutcome) -> AnalysisResult<()> {
    write_node_link(&outcome.master, &config.master_graph_output)?;
    if let Some(path) = &config.description_output {
        outcome.descriptions.write_csv(path)?;
        info!("Wrote description table to {}", path.display());
    }
    Ok(())
}

/// Select samples, analyse them and write the outputs
pub fn run(ctx: &AnalysisContext) -> AnalysisResult<AnalysisOutcome> {
    let samples = ctx.prepare_samples()?;
    let outcome = run_analysis(ctx, &samples)?;
    write_outputs(&ctx.config, &outcome)?;
    Ok(outcome)
}
