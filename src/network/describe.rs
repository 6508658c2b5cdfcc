//! Per-node network description
//!
//! Nine centrality measures per node, collected per sample into a wide table and
//! reshaped into the long, ranked and summary forms used for plotting.

use super::graph::InteractionGraph;
use crate::error::{AnalysisError, AnalysisResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tfnet_graph_algorithms::{
    average_neighbor_degree, betweenness_centrality, closeness_centrality, degree_centrality,
    eigenvector_centrality, in_degree_centrality, katz_centrality, load_centrality,
    out_degree_centrality, CentralityConfig, CentralityError, NodeId as ViewNodeId,
};

/// Number of description columns
pub const MEASURE_COUNT: usize = 9;

/// A description column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    DegreeCentrality,
    InDegreeCentrality,
    OutDegreeCentrality,
    ClosenessCentrality,
    BetweennessCentrality,
    EigenvectorCentrality,
    KatzCentrality,
    LoadCentrality,
    AverageNeighborDegree,
}

impl Measure {
    /// Columns in table order
    pub const ALL: [Measure; MEASURE_COUNT] = [
        Measure::DegreeCentrality,
        Measure::InDegreeCentrality,
        Measure::OutDegreeCentrality,
        Measure::ClosenessCentrality,
        Measure::BetweennessCentrality,
        Measure::EigenvectorCentrality,
        Measure::KatzCentrality,
        Measure::LoadCentrality,
        Measure::AverageNeighborDegree,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Measure::DegreeCentrality => "degree_centrality",
            Measure::InDegreeCentrality => "in_degree_centrality",
            Measure::OutDegreeCentrality => "out_degree_centrality",
            Measure::ClosenessCentrality => "closeness_centrality",
            Measure::BetweennessCentrality => "betweenness_centrality",
            Measure::EigenvectorCentrality => "eigenvector_centrality",
            Measure::KatzCentrality => "katz_centrality",
            Measure::LoadCentrality => "load_centrality",
            Measure::AverageNeighborDegree => "average_neighbor_degree",
        }
    }

    fn column(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Measures for one graph: one row per node in graph node order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    pub nodes: Vec<String>,
    pub values: Vec<[f64; MEASURE_COUNT]>,
}

impl GraphDescription {
    pub fn value(&self, node: &str, measure: Measure) -> Option<f64> {
        let idx = self.nodes.iter().position(|n| n == node)?;
        Some(self.values[idx][measure.column()])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Compute every measure; the first failing measure fails the description
pub fn describe(
    graph: &InteractionGraph,
    config: &CentralityConfig,
) -> Result<GraphDescription, CentralityError> {
    if graph.is_empty() {
        return Err(CentralityError::EmptyGraph {
            measure: "network description",
        });
    }

    let view = graph.to_view();
    let columns: [HashMap<ViewNodeId, f64>; MEASURE_COUNT] = [
        degree_centrality(&view),
        in_degree_centrality(&view),
        out_degree_centrality(&view),
        closeness_centrality(&view),
        betweenness_centrality(&view),
        eigenvector_centrality(&view, config)?,
        katz_centrality(&view, config)?,
        load_centrality(&view),
        average_neighbor_degree(&view),
    ];

    let nodes: Vec<String> = graph.nodes().map(str::to_string).collect();
    let values = assemble_rows(nodes.len(), &columns)?;

    Ok(GraphDescription { nodes, values })
}

/// Pivot per-measure maps into per-node rows; every measure must score every node
fn assemble_rows(
    node_count: usize,
    columns: &[HashMap<ViewNodeId, f64>; MEASURE_COUNT],
) -> Result<Vec<[f64; MEASURE_COUNT]>, CentralityError> {
    (0..node_count as u64)
        .map(|id| {
            let mut row = [0.0; MEASURE_COUNT];
            for ((slot, column), measure) in row.iter_mut().zip(columns).zip(Measure::ALL) {
                *slot = *column.get(&id).ok_or(CentralityError::MissingScore {
                    measure: measure.name(),
                    node: id,
                })?;
            }
            Ok(row)
        })
        .collect()
}

/// One wide-table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionRow {
    pub sample: String,
    #[serde(rename = "TF")]
    pub node: String,
    pub values: [f64; MEASURE_COUNT],
}

/// One long-form row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureValue {
    #[serde(rename = "TF")]
    pub node: String,
    pub sample: String,
    pub measure: Measure,
    pub value: f64,
}

/// A long-form row with its rank inside the measure column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue {
    #[serde(flatten)]
    pub value: MeasureValue,
    pub rank: f64,
}

/// Cross-sample spread of one measure for one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureSummary {
    #[serde(rename = "TF")]
    pub node: String,
    pub measure: Measure,
    pub samples: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

/// Per-sample descriptions stacked in sample order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionTable {
    rows: Vec<DescriptionRow>,
}

impl DescriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample's rows
    pub fn push_sample(&mut self, sample: &str, description: GraphDescription) {
        self.rows.extend(
            description
                .nodes
                .into_iter()
                .zip(description.values)
                .map(|(node, values)| DescriptionRow {
                    sample: sample.to_string(),
                    node,
                    values,
                }),
        );
    }

    pub fn rows(&self) -> &[DescriptionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct samples in table order
    pub fn samples(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.sample.as_str()) {
                seen.push(&row.sample);
            }
        }
        seen
    }

    /// Long form: measure-major, then row order
    pub fn melt(&self) -> Vec<MeasureValue> {
        Measure::ALL
            .iter()
            .flat_map(|&measure| {
                self.rows.iter().map(move |row| MeasureValue {
                    node: row.node.clone(),
                    sample: row.sample.clone(),
                    measure,
                    value: row.values[measure.column()],
                })
            })
            .collect()
    }

    /// Long form with average ranks (ties share the mean rank, 1-based) computed
    /// over each whole measure column
    pub fn ranked(&self) -> Vec<RankedValue> {
        let mut out = Vec::with_capacity(self.rows.len() * MEASURE_COUNT);
        for &measure in &Measure::ALL {
            let column: Vec<f64> = self.rows.iter().map(|r| r.values[measure.column()]).collect();
            let ranks = average_ranks(&column);
            for (row, rank) in self.rows.iter().zip(ranks) {
                out.push(RankedValue {
                    value: MeasureValue {
                        node: row.node.clone(),
                        sample: row.sample.clone(),
                        measure,
                        value: row.values[measure.column()],
                    },
                    rank,
                });
            }
        }
        out
    }

    /// Mean and population std per (TF, measure) across samples
    pub fn summary(&self) -> Vec<MeasureSummary> {
        let mut groups: IndexMap<(&str, Measure), Vec<f64>> = IndexMap::new();
        for row in &self.rows {
            for &measure in &Measure::ALL {
                groups
                    .entry((row.node.as_str(), measure))
                    .or_default()
                    .push(row.values[measure.column()]);
            }
        }

        groups
            .into_iter()
            .map(|((node, measure), values)| {
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                MeasureSummary {
                    node: node.to_string(),
                    measure,
                    samples: values.len(),
                    mean,
                    std: var.sqrt(),
                }
            })
            .collect()
    }

    /// Write the wide table: `sample, TF, <measures...>`
    pub fn write_csv(&self, path: impl AsRef<Path>) -> AnalysisResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
        }
        let mut writer = csv::Writer::from_path(path).map_err(|e| AnalysisError::csv(path, e))?;

        let mut header = vec!["sample", "TF"];
        header.extend(Measure::ALL.iter().map(Measure::name));
        writer
            .write_record(&header)
            .map_err(|e| AnalysisError::csv(path, e))?;

        for row in &self.rows {
            let mut record = vec![row.sample.clone(), row.node.clone()];
            record.extend(row.values.iter().map(|v| v.to_string()));
            writer
                .write_record(&record)
                .map_err(|e| AnalysisError::csv(path, e))?;
        }
        writer.flush().map_err(|e| AnalysisError::io(path, e))?;
        Ok(())
    }
}

/// 1-based ranks with ties averaged
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::EdgeAttrs;

    fn triangle_with_tail() -> InteractionGraph {
        // A -> B -> C -> A, C -> D
        let mut g = InteractionGraph::new();
        for (u, v) in [("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")] {
            g.add_edge(u, v, EdgeAttrs::raw(1.0));
        }
        g
    }

    #[test]
    fn test_describe_shape_and_order() {
        let desc = describe(&triangle_with_tail(), &CentralityConfig::default()).unwrap();
        assert_eq!(desc.nodes, vec!["A", "B", "C", "D"]);
        assert_eq!(desc.values.len(), 4);
        for row in &desc.values {
            assert!(row.iter().all(|v| v.is_finite()));
        }

        // C has in 1 + out 2 over n - 1 = 3
        assert_eq!(desc.value("C", Measure::DegreeCentrality), Some(1.0));
        assert_eq!(desc.value("D", Measure::OutDegreeCentrality), Some(0.0));
        assert_eq!(desc.value("D", Measure::AverageNeighborDegree), Some(0.0));
        assert!(desc.value("C", Measure::BetweennessCentrality).unwrap() > 0.0);
        assert_eq!(desc.value("Z", Measure::KatzCentrality), None);
    }

    #[test]
    fn test_describe_surfaces_measure_failure() {
        let config = CentralityConfig {
            eigenvector_max_iter: 1,
            ..CentralityConfig::default()
        };
        assert_eq!(
            describe(&triangle_with_tail(), &config),
            Err(CentralityError::NotConverged { iterations: 1 })
        );
        assert!(matches!(
            describe(&InteractionGraph::new(), &CentralityConfig::default()),
            Err(CentralityError::EmptyGraph { .. })
        ));
    }

    #[test]
    fn test_unscored_node_is_an_error() {
        let mut columns: [HashMap<ViewNodeId, f64>; MEASURE_COUNT] = Default::default();
        for column in columns.iter_mut() {
            column.insert(0, 0.5);
            column.insert(1, 0.25);
        }
        assert_eq!(assemble_rows(2, &columns).unwrap()[1], [0.25; MEASURE_COUNT]);

        columns[Measure::KatzCentrality.column()].remove(&1);
        assert_eq!(
            assemble_rows(2, &columns),
            Err(CentralityError::MissingScore {
                measure: "katz_centrality",
                node: 1,
            })
        );
    }

    #[test]
    fn test_edge_weights_move_spectral_measures_only() {
        let mut heavy = InteractionGraph::new();
        for (u, v, w) in [("A", "B", 9.0), ("B", "C", 5.0), ("C", "A", 1.0), ("C", "D", 2.0)] {
            heavy.add_edge(u, v, EdgeAttrs::raw(w));
        }
        let config = CentralityConfig::default();
        let plain = describe(&triangle_with_tail(), &config).unwrap();
        let weighted = describe(&heavy, &config).unwrap();

        for measure in [Measure::EigenvectorCentrality, Measure::KatzCentrality] {
            assert_ne!(
                plain.value("B", measure),
                weighted.value("B", measure),
                "{measure} should depend on weights"
            );
        }
        for measure in [Measure::ClosenessCentrality, Measure::BetweennessCentrality] {
            assert_eq!(plain.value("B", measure), weighted.value("B", measure));
        }
    }

    fn table() -> DescriptionTable {
        let mut t = DescriptionTable::new();
        t.push_sample(
            "s1",
            GraphDescription {
                nodes: vec!["A".into(), "B".into()],
                values: vec![[1.0; MEASURE_COUNT], [3.0; MEASURE_COUNT]],
            },
        );
        t.push_sample(
            "s2",
            GraphDescription {
                nodes: vec!["A".into()],
                values: vec![[3.0; MEASURE_COUNT]],
            },
        );
        t
    }

    #[test]
    fn test_table_shape() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(t.samples(), vec!["s1", "s2"]);
        assert_eq!(t.rows()[2].sample, "s2");

        let long = t.melt();
        assert_eq!(long.len(), 3 * MEASURE_COUNT);
        assert_eq!(long[0].measure, Measure::DegreeCentrality);
        assert_eq!(long[3].measure, Measure::InDegreeCentrality);
        assert_eq!(long[3].node, "A");
    }

    #[test]
    fn test_ranks_average_ties() {
        assert_eq!(average_ranks(&[1.0, 3.0, 3.0]), vec![1.0, 2.5, 2.5]);
        assert_eq!(average_ranks(&[5.0, 1.0, 3.0]), vec![3.0, 1.0, 2.0]);

        let ranked = table().ranked();
        assert_eq!(ranked.len(), 3 * MEASURE_COUNT);
        assert_eq!(ranked[0].rank, 1.0);
        assert_eq!(ranked[1].rank, 2.5);
        assert_eq!(ranked[2].rank, 2.5);
    }

    #[test]
    fn test_summary_mean_std() {
        let summary = table().summary();
        assert_eq!(summary.len(), 2 * MEASURE_COUNT);
        let a = &summary[0];
        assert_eq!(a.node, "A");
        assert_eq!(a.measure, Measure::DegreeCentrality);
        assert_eq!(a.samples, 2);
        assert_eq!(a.mean, 2.0);
        assert_eq!(a.std, 1.0);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("desc.csv");
        table().write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("sample,TF,degree_centrality,in_degree_centrality"));
        assert!(header.ends_with("average_neighbor_degree"));
        assert_eq!(lines.count(), 3);
    }
}
