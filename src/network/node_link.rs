//! Node-link JSON
//!
//! The layout read and written by networkx's `node_link_data`: a `nodes` list of
//! `{id}` objects and a `links` list of `{source, target, ...attrs}` objects.

use super::graph::{EdgeAttrs, GraphError, InteractionGraph};
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAttributes {
    #[serde(default)]
    pub averaged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub source: String,
    pub target: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Serialized graph document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub multigraph: bool,
    #[serde(default)]
    pub graph: GraphAttributes,
    pub nodes: Vec<NodeEntry>,
    pub links: Vec<LinkEntry>,
}

pub fn to_node_link(graph: &InteractionGraph) -> NodeLinkGraph {
    NodeLinkGraph {
        directed: true,
        multigraph: false,
        graph: GraphAttributes {
            averaged: graph.is_averaged(),
        },
        nodes: graph
            .nodes()
            .map(|id| NodeEntry { id: id.to_string() })
            .collect(),
        links: graph
            .edges()
            .map(|(source, target, attrs)| LinkEntry {
                source: source.to_string(),
                target: target.to_string(),
                weight: attrs.weight,
                count: attrs.count,
            })
            .collect(),
    }
}

/// Rebuild a graph; links must only reference listed nodes
pub fn from_node_link(doc: &NodeLinkGraph) -> Result<InteractionGraph, GraphError> {
    let mut graph = InteractionGraph::new();
    for node in &doc.nodes {
        graph.add_node(&node.id);
    }
    for link in &doc.links {
        let source = graph
            .node_id(&link.source)
            .ok_or_else(|| GraphError::UnknownEndpoint(link.source.clone()))?;
        let target = graph
            .node_id(&link.target)
            .ok_or_else(|| GraphError::UnknownEndpoint(link.target.clone()))?;
        graph.add_edge_by_id(
            source,
            target,
            EdgeAttrs {
                weight: link.weight,
                count: link.count,
            },
        )?;
    }
    graph.set_averaged(doc.graph.averaged);
    Ok(graph)
}

/// Write pretty-printed node-link JSON, creating parent directories
pub fn write_node_link(graph: &InteractionGraph, path: impl AsRef<Path>) -> AnalysisResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(&to_node_link(graph))?;
    std::fs::write(path, json).map_err(|e| AnalysisError::io(path, e))?;
    info!(
        "Wrote graph with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}

pub fn read_node_link(path: impl AsRef<Path>) -> AnalysisResult<InteractionGraph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let doc: NodeLinkGraph = serde_json::from_str(&text)?;
    Ok(from_node_link(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{average_weights, intersect_sum_weights, CountPolicy};

    fn merged() -> InteractionGraph {
        let mut g1 = InteractionGraph::new();
        g1.add_edge("SPI1", "IRF8", EdgeAttrs::raw(1.0));
        g1.add_edge("IRF8", "SPI1", EdgeAttrs::raw(2.0));
        let mut g2 = g1.clone();
        g2.add_edge("SPI1", "IRF8", EdgeAttrs::raw(3.0));
        average_weights(intersect_sum_weights(&g1, &g2, CountPolicy::Symmetric))
    }

    #[test]
    fn test_document_layout() {
        let value = serde_json::to_value(to_node_link(&merged())).unwrap();
        assert_eq!(value["directed"], true);
        assert_eq!(value["multigraph"], false);
        assert_eq!(value["graph"]["averaged"], true);
        assert_eq!(value["nodes"][0]["id"], "SPI1");
        assert_eq!(value["links"][0]["source"], "SPI1");
        assert_eq!(value["links"][0]["weight"], 2.0);
        assert_eq!(value["links"][0]["count"], 2);
    }

    #[test]
    fn test_raw_edges_omit_count() {
        let mut g = InteractionGraph::new();
        g.add_edge("A", "B", EdgeAttrs::raw(1.0));
        let value = serde_json::to_value(to_node_link(&g)).unwrap();
        assert!(value["links"][0].get("count").is_none());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("master.json");
        let graph = merged();

        write_node_link(&graph, &path).unwrap();
        let back = read_node_link(&path).unwrap();
        assert_eq!(back, graph);
        assert!(back.is_averaged());
    }

    #[test]
    fn test_unknown_link_endpoint() {
        let doc: NodeLinkGraph = serde_json::from_str(
            r#"{"directed": true, "multigraph": false, "graph": {},
                "nodes": [{"id": "A"}],
                "links": [{"source": "A", "target": "B", "weight": 1.0}]}"#,
        )
        .unwrap();
        assert_eq!(
            from_node_link(&doc),
            Err(GraphError::UnknownEndpoint("B".to_string()))
        );
    }
}
