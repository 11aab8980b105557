//! Metabolite nodes and the node position table.

use std::collections::HashMap;

use tracing::debug;

use crate::config::PlotConfig;
use crate::geometry::Point;
use crate::map::MapDocument;
use crate::style::{self, Color};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMetabolite {
    pub internal_id: String,
    pub position: Point,
    pub color: Color,
    pub size: f64,
    pub label: Option<String>,
    pub label_position: Option<Point>,
}

/// Output of a node walk: drawable metabolites plus lookups used by the reaction builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeExtraction {
    pub metabolites: Vec<ResolvedMetabolite>,
    /// Every placed node, metabolites and markers alike, keyed by internal id.
    pub positions: HashMap<String, Point>,
    /// Internal id to display label, for metabolites that have one.
    pub labels: HashMap<String, String>,
}

/// Positions of every node that has both coordinates. Independent of styling.
pub fn node_positions(document: &MapDocument) -> HashMap<String, Point> {
    document
        .nodes
        .iter()
        .filter_map(|(id, node)| node.position.map(|position| (id.clone(), position)))
        .collect()
}

pub fn extract_metabolites(document: &MapDocument, config: &PlotConfig) -> Vec<ResolvedMetabolite> {
    let mut metabolites = Vec::new();
    for (id, node) in &document.nodes {
        let Some(position) = node.position else {
            debug!(node_id = %id, "skipping node without coordinates");
            continue;
        };
        if !node.is_metabolite() {
            continue;
        }
        let identifier = node.text(&config.metabolite_identifier);
        let color = style::resolve(
            identifier,
            &config.metabolite_node_colors,
            config.metabolite_node_color,
        );
        let size = style::resolve_node_size(
            identifier,
            &config.metabolite_node_sizes,
            node.node_is_primary,
            config.metabolite_primary_node_size,
            config.metabolite_secondary_node_size,
        );
        // Labels without their own coordinates sit on the node.
        let label_position = identifier.map(|_| node.label_position.unwrap_or(position));
        metabolites.push(ResolvedMetabolite {
            internal_id: id.clone(),
            position,
            color,
            size,
            label: identifier.map(str::to_string),
            label_position,
        });
    }
    metabolites
}

pub fn label_lookup(metabolites: &[ResolvedMetabolite]) -> HashMap<String, String> {
    metabolites
        .iter()
        .filter_map(|metabolite| {
            metabolite
                .label
                .as_ref()
                .map(|label| (metabolite.internal_id.clone(), label.clone()))
        })
        .collect()
}

pub fn extract_nodes(document: &MapDocument, config: &PlotConfig) -> NodeExtraction {
    let metabolites = extract_metabolites(document, config);
    let labels = label_lookup(&metabolites);
    NodeExtraction {
        positions: node_positions(document),
        metabolites,
        labels,
    }
}
