//! Rendering options for a map and the per-entity override maps.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::style::Color;

pub const DEFAULT_IDENTIFIER: &str = "bigg_id";
pub const DEFAULT_CURVE_SAMPLES: usize = 100;

/// Which way a reaction carries flux.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Bidirectional,
}

impl Direction {
    /// Signs to evaluate stoichiometric targets against: +1 forward, -1 backward.
    pub fn signs(self) -> &'static [f64] {
        match self {
            Direction::Forward => &[1.0],
            Direction::Backward => &[-1.0],
            Direction::Bidirectional => &[1.0, -1.0],
        }
    }
}

/// Stoichiometry (metabolite id to signed coefficient) paired with a direction tag.
///
/// Decodes from a two-element array: `[{"atp_c": -1, "adp_c": 1}, "forward"]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "(HashMap<String, f64>, Direction)")]
pub struct ReactionDirection {
    pub stoichiometry: HashMap<String, f64>,
    pub direction: Direction,
}

impl From<(HashMap<String, f64>, Direction)> for ReactionDirection {
    fn from((stoichiometry, direction): (HashMap<String, f64>, Direction)) -> Self {
        Self {
            stoichiometry,
            direction,
        }
    }
}

impl ReactionDirection {
    pub fn new<I, S>(stoichiometry: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            stoichiometry: stoichiometry
                .into_iter()
                .map(|(id, coef)| (id.into(), coef))
                .collect(),
            direction,
        }
    }

    /// A metabolite is a target when its coefficient points the same way as `sign`.
    pub fn is_target(&self, metabolite: &str, sign: f64) -> bool {
        self.stoichiometry
            .get(metabolite)
            .is_some_and(|coef| coef * sign > 0.0)
    }
}

/// Per-entity overrides that typically change between renders of the same map.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    pub metabolite_node_sizes: HashMap<String, f64>,
    pub metabolite_node_colors: HashMap<String, Color>,
    pub reaction_edge_colors: HashMap<String, Color>,
    pub reaction_edge_widths: HashMap<String, f64>,
    pub reaction_directions: HashMap<String, ReactionDirection>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub metabolite_identifier: String,
    pub metabolite_show_text: bool,
    pub metabolite_text_size: f64,
    pub metabolite_text_color: Color,
    pub metabolite_primary_node_size: f64,
    pub metabolite_secondary_node_size: f64,
    pub metabolite_node_sizes: HashMap<String, f64>,
    pub metabolite_node_colors: HashMap<String, Color>,
    pub metabolite_node_color: Color,

    pub reaction_identifier: String,
    pub reaction_show_text: bool,
    pub reaction_show_name_instead_of_id: bool,
    pub reaction_text_size: f64,
    pub reaction_text_color: Color,
    pub reaction_edge_colors: HashMap<String, Color>,
    pub reaction_edge_color: Color,
    pub reaction_edge_widths: HashMap<String, f64>,
    pub reaction_edge_width: f64,
    pub reaction_arrow_size: f64,
    pub reaction_arrow_head_offset_fraction: f64,
    pub reaction_directions: HashMap<String, ReactionDirection>,

    pub annotation_show_text: bool,
    pub annotation_text_size: f64,
    pub annotation_text_color: Color,

    /// Points sampled per segment; 10 is enough for previews, 100-200 for print.
    pub curve_samples: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            metabolite_identifier: DEFAULT_IDENTIFIER.to_string(),
            metabolite_show_text: false,
            metabolite_text_size: 4.0,
            metabolite_text_color: Color::BLACK,
            metabolite_primary_node_size: 5.0,
            metabolite_secondary_node_size: 3.0,
            metabolite_node_sizes: HashMap::new(),
            metabolite_node_colors: HashMap::new(),
            metabolite_node_color: Color::BLACK,

            reaction_identifier: DEFAULT_IDENTIFIER.to_string(),
            reaction_show_text: false,
            reaction_show_name_instead_of_id: false,
            reaction_text_size: 4.0,
            reaction_text_color: Color::BLACK,
            reaction_edge_colors: HashMap::new(),
            reaction_edge_color: Color::BLACK,
            reaction_edge_widths: HashMap::new(),
            reaction_edge_width: 2.0,
            reaction_arrow_size: 12.0,
            reaction_arrow_head_offset_fraction: 0.1,
            reaction_directions: HashMap::new(),

            annotation_show_text: false,
            annotation_text_size: 12.0,
            annotation_text_color: Color::BLACK,

            curve_samples: DEFAULT_CURVE_SAMPLES,
        }
    }
}

impl PlotConfig {
    /// Read a JSON config file; any subset of options may be given, unknown keys are rejected.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid plot config in {:?}", path))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Replace every per-entity override map, keeping the fallbacks and toggles.
    pub fn with_overrides(mut self, overrides: StyleOverrides) -> Self {
        self.metabolite_node_sizes = overrides.metabolite_node_sizes;
        self.metabolite_node_colors = overrides.metabolite_node_colors;
        self.reaction_edge_colors = overrides.reaction_edge_colors;
        self.reaction_edge_widths = overrides.reaction_edge_widths;
        self.reaction_directions = overrides.reaction_directions;
        self
    }

    pub fn show_all_text(mut self) -> Self {
        self.metabolite_show_text = true;
        self.reaction_show_text = true;
        self.annotation_show_text = true;
        self
    }
}
