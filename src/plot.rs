//! Assembles the drawable primitive set for a whole map.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::annotations::extract_annotations;
use crate::config::{PlotConfig, StyleOverrides};
use crate::error::Result;
use crate::geometry::{Bounds, Point};
use crate::map::{MapDocument, Resolution};
use crate::nodes::{extract_metabolites, label_lookup, node_positions};
use crate::reactions::{build_reactions, LineStyle};
use crate::style::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: Point,
    pub size: f64,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub width: f64,
    pub color: Color,
    pub style: LineStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub position: Point,
    pub direction: Point,
    pub size: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    Metabolite,
    Reaction,
    Annotation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub position: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub kind: TextKind,
    pub items: Vec<TextItem>,
    pub size: f64,
    pub color: Color,
}

/// Backend-agnostic output of one render pass, in render space (y up).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimitiveSet {
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
    pub arrows: Vec<Arrow>,
    pub texts: Vec<TextBlock>,
}

impl PrimitiveSet {
    pub fn text(&self, kind: TextKind) -> Option<&TextBlock> {
        self.texts.iter().find(|block| block.kind == kind)
    }

    /// Extent of every primitive; markers and arrows count with their radius.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut include = |point: Point, radius: f64| {
            bounds
                .get_or_insert_with(|| Bounds::around(point))
                .include(point, radius);
        };
        for marker in &self.markers {
            include(marker.position, marker.size);
        }
        for polyline in &self.polylines {
            for point in &polyline.points {
                include(*point, polyline.width / 2.0);
            }
        }
        for arrow in &self.arrows {
            include(arrow.position, arrow.size);
        }
        for block in &self.texts {
            for item in &block.items {
                include(item.position, 0.0);
            }
        }
        bounds
    }
}

/// A decoded map plus its node position table, both independent of styling.
///
/// Re-rendering with different overrides reuses this instead of decoding the file again.
#[derive(Clone, Debug)]
pub struct MapCache {
    document: MapDocument,
    positions: HashMap<String, Point>,
}

impl MapCache {
    pub fn new(document: MapDocument) -> Self {
        let positions = node_positions(&document);
        Self {
            document,
            positions,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(MapDocument::from_json(text)?))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Failed to decode Escher map {:?}", path))
    }

    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    pub fn resolution(&self) -> Resolution {
        self.document.resolution()
    }

    pub fn render(&self, config: &PlotConfig) -> Result<PrimitiveSet> {
        assemble(&self.document, &self.positions, config)
    }
}

/// Decode `json` and render it in one go.
pub fn plot_map(json: &str, config: &PlotConfig) -> Result<PrimitiveSet> {
    MapCache::from_json(json)?.render(config)
}

/// Render a cached map again with a new set of per-entity overrides.
pub fn recompute_with_overrides(
    cache: &MapCache,
    config: &PlotConfig,
    overrides: StyleOverrides,
) -> Result<PrimitiveSet> {
    cache.render(&config.clone().with_overrides(overrides))
}

fn assemble(
    document: &MapDocument,
    positions: &HashMap<String, Point>,
    config: &PlotConfig,
) -> Result<PrimitiveSet> {
    let annotations = extract_annotations(document);
    let metabolites = extract_metabolites(document, config);
    let labels = label_lookup(&metabolites);
    let reactions = build_reactions(document, positions, &labels, config)?;

    let mut primitives = PrimitiveSet {
        markers: metabolites
            .iter()
            .map(|metabolite| Marker {
                position: metabolite.position,
                size: metabolite.size,
                color: metabolite.color,
            })
            .collect(),
        ..PrimitiveSet::default()
    };

    for reaction in &reactions {
        primitives
            .polylines
            .extend(reaction.segments.iter().map(|segment| Polyline {
                points: segment.points.clone(),
                width: reaction.width,
                color: reaction.color,
                style: reaction.line_style,
            }));
        primitives
            .arrows
            .extend(reaction.arrows.iter().map(|head| Arrow {
                position: head.position,
                direction: head.direction,
                size: config.reaction_arrow_size,
                color: reaction.color,
            }));
    }

    if config.metabolite_show_text {
        let items = metabolites
            .iter()
            .filter_map(|metabolite| {
                Some(TextItem {
                    text: metabolite.label.clone()?,
                    position: metabolite.label_position?,
                })
            })
            .collect();
        primitives.texts.push(TextBlock {
            kind: TextKind::Metabolite,
            items,
            size: config.metabolite_text_size,
            color: config.metabolite_text_color,
        });
    }
    if config.reaction_show_text {
        let items = reactions
            .iter()
            .filter_map(|reaction| {
                Some(TextItem {
                    text: reaction.label.clone()?,
                    position: reaction.label_position?,
                })
            })
            .collect();
        primitives.texts.push(TextBlock {
            kind: TextKind::Reaction,
            items,
            size: config.reaction_text_size,
            color: config.reaction_text_color,
        });
    }
    if config.annotation_show_text {
        let items = annotations
            .into_iter()
            .map(|annotation| TextItem {
                text: annotation.text,
                position: annotation.position,
            })
            .collect();
        primitives.texts.push(TextBlock {
            kind: TextKind::Annotation,
            items,
            size: config.annotation_text_size,
            color: config.annotation_text_color,
        });
    }

    info!(
        markers = primitives.markers.len(),
        polylines = primitives.polylines.len(),
        arrows = primitives.arrows.len(),
        text_blocks = primitives.texts.len(),
        "assembled map primitives"
    );
    Ok(primitives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map_json() -> String {
        json!([{}, {
            "nodes": {
                "1": {"node_type": "metabolite", "x": 0.0, "y": 0.0, "bigg_id": "m1",
                      "label_x": 0.0, "label_y": 5.0},
                "2": {"node_type": "metabolite", "x": 10.0, "y": 0.0, "bigg_id": "m2"},
                "3": {"node_type": "metabolite", "x": 5.0, "y": 5.0}
            },
            "reactions": {
                "1": {"bigg_id": "R1", "label_x": 5.0, "label_y": 1.0,
                      "segments": {"1": {"from_node_id": "1", "to_node_id": "2"}}}
            },
            "text_labels": {"1": {"x": 1.0, "y": 1.0, "text": "note"}}
        }])
        .to_string()
    }

    #[test]
    fn text_blocks_follow_toggles() {
        let hidden = plot_map(&map_json(), &PlotConfig::default()).unwrap();
        assert!(hidden.texts.is_empty());

        let shown = plot_map(&map_json(), &PlotConfig::default().show_all_text()).unwrap();
        let metabolites = shown.text(TextKind::Metabolite).unwrap();
        // Node 3 has no identifier and therefore no label.
        assert_eq!(metabolites.items.len(), 2);
        assert_eq!(metabolites.items[0].position, Point::new(0.0, -5.0));
        let reactions = shown.text(TextKind::Reaction).unwrap();
        assert_eq!(reactions.items[0].text, "R1");
        let notes = shown.text(TextKind::Annotation).unwrap();
        assert_eq!(notes.items[0].text, "note");
        assert_eq!(notes.items[0].position, Point::new(1.0, -1.0));
    }

    #[test]
    fn arrows_take_reaction_color_and_configured_size() {
        let config = PlotConfig::from_json(
            r##"{
                "reaction_edge_colors": {"R1": "#ff0000"},
                "reaction_arrow_size": 7.5,
                "reaction_directions": {"R1": [{"m1": -1, "m2": 1}, "forward"]}
            }"##,
        )
        .unwrap();
        let primitives = plot_map(&map_json(), &config).unwrap();
        assert_eq!(primitives.arrows.len(), 1);
        assert_eq!(primitives.arrows[0].size, 7.5);
        assert_eq!(primitives.arrows[0].color, Color::rgb8(255, 0, 0));
        assert_eq!(primitives.polylines[0].color, Color::rgb8(255, 0, 0));
    }

    #[test]
    fn recompute_reuses_cached_document() {
        let cache = MapCache::from_json(&map_json()).unwrap();
        let base = PlotConfig::default();
        let first = cache.render(&base).unwrap();
        assert_eq!(first.polylines[0].style, LineStyle::Solid);

        let overrides = StyleOverrides {
            reaction_edge_widths: HashMap::from([("other".to_string(), 5.0)]),
            ..StyleOverrides::default()
        };
        let second = recompute_with_overrides(&cache, &base, overrides).unwrap();
        assert_eq!(second.polylines[0].style, LineStyle::Dotted);
        assert_eq!(second.markers, first.markers);
    }

    #[test]
    fn bounds_cover_markers_and_lines() {
        let primitives = plot_map(&map_json(), &PlotConfig::default()).unwrap();
        let bounds = primitives.bounds().unwrap();
        // No node is primary, so every marker has the secondary size.
        let size = PlotConfig::default().metabolite_secondary_node_size;
        assert_eq!(bounds.min_x, -size);
        assert_eq!(bounds.max_x, 10.0 + size);
        assert_eq!(bounds.min_y, -5.0 - size);
        assert_eq!(bounds.max_y, size);
        assert!(PrimitiveSet::default().bounds().is_none());
    }
}
