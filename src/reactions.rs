//! Reaction paths: styled polylines per segment plus directional arrow heads.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::{PlotConfig, ReactionDirection};
use crate::error::{MapError, Result};
use crate::geometry::{arc_length_index, sample_curve, sample_line, Point};
use crate::map::{MapDocument, ReactionRecord, SegmentRecord};
use crate::style::{self, Color};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dotted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSegment {
    pub segment_id: String,
    pub points: Vec<Point>,
    pub from_label: Option<String>,
    pub to_label: Option<String>,
}

/// Arrow head anchored at `position`, pointing along `direction` (not normalized).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowHead {
    pub position: Point,
    pub direction: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedReaction {
    pub internal_id: String,
    /// Value of the configured identifier field; keys every override lookup.
    pub identifier: Option<String>,
    pub color: Color,
    pub width: f64,
    pub line_style: LineStyle,
    pub label: Option<String>,
    pub label_position: Option<Point>,
    pub segments: Vec<ResolvedSegment>,
    pub arrows: Vec<ArrowHead>,
}

impl ResolvedReaction {
    pub fn is_dotted(&self) -> bool {
        self.line_style == LineStyle::Dotted
    }
}

pub fn build_reactions(
    document: &MapDocument,
    positions: &HashMap<String, Point>,
    labels: &HashMap<String, String>,
    config: &PlotConfig,
) -> Result<Vec<ResolvedReaction>> {
    document
        .reactions
        .iter()
        .map(|(id, reaction)| build_reaction(id, reaction, positions, labels, config))
        .collect()
}

fn build_reaction(
    id: &str,
    reaction: &ReactionRecord,
    positions: &HashMap<String, Point>,
    labels: &HashMap<String, String>,
    config: &PlotConfig,
) -> Result<ResolvedReaction> {
    let identifier = reaction.text(&config.reaction_identifier);
    let color = style::resolve(
        identifier,
        &config.reaction_edge_colors,
        config.reaction_edge_color,
    );
    let width = style::resolve(
        identifier,
        &config.reaction_edge_widths,
        config.reaction_edge_width,
    );
    let line_style = if style::reaction_has_data(
        identifier,
        &config.reaction_edge_colors,
        &config.reaction_edge_widths,
    ) {
        LineStyle::Solid
    } else {
        LineStyle::Dotted
    };

    let samples = config.curve_samples.max(2);
    let segments = reaction
        .segments
        .iter()
        .map(|(segment_id, segment)| {
            resolve_segment(id, segment_id, segment, positions, labels, samples)
        })
        .collect::<Result<Vec<_>>>()?;

    let direction = identifier.and_then(|key| config.reaction_directions.get(key));
    let arrows = place_arrows(
        &segments,
        direction,
        reaction.reversibility.unwrap_or(false),
        config.reaction_arrow_head_offset_fraction,
    )?;
    trace!(reaction_id = %id, arrows = arrows.len(), "placed arrow heads");

    let label = if config.reaction_show_name_instead_of_id {
        reaction.name.as_deref().or(identifier)
    } else {
        identifier
    }
    .map(str::to_string);
    if label.is_none() {
        debug!(reaction_id = %id, "reaction has no label");
    }
    let label_position = label
        .as_ref()
        .and_then(|_| reaction.label_position.or_else(|| segment_midpoint(&segments)));

    Ok(ResolvedReaction {
        internal_id: id.to_string(),
        identifier: identifier.map(str::to_string),
        color,
        width,
        line_style,
        label,
        label_position,
        segments,
        arrows,
    })
}

fn resolve_segment(
    reaction_id: &str,
    segment_id: &str,
    segment: &SegmentRecord,
    positions: &HashMap<String, Point>,
    labels: &HashMap<String, String>,
    samples: usize,
) -> Result<ResolvedSegment> {
    let endpoint = |node_id: &str| {
        positions
            .get(node_id)
            .copied()
            .ok_or_else(|| MapError::DanglingEndpoint {
                reaction_id: reaction_id.to_string(),
                segment_id: segment_id.to_string(),
                node_id: node_id.to_string(),
            })
    };
    let start = endpoint(&segment.from_node_id)?;
    let end = endpoint(&segment.to_node_id)?;
    let points = match segment.controls() {
        Some((b1, b2)) => sample_curve(start, b1, b2, end, samples),
        None => sample_line(start, end, samples),
    };
    Ok(ResolvedSegment {
        segment_id: segment_id.to_string(),
        points,
        from_label: labels.get(&segment.from_node_id).cloned(),
        to_label: labels.get(&segment.to_node_id).cloned(),
    })
}

/// Arrow heads for one reaction.
///
/// With a direction entry, a segment endpoint gets a head when its metabolite is a target for
/// one of the entry's signs; start heads are only considered for the backward sign. Without an
/// entry, a reversible reaction still gets a head into every metabolite it starts from.
pub fn place_arrows(
    segments: &[ResolvedSegment],
    direction: Option<&ReactionDirection>,
    reversible: bool,
    offset_fraction: f64,
) -> Result<Vec<ArrowHead>> {
    let mut arrows = Vec::new();
    for segment in segments {
        if segment.points.len() < 2 {
            continue;
        }
        match direction {
            Some(entry) => {
                for &sign in entry.direction.signs() {
                    let is_target = |label: &Option<String>| {
                        label
                            .as_deref()
                            .is_some_and(|metabolite| entry.is_target(metabolite, sign))
                    };
                    if is_target(&segment.to_label) {
                        arrows.push(arrow_into_end(&segment.points, offset_fraction)?);
                    }
                    if sign < 0.0 && is_target(&segment.from_label) {
                        arrows.push(arrow_into_start(&segment.points, offset_fraction)?);
                    }
                }
            }
            None if reversible && segment.from_label.is_some() => {
                arrows.push(arrow_into_start(&segment.points, offset_fraction)?);
            }
            None => {}
        }
    }
    Ok(arrows)
}

/// Head near the end of `points`, pointing toward the end.
pub fn arrow_into_end(points: &[Point], offset_fraction: f64) -> Result<ArrowHead> {
    let index = offset_index(points, offset_fraction, offset_fraction)?;
    let last = points.len() - 1;
    let at = last.saturating_sub(index).min(last - 1);
    Ok(ArrowHead {
        position: points[at],
        direction: points[at].towards(points[at + 1]),
    })
}

/// Mirror of [`arrow_into_end`]: head near the start, pointing toward the start.
pub fn arrow_into_start(points: &[Point], offset_fraction: f64) -> Result<ArrowHead> {
    let index = offset_index(points, 1.0 - offset_fraction, offset_fraction)?;
    let last = points.len() - 1;
    let at = last.saturating_sub(index).max(1);
    Ok(ArrowHead {
        position: points[at],
        direction: points[at].towards(points[at - 1]),
    })
}

fn offset_index(points: &[Point], fraction: f64, configured: f64) -> Result<usize> {
    arc_length_index(points, fraction).ok_or(MapError::ArcLengthOutOfRange {
        fraction: configured,
    })
}

fn segment_midpoint(segments: &[ResolvedSegment]) -> Option<Point> {
    let points = &segments.first()?.points;
    points.get(points.len() / 2).copied()
}
