//! Decoding of Escher map documents (`[header, map]` JSON).
//!
//! Escher stores coordinates with y growing downward. Every y value read here goes through
//! [`document_point`], which flips it so the rest of the crate works with y growing upward.

use serde_json::{Map, Value};

use crate::error::{MapError, Result};
use crate::geometry::Point;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeType {
    Metabolite,
    Midmarker,
    Multimarker,
    Other(String),
}

impl NodeType {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("metabolite") => NodeType::Metabolite,
            Some("midmarker") => NodeType::Midmarker,
            Some("multimarker") => NodeType::Multimarker,
            Some(other) => NodeType::Other(other.to_string()),
            None => NodeType::Other(String::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    /// Present only when the document gives both `x` and `y`.
    pub position: Option<Point>,
    pub node_type: NodeType,
    pub node_is_primary: bool,
    pub label_position: Option<Point>,
    fields: Map<String, Value>,
}

impl NodeRecord {
    pub fn is_metabolite(&self) -> bool {
        self.node_type == NodeType::Metabolite
    }

    /// String value of an arbitrary field, e.g. the configured identifier field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentRecord {
    pub from_node_id: String,
    pub to_node_id: String,
    pub b1: Option<Point>,
    pub b2: Option<Point>,
}

impl SegmentRecord {
    /// Interior control points, if this segment is a cubic curve.
    pub fn controls(&self) -> Option<(Point, Point)> {
        self.b1.zip(self.b2)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReactionRecord {
    pub segments: Vec<(String, SegmentRecord)>,
    pub name: Option<String>,
    pub label_position: Option<Point>,
    pub reversibility: Option<bool>,
    fields: Map<String, Value>,
}

impl ReactionRecord {
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLabelRecord {
    pub position: Point,
    pub text: String,
}

/// Canvas extent as stored in the document; absent fields stay `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Resolution {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapDocument {
    pub nodes: Vec<(String, NodeRecord)>,
    pub reactions: Vec<(String, ReactionRecord)>,
    pub text_labels: Vec<(String, TextLabelRecord)>,
    canvas: Resolution,
}

impl MapDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match value.as_array().map(Vec::as_slice) {
            Some([_header, map]) => map,
            _ => return Err(MapError::NotATwoElementArray),
        };

        let nodes = required_collection(map, "nodes")?
            .iter()
            .map(|(id, record)| Ok((id.clone(), parse_node(id, record)?)))
            .collect::<Result<Vec<_>>>()?;
        let reactions = required_collection(map, "reactions")?
            .iter()
            .map(|(id, record)| Ok((id.clone(), parse_reaction(id, record)?)))
            .collect::<Result<Vec<_>>>()?;
        let text_labels = match map.get("text_labels") {
            None | Some(Value::Null) => Vec::new(),
            Some(labels) => labels
                .as_object()
                .ok_or(MapError::NotAnObject("text_labels"))?
                .iter()
                .map(|(id, record)| (id.clone(), parse_text_label(record)))
                .collect(),
        };
        let canvas = map.get("canvas").map(parse_canvas).unwrap_or_default();

        Ok(Self {
            nodes,
            reactions,
            text_labels,
            canvas,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.canvas
    }
}

/// Convert a document coordinate pair into render space (y up).
pub fn document_point(x: f64, y: f64) -> Point {
    Point { x, y: -y }
}

fn required_collection<'a>(map: &'a Value, key: &'static str) -> Result<&'a Map<String, Value>> {
    match map.get(key) {
        None | Some(Value::Null) => Err(MapError::MissingCollection(key)),
        Some(value) => value.as_object().ok_or(MapError::NotAnObject(key)),
    }
}

fn record_object<'a>(
    collection: &'static str,
    id: &str,
    record: &'a Value,
) -> Result<&'a Map<String, Value>> {
    record.as_object().ok_or_else(|| MapError::InvalidRecord {
        collection,
        id: id.to_string(),
        reason: "expected an object".to_string(),
    })
}

fn parse_node(id: &str, record: &Value) -> Result<NodeRecord> {
    let fields = record_object("nodes", id, record)?;
    Ok(NodeRecord {
        position: point_field(fields, "x", "y"),
        node_type: NodeType::parse(fields.get("node_type").and_then(Value::as_str)),
        node_is_primary: fields
            .get("node_is_primary")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        label_position: point_field(fields, "label_x", "label_y"),
        fields: fields.clone(),
    })
}

fn parse_reaction(id: &str, record: &Value) -> Result<ReactionRecord> {
    let fields = record_object("reactions", id, record)?;
    let segments = match fields.get("segments") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(segments)) => segments
            .iter()
            .map(|(segment_id, segment)| {
                Ok((segment_id.clone(), parse_segment(id, segment_id, segment)?))
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(MapError::InvalidRecord {
                collection: "reactions",
                id: id.to_string(),
                reason: "`segments` must be an object".to_string(),
            })
        }
    };
    Ok(ReactionRecord {
        segments,
        name: fields.get("name").and_then(Value::as_str).map(str::to_string),
        label_position: point_field(fields, "label_x", "label_y"),
        reversibility: fields.get("reversibility").and_then(Value::as_bool),
        fields: fields.clone(),
    })
}

fn parse_segment(reaction_id: &str, segment_id: &str, record: &Value) -> Result<SegmentRecord> {
    let record_id = format!("{reaction_id}/{segment_id}");
    let fields = record_object("segments", &record_id, record)?;
    let endpoint = |key: &str| {
        fields
            .get(key)
            .and_then(id_value)
            .ok_or_else(|| MapError::InvalidRecord {
                collection: "segments",
                id: record_id.clone(),
                reason: format!("missing `{key}`"),
            })
    };
    Ok(SegmentRecord {
        from_node_id: endpoint("from_node_id")?,
        to_node_id: endpoint("to_node_id")?,
        b1: fields.get("b1").and_then(control_point),
        b2: fields.get("b2").and_then(control_point),
    })
}

fn parse_text_label(record: &Value) -> TextLabelRecord {
    let x = record.get("x").and_then(Value::as_f64).unwrap_or(0.0);
    let y = record.get("y").and_then(Value::as_f64).unwrap_or(0.0);
    TextLabelRecord {
        position: document_point(x, y),
        text: record
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

fn parse_canvas(record: &Value) -> Resolution {
    let field = |key: &str| record.get(key).and_then(Value::as_f64);
    Resolution {
        height: field("height"),
        width: field("width"),
        x: field("x"),
        y: field("y"),
    }
}

fn point_field(fields: &Map<String, Value>, x_key: &str, y_key: &str) -> Option<Point> {
    let x = fields.get(x_key).and_then(Value::as_f64)?;
    let y = fields.get(y_key).and_then(Value::as_f64)?;
    Some(document_point(x, y))
}

fn control_point(value: &Value) -> Option<Point> {
    let fields = value.as_object()?;
    point_field(fields, "x", "y")
}

/// Node ids are strings in Escher exports, but older maps sometimes store them as numbers.
fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
