//! Per-entity style lookup with fallbacks.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{MapError, Result};

/// RGB color with channels in `[0, 1]`, the form cairo consumes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const GRAY: Color = Color {
        r: 0x80 as f64 / 255.0,
        g: 0x80 as f64 / 255.0,
        b: 0x80 as f64 / 255.0,
    };

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rgb`, `#rrggbb`, or one of a handful of CSS color names.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| MapError::InvalidColor(value.to_string()));
        }
        let color = match value.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "gray" | "grey" => Color::GRAY,
            "red" => Color::rgb8(0xFF, 0x00, 0x00),
            "green" => Color::rgb8(0x00, 0x80, 0x00),
            "blue" => Color::rgb8(0x00, 0x00, 0xFF),
            "orange" => Color::rgb8(0xFF, 0xA5, 0x00),
            "purple" => Color::rgb8(0x80, 0x00, 0x80),
            "yellow" => Color::rgb8(0xFF, 0xFF, 0x00),
            "brown" => Color::rgb8(0xA5, 0x2A, 0x2A),
            "cyan" => Color::rgb8(0x00, 0xFF, 0xFF),
            "magenta" => Color::rgb8(0xFF, 0x00, 0xFF),
            "pink" => Color::rgb8(0xFF, 0xC0, 0xCB),
            _ => return Err(MapError::InvalidColor(value.to_string())),
        };
        Ok(color)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some(Color::rgb8(r * 17, g * 17, b * 17))
        }
        6 => Some(Color::rgb8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

impl TryFrom<String> for Color {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

/// Look up `identifier` in `overrides`, falling back when it is absent (or unknown).
pub fn resolve<V: Clone>(
    identifier: Option<&str>,
    overrides: &HashMap<String, V>,
    fallback: V,
) -> V {
    identifier
        .and_then(|id| overrides.get(id))
        .cloned()
        .unwrap_or(fallback)
}

/// Node size: explicit override first, then the primary/secondary fallback.
pub fn resolve_node_size(
    identifier: Option<&str>,
    overrides: &HashMap<String, f64>,
    is_primary: bool,
    primary_size: f64,
    secondary_size: f64,
) -> f64 {
    let fallback = if is_primary {
        primary_size
    } else {
        secondary_size
    };
    resolve(identifier, overrides, fallback)
}

/// Whether a reaction is backed by override data (drawn solid) or missing it (drawn dotted).
///
/// With no overrides at all nothing is singled out. Otherwise a reaction needs an entry in at least
/// one of the two maps.
pub fn reaction_has_data(
    identifier: Option<&str>,
    colors: &HashMap<String, Color>,
    widths: &HashMap<String, f64>,
) -> bool {
    if colors.is_empty() && widths.is_empty() {
        return true;
    }
    match identifier {
        Some(id) => colors.contains_key(id) || widths.contains_key(id),
        None => false,
    }
}
