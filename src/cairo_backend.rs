//! Cairo/Pango rendering of a primitive set to PNG and SVG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cairo::{Context as CairoContext, Format, ImageSurface, LineCap, LineJoin, SvgSurface};
use pango::{Alignment, FontDescription};
use pangocairo::functions as pangocairo;

use crate::backend::{render_primitives, RenderBackend};
use crate::geometry::{Bounds, Point};
use crate::plot::{Arrow, Marker, Polyline, PrimitiveSet, TextBlock};
use crate::reactions::LineStyle;
use crate::style::Color;

pub const DEFAULT_PADDING: f64 = 10.0;
const FONT_FAMILY: &str = "Liberation Sans";
const TEXT_OUTLINE_WIDTH: f64 = 0.75;
const MARKER_OUTLINE_WIDTH: f64 = 0.5;
const DOT_SPACING: f64 = 2.0;
const ARROW_HALF_WIDTH_RATIO: f64 = 0.6;

/// Maps render space (y up) onto pixel space (y down).
#[derive(Clone, Copy, Debug)]
struct Transform {
    min_x: f64,
    max_y: f64,
    scale: f64,
}

impl Transform {
    fn map_point(&self, point: Point) -> Point {
        Point {
            x: (point.x - self.min_x) * self.scale,
            y: (self.max_y - point.y) * self.scale,
        }
    }

    /// Direction vectors only flip their y component.
    fn map_vector(&self, vector: Point) -> Point {
        Point {
            x: vector.x * self.scale,
            y: -vector.y * self.scale,
        }
    }

    fn scale_scalar(&self, value: f64) -> f64 {
        value * self.scale
    }
}

/// Compute a padded transform and canvas size from data bounds.
fn transform_with_padding(bounds: Bounds, padding: f64, scale: f64) -> (Transform, f64, f64) {
    let min_x = bounds.min_x - padding;
    let max_x = bounds.max_x + padding;
    let min_y = bounds.min_y - padding;
    let max_y = bounds.max_y + padding;
    let width = ((max_x - min_x).abs() * scale).max(1.0);
    let height = ((max_y - min_y).abs() * scale).max(1.0);
    (Transform { min_x, max_y, scale }, width, height)
}

struct CairoBackend<'a> {
    ctx: &'a CairoContext,
    transform: Transform,
}

impl CairoBackend<'_> {
    fn set_color(&self, color: Color) {
        self.ctx.set_source_rgb(color.r, color.g, color.b);
    }
}

impl RenderBackend for CairoBackend<'_> {
    fn draw_points(&mut self, markers: &[Marker]) -> Result<()> {
        let ctx = self.ctx;
        ctx.set_line_width(MARKER_OUTLINE_WIDTH);
        for marker in markers {
            let center = self.transform.map_point(marker.position);
            let radius = self.transform.scale_scalar(marker.size).max(1.0);
            ctx.new_path();
            ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
            self.set_color(marker.color);
            ctx.fill_preserve()?;
            self.set_color(Color::WHITE);
            ctx.stroke()?;
        }
        Ok(())
    }

    fn draw_polyline(&mut self, polyline: &Polyline) -> Result<()> {
        let ctx = self.ctx;
        let Some((first, rest)) = polyline.points.split_first() else {
            return Ok(());
        };
        let width = self.transform.scale_scalar(polyline.width).max(0.5);
        ctx.new_path();
        ctx.set_line_width(width);
        ctx.set_line_join(LineJoin::Round);
        match polyline.style {
            LineStyle::Solid => {
                ctx.set_line_cap(LineCap::Butt);
                ctx.set_dash(&[], 0.0);
            }
            LineStyle::Dotted => {
                // Zero-length dashes with round caps render as dots.
                ctx.set_line_cap(LineCap::Round);
                ctx.set_dash(&[0.0, width * DOT_SPACING], 0.0);
            }
        }
        let start = self.transform.map_point(*first);
        ctx.move_to(start.x, start.y);
        for point in rest {
            let next = self.transform.map_point(*point);
            ctx.line_to(next.x, next.y);
        }
        self.set_color(polyline.color);
        ctx.stroke()?;
        ctx.set_dash(&[], 0.0);
        Ok(())
    }

    fn draw_arrow(&mut self, arrow: &Arrow) -> Result<()> {
        let size = self.transform.scale_scalar(arrow.size);
        let base = self.transform.map_point(arrow.position);
        let direction = self.transform.map_vector(arrow.direction);
        let length = (direction.x * direction.x + direction.y * direction.y).sqrt();
        if length == 0.0 {
            return Ok(());
        }
        let tip = Point {
            x: base.x + direction.x / length * size / 2.0,
            y: base.y + direction.y / length * size / 2.0,
        };
        self.set_color(arrow.color);
        draw_filled_triangle(self.ctx, tip, base, size)
    }

    fn draw_text(&mut self, block: &TextBlock) -> Result<()> {
        let font_px = self.transform.scale_scalar(block.size);
        for item in &block.items {
            let center = self.transform.map_point(item.position);
            draw_text_centered(self.ctx, center, &item.text, font_px, block.color)?;
        }
        Ok(())
    }
}

fn draw_filled_triangle(ctx: &CairoContext, end: Point, prev: Point, size: f64) -> Result<()> {
    let Some((p1, p2, tip)) = triangle_points(end, prev, size) else {
        return Ok(());
    };
    ctx.new_path();
    ctx.move_to(p1.x, p1.y);
    ctx.line_to(p2.x, p2.y);
    ctx.line_to(tip.x, tip.y);
    ctx.close_path();
    ctx.fill()?;
    Ok(())
}

fn triangle_points(end: Point, prev: Point, size: f64) -> Option<(Point, Point, Point)> {
    let dx = end.x - prev.x;
    let dy = end.y - prev.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return None;
    }
    let ux = dx / length;
    let uy = dy / length;
    let base_x = end.x - ux * size;
    let base_y = end.y - uy * size;
    let perp_x = -uy;
    let perp_y = ux;
    let half_width = size * ARROW_HALF_WIDTH_RATIO;
    let p1 = Point {
        x: base_x + perp_x * half_width,
        y: base_y + perp_y * half_width,
    };
    let p2 = Point {
        x: base_x - perp_x * half_width,
        y: base_y - perp_y * half_width,
    };
    Some((p1, p2, end))
}

fn draw_text_centered(
    ctx: &CairoContext,
    center: Point,
    text: &str,
    font_px: f64,
    color: Color,
) -> Result<()> {
    if text.trim().is_empty() || font_px <= 0.0 {
        return Ok(());
    }
    let layout = pangocairo::create_layout(ctx);
    let mut font_desc = FontDescription::from_string(FONT_FAMILY);
    font_desc.set_absolute_size(font_px * pango::SCALE as f64);
    layout.set_font_description(Some(&font_desc));
    layout.set_alignment(Alignment::Center);
    layout.set_text(text);

    let (width, height) = layout.pixel_size();
    let x = center.x - width as f64 / 2.0;
    let y = center.y - height as f64 / 2.0;
    ctx.new_path();
    ctx.move_to(x, y);
    pangocairo::layout_path(ctx, &layout);
    if TEXT_OUTLINE_WIDTH > 0.0 {
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.set_line_width(TEXT_OUTLINE_WIDTH);
        ctx.stroke_preserve()?;
    }
    ctx.set_source_rgb(color.r, color.g, color.b);
    ctx.fill()?;
    Ok(())
}

fn setup_context(ctx: &CairoContext) -> Result<()> {
    ctx.set_source_rgb(1.0, 1.0, 1.0);
    ctx.paint()?;
    ctx.set_line_cap(LineCap::Butt);
    Ok(())
}

pub fn default_svg_output_path(output: &Path) -> PathBuf {
    let mut svg_path = output.to_path_buf();
    svg_path.set_extension("svg");
    svg_path
}

/// Draw `primitives` onto a PNG at `png_path` and an SVG at `svg_path`.
///
/// `scale` is pixels per map unit; `padding` is in map units.
pub fn write_png_and_svg(
    primitives: &PrimitiveSet,
    png_path: &Path,
    svg_path: &Path,
    padding: f64,
    scale: f64,
) -> Result<()> {
    let bounds = primitives.bounds().context("Map has nothing to draw")?;
    let (transform, width_f, height_f) = transform_with_padding(bounds, padding, scale);

    let surface =
        ImageSurface::create(Format::ARgb32, width_f.ceil() as i32, height_f.ceil() as i32)
            .context("Failed to create image surface")?;
    let ctx = CairoContext::new(&surface).context("Failed to create Cairo context")?;
    setup_context(&ctx)?;
    render_primitives(primitives, &mut CairoBackend { ctx: &ctx, transform })?;
    let mut file = fs::File::create(png_path).context("Failed to create PNG file")?;
    surface
        .write_to_png(&mut file)
        .context("Failed to write PNG")?;

    let surface = SvgSurface::new(width_f, height_f, Some(svg_path))
        .context("Failed to create SVG surface")?;
    let ctx = CairoContext::new(&surface).context("Failed to create Cairo context")?;
    setup_context(&ctx)?;
    render_primitives(primitives, &mut CairoBackend { ctx: &ctx, transform })?;
    surface.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_flips_y_and_pads() {
        let bounds = Bounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: -50.0,
            max_y: 0.0,
        };
        let (transform, width, height) = transform_with_padding(bounds, 10.0, 2.0);
        assert_eq!(width, 240.0);
        assert_eq!(height, 140.0);
        assert_eq!(transform.map_point(Point::new(0.0, 0.0)), Point::new(20.0, 20.0));
        assert_eq!(transform.map_point(Point::new(100.0, -50.0)), Point::new(220.0, 120.0));
        assert_eq!(transform.map_vector(Point::new(1.0, 1.0)), Point::new(2.0, -2.0));
    }

    #[test]
    fn triangle_tip_is_the_end_point() {
        let (p1, p2, tip) =
            triangle_points(Point::new(10.0, 0.0), Point::new(0.0, 0.0), 4.0).unwrap();
        assert_eq!(tip, Point::new(10.0, 0.0));
        assert_eq!(p1.x, 6.0);
        assert_eq!(p2.x, 6.0);
        assert!(((p1.y - p2.y).abs() - 4.8).abs() < 1e-12);
        assert!(triangle_points(Point::new(1.0, 1.0), Point::new(1.0, 1.0), 4.0).is_none());
    }
}
