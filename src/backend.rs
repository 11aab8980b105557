use anyhow::Result;

use crate::plot::{Arrow, Marker, Polyline, PrimitiveSet, TextBlock};

/// Drawing surface for a [`PrimitiveSet`]. Coordinates are in render space (y up).
pub trait RenderBackend {
    fn draw_points(&mut self, markers: &[Marker]) -> Result<()>;
    fn draw_polyline(&mut self, polyline: &Polyline) -> Result<()>;
    fn draw_arrow(&mut self, arrow: &Arrow) -> Result<()>;
    fn draw_text(&mut self, block: &TextBlock) -> Result<()>;
}

/// Paint order: reaction lines, arrow heads, metabolite markers, then text on top.
pub fn render_primitives(primitives: &PrimitiveSet, backend: &mut dyn RenderBackend) -> Result<()> {
    for polyline in &primitives.polylines {
        backend.draw_polyline(polyline)?;
    }
    for arrow in &primitives.arrows {
        backend.draw_arrow(arrow)?;
    }
    if !primitives.markers.is_empty() {
        backend.draw_points(&primitives.markers)?;
    }
    for block in &primitives.texts {
        backend.draw_text(block)?;
    }
    Ok(())
}
