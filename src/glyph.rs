//! Text-as-path placement.
//!
//! Glyph outlines arrive in font design units with y pointing up. A run is
//! laid out left to right from `origin` (the baseline start) by scaling each
//! outline to the font size, flipping y and advancing the pen.

use crate::errors::GeometryError;
use crate::log::debug;
use crate::normalize::{RawCommand, normalize};
use crate::transform::{AffineTransform, apply_commands};
use crate::types::{PathCommand, Point};

/// One glyph as supplied by the font collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub outline: Vec<RawCommand>,
    /// Advance width in design units.
    pub advance: f64,
}

/// Where and how large a run is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayout {
    /// Baseline start in user space.
    pub origin: Point,
    /// Em size in user units.
    pub font_size: f64,
    pub units_per_em: f64,
}

impl GlyphLayout {
    pub fn new(origin: Point, font_size: f64, units_per_em: f64) -> Self {
        Self {
            origin,
            font_size,
            units_per_em,
        }
    }

    /// Design units to user units.
    pub fn scale(&self) -> Result<f64, GeometryError> {
        if !(self.units_per_em > 0.0) || !self.font_size.is_finite() {
            return Err(GeometryError::malformed(format!(
                "cannot scale {} units per em to font size {}",
                self.units_per_em, self.font_size
            )));
        }
        Ok(self.font_size / self.units_per_em)
    }
}

/// Normalize and place every glyph of a run. Returns one command list
/// holding all contours of the run.
pub fn glyph_run(glyphs: &[Glyph], layout: &GlyphLayout) -> Result<Vec<PathCommand>, GeometryError> {
    let s = layout.scale()?;
    let mut pen_x = layout.origin.x;
    let mut out = Vec::new();

    for glyph in glyphs {
        let mut commands = normalize(&glyph.outline)?;
        let place = AffineTransform::scale(s, -s)
            .then(&AffineTransform::translate(pen_x, layout.origin.y));
        apply_commands(&mut commands, &place);
        out.extend(commands);
        if glyph.advance.is_finite() {
            pen_x += glyph.advance * s;
        }
    }

    debug!(glyphs = glyphs.len(), commands = out.len(), "placed glyph run");
    Ok(out)
}
