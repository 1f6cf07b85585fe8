//! End-to-end conversion: input geometry to [`OutputPath`].
//!
//! Every entry point runs the same pipeline:
//!
//! 1. normalize (path data, raw outlines, glyphs) or outline (shapes)
//! 2. apply the caller's transform
//! 3. measure the exact bounds
//! 4. simplify, when enabled, with tolerances in path units, then re-measure
//! 5. emit through the mapper and cache

use crate::cache::{NoCache, PathCache, emit_cached};
use crate::emit::{CoordinateMapper, OutputPath, UserSpace, axis_scales};
use crate::errors::ConvertError;
use crate::geometry::simplify::reduce_points;
use crate::geometry::{outline, path_bounds, simplify};
use crate::glyph::{Glyph, GlyphLayout, glyph_run};
use crate::log::debug;
use crate::normalize::{RawCommand, normalize};
use crate::options::ConversionOptions;
use crate::parse::parse_path_data;
use crate::reader::PathDataReader;
use crate::transform::{AffineTransform, apply_commands};
use crate::types::{PathCommand, ShapeGeometry, ShapeKind};

static USER_SPACE: UserSpace = UserSpace;
static NO_CACHE: NoCache = NoCache;

/// Options plus the caller's collaborators for one batch of conversions.
pub struct Converter<'a> {
    options: ConversionOptions,
    mapper: &'a dyn CoordinateMapper,
    cache: &'a dyn PathCache,
}

impl Default for Converter<'_> {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

impl<'a> Converter<'a> {
    /// User-space device bounds, no cache.
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            mapper: &USER_SPACE,
            cache: &NO_CACHE,
        }
    }

    pub fn with_mapper(mut self, mapper: &'a dyn CoordinateMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_cache(mut self, cache: &'a dyn PathCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert an SVG path `d` attribute.
    pub fn convert_path_data(
        &self,
        d: &str,
        transform: &AffineTransform,
    ) -> Result<OutputPath, ConvertError> {
        let segments = parse_path_data(d)?;
        let raw = PathDataReader::read(&segments)?;
        self.convert_outline(&raw, transform)
    }

    /// Convert raw outline commands, e.g. from a glyph or a pen recording.
    pub fn convert_outline(
        &self,
        raw: &[RawCommand],
        transform: &AffineTransform,
    ) -> Result<OutputPath, ConvertError> {
        let commands = normalize(raw)?;
        self.finish(commands, transform)
    }

    /// Convert a shape record built by the batch geometry engine.
    pub fn convert_shape(
        &self,
        shape: &ShapeGeometry,
        transform: &AffineTransform,
    ) -> Result<OutputPath, ConvertError> {
        let commands = match (shape.kind, self.options.max_polygon_points) {
            (ShapeKind::Polygon | ShapeKind::Polyline, Some(max)) if shape.points.len() > max => {
                let mut thinned = shape.clone();
                thinned.points = reduce_points(&shape.points, max);
                if let Some(count) = thinned.parameters.first_mut() {
                    *count = thinned.points.len() as f64;
                }
                outline(&thinned)
            }
            _ => outline(shape),
        };
        self.finish(commands, transform)
    }

    /// Convert a run of glyphs into one path.
    pub fn convert_glyph_run(
        &self,
        glyphs: &[Glyph],
        layout: &GlyphLayout,
        transform: &AffineTransform,
    ) -> Result<OutputPath, ConvertError> {
        let commands = glyph_run(glyphs, layout)?;
        self.finish(commands, transform)
    }

    fn finish(
        &self,
        mut commands: Vec<PathCommand>,
        transform: &AffineTransform,
    ) -> Result<OutputPath, ConvertError> {
        apply_commands(&mut commands, transform);
        let mut bbox = path_bounds(&commands).ok_or(ConvertError::EmptyPath)?;
        if self.options.simplify {
            let scale = axis_scales(bbox, self.options.path_scale);
            commands = simplify(&commands, &self.options, scale);
            bbox = path_bounds(&commands).ok_or(ConvertError::EmptyPath)?;
        }
        debug!(commands = commands.len(), ?bbox, "converting path");
        Ok(emit_cached(
            &commands,
            bbox,
            self.options.path_scale,
            self.mapper,
            self.cache,
        ))
    }
}
