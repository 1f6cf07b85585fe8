//! Vector geometry and path conversion for SVG to OOXML-style drawings.
//!
//! Shapes, path data and glyph outlines are normalized into
//! moveTo/lineTo/cubicCurveTo/closePath command lists, transformed, optionally
//! simplified, and emitted as integer paths scaled into each shape's own box.
//!
//! ```
//! use ooxgeom::{AffineTransform, Converter};
//!
//! let out = Converter::default()
//!     .convert_path_data("M0 0 L100 0", &AffineTransform::identity())
//!     .unwrap();
//! assert_eq!(out.to_string(), "M 0 0 L 21600 0");
//! assert_eq!(out.bounds.height, 1);
//! ```

use pest_derive::Parser;

pub mod cache;
pub mod convert;
pub mod defaults;
pub mod emit;
pub mod errors;
pub mod geometry;
pub mod glyph;
pub mod log;
pub mod normalize;
pub mod options;
pub mod parse;
pub mod reader;
pub mod transform;
pub mod types;

pub use cache::{CacheEntry, LruPathCache, NoCache, PathCache, emit_cached};
pub use convert::Converter;
pub use emit::{
    CoordinateMapper, EmittedBounds, EmuMapper, IntPoint, OutputPath, PathOp, UserSpace,
    axis_scales, emit, emit_with,
};
pub use errors::{ConvertError, GeometryError, PathDataError};
pub use geometry::{ShapeResult, area, intersects, intersects_batch, outline, union_bounds};
pub use glyph::{Glyph, GlyphLayout, glyph_run};
pub use normalize::{Pen, RawCommand, RawOp, normalize};
pub use options::ConversionOptions;
pub use parse::{PathSegment, parse_path_data, parse_path_data_lossy, parse_points};
pub use reader::PathDataReader;
pub use transform::{AffineTransform, apply, apply_batch, apply_commands};
pub use types::{PathCommand, Point, Rect, ShapeGeometry, ShapeKind};

#[derive(Parser)]
#[grammar = "path_data.pest"]
pub struct PathDataParser;

/// Convert path data with default options and no transform.
pub fn convert_path_data(d: &str) -> Result<OutputPath, ConvertError> {
    Converter::default().convert_path_data(d, &AffineTransform::identity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn parse_move_line_close() {
        let result = PathDataParser::parse(Rule::path_data, "M10 10 L20 20 Z");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_packed_numbers() {
        let result = PathDataParser::parse(Rule::path_data, "M.5.5-1-1l2e1,3E-1");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_arc_flags_without_separators() {
        let result = PathDataParser::parse(Rule::path_data, "M0 0 a10 10 0 1120 20");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_arc_arg_rule() {
        let result = PathDataParser::parse(Rule::arc_arg, "25 25 -30 0 1 50 -25");
        assert!(result.is_ok(), "Failed to parse arc_arg: {:?}", result.err());
    }

    #[test]
    fn reject_dangling_command() {
        let result = PathDataParser::parse(Rule::path_data, "M 0 0 L");
        assert!(result.is_err());
    }

    #[test]
    fn lossy_rule_keeps_rest() {
        let result = PathDataParser::parse(Rule::path_data_lossy, "M 0 0 L 5 5 ?? L 1 1");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn point_list_accepts_junk() {
        let result = PathDataParser::parse(Rule::point_list, "0,0 10,abc 5 5");
        assert!(result.is_ok(), "Failed to parse point_list: {:?}", result.err());
    }

    #[test]
    fn convenience_converts_with_defaults() {
        let out = convert_path_data("M 0 0 L 10 10").unwrap();
        assert_eq!(out.path_width, defaults::PATH_SCALE);
        assert_eq!(out.to_string(), "M 0 0 L 21600 21600");
    }
}
