//! Conversion settings

use crate::defaults;

/// Knobs for one conversion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionOptions {
    /// Integer coordinate space per axis for emitted paths.
    pub path_scale: i64,
    /// Run the simplifier before emission. Off by default.
    pub simplify: bool,
    /// Simplifier tolerances, in emitted path units.
    pub duplicate_tolerance: f64,
    pub flatten_tolerance: f64,
    /// Polygons with more vertices than this are thinned before outlining.
    pub max_polygon_points: Option<usize>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            path_scale: defaults::PATH_SCALE,
            simplify: false,
            duplicate_tolerance: defaults::DUPLICATE_TOLERANCE,
            flatten_tolerance: defaults::FLATTEN_TOLERANCE,
            max_polygon_points: None,
        }
    }
}

impl ConversionOptions {
    pub fn with_path_scale(mut self, scale: i64) -> Self {
        self.path_scale = scale;
        self
    }

    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    pub fn with_tolerances(mut self, duplicate: f64, flatten: f64) -> Self {
        self.duplicate_tolerance = duplicate;
        self.flatten_tolerance = flatten;
        self
    }

    pub fn with_max_polygon_points(mut self, max: usize) -> Self {
        self.max_polygon_points = Some(max);
        self
    }
}
