//! Shape geometry: canonical records, outlines, spatial queries and
//! simplification.

pub mod arc;
pub mod outline;
pub mod shapes;
pub mod simplify;
pub mod spatial;

pub use outline::{outline, path_bounds};
pub use shapes::{ShapeResult, circles, ellipses, lines, polygons, polylines, rectangles};
pub use simplify::{flatten_curves, reduce_points, remove_duplicates, simplify};
pub use spatial::{
    Contains, CoverageMask, Region, area, coverage_masks, intersects, intersects_batch,
    union_bounds,
};
