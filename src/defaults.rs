//! Default tolerances and scales (user-space units unless noted)

/// Side length of the integer path coordinate space each shape is emitted into.
pub const PATH_SCALE: i64 = 21600;
/// Consecutive points closer than this collapse into one.
pub const DUPLICATE_TOLERANCE: f64 = 0.1;
/// Cubic control points within this distance of the chord make the curve a line.
pub const FLATTEN_TOLERANCE: f64 = 1.0;
/// English Metric Units per CSS pixel (914400 EMU per inch at 96 dpi).
pub const EMU_PER_PX: f64 = 9525.0;
/// Smallest emitted extent on either axis, in device units.
pub const MIN_EXTENT: i64 = 1;
/// Cubic approximation constant for a quarter circle: 4/3 * (sqrt(2) - 1).
pub const KAPPA: f64 = 0.552_284_749_830_793_4;
