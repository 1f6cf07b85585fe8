//! Error types with diagnostics using miette
//!
//! Geometry errors are per shape or per call. Path data errors carry the
//! offending source span so a caller can render a pointed message.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::ShapeKind;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors raised while building, querying or emitting geometry.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Unusable numeric input. Recovered locally where possible; when it
    /// reaches the caller the shape should be skipped.
    #[error("malformed input: {reason}")]
    #[diagnostic(code(ooxgeom::malformed_input))]
    MalformedInput { reason: String },

    #[error("{kind} needs at least {required} points, got {found}")]
    #[diagnostic(
        code(ooxgeom::insufficient_points),
        help("skip this shape or emit a placeholder")
    )]
    InsufficientPoints {
        kind: ShapeKind,
        required: usize,
        found: usize,
    },

    #[error("batch inputs differ in length: {expected} vs {found}")]
    #[diagnostic(code(ooxgeom::length_mismatch))]
    LengthMismatch { expected: usize, found: usize },

    #[error("{sets} point sets but {matrices} transforms")]
    #[diagnostic(code(ooxgeom::arity_mismatch))]
    ArityMismatch { sets: usize, matrices: usize },

    #[error("command {index} needs a current point but no moveTo precedes it")]
    #[diagnostic(
        code(ooxgeom::missing_current_point),
        help("every contour must start with a moveTo")
    )]
    MissingCurrentPoint { index: usize },
}

impl GeometryError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GeometryError::MalformedInput {
            reason: reason.into(),
        }
    }
}

/// Check that every column length matches the first.
pub(crate) fn check_lengths(lengths: &[usize]) -> Result<usize, GeometryError> {
    let expected = lengths.first().copied().unwrap_or(0);
    match lengths.iter().find(|&&n| n != expected) {
        Some(&found) => Err(GeometryError::LengthMismatch { expected, found }),
        None => Ok(expected),
    }
}

// ============================================================================
// Path Data Errors
// ============================================================================

/// Errors in a path mini-language string.
#[derive(Error, Diagnostic, Debug)]
pub enum PathDataError {
    #[error("invalid path data")]
    #[diagnostic(code(ooxgeom::path::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{expected}")]
        span: SourceSpan,
        expected: String,
    },

    #[error("invalid number: {text}")]
    #[diagnostic(code(ooxgeom::path::invalid_number))]
    InvalidNumber {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a finite number")]
        span: SourceSpan,
    },
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Anything the end-to-end converter can fail with.
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PathData(#[from] PathDataError),

    #[error("nothing to emit")]
    #[diagnostic(code(ooxgeom::empty_path))]
    EmptyPath,
}
