//! Parse pest pairs into path segments and point lists

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::errors::PathDataError;
use crate::log::{debug, warn};
use crate::types::Point;
use crate::{PathDataParser, Rule};

/// One segment of path data, as written.
///
/// Implicit repetitions are expanded: `M 10 20 30 40` yields a `MoveTo`
/// followed by a `LineTo` with the same relativity.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    LineTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        abs: bool,
        x: f64,
    },
    VerticalLineTo {
        abs: bool,
        y: f64,
    },
    CurveTo {
        abs: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    SmoothCurveTo {
        abs: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Quadratic {
        abs: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    SmoothQuadratic {
        abs: bool,
        x: f64,
        y: f64,
    },
    EllipticalArc {
        abs: bool,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath {
        abs: bool,
    },
}

const SOURCE_NAME: &str = "<path data>";

/// Parse path data strictly: any syntax error fails the whole string.
pub fn parse_path_data(d: &str) -> Result<Vec<PathSegment>, PathDataError> {
    let pairs = PathDataParser::parse(Rule::path_data, d).map_err(|e| syntax_error(d, e))?;

    let mut segments = Vec::new();
    for pair in pairs {
        if pair.as_rule() == Rule::path_data {
            for inner in pair.into_inner() {
                parse_segment(d, inner, &mut segments)?;
            }
        }
    }
    debug!(count = segments.len(), "parsed path data");
    Ok(segments)
}

/// Parse path data the way renderers do: keep everything before the first
/// error and drop the rest.
pub fn parse_path_data_lossy(d: &str) -> Vec<PathSegment> {
    let pairs = match PathDataParser::parse(Rule::path_data_lossy, d) {
        Ok(pairs) => pairs,
        Err(e) => {
            warn!(error = %e, "path data rejected");
            return Vec::new();
        }
    };

    let mut segments = Vec::new();
    for pair in pairs.flat_map(|p| p.into_inner()) {
        match pair.as_rule() {
            Rule::rest => {
                if !pair.as_str().trim().is_empty() {
                    warn!(rest = pair.as_str(), "dropping unparseable path data tail");
                }
            }
            Rule::EOI => {}
            _ => {
                // A number that overflows to infinity ends the usable data too.
                if let Err(e) = parse_segment(d, pair, &mut segments) {
                    warn!(error = %e, "dropping path data after bad number");
                    break;
                }
            }
        }
    }
    segments
}

/// Parse a `points` attribute into points.
///
/// Coordinates pair up in order. A pair with a non-numeric or non-finite
/// member is dropped, as is an odd trailing coordinate.
pub fn parse_points(s: &str) -> Vec<Point> {
    let pairs = match PathDataParser::parse(Rule::point_list, s) {
        Ok(pairs) => pairs,
        Err(e) => {
            warn!(error = %e, "point list rejected");
            return Vec::new();
        }
    };

    let coords: Vec<Option<f64>> = pairs
        .flat_map(|p| p.into_inner())
        .filter_map(|p| match p.as_rule() {
            Rule::number => Some(p.as_str().parse::<f64>().ok().filter(|v| v.is_finite())),
            Rule::junk => Some(None),
            _ => None,
        })
        .collect();

    if coords.len() % 2 != 0 {
        warn!(count = coords.len(), "odd coordinate count, dropping the last one");
    }

    coords
        .chunks_exact(2)
        .filter_map(|c| match (c[0], c[1]) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => {
                warn!("dropping malformed point");
                None
            }
        })
        .collect()
}

fn parse_segment(
    source: &str,
    pair: Pair<Rule>,
    out: &mut Vec<PathSegment>,
) -> Result<(), PathDataError> {
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();
    let abs = match inner.next() {
        Some(cmd) => cmd.as_str().chars().all(|c| c.is_ascii_uppercase()),
        None => return Ok(()),
    };

    match rule {
        Rule::moveto => {
            for (i, p) in inner.enumerate() {
                let (x, y) = parse_pair(source, p)?;
                if i == 0 {
                    out.push(PathSegment::MoveTo { abs, x, y });
                } else {
                    out.push(PathSegment::LineTo { abs, x, y });
                }
            }
        }
        Rule::lineto => {
            for p in inner {
                let (x, y) = parse_pair(source, p)?;
                out.push(PathSegment::LineTo { abs, x, y });
            }
        }
        Rule::hlineto => {
            for p in inner {
                let x = parse_number(source, &p)?;
                out.push(PathSegment::HorizontalLineTo { abs, x });
            }
        }
        Rule::vlineto => {
            for p in inner {
                let y = parse_number(source, &p)?;
                out.push(PathSegment::VerticalLineTo { abs, y });
            }
        }
        Rule::curveto => {
            let pts = collect_pairs(source, inner)?;
            for c in pts.chunks_exact(3) {
                out.push(PathSegment::CurveTo {
                    abs,
                    x1: c[0].0,
                    y1: c[0].1,
                    x2: c[1].0,
                    y2: c[1].1,
                    x: c[2].0,
                    y: c[2].1,
                });
            }
        }
        Rule::smooth_curveto => {
            let pts = collect_pairs(source, inner)?;
            for c in pts.chunks_exact(2) {
                out.push(PathSegment::SmoothCurveTo {
                    abs,
                    x2: c[0].0,
                    y2: c[0].1,
                    x: c[1].0,
                    y: c[1].1,
                });
            }
        }
        Rule::quadto => {
            let pts = collect_pairs(source, inner)?;
            for c in pts.chunks_exact(2) {
                out.push(PathSegment::Quadratic {
                    abs,
                    x1: c[0].0,
                    y1: c[0].1,
                    x: c[1].0,
                    y: c[1].1,
                });
            }
        }
        Rule::smooth_quadto => {
            for p in inner {
                let (x, y) = parse_pair(source, p)?;
                out.push(PathSegment::SmoothQuadratic { abs, x, y });
            }
        }
        Rule::arcto => {
            for arg in inner {
                out.push(parse_arc_arg(source, abs, arg)?);
            }
        }
        Rule::closepath => out.push(PathSegment::ClosePath { abs }),
        _ => {}
    }
    Ok(())
}

fn parse_arc_arg(source: &str, abs: bool, pair: Pair<Rule>) -> Result<PathSegment, PathDataError> {
    let mut rx = 0.0;
    let mut ry = 0.0;
    let mut x_axis_rotation = 0.0;
    let mut flags = [false; 2];
    let mut end = (0.0, 0.0);
    let (mut n, mut f) = (0, 0);

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::number => {
                let v = parse_number(source, &p)?;
                match n {
                    0 => rx = v,
                    1 => ry = v,
                    _ => x_axis_rotation = v,
                }
                n += 1;
            }
            Rule::flag => {
                if let Some(slot) = flags.get_mut(f) {
                    *slot = p.as_str() == "1";
                }
                f += 1;
            }
            Rule::pair => end = parse_pair(source, p)?,
            _ => {}
        }
    }

    Ok(PathSegment::EllipticalArc {
        abs,
        rx,
        ry,
        x_axis_rotation,
        large_arc: flags[0],
        sweep: flags[1],
        x: end.0,
        y: end.1,
    })
}

fn collect_pairs<'i>(
    source: &str,
    pairs: impl Iterator<Item = Pair<'i, Rule>>,
) -> Result<Vec<(f64, f64)>, PathDataError> {
    pairs.map(|p| parse_pair(source, p)).collect()
}

fn parse_pair(source: &str, pair: Pair<Rule>) -> Result<(f64, f64), PathDataError> {
    let mut x = 0.0;
    let mut y = 0.0;
    for (i, p) in pair.into_inner().enumerate() {
        let v = parse_number(source, &p)?;
        if i == 0 {
            x = v;
        } else {
            y = v;
        }
    }
    Ok((x, y))
}

fn parse_number(source: &str, pair: &Pair<Rule>) -> Result<f64, PathDataError> {
    let text = pair.as_str();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => {
            let span = pair.as_span();
            Err(PathDataError::InvalidNumber {
                text: text.to_string(),
                src: NamedSource::new(SOURCE_NAME, source.to_string()),
                span: SourceSpan::from(span.start()..span.end()),
            })
        }
    }
}

fn syntax_error(source: &str, e: pest::error::Error<Rule>) -> PathDataError {
    let span = match e.location {
        InputLocation::Pos(pos) => SourceSpan::from(pos..pos),
        InputLocation::Span((start, end)) => SourceSpan::from(start..end),
    };
    let expected = match &e.variant {
        pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            format!("expected {:?}", positives)
        }
        _ => "unexpected input".to_string(),
    };
    PathDataError::Syntax {
        src: NamedSource::new(SOURCE_NAME, source.to_string()),
        span,
        expected,
    }
}
