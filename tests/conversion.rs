//! End-to-end conversion and geometry properties.
//!
//! Run with: RUST_LOG=ooxgeom=debug cargo test --features tracing -- --nocapture

use ooxgeom::geometry::shapes::{circle, ellipse, line, polygon, polyline, rectangle};
use ooxgeom::geometry::{circles, coverage_masks, rectangles, reduce_points};
use ooxgeom::{
    AffineTransform, ConversionOptions, Converter, EmuMapper, GeometryError, Glyph, GlyphLayout,
    LruPathCache, PathOp, Point, RawCommand, ShapeGeometry, area, intersects, intersects_batch,
    parse_path_data_lossy, parse_points, union_bounds,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample_shapes() -> Vec<ShapeGeometry> {
    vec![
        rectangle(0.0, 0.0, 10.0, 10.0, 2.0, 2.0).unwrap(),
        rectangle(10.0, 0.0, 5.0, 5.0, 0.0, 0.0).unwrap(),
        circle(0.0, 0.0, 1.0).unwrap(),
        circle(2.0, 0.0, 1.0).unwrap(),
        ellipse(20.0, 20.0, 5.0, 1.0).unwrap(),
        polygon(&parse_points("0,0 30,0 15,25")).unwrap(),
        polyline(&parse_points("-5,-5 -1,-1 -3,4")).unwrap(),
        line(0.0, 50.0, 100.0, 50.0).unwrap(),
    ]
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn points_round_trip() {
    let lists: [&[f64]; 4] = [
        &[0.0, 0.0, 10.0, 0.0, 10.0, 10.0],
        &[-1.5, 2.25, 1e3, -7.0],
        &[],
        &[0.125, 0.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
    ];
    for coords in lists {
        let text = coords.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",");
        let points = parse_points(&text);
        assert_eq!(points.len(), coords.len() / 2, "{text}");
        for (p, c) in points.iter().zip(coords.chunks_exact(2)) {
            assert_eq!((p.x, p.y), (c[0], c[1]));
        }
    }
}

#[test]
fn lossy_parse_keeps_prefix() {
    init_tracing();
    let segments = parse_path_data_lossy("M 0 0 L 10 0 L 10 # 10 L 0 10");
    assert_eq!(segments.len(), 2);
}

// =============================================================================
// Spatial properties
// =============================================================================

#[test]
fn intersection_is_symmetric() {
    let shapes = sample_shapes();
    for a in &shapes {
        for b in &shapes {
            assert_eq!(intersects(a, b), intersects(b, a), "{:?} vs {:?}", a.kind, b.kind);
        }
    }
}

#[test]
fn touching_tie_breaks() {
    let out = circles(&[0.0, 2.0], &[0.0, 0.0], &[1.0, 1.0]).unwrap();
    let (a, b) = (out[0].as_ref().unwrap(), out[1].as_ref().unwrap());
    assert!(intersects(a, b));

    let squares = rectangles(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 1.0], &[1.0, 1.0], &[0.0; 2], &[0.0; 2])
        .unwrap();
    assert!(!intersects(squares[0].as_ref().unwrap(), squares[1].as_ref().unwrap()));
}

#[test]
fn batch_intersection_length_mismatch() {
    let shapes = sample_shapes();
    let err = intersects_batch(&shapes[..3], &shapes[..2]).unwrap_err();
    assert_eq!(err, GeometryError::LengthMismatch { expected: 3, found: 2 });
}

#[test]
fn union_identity_and_containment() {
    let shapes = sample_shapes();
    for s in &shapes {
        assert_eq!(union_bounds(std::slice::from_ref(s)), s.bounding_box);
    }
    let all = union_bounds(&shapes);
    for s in &shapes {
        assert!(all.contains_rect(&s.bounding_box));
    }
}

#[test]
fn right_triangle_shoelace() {
    for (a, b) in [(3.0, 4.0), (0.5, 12.0), (1e4, 3e-3)] {
        let t = polygon(&[Point::new(0.0, 0.0), Point::new(a, 0.0), Point::new(0.0, b)]).unwrap();
        assert!((area(&t) - 0.5 * a * b).abs() <= 1e-9 * a * b);
    }
}

#[test]
fn masks_follow_batch_order() {
    let shapes = sample_shapes();
    let masks = coverage_masks(&shapes, (100.0, 100.0), (20, 20));
    assert_eq!(masks.len(), shapes.len());
    assert!(masks[0].count() > 0);
    assert_eq!(masks[7].count(), 0);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn rectangle_radius_clamp() {
    let r = rectangle(0.0, 0.0, 10.0, 10.0, 20.0, 20.0).unwrap();
    assert_eq!(r.corner_radii(), Some((5.0, 5.0)));
}

#[test]
fn circle_bounding_box() {
    let c = circle(5.0, 5.0, 3.0).unwrap();
    assert_eq!(c.bounding_box.as_tuple(), (2.0, 2.0, 6.0, 6.0));
}

#[test]
fn polygon_reduction_keeps_longest_edges() {
    let pts = parse_points("0,0 10,0 10,10 0,10");
    assert_eq!(reduce_points(&pts, 2), vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
}

#[test]
fn zero_height_line() {
    init_tracing();
    let shape = line(0.0, 0.0, 100.0, 0.0).unwrap();
    let out = Converter::default()
        .convert_shape(&shape, &AffineTransform::identity())
        .unwrap();
    assert_eq!(out.bounds.height, 1);
    assert_eq!(shape.dimensions.1, 0.0);
}

// =============================================================================
// Conversion
// =============================================================================

#[test]
fn quadratic_path_is_elevated() {
    init_tracing();
    let out = Converter::default()
        .convert_path_data("M0 0 Q 50 100 100 0", &AffineTransform::identity())
        .unwrap();
    insta::assert_snapshot!(out.to_string(), @"M 0 0 C 7200 28800 14400 28800 21600 0");
    assert_eq!((out.bounds.width, out.bounds.height), (100, 50));
}

#[test]
fn glyph_run_converts() {
    let glyph = Glyph {
        outline: vec![
            RawCommand::named("moveTo", vec![Point::new(0.0, 0.0)]),
            RawCommand::named("lineTo", vec![Point::new(1000.0, 0.0)]),
            RawCommand::named("lineTo", vec![Point::new(1000.0, 1000.0)]),
            RawCommand::named("closePath", vec![]),
        ],
        advance: 1000.0,
    };
    let layout = GlyphLayout::new(Point::new(0.0, 10.0), 10.0, 1000.0);
    let out = Converter::default()
        .convert_glyph_run(&[glyph], &layout, &AffineTransform::identity())
        .unwrap();
    insta::assert_snapshot!(out.to_string(), @"M 0 21600 L 21600 21600 L 21600 0 Z");
}

#[test]
fn emu_bounds_and_shared_cache() {
    let cache = LruPathCache::new(16);
    let mapper = EmuMapper::default();
    let shape = rectangle(1.0, 1.0, 4.0, 2.0, 0.0, 0.0).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let converter = Converter::new(ConversionOptions::default())
                    .with_mapper(&mapper)
                    .with_cache(&cache);
                let out = converter.convert_shape(&shape, &AffineTransform::identity()).unwrap();
                assert_eq!(out.bounds.x, 9525);
                assert_eq!(out.bounds.width, 4 * 9525);
            });
        }
    });
    assert_eq!(cache.len(), 1);
}

#[test]
fn rotated_square_bounds_grow() {
    let shape = rectangle(-1.0, -1.0, 2.0, 2.0, 0.0, 0.0).unwrap();
    let out = Converter::new(ConversionOptions::default().with_path_scale(1000))
        .convert_shape(&shape, &AffineTransform::rotate(45.0))
        .unwrap();
    // Corners land on the axes at +-sqrt(2); each rounds to +-1.
    assert_eq!((out.bounds.x, out.bounds.width), (-1, 2));
    assert_eq!((out.bounds.y, out.bounds.height), (-1, 2));
    assert_eq!(out.path_width, 1000);
}

#[test]
fn small_circle_stays_curved() {
    let shape = circle(5.0, 5.0, 2.0).unwrap();
    for opts in [ConversionOptions::default(), ConversionOptions::default().with_simplify(true)] {
        let out = Converter::new(opts)
            .convert_shape(&shape, &AffineTransform::identity())
            .unwrap();
        assert!(out.ops.iter().any(|op| matches!(op, PathOp::CubicCurveTo(..))), "{out}");
    }
}

#[test]
fn huge_rectangle_saturates_bounds() {
    let shape = rectangle(-1e30, 0.0, 2e30, 10.0, 0.0, 0.0).unwrap();
    let out = Converter::default()
        .convert_shape(&shape, &AffineTransform::identity())
        .unwrap();
    assert_eq!((out.bounds.x, out.bounds.width), (i64::MIN, i64::MAX));
    assert_eq!(out.bounds.height, 10);
}
