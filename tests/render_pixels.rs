//! Pixel-level rendering tests on the CPU raster surface.
//!
//! Sample points sit well inside filled regions so antialiased edges never
//! affect the assertions.

use tracery::{Canvas, PixmapSurface, Shape, render};

fn rect(x: f64, y: f64, width: f64, height: f64, fill: &str) -> Shape {
    Shape::Rect {
        x,
        y,
        width,
        height,
        fill: Some(fill.to_owned()),
        stroke: None,
        items: None,
    }
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

#[test]
fn rect_at_root_fills_its_resolved_pixel_box() {
    // Rect(10, 30, 50, 20) on a 500x500 canvas: absolute box
    // x=50, y=150, width=250, height=100.
    let tree = rect(10.0, 30.0, 50.0, 20.0, "red");
    let canvas = Canvas::square(500).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    assert_eq!(frame.pixel(150, 200), RED, "inside the box");
    assert_eq!(frame.pixel(60, 160), RED, "near the top-left corner");
    assert_eq!(frame.pixel(290, 240), RED, "near the bottom-right corner");
    assert_eq!(frame.pixel(30, 200), CLEAR, "left of the box");
    assert_eq!(frame.pixel(150, 100), CLEAR, "above the box");
    assert_eq!(frame.pixel(320, 200), CLEAR, "right of the box");
}

#[test]
fn later_sibling_paints_over_earlier_in_overlap() {
    let tree = Shape::Group {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        items: vec![
            rect(0.0, 0.0, 60.0, 60.0, "red"),
            rect(20.0, 20.0, 60.0, 60.0, "blue"),
        ],
    };
    let canvas = Canvas::square(100).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    assert_eq!(frame.pixel(10, 10), RED, "first sibling only");
    assert_eq!(frame.pixel(40, 40), BLUE, "overlap goes to the later sibling");
    assert_eq!(frame.pixel(70, 70), BLUE, "second sibling only");
}

#[test]
fn child_paints_over_its_parent() {
    let tree = Shape::Rect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        fill: Some("red".to_owned()),
        stroke: None,
        items: Some(vec![rect(25.0, 25.0, 50.0, 50.0, "blue")]),
    };
    let canvas = Canvas::square(100).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    assert_eq!(frame.pixel(10, 10), RED);
    assert_eq!(frame.pixel(50, 50), BLUE);
}

#[test]
fn every_pass_clears_the_whole_canvas() {
    let canvas = Canvas::square(100).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();

    // First frame covers everything.
    render(&rect(0.0, 0.0, 100.0, 100.0, "red"), canvas, &mut surface).unwrap();
    assert_eq!(surface.frame().pixel(80, 50), RED);

    // Second, smaller tree: no stale pixels outside it.
    render(&rect(0.0, 0.0, 50.0, 100.0, "blue"), canvas, &mut surface).unwrap();
    let frame = surface.frame();
    assert_eq!(frame.pixel(20, 50), BLUE);
    assert_eq!(frame.pixel(80, 50), CLEAR, "previous frame fully cleared");
    assert_eq!(frame.pixel(99, 99), CLEAR, "no stale pixels at frame edges");
}

#[test]
fn disjoint_halves_cover_the_canvas_without_gaps() {
    let tree = Shape::Group {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        items: vec![
            rect(0.0, 0.0, 50.0, 100.0, "red"),
            rect(50.0, 0.0, 50.0, 100.0, "blue"),
        ],
    };
    let canvas = Canvas::square(200).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    assert_eq!(frame.pixel(5, 5), RED);
    assert_eq!(frame.pixel(5, 194), RED);
    assert_eq!(frame.pixel(194, 5), BLUE);
    assert_eq!(frame.pixel(194, 194), BLUE);
    assert_eq!(frame.pixel(40, 100), RED);
    assert_eq!(frame.pixel(160, 100), BLUE);
}

#[test]
fn circle_fills_its_center_not_its_corners() {
    let tree = Shape::Circle {
        cx: 50.0,
        cy: 50.0,
        r: 30.0,
        fill: Some("#00f".to_owned()),
        stroke: None,
        items: None,
    };
    let canvas = Canvas::square(100).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    assert_eq!(frame.pixel(50, 50), BLUE);
    assert_eq!(frame.pixel(5, 5), CLEAR, "outside the disk");
}

#[test]
fn polygon_rasterizes_as_a_circle() {
    let hexagon = Shape::Polygon {
        cx: 50.0,
        cy: 50.0,
        r: 30.0,
        sides: 6,
        fill: Some("blue".to_owned()),
        stroke: None,
        items: None,
    };
    let disk = Shape::Circle {
        cx: 50.0,
        cy: 50.0,
        r: 30.0,
        fill: Some("blue".to_owned()),
        stroke: None,
        items: None,
    };
    let canvas = Canvas::square(100).unwrap();

    let mut a = PixmapSurface::new(canvas).unwrap();
    render(&hexagon, canvas, &mut a).unwrap();
    let mut b = PixmapSurface::new(canvas).unwrap();
    render(&disk, canvas, &mut b).unwrap();

    assert_eq!(a.frame().data, b.frame().data);
}

#[test]
fn stroked_line_leaves_ink_along_its_path_only() {
    let tree = Shape::Line {
        x0: 0.0,
        y0: 50.0,
        x1: 100.0,
        y1: 50.0,
        stroke: Some("black".to_owned()),
        items: None,
    };
    let canvas = Canvas::square(100).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    // The 1px stroke straddles the pixel rows around y=50; antialiasing may
    // split coverage, so assert on accumulated ink rather than exact values.
    let ink_on_line: u32 = (48..53).map(|y| u32::from(frame.pixel(50, y)[3])).sum();
    assert!(ink_on_line > 0, "line left no ink");
    let ink_far_away: u32 = (10..15).map(|y| u32::from(frame.pixel(50, y)[3])).sum();
    assert_eq!(ink_far_away, 0, "ink far from the line");
}

#[test]
fn stroke_without_fill_leaves_the_interior_empty() {
    let tree = Shape::Rect {
        x: 10.0,
        y: 10.0,
        width: 80.0,
        height: 80.0,
        fill: None,
        stroke: Some("black".to_owned()),
        items: None,
    };
    let canvas = Canvas::square(100).unwrap();
    let mut surface = PixmapSurface::new(canvas).unwrap();
    render(&tree, canvas, &mut surface).unwrap();
    let frame = surface.frame();

    assert_eq!(frame.pixel(50, 50), CLEAR, "interior is not filled");
    let edge_ink: u32 = (8..13).map(|x| u32::from(frame.pixel(x, 50)[3])).sum();
    assert!(edge_ink > 0, "left edge carries stroke ink");
}
