use crate::foundation::core::Canvas;
use crate::foundation::error::{TraceryError, TraceryResult};
use crate::render::surface::Surface;
use crate::resolve::scale::rescale;
use crate::resolve::space::{Space, absolutize};
use crate::scene::color::Color;
use crate::scene::model::Shape;

/// Render one scene tree onto a surface.
///
/// Resolves the tree (space composition, then the canvas's uniform output
/// scale) and paints it depth-first in pre-order: each node before its
/// children, siblings in array order, so a later sibling's subtree paints
/// over an earlier one's where they overlap. The surface is first cleared
/// over the full canvas so no stale pixels survive from a previous,
/// differently-shaped tree.
///
/// Failures are recovered here and surfaced as [`TraceryError::Render`];
/// callers keep the previous good frame (see [`crate::Session`]).
#[tracing::instrument(skip(root, surface))]
pub fn render(root: &Shape, canvas: Canvas, surface: &mut dyn Surface) -> TraceryResult<()> {
    surface.clear_rect(
        0.0,
        0.0,
        f64::from(canvas.width),
        f64::from(canvas.height),
    );
    let resolved = rescale(&absolutize(root, Space::root()), canvas.unit_scale());
    paint(&resolved, surface)
}

/// Paint an already-resolved tree, without clearing or rescaling.
pub(crate) fn paint(shape: &Shape, surface: &mut dyn Surface) -> TraceryResult<()> {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            ..
        } => {
            set_styles(surface, fill.as_deref(), stroke.as_deref())?;
            surface.fill_rect(*x, *y, *width, *height);
            surface.stroke_rect(*x, *y, *width, *height);
        }
        Shape::Square {
            x,
            y,
            side,
            fill,
            stroke,
            ..
        } => {
            set_styles(surface, fill.as_deref(), stroke.as_deref())?;
            surface.fill_rect(*x, *y, *side, *side);
            surface.stroke_rect(*x, *y, *side, *side);
        }
        Shape::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            ..
        } => {
            set_styles(surface, fill.as_deref(), stroke.as_deref())?;
            surface.fill_ellipse(*cx, *cy, *r, *r);
            surface.stroke_ellipse(*cx, *cy, *r, *r);
        }
        Shape::Ellipse {
            cx,
            cy,
            rx,
            ry,
            fill,
            stroke,
            ..
        } => {
            set_styles(surface, fill.as_deref(), stroke.as_deref())?;
            surface.fill_ellipse(*cx, *cy, *rx, *ry);
            surface.stroke_ellipse(*cx, *cy, *rx, *ry);
        }
        // Painted as a circle from its circumradius; see the resolver notes.
        Shape::Polygon {
            cx,
            cy,
            r,
            fill,
            stroke,
            ..
        } => {
            set_styles(surface, fill.as_deref(), stroke.as_deref())?;
            surface.fill_ellipse(*cx, *cy, *r, *r);
            surface.stroke_ellipse(*cx, *cy, *r, *r);
        }
        Shape::Line {
            x0,
            y0,
            x1,
            y1,
            stroke,
            ..
        } => {
            set_styles(surface, None, stroke.as_deref())?;
            surface.stroke_line(*x0, *y0, *x1, *y1);
        }
        Shape::Group { items, .. } => {
            for item in items {
                paint(item, surface)?;
            }
            return Ok(());
        }
    }

    if let Some(items) = shape.children() {
        for item in items {
            paint(item, surface)?;
        }
    }
    Ok(())
}

/// Reset both paint channels for a node. Absent colors reset to transparent
/// explicitly: the surface may retain style state from a sibling.
fn set_styles(
    surface: &mut dyn Surface,
    fill: Option<&str>,
    stroke: Option<&str>,
) -> TraceryResult<()> {
    surface.set_fill(parse_channel(fill)?);
    surface.set_stroke(parse_channel(stroke)?);
    Ok(())
}

fn parse_channel(color: Option<&str>) -> TraceryResult<Option<Color>> {
    color
        .map(|s| {
            Color::parse(s).map_err(|e| TraceryError::render(format!("unpaintable node: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::record::{RecordingSurface, SurfaceOp};

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

    #[test]
    fn clears_the_full_canvas_before_painting() {
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
        let mut surface = RecordingSurface::new();
        render(&tree, Canvas::square(500).unwrap(), &mut surface).unwrap();
        assert_eq!(
            surface.ops[0],
            SurfaceOp::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 500.0,
                height: 500.0,
            }
        );
    }

    #[test]
    fn scenario_rect_at_root_resolves_to_pixel_box() {
        let tree = rect(10.0, 30.0, 50.0, 20.0, "red");
        let mut surface = RecordingSurface::new();
        render(&tree, Canvas::square(500).unwrap(), &mut surface).unwrap();
        assert!(surface.ops.contains(&SurfaceOp::FillRect {
            x: 50.0,
            y: 150.0,
            width: 250.0,
            height: 100.0,
        }));
    }

    #[test]
    fn paints_node_before_children_and_siblings_in_order() {
        let tree = Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            fill: Some("red".to_owned()),
            stroke: None,
            items: Some(vec![
                rect(0.0, 0.0, 10.0, 10.0, "green"),
                rect(10.0, 0.0, 10.0, 10.0, "blue"),
            ]),
        };
        let mut surface = RecordingSurface::new();
        paint(&tree, &mut surface).unwrap();

        let fills: Vec<Option<Color>> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::SetFill(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![
                Some(Color::rgba8(255, 0, 0, 255)),
                Some(Color::rgba8(0, 128, 0, 255)),
                Some(Color::rgba8(0, 0, 255, 255)),
            ]
        );
    }

    #[test]
    fn group_draws_no_geometry_of_its_own() {
        let tree = Shape::Group {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            items: vec![],
        };
        let mut surface = RecordingSurface::new();
        paint(&tree, &mut surface).unwrap();
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn absent_colors_reset_both_channels_to_transparent() {
        let tree = Shape::Circle {
            cx: 50.0,
            cy: 50.0,
            r: 10.0,
            fill: None,
            stroke: None,
            items: None,
        };
        let mut surface = RecordingSurface::new();
        paint(&tree, &mut surface).unwrap();
        assert_eq!(surface.ops[0], SurfaceOp::SetFill(None));
        assert_eq!(surface.ops[1], SurfaceOp::SetStroke(None));
    }

    #[test]
    fn line_has_no_fill_channel() {
        let tree = Shape::Line {
            x0: 0.0,
            y0: 0.0,
            x1: 10.0,
            y1: 10.0,
            stroke: Some("#000".to_owned()),
            items: None,
        };
        let mut surface = RecordingSurface::new();
        paint(&tree, &mut surface).unwrap();
        assert_eq!(surface.ops[0], SurfaceOp::SetFill(None));
        assert_eq!(
            surface.ops[2],
            SurfaceOp::StrokeLine {
                x0: 0.0,
                y0: 0.0,
                x1: 10.0,
                y1: 10.0,
            }
        );
    }

    #[test]
    fn polygon_paints_as_a_circle() {
        let tree = Shape::Polygon {
            cx: 5.0,
            cy: 6.0,
            r: 2.0,
            sides: 6,
            fill: Some("blue".to_owned()),
            stroke: None,
            items: None,
        };
        let mut surface = RecordingSurface::new();
        paint(&tree, &mut surface).unwrap();
        assert!(surface.ops.contains(&SurfaceOp::FillEllipse {
            cx: 5.0,
            cy: 6.0,
            rx: 2.0,
            ry: 2.0,
        }));
    }

    #[test]
    fn invalid_color_is_a_render_error() {
        let tree = rect(0.0, 0.0, 10.0, 10.0, "nonsense");
        let mut surface = RecordingSurface::new();
        let err = paint(&tree, &mut surface).unwrap_err();
        assert!(matches!(err, TraceryError::Render(_)));
    }
}
