use crate::foundation::core::{Point, SPACE_UNITS, Vec2};
use crate::scene::model::Shape;

/// The absolute box a node's relative coordinates are defined within.
///
/// `origin` is the box's top-left corner in absolute units; `unit` is the
/// absolute length of one relative unit along each axis (the box dimension
/// divided by 100). The root space has origin (0,0) and unit (1,1), so one
/// absolute unit per relative unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Space {
    /// Top-left corner of the box, absolute.
    pub origin: Point,
    /// Absolute length of one relative unit along each axis.
    pub unit: Vec2,
}

impl Space {
    /// The implicit root space: origin (0,0), width 100, height 100.
    pub fn root() -> Self {
        Self {
            origin: Point::ORIGIN,
            unit: Vec2::new(1.0, 1.0),
        }
    }

    /// The space defined by an absolute box, re-expressed as a fresh 0–100
    /// coordinate system for the box's children.
    pub fn of_box(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            unit: Vec2::new(width / SPACE_UNITS, height / SPACE_UNITS),
        }
    }

    /// Whether both axes scale equally. Regular shapes (Square, Circle) keep
    /// their tag only under an isotropic space.
    pub fn is_isotropic(self) -> bool {
        self.unit.x == self.unit.y
    }

    fn map_x(self, v: f64) -> f64 {
        self.origin.x + v * self.unit.x
    }

    fn map_y(self, v: f64) -> f64 {
        self.origin.y + v * self.unit.y
    }
}

/// Space composition: convert a tree from nested parent-relative coordinates
/// into one absolute coordinate space.
///
/// Each coordinate maps as `origin + v * unit`, each size as `v * unit`; a
/// child's space is the node's own resolved box. A Group's box is never drawn
/// but always defines its children's space; a zero-dimension box collapses
/// all descendants to zero extent, which is a valid degenerate render, and
/// negative sizes pass through uninterpreted.
///
/// Type-changing degenerations: under an anisotropic space a Square resolves
/// to a Rect and a Circle to an Ellipse, so non-uniform parent stretching
/// stays visually correct instead of forcing a single `side`/`r` value. The
/// transform returns a different variant rather than mutating fields in
/// place, so a resolved Rect never carries a stale `side`.
///
/// Polygon is passed through untouched (children included): its composition
/// pass is a stub, and the painter draws it as a circle from its raw
/// coordinates after the output scale.
pub fn absolutize(shape: &Shape, space: Space) -> Shape {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            items,
        } => {
            let (ax, ay) = (space.map_x(*x), space.map_y(*y));
            let (aw, ah) = (width * space.unit.x, height * space.unit.y);
            Shape::Rect {
                x: ax,
                y: ay,
                width: aw,
                height: ah,
                fill: fill.clone(),
                stroke: stroke.clone(),
                items: absolutize_items(items, Space::of_box(ax, ay, aw, ah)),
            }
        }
        Shape::Square {
            x,
            y,
            side,
            fill,
            stroke,
            items,
        } => {
            let (ax, ay) = (space.map_x(*x), space.map_y(*y));
            let (sw, sh) = (side * space.unit.x, side * space.unit.y);
            let items = absolutize_items(items, Space::of_box(ax, ay, sw, sh));
            if space.is_isotropic() {
                Shape::Square {
                    x: ax,
                    y: ay,
                    side: sw,
                    fill: fill.clone(),
                    stroke: stroke.clone(),
                    items,
                }
            } else {
                Shape::Rect {
                    x: ax,
                    y: ay,
                    width: sw,
                    height: sh,
                    fill: fill.clone(),
                    stroke: stroke.clone(),
                    items,
                }
            }
        }
        Shape::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            items,
        } => {
            let (acx, acy) = (space.map_x(*cx), space.map_y(*cy));
            let (rx, ry) = (r * space.unit.x, r * space.unit.y);
            let child = Space::of_box(acx - rx, acy - ry, 2.0 * rx, 2.0 * ry);
            let items = absolutize_items(items, child);
            if space.is_isotropic() {
                Shape::Circle {
                    cx: acx,
                    cy: acy,
                    r: rx,
                    fill: fill.clone(),
                    stroke: stroke.clone(),
                    items,
                }
            } else {
                Shape::Ellipse {
                    cx: acx,
                    cy: acy,
                    rx,
                    ry,
                    fill: fill.clone(),
                    stroke: stroke.clone(),
                    items,
                }
            }
        }
        Shape::Ellipse {
            cx,
            cy,
            rx,
            ry,
            fill,
            stroke,
            items,
        } => {
            let (acx, acy) = (space.map_x(*cx), space.map_y(*cy));
            let (arx, ary) = (rx * space.unit.x, ry * space.unit.y);
            let child = Space::of_box(acx - arx, acy - ary, 2.0 * arx, 2.0 * ary);
            Shape::Ellipse {
                cx: acx,
                cy: acy,
                rx: arx,
                ry: ary,
                fill: fill.clone(),
                stroke: stroke.clone(),
                items: absolutize_items(items, child),
            }
        }
        Shape::Polygon { .. } => shape.clone(),
        Shape::Line {
            x0,
            y0,
            x1,
            y1,
            stroke,
            items,
        } => {
            let (ax0, ay0) = (space.map_x(*x0), space.map_y(*y0));
            let (ax1, ay1) = (space.map_x(*x1), space.map_y(*y1));
            let child = Space::of_box(
                ax0,
                ay0,
                (x1 - x0) * space.unit.x,
                (y1 - y0) * space.unit.y,
            );
            Shape::Line {
                x0: ax0,
                y0: ay0,
                x1: ax1,
                y1: ay1,
                stroke: stroke.clone(),
                items: absolutize_items(items, child),
            }
        }
        Shape::Group {
            x,
            y,
            width,
            height,
            items,
        } => {
            let (ax, ay) = (space.map_x(*x), space.map_y(*y));
            let (aw, ah) = (width * space.unit.x, height * space.unit.y);
            let child = Space::of_box(ax, ay, aw, ah);
            Shape::Group {
                x: ax,
                y: ay,
                width: aw,
                height: ah,
                items: items.iter().map(|item| absolutize(item, child)).collect(),
            }
        }
    }
}

fn absolutize_items(items: &Option<Vec<Shape>>, space: Space) -> Option<Vec<Shape>> {
    items
        .as_ref()
        .map(|items| items.iter().map(|item| absolutize(item, space)).collect())
}
