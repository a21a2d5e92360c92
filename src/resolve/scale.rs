use crate::scene::model::Shape;

/// Uniform output scale: multiply every absolute coordinate and size by a
/// single scalar, recursively.
///
/// This is the second resolver pass, applied after space composition to map
/// absolute units onto device pixels (`canvas pixel size / 100`). It is a
/// pure linear multiply over geometric fields: tags, colors and child order
/// are untouched, so scaling by 1.0 is the identity.
pub fn rescale(shape: &Shape, scale: f64) -> Shape {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            items,
        } => Shape::Rect {
            x: x * scale,
            y: y * scale,
            width: width * scale,
            height: height * scale,
            fill: fill.clone(),
            stroke: stroke.clone(),
            items: rescale_items(items, scale),
        },
        Shape::Square {
            x,
            y,
            side,
            fill,
            stroke,
            items,
        } => Shape::Square {
            x: x * scale,
            y: y * scale,
            side: side * scale,
            fill: fill.clone(),
            stroke: stroke.clone(),
            items: rescale_items(items, scale),
        },
        Shape::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            items,
        } => Shape::Circle {
            cx: cx * scale,
            cy: cy * scale,
            r: r * scale,
            fill: fill.clone(),
            stroke: stroke.clone(),
            items: rescale_items(items, scale),
        },
        Shape::Ellipse {
            cx,
            cy,
            rx,
            ry,
            fill,
            stroke,
            items,
        } => Shape::Ellipse {
            cx: cx * scale,
            cy: cy * scale,
            rx: rx * scale,
            ry: ry * scale,
            fill: fill.clone(),
            stroke: stroke.clone(),
            items: rescale_items(items, scale),
        },
        Shape::Polygon {
            cx,
            cy,
            r,
            sides,
            fill,
            stroke,
            items,
        } => Shape::Polygon {
            cx: cx * scale,
            cy: cy * scale,
            r: r * scale,
            sides: *sides,
            fill: fill.clone(),
            stroke: stroke.clone(),
            items: rescale_items(items, scale),
        },
        Shape::Line {
            x0,
            y0,
            x1,
            y1,
            stroke,
            items,
        } => Shape::Line {
            x0: x0 * scale,
            y0: y0 * scale,
            x1: x1 * scale,
            y1: y1 * scale,
            stroke: stroke.clone(),
            items: rescale_items(items, scale),
        },
        Shape::Group {
            x,
            y,
            width,
            height,
            items,
        } => Shape::Group {
            x: x * scale,
            y: y * scale,
            width: width * scale,
            height: height * scale,
            items: items.iter().map(|item| rescale(item, scale)).collect(),
        },
    }
}

fn rescale_items(items: &Option<Vec<Shape>>, scale: f64) -> Option<Vec<Shape>> {
    items
        .as_ref()
        .map(|items| items.iter().map(|item| rescale(item, scale)).collect())
}
