use crate::foundation::error::{TraceryError, TraceryResult};

/// A node in the scene-graph value produced by one evaluation.
///
/// Coordinates and sizes are numeric, expressed on a 0–100 scale relative to
/// the node's parent box (the document root is implicitly a 0–100 × 0–100
/// space). Every variant except [`Shape::Group`] may carry an optional
/// `items` list of children, drawn after the node's own geometry inside the
/// node's box; a Group's `items` is always present and the Group itself is
/// never drawn.
///
/// The serialized form carries a lower-cased `type` tag plus the variant's
/// own fields, recursing into `items`. Decoding rejects nodes missing
/// required fields for their tag; absent `fill`/`stroke`/`items` decode to
/// "not drawn" / "no children", never to zero-valued geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned box.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Box width.
        width: f64,
        /// Box height.
        height: f64,
        /// Fill color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Stroke color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        /// Optional children, drawn after this node inside its box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Shape>>,
    },
    /// Axis-aligned square; degenerates to [`Shape::Rect`] under anisotropic
    /// scale.
    Square {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Side length.
        side: f64,
        /// Fill color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Stroke color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        /// Optional children, drawn after this node inside its box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Shape>>,
    },
    /// Circle; degenerates to [`Shape::Ellipse`] under anisotropic scale.
    Circle {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius.
        r: f64,
        /// Fill color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Stroke color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        /// Optional children, drawn after this node inside its box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Shape>>,
    },
    /// Axis-aligned ellipse.
    Ellipse {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
        /// Fill color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Stroke color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        /// Optional children, drawn after this node inside its box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Shape>>,
    },
    /// Regular polygon with `sides` vertices. Currently painted as a circle
    /// and passed through space composition untouched; see the resolver.
    Polygon {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Circumradius.
        r: f64,
        /// Vertex count, must be ≥ 3.
        sides: u32,
        /// Fill color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Stroke color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        /// Optional children, drawn after this node inside its box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Shape>>,
    },
    /// Line segment. One-dimensional; carries no fill.
    Line {
        /// Start x.
        x0: f64,
        /// Start y.
        y0: f64,
        /// End x.
        x1: f64,
        /// End y.
        y1: f64,
        /// Stroke color string; absent renders transparent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        /// Optional children, drawn after this node inside its box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Shape>>,
    },
    /// Pure container: its box defines its children's coordinate space but
    /// is never itself drawn.
    Group {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Box width.
        width: f64,
        /// Box height.
        height: f64,
        /// Children, drawn in array order. Required; may be empty.
        items: Vec<Shape>,
    },
}

impl Shape {
    /// The lower-cased wire tag for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Square { .. } => "square",
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Polygon { .. } => "polygon",
            Shape::Line { .. } => "line",
            Shape::Group { .. } => "group",
        }
    }

    /// Children of this node, if any. A Group always has children (possibly
    /// an empty list); other variants only when `items` is present.
    pub fn children(&self) -> Option<&[Shape]> {
        match self {
            Shape::Rect { items, .. }
            | Shape::Square { items, .. }
            | Shape::Circle { items, .. }
            | Shape::Ellipse { items, .. }
            | Shape::Polygon { items, .. }
            | Shape::Line { items, .. } => items.as_deref(),
            Shape::Group { items, .. } => Some(items),
        }
    }

    /// Validate structural invariants the serde layer cannot express,
    /// recursively: currently that a Polygon has at least 3 sides.
    pub fn validate(&self) -> TraceryResult<()> {
        if let Shape::Polygon { sides, .. } = *self
            && sides < 3
        {
            return Err(TraceryError::validation(format!(
                "polygon must have at least 3 sides, got {sides}"
            )));
        }
        if let Some(items) = self.children() {
            for item in items {
                item.validate()?;
            }
        }
        Ok(())
    }
}
