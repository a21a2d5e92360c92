use crate::render::surface::Surface;
use crate::scene::color::Color;

/// One recorded drawing operation. Field order mirrors the [`Surface`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceOp {
    /// Erase a region.
    ClearRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Fill color change.
    SetFill(Option<Color>),
    /// Stroke color change.
    SetStroke(Option<Color>),
    /// Filled rectangle.
    FillRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Outlined rectangle.
    StrokeRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Filled ellipse.
    FillEllipse {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius along x.
        rx: f64,
        /// Radius along y.
        ry: f64,
    },
    /// Outlined ellipse.
    StrokeEllipse {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius along x.
        rx: f64,
        /// Radius along y.
        ry: f64,
    },
    /// Line segment.
    StrokeLine {
        /// Start x.
        x0: f64,
        /// Start y.
        y0: f64,
        /// End x.
        x1: f64,
        /// End y.
        y1: f64,
    },
}

/// A [`Surface`] that records every operation instead of rasterizing.
///
/// Useful for asserting paint order and style state in tests, and for
/// replaying a pass onto another surface.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Operations in call order.
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// New empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the recorded operations onto another surface, in order.
    pub fn replay(&self, target: &mut dyn Surface) {
        for op in &self.ops {
            match *op {
                SurfaceOp::ClearRect {
                    x,
                    y,
                    width,
                    height,
                } => target.clear_rect(x, y, width, height),
                SurfaceOp::SetFill(color) => target.set_fill(color),
                SurfaceOp::SetStroke(color) => target.set_stroke(color),
                SurfaceOp::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => target.fill_rect(x, y, width, height),
                SurfaceOp::StrokeRect {
                    x,
                    y,
                    width,
                    height,
                } => target.stroke_rect(x, y, width, height),
                SurfaceOp::FillEllipse { cx, cy, rx, ry } => target.fill_ellipse(cx, cy, rx, ry),
                SurfaceOp::StrokeEllipse { cx, cy, rx, ry } => {
                    target.stroke_ellipse(cx, cy, rx, ry);
                }
                SurfaceOp::StrokeLine { x0, y0, x1, y1 } => target.stroke_line(x0, y0, x1, y1),
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_fill(&mut self, color: Option<Color>) {
        self.ops.push(SurfaceOp::SetFill(color));
    }

    fn set_stroke(&mut self, color: Option<Color>) {
        self.ops.push(SurfaceOp::SetStroke(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::StrokeRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.ops.push(SurfaceOp::FillEllipse { cx, cy, rx, ry });
    }

    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.ops.push(SurfaceOp::StrokeEllipse { cx, cy, rx, ry });
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.ops.push(SurfaceOp::StrokeLine { x0, y0, x1, y1 });
    }
}
