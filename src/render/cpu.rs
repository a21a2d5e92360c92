use kurbo::Shape as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TraceryError, TraceryResult};
use crate::render::surface::{FrameRgba, Surface};
use crate::scene::color::Color;

/// Device stroke width in pixels.
const STROKE_WIDTH: f64 = 1.0;

/// Curve flattening tolerance for ellipse and stroke outlines, in device
/// pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// A CPU raster [`Surface`] producing premultiplied RGBA8 frames.
///
/// Draws accumulate in a `vello_cpu` render context and are rasterized onto
/// the backing pixmap when the frame is read back (or when a clear forces a
/// flush). The pixmap persists across passes, so a host can keep presenting
/// the previous frame while a new tree fails to evaluate or paint.
pub struct PixmapSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    fill: Option<Color>,
    stroke: Option<Color>,
}

impl PixmapSurface {
    /// Create a surface matching the canvas dimensions.
    pub fn new(canvas: Canvas) -> TraceryResult<Self> {
        let width = u16::try_from(canvas.width)
            .map_err(|_| TraceryError::render("canvas width exceeds raster surface limit"))?;
        let height = u16::try_from(canvas.height)
            .map_err(|_| TraceryError::render("canvas height exceeds raster surface limit"))?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: vello_cpu::RenderContext::new(width, height),
            fill: None,
            stroke: None,
        })
    }

    /// Rasterize pending draws and read the frame back.
    pub fn frame(&mut self) -> FrameRgba {
        self.flush_ops();
        FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn flush_ops(&mut self) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();
    }

    fn fill_cpu_path(&mut self, color: Color, path: &kurbo::BezPath) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Strokes are expanded to fill outlines: everything reaching the
    /// rasterizer is a filled path.
    fn fill_outline(&mut self, color: Color, path: &kurbo::BezPath) {
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &kurbo::Stroke::new(STROKE_WIDTH),
            &kurbo::StrokeOpts::default(),
            PATH_TOLERANCE,
        );
        self.fill_cpu_path(color, &outline);
    }
}

impl Surface for PixmapSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // Settle pending draws first so the erase applies on top of them.
        self.flush_ops();

        let x0 = (x.floor().max(0.0) as u32).min(u32::from(self.width));
        let y0 = (y.floor().max(0.0) as u32).min(u32::from(self.height));
        let x1 = ((x + width).ceil().max(0.0) as u32).min(u32::from(self.width));
        let y1 = ((y + height).ceil().max(0.0) as u32).min(u32::from(self.height));

        let row_px = self.width as usize;
        let data = self.pixmap.data_as_u8_slice_mut();
        for row in y0 as usize..y1 as usize {
            let start = (row * row_px + x0 as usize) * 4;
            let end = (row * row_px + x1 as usize) * 4;
            data[start..end].fill(0);
        }
    }

    fn set_fill(&mut self, color: Option<Color>) {
        self.fill = color;
    }

    fn set_stroke(&mut self, color: Option<Color>) {
        self.stroke = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(color) = self.fill.filter(|c| !c.is_transparent()) else {
            return;
        };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + width, y + height));
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(color) = self.stroke.filter(|c| !c.is_transparent()) else {
            return;
        };
        let path = kurbo::Rect::new(x, y, x + width, y + height).to_path(PATH_TOLERANCE);
        self.fill_outline(color, &path);
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        let Some(color) = self.fill.filter(|c| !c.is_transparent()) else {
            return;
        };
        let path = ellipse_path(cx, cy, rx, ry);
        self.fill_cpu_path(color, &path);
    }

    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        let Some(color) = self.stroke.filter(|c| !c.is_transparent()) else {
            return;
        };
        let path = ellipse_path(cx, cy, rx, ry);
        self.fill_outline(color, &path);
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let Some(color) = self.stroke.filter(|c| !c.is_transparent()) else {
            return;
        };
        let mut path = kurbo::BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x1, y1));
        self.fill_outline(color, &path);
    }
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> kurbo::BezPath {
    // Negative radii pass through the resolver uninterpreted; the raster
    // backend draws their magnitude.
    kurbo::Ellipse::new((cx, cy), (rx.abs(), ry.abs()), 0.0).to_path(PATH_TOLERANCE)
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
