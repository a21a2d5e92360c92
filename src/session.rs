use crate::eval::dispatcher::{Dispatcher, Evaluation};
use crate::foundation::core::{Canvas, Seed, Tick};
use crate::foundation::error::TraceryResult;
use crate::render::painter::render;
use crate::render::record::RecordingSurface;
use crate::render::surface::Surface;
use crate::scene::color::Color;
use crate::scene::model::Shape;

/// Opacity of the veil drawn over a stale frame, so a faulted state reads as
/// "this picture is out of date" rather than as current output.
const STALE_VEIL: Color = Color::rgba8(255, 255, 255, 191);

/// Caller-side orchestration over a [`Dispatcher`].
///
/// The dispatcher resolves every request it is given, in response-arrival
/// order and without cancellation; it is the caller's job to keep only the
/// most recently issued result. A session does exactly that: [`submit`]
/// supersedes the in-flight evaluation (a superseded request still completes
/// inside the dispatcher; its resolution is discarded), [`poll`] drains the
/// current one, and [`present`] paints the last good scene — dimmed when the
/// newest evaluation or paint failed, so the stale frame is visibly stale.
///
/// [`submit`]: Session::submit
/// [`poll`]: Session::poll
/// [`present`]: Session::present
pub struct Session {
    dispatcher: Dispatcher,
    canvas: Canvas,
    inflight: Option<Evaluation>,
    scene: Option<Shape>,
    error: Option<String>,
}

impl Session {
    /// Create a session presenting onto `canvas`.
    pub fn new(dispatcher: Dispatcher, canvas: Canvas) -> Self {
        Self {
            dispatcher,
            canvas,
            inflight: None,
            scene: None,
            error: None,
        }
    }

    /// The dispatcher this session issues requests through.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The presentation canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Issue an evaluation, superseding any in-flight one.
    #[tracing::instrument(skip(self, source))]
    pub fn submit(&mut self, source: &str, seed: Seed, tick: Option<Tick>) {
        self.inflight = Some(self.dispatcher.evaluate(source, seed, tick));
    }

    /// Drain the in-flight evaluation if it has resolved.
    ///
    /// Returns `true` when state changed: a new scene arrived (clearing any
    /// fault), or the evaluation failed (the previous scene is kept and the
    /// session becomes faulted).
    pub fn poll(&mut self) -> bool {
        let Some(inflight) = &mut self.inflight else {
            return false;
        };
        let Some(outcome) = inflight.try_take() else {
            return false;
        };
        self.inflight = None;
        match outcome {
            Ok(scene) => {
                self.scene = Some(scene);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// The last successfully evaluated scene, if any.
    pub fn scene(&self) -> Option<&Shape> {
        self.scene.as_ref()
    }

    /// The latest evaluation or render diagnostic, if the session is faulted.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the newest evaluation or paint failed.
    pub fn is_faulted(&self) -> bool {
        self.error.is_some()
    }

    /// Paint the session state onto a surface.
    ///
    /// The pass is first rendered into a recording; only a pass that
    /// completes cleanly is replayed onto the device surface, so a paint
    /// failure leaves the previously presented frame intact. In a faulted
    /// state the frame is veiled to mark it stale. The error, if any, is
    /// returned as a value; nothing here is fatal.
    pub fn present(&mut self, surface: &mut dyn Surface) -> TraceryResult<()> {
        let Some(scene) = &self.scene else {
            return Ok(());
        };

        let mut pass = RecordingSurface::new();
        match render(scene, self.canvas, &mut pass) {
            Ok(()) => {
                pass.replay(surface);
                if self.error.is_some() {
                    self.veil(surface);
                }
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.veil(surface);
                Err(e)
            }
        }
    }

    fn veil(&self, surface: &mut dyn Surface) {
        surface.set_fill(Some(STALE_VEIL));
        surface.set_stroke(None);
        surface.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        );
    }
}
