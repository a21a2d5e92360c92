//! Tracery turns user-authored scripts into declarative trees of 2D shapes and
//! renders them onto a pixel canvas.
//!
//! The pipeline has three stages:
//!
//! 1. **Evaluate**: source text + seed (+ optional tick) is dispatched over an
//!    asynchronous channel to an external script engine, which replies with a
//!    serialized scene value correlated back by token ([`Dispatcher`]).
//! 2. **Resolve**: the scene tree's parent-relative 0–100 coordinates are
//!    composed into one absolute space ([`absolutize`]), then uniformly
//!    scaled to device pixels ([`rescale`]).
//! 3. **Render**: the resolved tree is painted depth-first onto a [`Surface`]
//!    ([`render`]).
//!
//! Evaluations of known-expensive bundled scripts short-circuit through an
//! immutable precomputed table ([`lookup_precomputed`]) without touching the
//! engine, and [`Session`] layers latest-wins result tracking and stale-frame
//! presentation on top for interactive hosts.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Scene values are immutable**: each evaluation produces a fresh tree;
//!   resolution transforms copies and never mutates in place.
//! - **Errors are values**: a failed evaluation or render surfaces as a
//!   [`TraceryError`], never as a panic across the API boundary.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod eval;
mod foundation;
mod render;
mod resolve;
mod scene;
mod session;

/// Bundled example scripts.
pub mod gallery;

pub use crate::foundation::core::{Canvas, Point, Seed, Tick, Vec2};
pub use crate::foundation::error::{TraceryError, TraceryResult};

pub use crate::cache::fingerprint::{Fingerprint, fingerprint_source};
pub use crate::cache::precomputed::lookup_precomputed;
pub use crate::eval::dispatcher::{Dispatcher, EngineChannel, Evaluation};
pub use crate::eval::program::{ENTRY_POINT, build_request};
pub use crate::eval::protocol::{EngineMessage, EngineRequest};
pub use crate::render::cpu::PixmapSurface;
pub use crate::render::painter::render;
pub use crate::render::record::{RecordingSurface, SurfaceOp};
pub use crate::render::surface::{FrameRgba, Surface};
pub use crate::resolve::scale::rescale;
pub use crate::resolve::space::{Space, absolutize};
pub use crate::scene::color::Color;
pub use crate::scene::model::Shape;
pub use crate::session::Session;
