//! Capability seam between the render cache and whatever actually rasterizes.
//!
//! The cache only needs a handful of things from a 2D backend: an offscreen
//! surface it can own, a way to record draw calls once and replay them, an
//! immutable snapshot of the surface, and a blit onto the frame canvas. The
//! host hands over the frame canvas through a [`FrameContext`] lease that may
//! be refused for a given frame.

use crate::node::{PathGeometry, StrokeStyle};
use crate::utils::{Color, Rectangle, Size};

/// Immediate-mode drawing target. Transform calls compose the way Skia's
/// canvas does: each call is applied before everything already on the stack.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Fills the whole target, ignoring the current transform.
    fn clear(&mut self, color: Color);
    fn stroke_path(&mut self, path: &PathGeometry, style: &StrokeStyle);
}

/// Anything that can replay its draw calls onto a canvas of the given size.
pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas, bounds: Size);
}

pub trait RasterBackend {
    /// Canvas type handed out by the host each frame.
    type Canvas: Canvas;
    /// Handle to a GPU device, when the host has one.
    type GpuContext;
    type Surface;
    type Picture;
    type Image;

    /// Allocates an offscreen surface. A GPU-backed surface should be
    /// preferred whenever `gpu` is present. `None` means allocation failed.
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
        gpu: Option<&Self::GpuContext>,
    ) -> Option<Self::Surface>;

    fn record_picture(
        &mut self,
        cull: Rectangle,
        draw: &mut dyn FnMut(&mut dyn Canvas),
    ) -> Self::Picture;

    fn draw_picture(&mut self, surface: &mut Self::Surface, picture: &Self::Picture);

    fn snapshot(&mut self, surface: &Self::Surface) -> Self::Image;

    fn draw_image(
        &mut self,
        canvas: &mut Self::Canvas,
        image: &Self::Image,
        src: Rectangle,
        dst: Rectangle,
    );
}

/// Raster access for one frame. Dropping the lease gives the canvas back.
pub struct RasterLease<'a, B: RasterBackend> {
    pub canvas: &'a mut B::Canvas,
    pub gpu: Option<&'a B::GpuContext>,
}

impl<'a, B: RasterBackend> RasterLease<'a, B> {
    pub fn new(canvas: &'a mut B::Canvas, gpu: Option<&'a B::GpuContext>) -> Self {
        Self { canvas, gpu }
    }
}

pub trait FrameContext<B: RasterBackend> {
    /// Returns `None` when raster access is unavailable for this frame.
    fn lease(&mut self) -> Option<RasterLease<'_, B>>;
}
