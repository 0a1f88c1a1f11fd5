//! Offscreen raster cache for the scene.
//!
//! Geometry is recorded and rasterized once per invalidation. Every frame
//! after that is a snapshot of the cached surface blitted under the current
//! pan/zoom transform, so frame cost does not depend on how many nodes the
//! scene holds.

use crate::backend::{Canvas, Drawable, FrameContext, RasterBackend};
use crate::transform::AffineTransform;
use crate::utils::{Rectangle, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Recorded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Width or height is not positive.
    Degenerate,
    /// The frame context refused raster access.
    NoLease,
    /// The backend could not allocate the offscreen surface.
    SurfaceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Skipped(SkipReason),
    /// The cached layer was blitted; `recorded` is set on the frame that
    /// (re)built the cache.
    Composited { recorded: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub surfaces_created: u64,
    pub recordings: u64,
    pub composites: u64,
    pub skipped: u64,
    pub invalidations: u64,
}

enum CacheState<B: RasterBackend> {
    Empty,
    Recorded {
        surface: B::Surface,
        picture: B::Picture,
    },
}

pub struct RenderCache<B: RasterBackend> {
    backend: B,
    bounds: Size,
    transform: AffineTransform,
    state: CacheState<B>,
    stats: RenderStats,
}

impl<B: RasterBackend> RenderCache<B> {
    pub fn new(backend: B, bounds: Size) -> Self {
        Self {
            backend,
            bounds,
            transform: AffineTransform::IDENTITY,
            state: CacheState::Empty,
            stats: RenderStats::default(),
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    pub fn status(&self) -> CacheStatus {
        match self.state {
            CacheState::Empty => CacheStatus::Empty,
            CacheState::Recorded { .. } => CacheStatus::Recorded,
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Drops the cached surface and picture and adopts new bounds. The next
    /// [`RenderCache::render`] records the content again.
    pub fn invalidate(&mut self, bounds: Size) {
        // Replacing the state drops the old surface and picture right here.
        self.state = CacheState::Empty;
        self.bounds = bounds;
        self.stats.invalidations += 1;
        log::debug!(
            "render cache invalidated at {}x{}",
            bounds.width,
            bounds.height
        );
    }

    /// Only the next composite is affected; the cache is left alone.
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    pub fn render<F, D>(&mut self, frame: &mut F, content: &D) -> RenderOutcome
    where
        F: FrameContext<B> + ?Sized,
        D: Drawable + ?Sized,
    {
        let outcome = self.render_inner(frame, content);
        match outcome {
            RenderOutcome::Skipped(reason) => {
                self.stats.skipped += 1;
                log::trace!("frame skipped: {:?}", reason);
            }
            RenderOutcome::Composited { .. } => self.stats.composites += 1,
        }
        outcome
    }

    fn render_inner<F, D>(&mut self, frame: &mut F, content: &D) -> RenderOutcome
    where
        F: FrameContext<B> + ?Sized,
        D: Drawable + ?Sized,
    {
        let bounds = self.bounds;
        if bounds.is_degenerate() {
            return RenderOutcome::Skipped(SkipReason::Degenerate);
        }

        let Some(lease) = frame.lease() else {
            return RenderOutcome::Skipped(SkipReason::NoLease);
        };

        let mut recorded = false;
        if let CacheState::Empty = self.state {
            let (width, height) = bounds.pixel_size();
            let Some(mut surface) = self.backend.create_surface(width, height, lease.gpu) else {
                log::warn!("could not allocate {}x{} cache surface", width, height);
                return RenderOutcome::Skipped(SkipReason::SurfaceUnavailable);
            };
            self.stats.surfaces_created += 1;
            log::debug!(
                "allocated {}x{} cache surface (gpu: {})",
                width,
                height,
                lease.gpu.is_some()
            );

            let picture = self
                .backend
                .record_picture(Rectangle::from_size(bounds), &mut |canvas: &mut dyn Canvas| {
                    content.draw(canvas, bounds)
                });
            self.backend.draw_picture(&mut surface, &picture);
            self.stats.recordings += 1;
            recorded = true;
            log::debug!("recorded scene into cache surface");

            self.state = CacheState::Recorded { surface, picture };
        }

        let CacheState::Recorded { surface, .. } = &self.state else {
            return RenderOutcome::Skipped(SkipReason::SurfaceUnavailable);
        };
        let snapshot = self.backend.snapshot(surface);

        let canvas = lease.canvas;
        let rect = Rectangle::from_size(bounds);
        canvas.save();
        canvas.translate(self.transform.translate_x, self.transform.translate_y);
        canvas.scale(self.transform.scale_x, self.transform.scale_y);
        self.backend.draw_image(canvas, &snapshot, rect, rect);
        canvas.restore();
        log::trace!("composited cache under {:?}", self.transform);

        RenderOutcome::Composited { recorded }
    }
}
