//! The viewer control: owns the scene, the raster cache and the input state
//! and keeps them in step as resize and pointer events arrive.

use rand::Rng;

use crate::backend::{FrameContext, RasterBackend};
use crate::config::FastDrawConfig;
use crate::input::{InputController, PointerEvent, WheelEvent, ZoomPolicy};
use crate::render_cache::{RenderCache, RenderOutcome};
use crate::scene::Scene;
use crate::transform::AffineTransform;
use crate::utils::Size;

pub struct CachedDrawControl<B: RasterBackend> {
    scene: Scene,
    cache: RenderCache<B>,
    input: InputController,
    bounds: Size,
    repaint_requested: bool,
}

impl<B: RasterBackend> CachedDrawControl<B> {
    pub fn new(backend: B, scene: Scene, policy: ZoomPolicy) -> Self {
        Self {
            scene,
            cache: RenderCache::new(backend, Size::ZERO),
            input: InputController::new(policy),
            bounds: Size::ZERO,
            repaint_requested: false,
        }
    }

    pub fn from_config(backend: B, config: &FastDrawConfig) -> Self {
        let scene = Scene::new(
            config.scene.node_count,
            config.scene.max_rect_size,
            config.stroke.style(),
        );
        Self::new(backend, scene, config.zoom.policy())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn cache(&self) -> &RenderCache<B> {
        &self.cache
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn transform(&self) -> AffineTransform {
        self.cache.transform()
    }

    /// Returns and clears the pending repaint request.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    pub fn resize(&mut self, bounds: Size) {
        if !self.begin_resize(bounds) {
            return;
        }
        self.scene.regenerate(bounds);
        self.finish_resize(bounds);
    }

    /// Same as [`CachedDrawControl::resize`] with a caller-supplied generator.
    pub fn resize_with_rng<R: Rng + ?Sized>(&mut self, bounds: Size, rng: &mut R) {
        if !self.begin_resize(bounds) {
            return;
        }
        self.scene.regenerate_with_rng(bounds, rng);
        self.finish_resize(bounds);
    }

    fn begin_resize(&mut self, bounds: Size) -> bool {
        if bounds == self.bounds && !self.scene.is_empty() {
            log::trace!("resize to current bounds ignored");
            return false;
        }
        self.bounds = bounds;
        true
    }

    fn finish_resize(&mut self, bounds: Size) {
        self.input.reset();
        self.cache.set_transform(AffineTransform::IDENTITY);
        self.cache.invalidate(bounds);
        self.repaint_requested = true;
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if let Some(transform) = self.input.handle_pointer(event) {
            self.apply(transform);
        }
    }

    pub fn wheel(&mut self, event: WheelEvent) {
        if let Some(transform) = self.input.wheel(event) {
            self.apply(transform);
        }
    }

    fn apply(&mut self, transform: AffineTransform) {
        self.cache.set_transform(transform);
        self.repaint_requested = true;
    }

    pub fn render<F>(&mut self, frame: &mut F) -> RenderOutcome
    where
        F: FrameContext<B> + ?Sized,
    {
        self.cache.render(frame, &self.scene)
    }
}
