#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use fastdraw::backend::{Canvas, Drawable, FrameContext, RasterBackend, RasterLease};
use fastdraw::node::{PathGeometry, StrokeStyle};
use fastdraw::utils::{Color, Rectangle, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Save,
    Restore,
    Translate(f32, f32),
    Scale(f32, f32),
    Clear(Color),
    Stroke(usize),
    DrawImage { src: Rectangle, dst: Rectangle },
}

#[derive(Debug, Default)]
pub struct MockCanvas {
    pub ops: Vec<Op>,
}

impl Canvas for MockCanvas {
    fn save(&mut self) {
        self.ops.push(Op::Save);
    }
    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }
    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(Op::Translate(dx, dy));
    }
    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(Op::Scale(sx, sy));
    }
    fn clear(&mut self, color: Color) {
        self.ops.push(Op::Clear(color));
    }
    fn stroke_path(&mut self, path: &PathGeometry, _style: &StrokeStyle) {
        self.ops.push(Op::Stroke(path.rects().len()));
    }
}

pub struct MockGpu;

pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub gpu: bool,
    pub pictures_drawn: usize,
    live: Rc<Cell<usize>>,
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

pub struct MockPicture {
    pub cull: Rectangle,
    pub ops: Vec<Op>,
}

pub struct MockImage {
    pub width: u32,
    pub height: u32,
}

#[derive(Default)]
pub struct MockBackend {
    pub surfaces_created: usize,
    pub gpu_surfaces: usize,
    pub recordings: usize,
    pub picture_draws: usize,
    pub snapshots: usize,
    pub last_surface_size: Option<(u32, u32)>,
    pub last_picture_ops: usize,
    pub fail_allocation: bool,
    live_surfaces: Rc<Cell<usize>>,
}

impl MockBackend {
    pub fn live_surfaces(&self) -> usize {
        self.live_surfaces.get()
    }
}

impl RasterBackend for MockBackend {
    type Canvas = MockCanvas;
    type GpuContext = MockGpu;
    type Surface = MockSurface;
    type Picture = MockPicture;
    type Image = MockImage;

    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
        gpu: Option<&MockGpu>,
    ) -> Option<MockSurface> {
        if self.fail_allocation {
            return None;
        }
        self.surfaces_created += 1;
        if gpu.is_some() {
            self.gpu_surfaces += 1;
        }
        self.last_surface_size = Some((width, height));
        self.live_surfaces.set(self.live_surfaces.get() + 1);
        Some(MockSurface {
            width,
            height,
            gpu: gpu.is_some(),
            pictures_drawn: 0,
            live: Rc::clone(&self.live_surfaces),
        })
    }

    fn record_picture(
        &mut self,
        cull: Rectangle,
        draw: &mut dyn FnMut(&mut dyn Canvas),
    ) -> MockPicture {
        self.recordings += 1;
        let mut recorder = MockCanvas::default();
        draw(&mut recorder);
        self.last_picture_ops = recorder.ops.len();
        MockPicture {
            cull,
            ops: recorder.ops,
        }
    }

    fn draw_picture(&mut self, surface: &mut MockSurface, _picture: &MockPicture) {
        self.picture_draws += 1;
        surface.pictures_drawn += 1;
    }

    fn snapshot(&mut self, surface: &MockSurface) -> MockImage {
        self.snapshots += 1;
        MockImage {
            width: surface.width,
            height: surface.height,
        }
    }

    fn draw_image(
        &mut self,
        canvas: &mut MockCanvas,
        _image: &MockImage,
        src: Rectangle,
        dst: Rectangle,
    ) {
        canvas.ops.push(Op::DrawImage { src, dst });
    }
}

pub struct MockFrame {
    pub canvas: MockCanvas,
    pub gpu: Option<MockGpu>,
    pub lease_available: bool,
}

impl MockFrame {
    pub fn cpu() -> Self {
        Self {
            canvas: MockCanvas::default(),
            gpu: None,
            lease_available: true,
        }
    }

    pub fn gpu() -> Self {
        Self {
            gpu: Some(MockGpu),
            ..Self::cpu()
        }
    }

    pub fn without_lease() -> Self {
        Self {
            lease_available: false,
            ..Self::cpu()
        }
    }
}

impl FrameContext<MockBackend> for MockFrame {
    fn lease(&mut self) -> Option<RasterLease<'_, MockBackend>> {
        if !self.lease_available {
            return None;
        }
        Some(RasterLease::new(&mut self.canvas, self.gpu.as_ref()))
    }
}

/// Content that counts how often it is asked to draw.
#[derive(Default)]
pub struct CountingContent {
    pub draws: Cell<usize>,
}

impl Drawable for CountingContent {
    fn draw(&self, canvas: &mut dyn Canvas, bounds: Size) {
        self.draws.set(self.draws.get() + 1);
        canvas.clear(Color::WHITE);
        let mut path = PathGeometry::new();
        path.add_rect(Rectangle::new(0.0, 0.0, bounds.width / 2.0, bounds.height / 2.0));
        canvas.stroke_path(&path, &StrokeStyle::default());
    }
}
