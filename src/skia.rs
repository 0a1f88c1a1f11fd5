//! CPU raster backend on top of `tiny-skia`.
//!
//! Pixmaps are always RGBA8888 premultiplied, which is what both the wgpu
//! presenter and the PNG snapshot path expect. `tiny-skia` has no GPU
//! surfaces, so [`NoGpu`] stands in for the GPU context type and can never
//! be constructed.

use std::rc::Rc;

use tiny_skia::{
    FilterQuality, IntRect, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::backend::{Canvas, FrameContext, RasterBackend, RasterLease};
use crate::node::{PathGeometry, StrokeStyle};
use crate::utils::{Color, Rectangle};

pub enum NoGpu {}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn build_path(geometry: &PathGeometry) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for r in geometry.rects() {
        if let Some(rect) = Rect::from_xywh(r.x, r.y, r.width, r.height) {
            pb.push_rect(rect);
        }
    }
    pb.finish()
}

fn stroke_paint(style: &StrokeStyle) -> (Paint<'static>, Stroke) {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(style.color));
    paint.anti_alias = style.antialias;
    let stroke = Stroke {
        width: style.width,
        ..Stroke::default()
    };
    (paint, stroke)
}

/// A pixmap plus a Skia-style save/restore transform stack.
///
/// The pixmap sits behind an `Rc` so that [`SkiaBackend::snapshot`] can hand
/// out an immutable image without copying; a later write through
/// [`SkiaCanvas::pixmap_mut`] copies only if a snapshot is still alive.
#[derive(Clone)]
pub struct SkiaCanvas {
    pixmap: Rc<Pixmap>,
    transform: Transform,
    stack: Vec<Transform>,
}

impl SkiaCanvas {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self::from_pixmap(Pixmap::new(width, height)?))
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap: Rc::new(pixmap),
            transform: Transform::identity(),
            stack: Vec::new(),
        }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        Rc::make_mut(&mut self.pixmap)
    }

    pub fn total_transform(&self) -> Transform {
        self.transform
    }

    /// Clears the save stack and installs `base` as the root transform.
    pub fn reset_transform(&mut self, base: Transform) {
        self.stack.clear();
        self.transform = base;
    }

    fn stroke_built(&mut self, path: &Path, style: &StrokeStyle) {
        let (paint, stroke) = stroke_paint(style);
        let transform = self.transform;
        self.pixmap_mut()
            .stroke_path(path, &paint, &stroke, transform, None);
    }
}

impl Canvas for SkiaCanvas {
    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_translate(dx, dy);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform.pre_scale(sx, sy);
    }

    fn clear(&mut self, color: Color) {
        self.pixmap_mut().fill(to_skia_color(color));
    }

    fn stroke_path(&mut self, path: &PathGeometry, style: &StrokeStyle) {
        if let Some(path) = build_path(path) {
            self.stroke_built(&path, style);
        }
    }
}

#[derive(Debug, Clone)]
enum DrawCommand {
    Save,
    Restore,
    Translate(f32, f32),
    Scale(f32, f32),
    Clear(Color),
    StrokePath { path: Path, style: StrokeStyle },
}

/// Immutable list of draw calls captured by [`PictureRecorder`].
#[derive(Debug, Clone)]
pub struct SkiaPicture {
    cull: Rectangle,
    commands: Vec<DrawCommand>,
}

impl SkiaPicture {
    pub fn cull(&self) -> Rectangle {
        self.cull
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn playback(&self, canvas: &mut SkiaCanvas) {
        canvas.save();
        for command in &self.commands {
            match command {
                DrawCommand::Save => canvas.save(),
                DrawCommand::Restore => canvas.restore(),
                DrawCommand::Translate(dx, dy) => canvas.translate(*dx, *dy),
                DrawCommand::Scale(sx, sy) => canvas.scale(*sx, *sy),
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::StrokePath { path, style } => canvas.stroke_built(path, style),
            }
        }
        canvas.restore();
    }
}

/// Canvas that captures calls instead of rasterizing them. Paths are
/// flattened into `tiny_skia::Path` at record time so playback only strokes.
#[derive(Default)]
pub struct PictureRecorder {
    commands: Vec<DrawCommand>,
}

impl PictureRecorder {
    pub fn finish(self, cull: Rectangle) -> SkiaPicture {
        SkiaPicture {
            cull,
            commands: self.commands,
        }
    }
}

impl Canvas for PictureRecorder {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale(sx, sy));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn stroke_path(&mut self, path: &PathGeometry, style: &StrokeStyle) {
        if let Some(path) = build_path(path) {
            self.commands.push(DrawCommand::StrokePath {
                path,
                style: *style,
            });
        }
    }
}

/// Immutable view of a surface at snapshot time.
#[derive(Clone)]
pub struct SkiaImage(Rc<Pixmap>);

impl SkiaImage {
    pub fn pixmap(&self) -> &Pixmap {
        &self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SkiaBackend;

impl SkiaBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RasterBackend for SkiaBackend {
    type Canvas = SkiaCanvas;
    type GpuContext = NoGpu;
    type Surface = SkiaCanvas;
    type Picture = SkiaPicture;
    type Image = SkiaImage;

    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
        gpu: Option<&NoGpu>,
    ) -> Option<SkiaCanvas> {
        if let Some(gpu) = gpu {
            match *gpu {}
        }
        SkiaCanvas::new(width, height)
    }

    fn record_picture(
        &mut self,
        cull: Rectangle,
        draw: &mut dyn FnMut(&mut dyn Canvas),
    ) -> SkiaPicture {
        let mut recorder = PictureRecorder::default();
        draw(&mut recorder);
        recorder.finish(cull)
    }

    fn draw_picture(&mut self, surface: &mut SkiaCanvas, picture: &SkiaPicture) {
        picture.playback(surface);
    }

    fn snapshot(&mut self, surface: &SkiaCanvas) -> SkiaImage {
        SkiaImage(Rc::clone(&surface.pixmap))
    }

    fn draw_image(
        &mut self,
        canvas: &mut SkiaCanvas,
        image: &SkiaImage,
        src: Rectangle,
        dst: Rectangle,
    ) {
        if src.width <= 0.0 || src.height <= 0.0 {
            return;
        }
        let source = image.pixmap();
        let whole = src.x == 0.0
            && src.y == 0.0
            && src.width as u32 >= source.width()
            && src.height as u32 >= source.height();

        let cropped;
        let pixels = if whole {
            source
        } else {
            let Some(rect) = IntRect::from_xywh(
                src.x as i32,
                src.y as i32,
                src.width.ceil() as u32,
                src.height.ceil() as u32,
            ) else {
                return;
            };
            let Some(crop) = source.clone_rect(rect) else {
                return;
            };
            cropped = crop;
            &cropped
        };

        let transform = canvas
            .total_transform()
            .pre_translate(dst.x, dst.y)
            .pre_scale(dst.width / src.width, dst.height / src.height);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        canvas
            .pixmap_mut()
            .draw_pixmap(0, 0, pixels.as_ref(), &paint, transform, None);
    }
}

/// Frame context backed by a plain pixmap owned by the host.
pub struct SkiaFrame {
    canvas: SkiaCanvas,
    base: Transform,
}

impl SkiaFrame {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            canvas: SkiaCanvas::new(width, height)?,
            base: Transform::identity(),
        })
    }

    /// Device pixels per logical unit; applied under every frame's drawing.
    pub fn set_scale_factor(&mut self, scale: f32) {
        self.base = Transform::from_scale(scale, scale);
    }

    /// Clears to `background` and resets the transform stack.
    pub fn begin(&mut self, background: Color) {
        self.canvas.reset_transform(self.base);
        self.canvas.clear(background);
    }

    pub fn pixmap(&self) -> &Pixmap {
        self.canvas.pixmap()
    }
}

impl FrameContext<SkiaBackend> for SkiaFrame {
    fn lease(&mut self) -> Option<RasterLease<'_, SkiaBackend>> {
        Some(RasterLease::new(&mut self.canvas, None))
    }
}
