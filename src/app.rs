use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FastDrawConfig;
use crate::control::CachedDrawControl;
use crate::diagnostics::FrameTimer;
use crate::input::{PointerEvent, WheelEvent};
use crate::present::Presenter;
use crate::render_cache::RenderOutcome;
use crate::skia::{SkiaBackend, SkiaFrame};
use crate::utils::{Position, Size};

/// Pixels scrolled per wheel "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

pub struct FastDrawApp {
    config: FastDrawConfig,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter<'static>>,
    frame: Option<SkiaFrame>,
    control: CachedDrawControl<SkiaBackend>,
    cursor: Position,
    scale_factor: f64,
    frame_timer: Option<FrameTimer>,
}

impl FastDrawApp {
    pub fn new(config: FastDrawConfig) -> Self {
        let control = CachedDrawControl::from_config(SkiaBackend::new(), &config);
        Self {
            config,
            window: None,
            presenter: None,
            frame: None,
            control,
            cursor: Position::default(),
            scale_factor: 1.0,
            frame_timer: cfg!(debug_assertions).then(|| FrameTimer::new(Instant::now())),
        }
    }

    pub fn control(&self) -> &CachedDrawControl<SkiaBackend> {
        &self.control
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn request_redraw_if_needed(&mut self) {
        if self.control.take_repaint_request() {
            self.request_redraw();
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(size);
        }
        self.frame = SkiaFrame::new(size.width, size.height).map(|mut frame| {
            frame.set_scale_factor(self.scale_factor as f32);
            frame
        });
        let logical = size.to_logical::<f32>(self.scale_factor);
        self.control
            .resize(Size::new(logical.width, logical.height));
        self.request_redraw_if_needed();
    }

    fn redraw(&mut self) {
        let (Some(frame), Some(presenter)) = (&mut self.frame, &mut self.presenter) else {
            return;
        };
        let started = Instant::now();
        frame.begin(self.control.scene().background());
        if let RenderOutcome::Skipped(reason) = self.control.render(frame) {
            log::trace!("nothing composited this frame: {:?}", reason);
        }
        if let Err(e) = presenter.present(frame.pixmap()) {
            log::error!("{:#}", e);
        }

        if let Some(timer) = &mut self.frame_timer {
            let now = Instant::now();
            if let Some(report) = timer.record(now - started, now) {
                log::debug!(
                    "{:.1} fps, {:.2} ms avg, {:.2} ms max over {} frames",
                    report.fps,
                    report.avg_frame_ms,
                    report.max_frame_ms,
                    report.frames
                );
            }
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let surface = instance.create_surface(window.clone())?;
        let presenter = Presenter::new(&instance, surface, window.inner_size())?;

        self.scale_factor = window.scale_factor();
        self.presenter = Some(presenter);
        self.window = Some(window.clone());
        self.handle_resize(window.inner_size());
        Ok(())
    }
}

impl ApplicationHandler<()> for FastDrawApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            log::error!("failed to open window: {:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(new_size) => self.handle_resize(new_size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = self.window.clone() {
                    self.handle_resize(window.inner_size());
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(self.scale_factor);
                self.cursor = Position::new(logical.x, logical.y);
                self.control.pointer(PointerEvent::moved(self.cursor));
                self.request_redraw_if_needed();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => PointerEvent::pressed(self.cursor),
                    ElementState::Released => PointerEvent::released(self.cursor),
                };
                self.control.pointer(event);
                self.request_redraw_if_needed();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.control.wheel(WheelEvent::vertical(self.cursor, dy));
                self.request_redraw_if_needed();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }
}

pub fn run_app(config: FastDrawConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = FastDrawApp::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
