pub mod app;
pub mod backend;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod input;
pub mod node;
pub mod present;
pub mod render_cache;
pub mod scene;
pub mod skia;
pub mod transform;
pub mod utils;

pub use backend::{Canvas, Drawable, FrameContext, RasterBackend, RasterLease};
pub use config::FastDrawConfig;
pub use control::CachedDrawControl;
pub use input::{InputController, PointerEvent, WheelEvent, ZoomPolicy};
pub use render_cache::{CacheStatus, RenderCache, RenderOutcome, RenderStats, SkipReason};
pub use scene::Scene;
pub use skia::{SkiaBackend, SkiaFrame};
pub use transform::AffineTransform;
