//! Turns pointer drags and wheel ticks into the transform the cache is
//! composited under.

use std::collections::HashSet;

use crate::transform::AffineTransform;
use crate::utils::Position;

pub const DEFAULT_ZOOM_BASE: f32 = 1.15;
pub const DEFAULT_MIN_ZOOM_LEVEL: i32 = -20;
pub const DEFAULT_MAX_ZOOM_LEVEL: i32 = 40;
pub const DEFAULT_ZOOM_RATIO: f32 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Pressed,
    Moved,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Position,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn pressed(position: Position) -> Self {
        Self {
            position,
            phase: PointerPhase::Pressed,
        }
    }

    pub fn moved(position: Position) -> Self {
        Self {
            position,
            phase: PointerPhase::Moved,
        }
    }

    pub fn released(position: Position) -> Self {
        Self {
            position,
            phase: PointerPhase::Released,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Position,
    /// Signed scroll amount; positive `y` scrolls up (zooms in).
    pub delta: Position,
}

impl WheelEvent {
    pub fn vertical(position: Position, dy: f32) -> Self {
        Self {
            position,
            delta: Position { x: 0.0, y: dy },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomPolicy {
    /// Integer zoom level with scale `base^level`. Every step rebuilds the
    /// transform from identity around the cursor, so a given level and
    /// cursor always yield the same matrix.
    Discrete {
        base: f32,
        min_level: i32,
        max_level: i32,
    },
    /// Multiplies the current transform by `ratio` (or its inverse) around
    /// the cursor. Unbounded, and rounding error accumulates over events.
    Continuous { ratio: f32 },
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        ZoomPolicy::Discrete {
            base: DEFAULT_ZOOM_BASE,
            min_level: DEFAULT_MIN_ZOOM_LEVEL,
            max_level: DEFAULT_MAX_ZOOM_LEVEL,
        }
    }
}

/// Transform for zoom `level`, anchored at `cursor`, built from identity.
pub fn discrete_zoom_transform(base: f32, level: i32, cursor: Position) -> AffineTransform {
    let scale = (base as f64).powi(level) as f32;
    AffineTransform::identity().scaled_about(scale, cursor)
}

#[derive(Debug, Clone)]
pub struct InputController {
    policy: ZoomPolicy,
    transform: AffineTransform,
    zoom_level: i32,
    dragging: bool,
    last_position: Position,
    // Bit patterns of every scale a wheel step has produced.
    zoom_states: HashSet<u32>,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(ZoomPolicy::default())
    }
}

impl InputController {
    pub fn new(policy: ZoomPolicy) -> Self {
        Self {
            policy,
            transform: AffineTransform::IDENTITY,
            zoom_level: 0,
            dragging: false,
            last_position: Position::default(),
            zoom_states: HashSet::new(),
        }
    }

    pub fn policy(&self) -> ZoomPolicy {
        self.policy
    }

    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// Distinct scale factors reached by wheel steps so far. Survives
    /// [`InputController::reset`].
    pub fn zoom_state_count(&self) -> usize {
        self.zoom_states.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Back to identity at level 0 with no drag in progress.
    pub fn reset(&mut self) {
        self.transform = AffineTransform::IDENTITY;
        self.zoom_level = 0;
        self.dragging = false;
        self.last_position = Position::default();
    }

    /// Returns the new transform when the event changed it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<AffineTransform> {
        match event.phase {
            PointerPhase::Pressed => {
                self.pointer_pressed(event.position);
                None
            }
            PointerPhase::Moved => self.pointer_moved(event.position),
            PointerPhase::Released => {
                self.pointer_released();
                None
            }
        }
    }

    pub fn pointer_pressed(&mut self, position: Position) {
        self.last_position = position;
        self.dragging = true;
    }

    pub fn pointer_moved(&mut self, position: Position) -> Option<AffineTransform> {
        if !self.dragging {
            return None;
        }
        let delta = position - self.last_position;
        self.last_position = position;
        self.transform = self
            .transform
            .post_concat(AffineTransform::from_translate(delta.x, delta.y));
        Some(self.transform)
    }

    pub fn pointer_released(&mut self) {
        self.dragging = false;
    }

    /// Returns `None` for a zero delta and for steps past either zoom limit.
    pub fn wheel(&mut self, event: WheelEvent) -> Option<AffineTransform> {
        if event.delta.y == 0.0 {
            return None;
        }
        let zoom_in = event.delta.y > 0.0;
        let cursor = event.position;

        match self.policy {
            ZoomPolicy::Discrete {
                base,
                min_level,
                max_level,
            } => {
                let step = if zoom_in { 1 } else { -1 };
                let level = (self.zoom_level + step).clamp(min_level, max_level);
                if level == self.zoom_level {
                    return None;
                }
                self.zoom_level = level;
                self.transform = discrete_zoom_transform(base, level, cursor);
                self.zoom_states.insert(self.transform.scale_x.to_bits());
                log::debug!(
                    "zoom level {} (scale {:.4}) at ({}, {}), {} distinct scales",
                    level,
                    self.transform.scale_x,
                    cursor.x,
                    cursor.y,
                    self.zoom_states.len()
                );
            }
            ZoomPolicy::Continuous { ratio } => {
                let factor = if zoom_in { ratio } else { 1.0 / ratio };
                self.transform = self.transform.scaled_about(factor, cursor);
                self.zoom_states.insert(self.transform.scale_x.to_bits());
                log::debug!(
                    "zoom scale {:.4}, {} distinct scales",
                    self.transform.scale_x,
                    self.zoom_states.len()
                );
            }
        }
        Some(self.transform)
    }
}
