//! Scale + translate matrices used for panning and zooming the cached layer.
//!
//! Only the diagonal and translation terms are stored; nothing in the viewer
//! rotates or skews, so a full 3x3 matrix would just carry zeros around.

use crate::utils::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_translate(dx: f32, dy: f32) -> Self {
        Self {
            translate_x: dx,
            translate_y: dy,
            ..Self::IDENTITY
        }
    }

    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::IDENTITY
        }
    }

    /// Returns a transform that applies `self` first and then `other`.
    pub fn post_concat(self, other: AffineTransform) -> Self {
        Self {
            scale_x: other.scale_x * self.scale_x,
            scale_y: other.scale_y * self.scale_y,
            translate_x: other.scale_x * self.translate_x + other.translate_x,
            translate_y: other.scale_y * self.translate_y + other.translate_y,
        }
    }

    /// Scales by `factor` around `anchor`, leaving the anchor where it is.
    pub fn scaled_about(self, factor: f32, anchor: Position) -> Self {
        self.post_concat(Self::from_translate(-anchor.x, -anchor.y))
            .post_concat(Self::from_scale(factor, factor))
            .post_concat(Self::from_translate(anchor.x, anchor.y))
    }

    pub fn map_point(&self, p: Position) -> Position {
        Position {
            x: p.x * self.scale_x + self.translate_x,
            y: p.y * self.scale_y + self.translate_y,
        }
    }

    pub fn map_vector(&self, v: Position) -> Position {
        Position {
            x: v.x * self.scale_x,
            y: v.y * self.scale_y,
        }
    }

    pub fn translation(&self) -> Position {
        Position {
            x: self.translate_x,
            y: self.translate_y,
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.scale_x == self.scale_y
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn to_tiny_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.scale_x,
            0.0,
            0.0,
            self.scale_y,
            self.translate_x,
            self.translate_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_concat_applies_left_first() {
        let t = AffineTransform::from_scale(2.0, 2.0)
            .post_concat(AffineTransform::from_translate(5.0, -1.0));
        let p = t.map_point(Position::new(1.0, 1.0));
        assert_eq!(p, Position::new(7.0, 1.0));
    }

    #[test]
    fn tiny_skia_conversion_matches_map_point() {
        let t = AffineTransform::from_scale(1.5, 1.5)
            .post_concat(AffineTransform::from_translate(10.0, 20.0));
        let mut pts = [tiny_skia::Point::from_xy(4.0, 8.0)];
        t.to_tiny_skia().map_points(&mut pts);
        let ours = t.map_point(Position::new(4.0, 8.0));
        assert!((pts[0].x - ours.x).abs() < 1e-4);
        assert!((pts[0].y - ours.y).abs() < 1e-4);
    }
}
