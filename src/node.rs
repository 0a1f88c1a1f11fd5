use crate::backend::Canvas;
use crate::utils::{Color, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub antialias: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
            antialias: false,
        }
    }
}

/// Closed rectangular sub-paths merged into one outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    rects: Vec<Rectangle>,
}

impl PathGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rect(&mut self, rect: Rectangle) {
        self.rects.push(rect);
    }

    /// Drops every sub-path but keeps the allocation.
    pub fn reset(&mut self) {
        self.rects.clear();
    }

    pub fn rects(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

pub trait DrawNode {
    fn draw(&self, canvas: &mut dyn Canvas);
    fn reset(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct PathDrawNode {
    path: PathGeometry,
    style: StrokeStyle,
}

impl PathDrawNode {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            path: PathGeometry::new(),
            style,
        }
    }

    pub fn add_rect(&mut self, rect: Rectangle) {
        self.path.add_rect(rect);
    }

    pub fn path(&self) -> &PathGeometry {
        &self.path
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

impl DrawNode for PathDrawNode {
    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.path.is_empty() {
            return;
        }
        canvas.stroke_path(&self.path, &self.style);
    }

    fn reset(&mut self) {
        self.path.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_geometry_in_place() {
        let mut node = PathDrawNode::default();
        node.add_rect(Rectangle::new(1.0, 2.0, 3.0, 4.0));
        node.add_rect(Rectangle::new(5.0, 6.0, 7.0, 8.0));
        let capacity = node.path.rects.capacity();

        node.reset();

        assert!(node.path().is_empty());
        assert_eq!(node.path.rects.capacity(), capacity);
        assert_eq!(*node.style(), StrokeStyle::default());
    }
}
