//! The drawable content of the viewer: a fixed pool of path nodes that get
//! new random rectangles every time the viewport changes size.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::{Canvas, Drawable};
use crate::node::{DrawNode, PathDrawNode, StrokeStyle};
use crate::utils::{Color, Rectangle, Size};

pub const DEFAULT_NODE_COUNT: usize = 10_000;
pub const DEFAULT_MAX_RECT_SIZE: u32 = 30;

#[derive(Debug)]
pub struct Scene {
    nodes: Vec<PathDrawNode>,
    node_count: usize,
    max_rect_size: u32,
    style: StrokeStyle,
    background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_COUNT, DEFAULT_MAX_RECT_SIZE, StrokeStyle::default())
    }
}

impl Scene {
    /// Nodes are not allocated until the first [`Scene::regenerate`].
    pub fn new(node_count: usize, max_rect_size: u32, style: StrokeStyle) -> Self {
        Self {
            nodes: Vec::new(),
            node_count,
            max_rect_size,
            style,
            background: Color::WHITE,
        }
    }

    pub fn nodes(&self) -> &[PathDrawNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Scatters one rectangle per node over `bounds` using a freshly seeded
    /// generator, so consecutive layouts are unrelated.
    pub fn regenerate(&mut self, bounds: Size) {
        let mut rng = StdRng::from_entropy();
        self.regenerate_with_rng(bounds, &mut rng);
    }

    pub fn regenerate_with_rng<R: Rng + ?Sized>(&mut self, bounds: Size, rng: &mut R) {
        if self.nodes.is_empty() {
            let style = self.style;
            self.nodes.reserve_exact(self.node_count);
            self.nodes
                .extend((0..self.node_count).map(|_| PathDrawNode::new(style)));
        } else {
            for node in &mut self.nodes {
                node.reset();
            }
        }

        let max_x = bounds.width.max(0.0) as u32;
        let max_y = bounds.height.max(0.0) as u32;
        let max_side = self.max_rect_size;

        for node in &mut self.nodes {
            let rect = Rectangle::new(
                sample_below(rng, max_x) as f32,
                sample_below(rng, max_y) as f32,
                sample_below(rng, max_side) as f32,
                sample_below(rng, max_side) as f32,
            );
            node.add_rect(rect);
        }

        log::debug!(
            "regenerated {} nodes for {}x{}",
            self.nodes.len(),
            bounds.width,
            bounds.height
        );
    }
}

// Integer in [0, upper); an empty range collapses to 0.
fn sample_below<R: Rng + ?Sized>(rng: &mut R, upper: u32) -> u32 {
    if upper == 0 {
        0
    } else {
        rng.gen_range(0..upper)
    }
}

impl Drawable for Scene {
    fn draw(&self, canvas: &mut dyn Canvas, _bounds: Size) {
        canvas.save();
        canvas.clear(self.background);
        for node in &self.nodes {
            node.draw(canvas);
        }
        canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_allocated_lazily() {
        let scene = Scene::new(16, 30, StrokeStyle::default());
        assert!(scene.is_empty());
    }

    #[test]
    fn zero_sized_axis_pins_coordinate() {
        let mut scene = Scene::new(32, 30, StrokeStyle::default());
        let mut rng = StdRng::seed_from_u64(3);
        scene.regenerate_with_rng(Size::new(0.0, 50.0), &mut rng);
        assert!(scene.nodes().iter().all(|n| n.path().rects()[0].x == 0.0));
    }
}
