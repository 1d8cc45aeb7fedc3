use skillspan_protocol::{Point, Rect};

use crate::config::LayoutConfig;

/// Fixed-position region that deletes whatever block is released over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    rect: Rect,
    buffer: f64,
}

impl DropTarget {
    /// `buffer` widens the hit area on every side.
    pub fn new(rect: Rect, buffer: f64) -> Self {
        Self { rect, buffer }
    }

    /// Square target in the bottom-right corner of a `width`×`height` surface.
    pub fn anchored(width: f64, height: f64, config: &LayoutConfig) -> Self {
        let size = config.trash_size;
        let rect = Rect::new(
            width - config.trash_margin - size,
            height - config.trash_margin - size,
            size,
            size,
        );
        Self::new(rect, config.delete_buffer)
    }

    /// Visible bounds, without the buffer.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn hit(&self, point: Point) -> bool {
        self.rect.expand(self.buffer).contains(point)
    }
}
