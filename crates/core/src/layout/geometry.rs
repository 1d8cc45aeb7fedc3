use skillspan_protocol::{Point, Rect};

use super::packing::{PackedLayout, pack_lane};
use crate::config::LayoutConfig;
use crate::model::{BlockId, ProgressBlock, Section, TimelineWindow};

/// Which part of a block a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPart {
    LeftHandle,
    RightHandle,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockHit {
    pub id: BlockId,
    pub section: Section,
    pub part: BlockPart,
    /// Surface-space rectangle of the block at the time of the hit.
    pub rect: Rect,
    /// Surface y of the lane the block lives in.
    pub lane_top: f64,
}

/// A block's packed position, in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPlacement {
    pub id: BlockId,
    pub row: usize,
    pub rect: Rect,
}

/// Lane-relative rectangle of a block placed in `row`.
///
/// Blocks are never drawn narrower than one month.
pub fn block_rect(block: &ProgressBlock, window: &TimelineWindow, row: usize, config: &LayoutConfig) -> Rect {
    let month_width = window.month_width();
    let interval = block.interval();
    let left = window.month_to_x(interval.start);
    let width = (f64::from(interval.duration()) * month_width).max(month_width);
    let top = config.lane_top_padding + row as f64 * config.row_height();
    Rect::new(left, top, width, config.block_height)
}

/// Row implied by a lane-relative block top, the inverse of [`block_rect`].
pub fn row_from_top(top: f64, config: &LayoutConfig) -> i32 {
    let row_height = config.row_height();
    if row_height <= 0.0 {
        return 0;
    }
    (((top - config.lane_top_padding) / row_height).round() as i32).max(0)
}

pub fn lane_height(total_rows: usize, config: &LayoutConfig) -> f64 {
    (total_rows as f64 * config.row_height() + config.lane_bottom_padding).max(config.lane_min_height)
}

/// One lane, packed and positioned on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneGeometry {
    pub section: Section,
    /// Surface y of the lane's top edge.
    pub top: f64,
    pub height: f64,
    pub layout: PackedLayout,
    /// In block-collection order, so later entries draw on top.
    pub placements: Vec<BlockPlacement>,
}

impl LaneGeometry {
    pub fn compute(
        blocks: &[ProgressBlock],
        section: Section,
        window: &TimelineWindow,
        config: &LayoutConfig,
        top: f64,
    ) -> Self {
        let layout = pack_lane(blocks, section, config.max_row_search);
        let placements = blocks
            .iter()
            .filter(|b| b.section == section)
            .map(|b| {
                let row = layout.row(&b.id).unwrap_or(0);
                BlockPlacement {
                    id: b.id.clone(),
                    row,
                    rect: block_rect(b, window, row, config).offset_y(top),
                }
            })
            .collect();
        Self {
            section,
            top,
            height: lane_height(layout.total_rows(), config),
            layout,
            placements,
        }
    }

    pub fn bounds(&self, width: f64) -> Rect {
        Rect::new(0.0, self.top, width, self.height)
    }

    pub fn placement(&self, id: &BlockId) -> Option<&BlockPlacement> {
        self.placements.iter().find(|p| &p.id == id)
    }
}

/// Full vertical arrangement: top lane, axis band, bottom lane.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGeometry {
    pub window: TimelineWindow,
    pub top: LaneGeometry,
    pub axis: Rect,
    pub bottom: LaneGeometry,
    handle_width: f64,
}

impl TimelineGeometry {
    pub fn compute(blocks: &[ProgressBlock], window: &TimelineWindow, config: &LayoutConfig) -> Self {
        let top = LaneGeometry::compute(blocks, Section::Top, window, config, 0.0);
        let axis = Rect::new(0.0, top.height, window.width, config.axis_height);
        let bottom = LaneGeometry::compute(blocks, Section::Bottom, window, config, axis.bottom());
        Self {
            window: *window,
            top,
            axis,
            bottom,
            handle_width: config.handle_width,
        }
    }

    pub fn lane(&self, section: Section) -> &LaneGeometry {
        match section {
            Section::Top => &self.top,
            Section::Bottom => &self.bottom,
        }
    }

    pub fn total_height(&self) -> f64 {
        self.bottom.top + self.bottom.height
    }

    pub fn placement(&self, id: &BlockId) -> Option<(Section, &BlockPlacement)> {
        Section::BOTH
            .into_iter()
            .find_map(|s| self.lane(s).placement(id).map(|p| (s, p)))
    }

    /// Topmost block under `point`, and which grip or body it hit.
    pub fn hit_test(&self, point: Point) -> Option<BlockHit> {
        for section in Section::BOTH {
            let lane = self.lane(section);
            let Some(placement) = lane.placements.iter().rev().find(|p| p.rect.contains(point)) else {
                continue;
            };
            let rect = placement.rect;
            let part = if point.x >= rect.right() - self.handle_width {
                BlockPart::RightHandle
            } else if point.x <= rect.x + self.handle_width {
                BlockPart::LeftHandle
            } else {
                BlockPart::Body
            };
            return Some(BlockHit {
                id: placement.id.clone(),
                section,
                part,
                rect,
                lane_top: lane.top,
            });
        }
        None
    }
}
