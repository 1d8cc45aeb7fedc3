pub mod geometry;
pub mod packing;

pub use geometry::{
    BlockHit, BlockPart, BlockPlacement, LaneGeometry, TimelineGeometry, block_rect, lane_height,
    row_from_top,
};
pub use packing::{PackedLayout, pack, pack_lane};
