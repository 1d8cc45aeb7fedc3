//! Pointer-driven editing: per-block state machine, batch moves of the
//! selection, and the deletion drop target.

pub mod batch;
pub mod controller;
pub mod drop_target;

pub use batch::{BlockMove, DragSnapshot, apply_moves, batch_move};
pub use controller::{
    CursorHint, Edge, Effect, InteractionController, InteractionState, MoveDelta, PointerEvent,
    Tooltip,
};
pub use drop_target::DropTarget;
