use skillspan_protocol::Point;

use super::drop_target::DropTarget;
use crate::config::LayoutConfig;
use crate::layout::{BlockHit, BlockPart, row_from_top};
use crate::model::{BlockId, MonthInterval, ProgressBlock, TimelineWindow, YearMonth, pixel_to_month_offset};

/// Pointer input, in surface coordinates, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// `additive` is set when a multi-select modifier (ctrl/cmd/shift) is held.
    Down { position: Point, additive: bool },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    ResizingLeft,
    ResizingRight,
    Dragging,
}

/// Cursor the host should show for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Grabbing,
    ResizeHorizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Transient `year/month` label shown next to the edge being resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub edge: Edge,
    /// Surface point of the moving edge's top.
    pub anchor: Point,
}

/// One drag step expressed in whole months and rows, relative to where the
/// drag started. Months are measured before window clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveDelta {
    pub months: i32,
    pub rows: i32,
}

/// What the owner of the block collection should do in response to input.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A body press began a drag; snapshot the blocks and show the
    /// deletion target.
    DragStarted { id: BlockId },
    /// New interval for a block being resized. The opposite edge is unchanged.
    Resize { id: BlockId, interval: MonthInterval },
    /// New interval and row for a dragged block, plus the displacement for
    /// batch moves.
    Move {
        id: BlockId,
        interval: MonthInterval,
        row: i32,
        delta: MoveDelta,
    },
    /// The block was released over the deletion target.
    Delete { id: BlockId },
    DragEnded,
}

/// State captured at pointer-down; every move is computed from it.
#[derive(Debug, Clone, PartialEq)]
struct Grip {
    id: BlockId,
    origin: Point,
    left_px: f64,
    width_px: f64,
    top_px: f64,
    start_row: i32,
    interval: MonthInterval,
}

/// Pointer state machine for a single block.
///
/// `Idle` → press on a grip or body → `ResizingLeft` / `ResizingRight` /
/// `Dragging` → release → `Idle`. Release is the only way out; there is no
/// cancel.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    grip: Option<Grip>,
    tooltip: Option<Tooltip>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.state == InteractionState::Dragging
    }

    /// Block currently being manipulated.
    pub fn active_block(&self) -> Option<&BlockId> {
        self.grip.as_ref().map(|g| &g.id)
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn cursor(&self) -> CursorHint {
        match self.state {
            InteractionState::Idle => CursorHint::Default,
            InteractionState::Dragging => CursorHint::Grabbing,
            InteractionState::ResizingLeft | InteractionState::ResizingRight => {
                CursorHint::ResizeHorizontal
            }
        }
    }

    /// Begin an interaction on `block`, which was hit at `position`.
    pub fn press(
        &mut self,
        hit: &BlockHit,
        block: &ProgressBlock,
        position: Point,
        config: &LayoutConfig,
    ) -> Vec<Effect> {
        let start_row = row_from_top(hit.rect.y - hit.lane_top, config);
        self.grip = Some(Grip {
            id: block.id.clone(),
            origin: position,
            left_px: hit.rect.x,
            width_px: hit.rect.w,
            top_px: hit.rect.y,
            start_row,
            interval: block.interval(),
        });
        self.tooltip = None;
        self.state = match hit.part {
            BlockPart::LeftHandle => InteractionState::ResizingLeft,
            BlockPart::RightHandle => InteractionState::ResizingRight,
            BlockPart::Body => InteractionState::Dragging,
        };
        tracing::debug!(block = %block.id, state = ?self.state, row = start_row, "pointer down");

        if self.state == InteractionState::Dragging {
            vec![Effect::DragStarted {
                id: block.id.clone(),
            }]
        } else {
            Vec::new()
        }
    }

    /// Recompute the manipulated block for a pointer at `position`.
    ///
    /// Returns `None` while idle.
    pub fn drag_to(
        &mut self,
        position: Point,
        window: &TimelineWindow,
        config: &LayoutConfig,
    ) -> Option<Effect> {
        let grip = self.grip.as_ref()?;
        let dx = position.x - grip.origin.x;
        let dy = position.y - grip.origin.y;
        let month_width = window.month_width();
        let bounds = window.bounds();

        let effect = match self.state {
            InteractionState::Idle => return None,
            InteractionState::ResizingLeft => {
                let candidate =
                    window.start_abs() + pixel_to_month_offset(grip.left_px + dx, month_width);
                let interval = grip.interval.resize_start(candidate, bounds);
                self.tooltip = Some(Tooltip {
                    text: YearMonth::from_abs(interval.start).to_string(),
                    edge: Edge::Left,
                    anchor: Point::new(window.month_to_x(interval.start), grip.top_px),
                });
                Effect::Resize {
                    id: grip.id.clone(),
                    interval,
                }
            }
            InteractionState::ResizingRight => {
                let right_px = grip.left_px + grip.width_px + dx;
                let candidate =
                    window.start_abs() + pixel_to_month_offset(right_px, month_width) - 1;
                let interval = grip.interval.resize_end(candidate, bounds);
                self.tooltip = Some(Tooltip {
                    text: YearMonth::from_abs(interval.end).to_string(),
                    edge: Edge::Right,
                    anchor: Point::new(window.month_to_x(interval.end + 1), grip.top_px),
                });
                Effect::Resize {
                    id: grip.id.clone(),
                    interval,
                }
            }
            InteractionState::Dragging => {
                let candidate =
                    window.start_abs() + pixel_to_month_offset(grip.left_px + dx, month_width);
                let interval = MonthInterval::with_duration(candidate, grip.interval.duration())
                    .shift_into(bounds);
                let rows = if config.row_height() > 0.0 {
                    // Never farther than the packer would search.
                    let limit = config.max_row_search as f64;
                    (dy / config.row_height()).round().clamp(-limit, limit) as i32
                } else {
                    0
                };
                Effect::Move {
                    id: grip.id.clone(),
                    interval,
                    row: (grip.start_row + rows).max(0),
                    delta: MoveDelta {
                        months: candidate - grip.interval.start,
                        rows,
                    },
                }
            }
        };
        tracing::trace!(?effect, "pointer move");
        Some(effect)
    }

    /// Finish the interaction. A drag released within the (buffered)
    /// deletion target deletes the block.
    pub fn release(&mut self, position: Point, target: Option<&DropTarget>) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let grip = self.grip.take();
        self.tooltip = None;

        let mut effects = Vec::new();
        if state == InteractionState::Dragging {
            if let Some(grip) = grip
                && target.is_some_and(|t| t.hit(position))
            {
                tracing::debug!(block = %grip.id, "dropped on deletion target");
                effects.push(Effect::Delete { id: grip.id });
            }
            effects.push(Effect::DragEnded);
        }
        effects
    }
}
