use std::collections::HashMap;

use super::controller::MoveDelta;
use crate::layout::TimelineGeometry;
use crate::model::{BlockId, MonthInterval, ProgressBlock, Selection};

/// Copy of every block taken when a drag starts. Batch moves are always
/// computed from these values, never from the live blocks, so repeated move
/// events don't accumulate error.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    dragged: BlockId,
    blocks: HashMap<BlockId, ProgressBlock>,
}

impl DragSnapshot {
    /// Rows in the snapshot are the rows the blocks were displayed in, so a
    /// block with no (or a stale) row hint moves relative to where the user
    /// saw it.
    pub fn capture(dragged: &BlockId, blocks: &[ProgressBlock], geometry: &TimelineGeometry) -> Self {
        let blocks = blocks
            .iter()
            .map(|b| {
                let mut copy = b.clone();
                let shown = geometry.placement(&b.id).map(|(_, p)| p.row as i32);
                copy.row = Some(shown.unwrap_or_else(|| b.row.unwrap_or(0).max(0)));
                (b.id.clone(), copy)
            })
            .collect();
        Self {
            dragged: dragged.clone(),
            blocks,
        }
    }

    pub fn dragged(&self) -> &BlockId {
        &self.dragged
    }

    pub fn get(&self, id: &BlockId) -> Option<&ProgressBlock> {
        self.blocks.get(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// New placement for one block of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMove {
    pub id: BlockId,
    pub interval: MonthInterval,
    pub row: i32,
}

/// Apply one `(months, rows)` offset to every selected block's snapshot
/// values. Each block is clamped into `bounds` on its own by rigid
/// translation; rows floor at 0. Unselected blocks are not touched.
pub fn batch_move(
    snapshot: &DragSnapshot,
    selection: &Selection,
    delta: MoveDelta,
    bounds: MonthInterval,
) -> Vec<BlockMove> {
    selection
        .iter()
        .filter_map(|id| snapshot.get(id))
        .map(|original| BlockMove {
            id: original.id.clone(),
            interval: original.interval().translate(delta.months).shift_into(bounds),
            row: (original.row.unwrap_or(0) + delta.rows).max(0),
        })
        .collect()
}

/// Write moves into the live collection. Ids that no longer exist are
/// skipped.
pub fn apply_moves(blocks: &mut [ProgressBlock], moves: &[BlockMove]) {
    for mv in moves {
        if let Some(block) = blocks.iter_mut().find(|b| b.id == mv.id) {
            block.set_interval(mv.interval);
            block.row = Some(mv.row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::model::{BlockColor, Section, TimelineWindow};

    fn block(id: &str, start: (i32, u32), end: (i32, u32), row: Option<i32>) -> ProgressBlock {
        ProgressBlock {
            id: BlockId::from(id),
            name: id.to_string(),
            color: BlockColor::Purple,
            start_year: start.0,
            start_month: start.1,
            end_year: end.0,
            end_month: end.1,
            section: Section::Top,
            row,
        }
    }

    fn setup() -> (Vec<ProgressBlock>, DragSnapshot, TimelineWindow) {
        let window = TimelineWindow::new(2020, 2021, 960.0).expect("valid window");
        let blocks = vec![
            block("a", (2020, 1), (2020, 6), None),
            block("b", (2020, 3), (2020, 9), None),
            block("c", (2021, 1), (2021, 12), Some(0)),
        ];
        let geometry = TimelineGeometry::compute(&blocks, &window, &LayoutConfig::default());
        let snapshot = DragSnapshot::capture(&BlockId::from("a"), &blocks, &geometry);
        (blocks, snapshot, window)
    }

    #[test]
    fn snapshot_resolves_displayed_rows() {
        let (_, snapshot, _) = setup();
        assert_eq!(snapshot.get(&BlockId::from("a")).and_then(|b| b.row), Some(0));
        assert_eq!(snapshot.get(&BlockId::from("b")).and_then(|b| b.row), Some(1));
        assert_eq!(snapshot.dragged(), &BlockId::from("a"));
    }

    #[test]
    fn moves_only_selected_blocks_rigidly() {
        let (mut blocks, snapshot, window) = setup();
        let mut selection = Selection::new();
        selection.select_many([BlockId::from("a"), BlockId::from("b")]);

        let moves = batch_move(
            &snapshot,
            &selection,
            MoveDelta { months: 2, rows: 1 },
            window.bounds(),
        );
        assert_eq!(moves.len(), 2);
        apply_moves(&mut blocks, &moves);

        assert_eq!(blocks[0].interval(), MonthInterval::new(24242, 24247));
        assert_eq!(blocks[0].row, Some(1));
        assert_eq!(blocks[1].interval(), MonthInterval::new(24244, 24250));
        assert_eq!(blocks[1].row, Some(2));
        assert_eq!(blocks[2].interval(), MonthInterval::new(24252, 24263));
        assert_eq!(blocks[2].row, Some(0));
    }

    #[test]
    fn each_block_clamps_independently() {
        let (mut blocks, snapshot, window) = setup();
        let mut selection = Selection::new();
        selection.select_many([BlockId::from("a"), BlockId::from("c")]);

        let moves = batch_move(
            &snapshot,
            &selection,
            MoveDelta { months: 6, rows: -3 },
            window.bounds(),
        );
        apply_moves(&mut blocks, &moves);
        // a moves freely, c is pinned against the window end.
        assert_eq!(blocks[0].interval(), MonthInterval::new(24246, 24251));
        assert_eq!(blocks[2].interval(), MonthInterval::new(24252, 24263));
        assert_eq!(blocks[0].row, Some(0));
        assert_eq!(blocks[2].row, Some(0));
    }

    #[test]
    fn repeated_moves_compose_from_snapshot() {
        let (mut blocks, snapshot, window) = setup();
        let mut selection = Selection::new();
        selection.select_many([BlockId::from("a")]);
        for months in [1, 2, 3, 1] {
            let moves = batch_move(
                &snapshot,
                &selection,
                MoveDelta { months, rows: 0 },
                window.bounds(),
            );
            apply_moves(&mut blocks, &moves);
        }
        assert_eq!(blocks[0].interval(), MonthInterval::new(24241, 24246));
    }
}
