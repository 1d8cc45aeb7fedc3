use std::collections::HashMap;

use crate::model::{BlockId, MonthInterval, ProgressBlock, Section};

/// Row assignment for one lane. Derived from the lane's current block set;
/// recompute it whenever that set changes instead of caching it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedLayout {
    rows: HashMap<BlockId, usize>,
    total_rows: usize,
}

impl PackedLayout {
    /// Assigned row of a block, if it belongs to this lane.
    pub fn row(&self, id: &BlockId) -> Option<usize> {
        self.rows.get(id).copied()
    }

    /// Rows reserved by the lane. Never less than 1.
    pub fn total_rows(&self) -> usize {
        self.total_rows.max(1)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockId, usize)> {
        self.rows.iter().map(|(id, row)| (id, *row))
    }
}

/// Greedy first-fit packing in input order.
///
/// Each block starts scanning at its row hint (0 when absent, negative, or at
/// or beyond `max_row_search`) and takes the first row at or above it that
/// holds nothing overlapping. Rows below a hint are reserved even if empty.
pub fn pack<'a, I>(blocks: I, max_row_search: usize) -> PackedLayout
where
    I: IntoIterator<Item = &'a ProgressBlock>,
{
    let mut rows: Vec<Vec<MonthInterval>> = Vec::new();
    let mut assignments = HashMap::new();

    for block in blocks {
        let target = preferred_row(block.row, max_row_search);
        let interval = block.interval();

        while rows.len() <= target {
            rows.push(Vec::new());
        }

        let mut placed = None;
        for idx in target..max_row_search {
            if idx >= rows.len() {
                rows.push(Vec::new());
            }
            if !rows[idx].iter().any(|other| other.overlaps(&interval)) {
                placed = Some(idx);
                break;
            }
        }

        let idx = placed.unwrap_or_else(|| {
            tracing::error!(
                block = %block.id,
                limit = max_row_search,
                "row search exhausted, opening a fresh row"
            );
            rows.push(Vec::new());
            rows.len() - 1
        });
        rows[idx].push(interval);
        assignments.insert(block.id.clone(), idx);
    }

    PackedLayout {
        rows: assignments,
        total_rows: rows.len().max(1),
    }
}

/// Pack only the blocks of `section`, keeping their relative order.
pub fn pack_lane(blocks: &[ProgressBlock], section: Section, max_row_search: usize) -> PackedLayout {
    pack(blocks.iter().filter(|b| b.section == section), max_row_search)
}

fn preferred_row(hint: Option<i32>, max_row_search: usize) -> usize {
    match hint {
        Some(row) if row >= 0 && (row as usize) < max_row_search => row as usize,
        _ => 0,
    }
}
