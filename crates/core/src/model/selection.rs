use std::collections::HashSet;

use super::block::BlockId;

/// Unordered set of selected block ids, shared across both lanes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<BlockId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click selects only `id`; an additive click toggles `id`.
    pub fn select(&mut self, id: &BlockId, additive: bool) {
        if !additive {
            self.ids.clear();
            self.ids.insert(id.clone());
        } else if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Replace the selection wholesale (rubber-band selection).
    pub fn select_many<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = BlockId>,
    {
        self.ids = ids.into_iter().collect();
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.ids.contains(id)
    }

    pub fn remove(&mut self, id: &BlockId) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer name an existing block.
    pub fn retain_existing<'a, I>(&mut self, existing: I)
    where
        I: IntoIterator<Item = &'a BlockId>,
    {
        let existing: HashSet<&BlockId> = existing.into_iter().collect();
        self.ids.retain(|id| existing.contains(id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockId> {
        self.ids.iter()
    }
}
