use chrono::{Datelike, Local};
use skillspan_protocol::{Point, RenderCommand};

use super::block::{BlockDraft, BlockError, BlockId, ProgressBlock, Section};
use super::selection::Selection;
use super::window::{TimelineWindow, WindowError, validate_years};
use crate::config::LayoutConfig;
use crate::document::{DocumentError, TimelineDocument};
use crate::interaction::{
    CursorHint, DragSnapshot, DropTarget, Effect, InteractionController, InteractionState,
    PointerEvent, Tooltip, apply_moves, batch_move,
};
use crate::layout::{BlockHit, PackedLayout, TimelineGeometry, pack_lane};
use crate::views;

pub const DEFAULT_TOP_LABEL: &str = "Work";
pub const DEFAULT_BOTTOM_LABEL: &str = "Personal";

const DEFAULT_SURFACE_WIDTH: f64 = 1200.0;
const DEFAULT_SURFACE_HEIGHT: f64 = 800.0;

/// What a "clear" request would remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Only the selected blocks.
    Selected,
    All,
}

/// Owner of the timeline's mutable state: year range, lane labels, the block
/// collection, the selection, and the in-flight pointer interaction.
///
/// All mutation goes through methods here. Packing and geometry are derived
/// on demand from the current blocks and are never stored.
#[derive(Debug, Clone)]
pub struct Session {
    start_year: i32,
    end_year: i32,
    top_label: String,
    bottom_label: String,
    /// Insertion order is packing order.
    blocks: Vec<ProgressBlock>,
    selection: Selection,
    config: LayoutConfig,
    surface_width: f64,
    surface_height: f64,
    interaction: InteractionController,
    snapshot: Option<DragSnapshot>,
}

impl Session {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, WindowError> {
        validate_years(start_year, end_year)?;
        Ok(Self {
            start_year,
            end_year,
            top_label: DEFAULT_TOP_LABEL.to_string(),
            bottom_label: DEFAULT_BOTTOM_LABEL.to_string(),
            blocks: Vec::new(),
            selection: Selection::new(),
            config: LayoutConfig::default(),
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
            interaction: InteractionController::new(),
            snapshot: None,
        })
    }

    /// The last ten years up to and including the current one.
    pub fn with_current_years() -> Self {
        let year = Local::now().year();
        Self {
            start_year: year - 10,
            end_year: year,
            top_label: DEFAULT_TOP_LABEL.to_string(),
            bottom_label: DEFAULT_BOTTOM_LABEL.to_string(),
            blocks: Vec::new(),
            selection: Selection::new(),
            config: LayoutConfig::default(),
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
            interaction: InteractionController::new(),
            snapshot: None,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    // --- Accessors ---

    pub fn years(&self) -> (i32, i32) {
        (self.start_year, self.end_year)
    }

    pub fn blocks(&self) -> &[ProgressBlock] {
        &self.blocks
    }

    pub fn block(&self, id: &BlockId) -> Option<&ProgressBlock> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn section_label(&self, section: Section) -> &str {
        match section {
            Section::Top => &self.top_label,
            Section::Bottom => &self.bottom_label,
        }
    }

    pub fn surface_size(&self) -> (f64, f64) {
        (self.surface_width, self.surface_height)
    }

    pub fn window(&self) -> TimelineWindow {
        TimelineWindow {
            start_year: self.start_year,
            end_year: self.end_year,
            width: self.surface_width,
        }
    }

    pub fn geometry(&self) -> TimelineGeometry {
        TimelineGeometry::compute(&self.blocks, &self.window(), &self.config)
    }

    pub fn lane_layout(&self, section: Section) -> PackedLayout {
        pack_lane(&self.blocks, section, self.config.max_row_search)
    }

    pub fn hit_test(&self, point: Point) -> Option<BlockHit> {
        self.geometry().hit_test(point)
    }

    pub fn drop_target(&self) -> DropTarget {
        DropTarget::anchored(self.surface_width, self.surface_height, &self.config)
    }

    /// The deletion target is only offered while a block is being dragged.
    pub fn trash_visible(&self) -> bool {
        self.interaction.is_dragging()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.interaction.tooltip()
    }

    pub fn cursor(&self) -> CursorHint {
        self.interaction.cursor()
    }

    // --- Settings ---

    pub fn set_surface(&mut self, width: f64, height: f64) {
        self.surface_width = width.max(0.0);
        self.surface_height = height.max(0.0);
    }

    pub fn set_years(&mut self, start_year: i32, end_year: i32) -> Result<(), WindowError> {
        validate_years(start_year, end_year).inspect_err(|err| {
            tracing::warn!(%err, "rejected year range");
        })?;
        self.start_year = start_year;
        self.end_year = end_year;
        tracing::debug!(start_year, end_year, "year range updated");
        Ok(())
    }

    pub fn set_section_label(&mut self, section: Section, label: impl Into<String>) {
        let label = label.into();
        match section {
            Section::Top => self.top_label = label,
            Section::Bottom => self.bottom_label = label,
        }
    }

    // --- Block collection ---

    /// Confirm an add form. The new block gets a fresh id and goes last.
    pub fn add_block(&mut self, draft: BlockDraft) -> Result<BlockId, BlockError> {
        let block = draft.into_block(BlockId::generate(), None).inspect_err(|err| {
            tracing::warn!(%err, "rejected new block");
        })?;
        let id = block.id.clone();
        tracing::debug!(block = %id, name = %block.name, "block added");
        self.blocks.push(block);
        Ok(id)
    }

    /// Confirm an edit form. Keeps the id, collection position and row hint.
    pub fn edit_block(&mut self, id: &BlockId, draft: BlockDraft) -> Result<(), BlockError> {
        let slot = self
            .blocks
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| BlockError::UnknownBlock(id.clone()))?;
        *slot = draft.into_block(id.clone(), slot.row).inspect_err(|err| {
            tracing::warn!(block = %id, %err, "rejected block edit");
        })?;
        tracing::debug!(block = %id, "block edited");
        Ok(())
    }

    /// Delete a block. Deleting a selected block deletes the whole
    /// selection. Returns how many blocks were removed; unknown ids remove
    /// nothing.
    pub fn delete_block(&mut self, id: &BlockId) -> usize {
        let before = self.blocks.len();
        if self.selection.contains(id) {
            self.blocks.retain(|b| !self.selection.contains(&b.id));
            self.selection.clear();
        } else {
            self.blocks.retain(|b| &b.id != id);
            self.selection.remove(id);
        }
        let removed = before - self.blocks.len();
        tracing::debug!(block = %id, removed, "delete");
        removed
    }

    pub fn clear_request(&self) -> ClearMode {
        if self.selection.is_empty() {
            ClearMode::All
        } else {
            ClearMode::Selected
        }
    }

    pub fn clear(&mut self, mode: ClearMode) {
        match mode {
            ClearMode::Selected => self.blocks.retain(|b| !self.selection.contains(&b.id)),
            ClearMode::All => self.blocks.clear(),
        }
        self.selection.clear();
        tracing::debug!(?mode, remaining = self.blocks.len(), "cleared");
    }

    // --- Selection ---

    pub fn select_block(&mut self, id: &BlockId, additive: bool) {
        self.selection.select(id, additive);
    }

    pub fn select_many<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = BlockId>,
    {
        self.selection.select_many(ids);
    }

    // --- Pointer input ---

    /// Feed one pointer event through hit-testing, selection and the
    /// interaction controller, applying the resulting effects. Returns the
    /// effects so the host can react (show the trash, end a drag, ...).
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Effect> {
        match event {
            PointerEvent::Down { position, additive } => self.pointer_down(position, additive),
            PointerEvent::Move { position } => {
                let window = self.window();
                let Some(effect) = self.interaction.drag_to(position, &window, &self.config) else {
                    return Vec::new();
                };
                self.apply_effect(&effect);
                vec![effect]
            }
            PointerEvent::Up { position } => {
                let target = self.drop_target();
                let effects = self.interaction.release(position, Some(&target));
                for effect in &effects {
                    self.apply_effect(effect);
                }
                effects
            }
        }
    }

    fn pointer_down(&mut self, position: Point, additive: bool) -> Vec<Effect> {
        if self.interaction.is_active() {
            tracing::trace!("pointer down during an active interaction ignored");
            return Vec::new();
        }
        let geometry = self.geometry();
        let Some(hit) = geometry.hit_test(position) else {
            return Vec::new();
        };
        self.selection.select(&hit.id, additive);

        let Some(block) = self.blocks.iter().find(|b| b.id == hit.id) else {
            return Vec::new();
        };
        let effects = self.interaction.press(&hit, block, position, &self.config);
        if effects
            .iter()
            .any(|e| matches!(e, Effect::DragStarted { .. }))
        {
            self.snapshot = Some(DragSnapshot::capture(&hit.id, &self.blocks, &geometry));
        }
        effects
    }

    fn apply_effect(&mut self, effect: &Effect) {
        match effect {
            Effect::DragStarted { .. } => {}
            Effect::Resize { id, interval } => {
                if let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) {
                    block.set_interval(*interval);
                }
            }
            Effect::Move {
                id,
                interval,
                row,
                delta,
            } => match &self.snapshot {
                Some(snapshot) if self.selection.contains(id) => {
                    let moves = batch_move(snapshot, &self.selection, *delta, self.window().bounds());
                    apply_moves(&mut self.blocks, &moves);
                }
                _ => {
                    if let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) {
                        block.set_interval(*interval);
                        block.row = Some(*row);
                    }
                }
            },
            Effect::Delete { id } => {
                self.delete_block(id);
            }
            Effect::DragEnded => self.snapshot = None,
        }
    }

    // --- Documents ---

    pub fn to_document(&self) -> TimelineDocument {
        TimelineDocument {
            start_year: self.start_year,
            end_year: self.end_year,
            top_section_label: Some(self.top_label.clone()),
            bottom_section_label: Some(self.bottom_label.clone()),
            progress_blocks: self.blocks.clone(),
        }
    }

    /// Parse, validate and apply an external document. On any error the
    /// session is left untouched.
    pub fn import_json(&mut self, data: &[u8]) -> Result<(), DocumentError> {
        let doc = TimelineDocument::from_json(data)?;
        self.apply_document(doc)
    }

    /// Replace the session state with `doc`. Absent labels keep their
    /// current values.
    pub fn apply_document(&mut self, doc: TimelineDocument) -> Result<(), DocumentError> {
        doc.validate()?;
        self.start_year = doc.start_year;
        self.end_year = doc.end_year;
        if let Some(label) = doc.top_section_label {
            self.top_label = label;
        }
        if let Some(label) = doc.bottom_section_label {
            self.bottom_label = label;
        }
        self.blocks = doc.progress_blocks;
        self.selection.retain_existing(self.blocks.iter().map(|b| &b.id));
        tracing::debug!(blocks = self.blocks.len(), "document applied");
        Ok(())
    }

    // --- Rendering ---

    pub fn render(&self) -> Vec<RenderCommand> {
        views::render_timeline(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_current_years()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::YearMonth;

    fn draft(name: &str, start: (i32, u32), end: (i32, u32), section: Section) -> BlockDraft {
        BlockDraft {
            name: name.to_string(),
            color: crate::model::BlockColor::Blue,
            start: YearMonth::new(start.0, start.1),
            end: YearMonth::new(end.0, end.1),
            section,
        }
    }

    fn session() -> Session {
        Session::new(2020, 2021).expect("valid years")
    }

    #[test]
    fn rejects_bad_years_without_change() {
        let mut s = session();
        assert!(s.set_years(2022, 2022).is_err());
        assert_eq!(s.years(), (2020, 2021));
        assert!(Session::new(2021, 2020).is_err());
    }

    #[test]
    fn default_window_is_ten_years_back() {
        let s = Session::with_current_years();
        let (start, end) = s.years();
        assert_eq!(end - start, 10);
    }

    #[test]
    fn add_and_edit_keep_identity() {
        let mut s = session();
        let id = s
            .add_block(draft("Rust", (2020, 1), (2020, 6), Section::Top))
            .expect("valid draft");
        s.blocks[0].row = Some(3);

        s.edit_block(&id, draft("Rust 2", (2020, 2), (2020, 8), Section::Bottom))
            .expect("valid edit");
        let block = s.block(&id).expect("still present");
        assert_eq!(block.name, "Rust 2");
        assert_eq!(block.section, Section::Bottom);
        assert_eq!(block.row, Some(3));
    }

    #[test]
    fn invalid_draft_changes_nothing() {
        let mut s = session();
        assert!(
            s.add_block(draft("x", (2020, 6), (2020, 1), Section::Top))
                .is_err()
        );
        assert!(s.blocks().is_empty());

        let id = s
            .add_block(draft("y", (2020, 1), (2020, 2), Section::Top))
            .expect("valid draft");
        assert!(
            s.edit_block(&id, draft("y", (2021, 1), (2020, 2), Section::Top))
                .is_err()
        );
        assert_eq!(s.block(&id).map(|b| b.start()), Some(YearMonth::new(2020, 1)));
        assert!(matches!(
            s.edit_block(&BlockId::from("nope"), draft("z", (2020, 1), (2020, 2), Section::Top)),
            Err(BlockError::UnknownBlock(_))
        ));
    }

    #[test]
    fn delete_selected_removes_group() {
        let mut s = session();
        let a = s.add_block(draft("a", (2020, 1), (2020, 2), Section::Top)).expect("ok");
        let b = s.add_block(draft("b", (2020, 3), (2020, 4), Section::Top)).expect("ok");
        let c = s.add_block(draft("c", (2020, 5), (2020, 6), Section::Bottom)).expect("ok");
        let d = s.add_block(draft("d", (2020, 7), (2020, 8), Section::Bottom)).expect("ok");
        s.select_many([a.clone(), b.clone(), c.clone()]);

        assert_eq!(s.delete_block(&b), 3);
        assert!(s.selection().is_empty());
        assert_eq!(s.blocks().len(), 1);
        assert_eq!(s.blocks()[0].id, d);
    }

    #[test]
    fn delete_unselected_removes_one() {
        let mut s = session();
        let a = s.add_block(draft("a", (2020, 1), (2020, 2), Section::Top)).expect("ok");
        let b = s.add_block(draft("b", (2020, 3), (2020, 4), Section::Top)).expect("ok");
        s.select_block(&a, false);

        assert_eq!(s.delete_block(&b), 1);
        assert!(s.selection().contains(&a));
        assert_eq!(s.delete_block(&BlockId::from("missing")), 0);
        assert_eq!(s.blocks().len(), 1);
    }

    #[test]
    fn clear_modes() {
        let mut s = session();
        let a = s.add_block(draft("a", (2020, 1), (2020, 2), Section::Top)).expect("ok");
        s.add_block(draft("b", (2020, 3), (2020, 4), Section::Top)).expect("ok");
        assert_eq!(s.clear_request(), ClearMode::All);

        s.select_block(&a, false);
        assert_eq!(s.clear_request(), ClearMode::Selected);
        s.clear(ClearMode::Selected);
        assert_eq!(s.blocks().len(), 1);

        s.clear(ClearMode::All);
        assert!(s.blocks().is_empty());
        assert!(s.selection().is_empty());
    }

    #[test]
    fn labels_default_and_update() {
        let mut s = session();
        assert_eq!(s.section_label(Section::Top), "Work");
        assert_eq!(s.section_label(Section::Bottom), "Personal");
        s.set_section_label(Section::Bottom, "Hobbies");
        assert_eq!(s.section_label(Section::Bottom), "Hobbies");
    }

    #[test]
    fn lane_layout_reflects_current_blocks() {
        let mut s = session();
        let a = s.add_block(draft("a", (2020, 1), (2020, 6), Section::Top)).expect("ok");
        let b = s.add_block(draft("b", (2020, 3), (2020, 9), Section::Top)).expect("ok");
        let layout = s.lane_layout(Section::Top);
        assert_eq!(layout.row(&a), Some(0));
        assert_eq!(layout.row(&b), Some(1));

        s.delete_block(&a);
        assert_eq!(s.lane_layout(Section::Top).row(&b), Some(0));
        assert_eq!(s.lane_layout(Section::Bottom).total_rows(), 1);
    }
}
