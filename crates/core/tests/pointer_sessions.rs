//! Headless sessions driven by synthetic pointer sequences.
//!
//! Layout used throughout: years 2020-2021 on a 960x600 surface, so each
//! month is 40px wide, rows are 46px apart, the top lane starts at y=0 and
//! the bottom lane at y=180. The trash sits at (880, 520) with a 30px buffer.

use skillspan_core::interaction::{Effect, InteractionState, PointerEvent};
use skillspan_core::model::{BlockColor, BlockDraft, BlockId, Section, YearMonth};
use skillspan_core::{ClearMode, Session};
use skillspan_protocol::{Point, RenderCommand};

fn session() -> Session {
    let mut session = Session::new(2020, 2021).expect("valid years");
    session.set_surface(960.0, 600.0);
    session
}

fn add(session: &mut Session, name: &str, start: (i32, u32), end: (i32, u32), section: Section) -> BlockId {
    session
        .add_block(BlockDraft {
            name: name.into(),
            color: BlockColor::Blue,
            start: YearMonth::new(start.0, start.1),
            end: YearMonth::new(end.0, end.1),
            section,
        })
        .expect("valid draft")
}

fn down(session: &mut Session, x: f64, y: f64, additive: bool) -> Vec<Effect> {
    session.handle_pointer(PointerEvent::Down {
        position: Point::new(x, y),
        additive,
    })
}

fn move_to(session: &mut Session, x: f64, y: f64) -> Vec<Effect> {
    session.handle_pointer(PointerEvent::Move {
        position: Point::new(x, y),
    })
}

fn up(session: &mut Session, x: f64, y: f64) -> Vec<Effect> {
    session.handle_pointer(PointerEvent::Up {
        position: Point::new(x, y),
    })
}

fn span(session: &Session, id: &BlockId) -> (YearMonth, YearMonth) {
    let block = session.block(id).expect("block exists");
    (block.start(), block.end())
}

fn trash_drawn(session: &Session) -> bool {
    session
        .render()
        .iter()
        .any(|c| matches!(c, RenderCommand::BeginGroup { id, .. } if id == "trash"))
}

#[test]
fn drag_moves_block_and_changes_row() {
    let mut s = session();
    // April..September 2020: x 120..360, y 10..44.
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);

    let effects = down(&mut s, 200.0, 20.0, false);
    assert_eq!(effects, vec![Effect::DragStarted { id: a.clone() }]);
    assert!(s.selection().contains(&a));
    assert!(trash_drawn(&s));

    move_to(&mut s, 280.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 6), YearMonth::new(2020, 11)));

    move_to(&mut s, 280.0, 66.0);
    assert_eq!(s.block(&a).and_then(|b| b.row), Some(1));

    let effects = up(&mut s, 280.0, 66.0);
    assert_eq!(effects, vec![Effect::DragEnded]);
    assert_eq!(s.interaction_state(), InteractionState::Idle);
    assert!(!trash_drawn(&s));
    assert_eq!(s.lane_layout(Section::Top).row(&a), Some(1));
}

#[test]
fn drag_past_window_end_shifts_whole_block() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);

    down(&mut s, 200.0, 20.0, false);
    move_to(&mut s, 900.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2021, 7), YearMonth::new(2021, 12)));

    move_to(&mut s, -500.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 1), YearMonth::new(2020, 6)));
    up(&mut s, -500.0, 20.0);
}

#[test]
fn block_longer_than_window_drags_against_window_end() {
    let mut s = session();
    // April 2020..March 2023 overhangs the right edge: x 120..1560.
    let a = add(&mut s, "A", (2020, 4), (2023, 3), Section::Top);

    down(&mut s, 200.0, 20.0, false);
    move_to(&mut s, 240.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2019, 1), YearMonth::new(2021, 12)));

    move_to(&mut s, -400.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2019, 1), YearMonth::new(2021, 12)));
    up(&mut s, -400.0, 20.0);
}

#[test]
fn release_over_trash_deletes() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    let b = add(&mut s, "B", (2021, 1), (2021, 3), Section::Bottom);

    down(&mut s, 200.0, 20.0, false);
    move_to(&mut s, 860.0, 500.0);
    // Inside the buffer, outside the visible square.
    let effects = up(&mut s, 860.0, 500.0);
    assert_eq!(effects, vec![Effect::Delete { id: a.clone() }, Effect::DragEnded]);
    assert!(s.block(&a).is_none());
    assert!(s.block(&b).is_some());
    assert!(s.selection().is_empty());
}

#[test]
fn right_resize_keeps_start_and_shows_tooltip() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);

    assert!(down(&mut s, 350.0, 20.0, false).is_empty());
    assert_eq!(s.interaction_state(), InteractionState::ResizingRight);

    move_to(&mut s, 430.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 4), YearMonth::new(2020, 11)));
    assert_eq!(s.tooltip().map(|t| t.text.as_str()), Some("2020/11"));

    move_to(&mut s, 2000.0, 20.0);
    assert_eq!(span(&s, &a).1, YearMonth::new(2021, 12));

    assert!(up(&mut s, 2000.0, 20.0).is_empty());
    assert!(s.tooltip().is_none());
}

#[test]
fn left_resize_never_crosses_end() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);

    down(&mut s, 125.0, 20.0, false);
    assert_eq!(s.interaction_state(), InteractionState::ResizingLeft);

    move_to(&mut s, 405.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 9), YearMonth::new(2020, 9)));

    move_to(&mut s, -300.0, 20.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 1), YearMonth::new(2020, 9)));
    up(&mut s, -300.0, 20.0);
}

#[test]
fn additive_press_drags_the_whole_selection() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    // January..March 2020 in the bottom lane: x 0..120, y 190..224.
    let b = add(&mut s, "B", (2020, 1), (2020, 3), Section::Bottom);
    let c = add(&mut s, "C", (2021, 1), (2021, 2), Section::Bottom);

    down(&mut s, 200.0, 20.0, false);
    up(&mut s, 200.0, 20.0);
    down(&mut s, 60.0, 200.0, true);
    assert_eq!(s.selection().len(), 2);

    move_to(&mut s, 140.0, 200.0);
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 6), YearMonth::new(2020, 11)));
    assert_eq!(span(&s, &b), (YearMonth::new(2020, 3), YearMonth::new(2020, 5)));
    assert_eq!(span(&s, &c), (YearMonth::new(2021, 1), YearMonth::new(2021, 2)));

    // Moves are measured from the snapshot, not accumulated.
    move_to(&mut s, 140.0, 200.0);
    assert_eq!(span(&s, &b), (YearMonth::new(2020, 3), YearMonth::new(2020, 5)));
    up(&mut s, 140.0, 200.0);
}

#[test]
fn deselected_block_moves_alone() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    let b = add(&mut s, "B", (2020, 1), (2020, 3), Section::Bottom);
    s.select_many([a.clone(), b.clone()]);

    // Additive press toggles B out of the selection before dragging it.
    down(&mut s, 60.0, 200.0, true);
    assert!(!s.selection().contains(&b));
    move_to(&mut s, 140.0, 200.0);
    assert_eq!(span(&s, &b), (YearMonth::new(2020, 3), YearMonth::new(2020, 5)));
    assert_eq!(span(&s, &a), (YearMonth::new(2020, 4), YearMonth::new(2020, 9)));
    up(&mut s, 140.0, 200.0);
}

#[test]
fn dropping_a_selected_block_deletes_the_group() {
    let mut s = session();
    add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    add(&mut s, "B", (2020, 1), (2020, 3), Section::Bottom);
    let c = add(&mut s, "C", (2021, 1), (2021, 2), Section::Bottom);

    down(&mut s, 200.0, 20.0, false);
    up(&mut s, 200.0, 20.0);
    down(&mut s, 60.0, 200.0, true);
    move_to(&mut s, 900.0, 550.0);
    up(&mut s, 900.0, 550.0);

    assert_eq!(s.blocks().len(), 1);
    assert_eq!(s.blocks()[0].id, c);
    assert!(s.selection().is_empty());
}

#[test]
fn press_on_empty_space_does_nothing() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    s.select_block(&a, false);

    assert!(down(&mut s, 600.0, 20.0, false).is_empty());
    assert!(move_to(&mut s, 700.0, 20.0).is_empty());
    assert!(up(&mut s, 700.0, 20.0).is_empty());
    assert!(s.selection().contains(&a));
}

#[test]
fn import_replaces_state_and_keeps_labels() {
    let mut s = session();
    s.set_section_label(Section::Top, "Career");
    add(&mut s, "old", (2020, 1), (2020, 2), Section::Top);

    s.import_json(br#"{"startYear":2019,"endYear":2022,"progressBlocks":[]}"#)
        .expect("valid document");
    assert_eq!(s.years(), (2019, 2022));
    assert!(s.blocks().is_empty());
    assert_eq!(s.section_label(Section::Top), "Career");

    assert!(s.import_json(br#"{"startYear":2019,"progressBlocks":[]}"#).is_err());
    assert_eq!(s.years(), (2019, 2022));
}

#[test]
fn import_outside_the_calendar_is_rejected() {
    let mut s = session();
    add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);

    let huge = br#"{"startYear":2000000000,"endYear":2000000001,"progressBlocks":[]}"#;
    assert!(s.import_json(huge).is_err());
    assert!(s.set_years(0, 100_000).is_err());
    assert_eq!(s.years(), (2020, 2021));
    assert_eq!(s.blocks().len(), 1);
    assert!(!s.render().is_empty());
}

#[test]
fn export_then_import_restores_blocks() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    let json = s.to_document().to_json_pretty().expect("serializes");

    let mut other = Session::new(2000, 2001).expect("valid years");
    other.import_json(json.as_bytes()).expect("valid document");
    assert_eq!(other.years(), (2020, 2021));
    assert_eq!(other.block(&a).map(|b| b.name.as_str()), Some("A"));
}

#[test]
fn clear_selected_then_all() {
    let mut s = session();
    let a = add(&mut s, "A", (2020, 4), (2020, 9), Section::Top);
    add(&mut s, "B", (2020, 1), (2020, 3), Section::Bottom);
    s.select_block(&a, false);

    let mode = s.clear_request();
    assert_eq!(mode, ClearMode::Selected);
    s.clear(mode);
    assert_eq!(s.blocks().len(), 1);

    let mode = s.clear_request();
    assert_eq!(mode, ClearMode::All);
    s.clear(mode);
    assert!(s.blocks().is_empty());
}
