use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use skillspan_core::Session;
use skillspan_core::interaction::{InteractionState, PointerEvent};
use skillspan_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

const HEADER_ROWS: u16 = 1;
const FOOTER_ROWS: u16 = 1;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::BlockBlue => Color::Rgb(96, 165, 250),
        ThemeToken::BlockGreen => Color::Rgb(74, 222, 128),
        ThemeToken::BlockPurple => Color::Rgb(192, 132, 252),
        ThemeToken::BlockRed => Color::Rgb(248, 113, 113),
        ThemeToken::BlockYellow => Color::Rgb(250, 204, 21),
        ThemeToken::BlockTeal => Color::Rgb(45, 212, 191),
        ThemeToken::BlockIndigo => Color::Rgb(129, 140, 248),
        ThemeToken::BlockBorder => Color::DarkGray,
        ThemeToken::BlockText => Color::Black,
        ThemeToken::LaneBackground => Color::Black,
        ThemeToken::LaneBorder => Color::DarkGray,
        ThemeToken::LaneLabelBackground => Color::DarkGray,
        ThemeToken::LaneLabelText => Color::Gray,
        ThemeToken::AxisBackground => Color::Rgb(20, 20, 20),
        ThemeToken::AxisLine => Color::Gray,
        ThemeToken::AxisMajorTick => Color::White,
        ThemeToken::AxisMinorTick => Color::DarkGray,
        ThemeToken::AxisLabel => Color::White,
        ThemeToken::SelectionRing => Color::LightYellow,
        ThemeToken::TooltipBackground => Color::White,
        ThemeToken::TooltipText => Color::Black,
        ThemeToken::TrashFill => Color::Red,
        ThemeToken::TrashText => Color::White,
        ThemeToken::Background => Color::Black,
    }
}

/// Map a span of surface units onto whole cells, never narrower than one.
fn cell_span(start: f64, len: f64) -> (i64, i64) {
    let first = start.floor() as i64;
    let last = ((start + len).ceil() as i64).max(first + 1);
    (first, last)
}

fn put_str(buf: &mut Buffer, area: Rect, col: i64, row: i64, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        put_char(buf, area, col + i as i64, row, ch, style);
    }
}

fn put_char(buf: &mut Buffer, area: Rect, col: i64, row: i64, ch: char, style: Style) {
    if col < 0 || row < 0 || col >= i64::from(area.width) || row >= i64::from(area.height) {
        return;
    }
    let x = area.x + col as u16;
    let y = area.y + row as u16;
    buf[(x, y)].set_char(ch).set_style(style);
}

/// Paint render commands onto the terminal buffer, one surface unit per cell.
fn draw_commands(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                block_id,
            } => {
                let bg = theme_to_color(*color);
                let (c0, c1) = cell_span(rect.x, rect.w);
                let (r0, r1) = cell_span(rect.y, rect.h);
                let mut style = Style::default().bg(bg);
                if block_id.is_some() {
                    style = style.fg(theme_to_color(ThemeToken::BlockText));
                    if *border_color == Some(ThemeToken::SelectionRing) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                }
                for row in r0..r1 {
                    for col in c0..c1 {
                        put_char(buf, area, col, row, ' ', style);
                    }
                }
                if let (Some(label), Some(_)) = (label, block_id) {
                    let room = usize::try_from(c1 - c0).unwrap_or(0);
                    let text: String = label.chars().take(room).collect();
                    put_str(buf, area, c0, r0, &text, style);
                }
            }
            RenderCommand::DrawLine { from, to, color, .. } => {
                let style = Style::default().fg(theme_to_color(*color));
                if (from.y - to.y).abs() < f64::EPSILON {
                    let row = from.y.floor() as i64;
                    let (c0, c1) = cell_span(from.x.min(to.x), (to.x - from.x).abs());
                    for col in c0..c1 {
                        put_char(buf, area, col, row, '─', style);
                    }
                } else if (from.x - to.x).abs() < f64::EPSILON {
                    let col = from.x.floor() as i64;
                    let (r0, r1) = cell_span(from.y.min(to.y), (to.y - from.y).abs());
                    for row in r0..r1 {
                        put_char(buf, area, col, row, '│', style);
                    }
                } else {
                    put_char(buf, area, to.x.floor() as i64 - 1, to.y.floor() as i64, '▶', style);
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as i64;
                let x = position.x.floor() as i64;
                let col = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x - len / 2,
                    TextAlign::Right => x - len,
                };
                // Text baselines sit on the row below the cell they label.
                let row = position.y.floor() as i64 - 1;
                let style = Style::default().fg(theme_to_color(*color));
                put_str(buf, area, col, row.max(0), text, style);
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

/// Translate a terminal mouse event into surface coordinates. The pointer
/// sits in the middle of its cell.
fn pointer_event(mouse: MouseEvent, area: Rect) -> Option<PointerEvent> {
    let position = Point::new(
        f64::from(mouse.column) - f64::from(area.x) + 0.5,
        f64::from(mouse.row) - f64::from(area.y) + 0.5,
    );
    let additive = mouse
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down { position, additive }),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Move { position }),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up { position }),
        _ => None,
    }
}

/// Year-range entry typed into the footer, e.g. `2015-2025`.
#[derive(Debug, Default)]
struct YearPrompt {
    input: String,
    rejected: bool,
}

fn parse_year_range(input: &str) -> Option<(i32, i32)> {
    let (start, end) = input.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

impl YearPrompt {
    /// Feed one key. Returns `true` once the prompt is finished.
    fn key(&mut self, code: KeyCode, session: &mut Session) -> bool {
        match code {
            KeyCode::Esc => return true,
            KeyCode::Enter => {
                let accepted = parse_year_range(&self.input)
                    .is_some_and(|(start, end)| session.set_years(start, end).is_ok());
                if accepted {
                    return true;
                }
                self.rejected = true;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == ' ' => {
                self.input.push(c);
                self.rejected = false;
            }
            _ => {}
        }
        false
    }

    fn line(&self) -> String {
        let hint = if self.rejected {
            "invalid range"
        } else {
            "Enter confirm, Esc skip"
        };
        format!(" years (START-END): {}_  [{hint}] ", self.input)
    }
}

fn status_line(session: &Session, prompt: Option<&YearPrompt>) -> String {
    if let Some(prompt) = prompt {
        return prompt.line();
    }
    if let Some(tooltip) = session.tooltip() {
        return format!(" {} ", tooltip.text);
    }
    match session.interaction_state() {
        InteractionState::Dragging => " drop on Delete to remove ".to_string(),
        InteractionState::Idle => format!(
            " {} selected | click select | ctrl/shift-click add | Del delete | c clear | y years | q quit ",
            session.selection().len()
        ),
        _ => String::new(),
    }
}

fn draw(
    frame: &mut Frame,
    session: &Session,
    prompt: Option<&YearPrompt>,
    commands: &[RenderCommand],
    content: Rect,
) {
    let area = frame.area();
    let (start, end) = session.years();

    let header = Block::default()
        .title(format!(" skillspan | {start}-{end} | {} blocks ", session.blocks().len()))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(header, Rect::new(0, 0, area.width, HEADER_ROWS));

    let background = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(background, content);
    draw_commands(frame.buffer_mut(), content, commands);

    let footer = Block::default()
        .title(status_line(session, prompt))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(
        footer,
        Rect::new(0, area.height.saturating_sub(FOOTER_ROWS), area.width, FOOTER_ROWS),
    );
}

/// Run the interactive view. With `ask_years` the view opens on the year
/// range prompt, as it does when nothing has been saved yet.
pub fn run_interactive(session: &mut Session, ask_years: bool) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let prompt = ask_years.then(YearPrompt::default);
    let result = event_loop(&mut terminal, session, prompt);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    mut prompt: Option<YearPrompt>,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        let content = Rect::new(
            0,
            HEADER_ROWS,
            size.width,
            size.height.saturating_sub(HEADER_ROWS + FOOTER_ROWS),
        );
        session.set_surface(f64::from(content.width), f64::from(content.height));
        let commands = session.render();
        terminal.draw(|frame| draw(frame, session, prompt.as_ref(), &commands, content))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press && prompt.is_some() => {
                if prompt.as_mut().is_some_and(|p| p.key(key.code, session)) {
                    prompt = None;
                }
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('y') => prompt = Some(YearPrompt::default()),
                KeyCode::Char('c') => {
                    let mode = session.clear_request();
                    session.clear(mode);
                }
                KeyCode::Delete | KeyCode::Backspace => {
                    let first = session.selection().iter().next().cloned();
                    if let Some(id) = first {
                        session.delete_block(&id);
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) if prompt.is_none() => {
                if let Some(event) = pointer_event(mouse, content) {
                    session.handle_pointer(event);
                }
            }
            _ => {}
        }
    }
    tracing::info!(blocks = session.blocks().len(), "leaving interactive view");
    Ok(())
}
