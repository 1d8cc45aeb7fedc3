use skillspan_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::config::LayoutConfig;
use crate::model::{AbsMonth, TimelineWindow, from_abs_month};

const MAJOR_TICK_RATIO: f64 = 0.3;
const MINOR_TICK_RATIO: f64 = 0.15;
const ARROW_SIZE: f64 = 6.0;

/// One month boundary on the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Month that starts at this tick.
    pub month: AbsMonth,
    pub x: f64,
    /// January boundaries.
    pub major: bool,
    pub label: Option<String>,
}

/// `total_months + 1` ticks, one at each month boundary including both ends.
///
/// The first tick carries its year, the closing tick `end_year + 1`, and
/// every January in between its own year.
pub fn axis_ticks(window: &TimelineWindow) -> Vec<AxisTick> {
    let total = window.total_months();
    (0..=total)
        .map(|i| {
            let month = window.start_abs() + i;
            let (year, calendar_month) = from_abs_month(month);
            let label = if i == total {
                Some((window.end_year + 1).to_string())
            } else if i == 0 || calendar_month == 1 {
                Some(year.to_string())
            } else {
                None
            };
            AxisTick {
                month,
                x: window.month_to_x(month),
                major: calendar_month == 1,
                label,
            }
        })
        .collect()
}

/// Render the axis band: background, center line with an arrowhead, month
/// ticks and year labels.
pub fn render_time_axis(window: &TimelineWindow, band: Rect, config: &LayoutConfig) -> Vec<RenderCommand> {
    let ticks = axis_ticks(window);
    let mut commands = Vec::with_capacity(ticks.len() * 2 + 8);
    let mid = band.y + band.h / 2.0;
    let right = band.right();

    commands.push(RenderCommand::BeginGroup {
        id: "axis".into(),
        label: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect: band,
        color: ThemeToken::AxisBackground,
        border_color: Some(ThemeToken::AxisLine),
        label: None,
        block_id: None,
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(band.x, mid),
        to: Point::new(right, mid),
        color: ThemeToken::AxisLine,
        width: 2.0,
    });
    let arrow = ARROW_SIZE.min(band.h / 2.0);
    for dy in [-arrow, arrow] {
        commands.push(RenderCommand::DrawLine {
            from: Point::new(right - arrow, mid + dy),
            to: Point::new(right, mid),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
    }

    for tick in &ticks {
        let (half, color) = if tick.major {
            (band.h * MAJOR_TICK_RATIO / 2.0, ThemeToken::AxisMajorTick)
        } else {
            (band.h * MINOR_TICK_RATIO / 2.0, ThemeToken::AxisMinorTick)
        };
        commands.push(RenderCommand::DrawLine {
            from: Point::new(tick.x, mid - half),
            to: Point::new(tick.x, mid + half),
            color,
            width: 1.0,
        });
        if let Some(label) = &tick.label {
            commands.push(RenderCommand::DrawText {
                position: Point::new(tick.x, mid + half + config.font_size),
                text: label.clone(),
                color: ThemeToken::AxisLabel,
                font_size: config.font_size,
                align: TextAlign::Center,
            });
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
