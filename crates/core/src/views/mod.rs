//! Render-command producers. Each view is a pure function of layout and
//! session state.

pub mod lanes;
pub mod overlay;
pub mod time_axis;

use skillspan_protocol::{Rect, RenderCommand, ThemeToken};

use crate::model::{Section, Session};

pub use lanes::render_lane;
pub use overlay::{render_tooltip, render_trash};
pub use time_axis::{AxisTick, axis_ticks, render_time_axis};

/// Full frame for a session: top lane, axis, bottom lane, then the
/// interaction overlays (resize tooltip, and the trash while dragging).
pub fn render_timeline(session: &Session) -> Vec<RenderCommand> {
    let geometry = session.geometry();
    let config = session.config();
    let (surface_width, surface_height) = session.surface_size();
    let width = geometry.window.width;

    let mut commands = vec![RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, geometry.total_height().max(surface_height)),
        color: ThemeToken::Background,
        border_color: None,
        label: None,
        block_id: None,
    }];

    for section in Section::BOTH {
        if section == Section::Bottom {
            commands.extend(render_time_axis(&geometry.window, geometry.axis, config));
        }
        commands.extend(render_lane(
            geometry.lane(section),
            session.section_label(section),
            session.blocks(),
            session.selection(),
            width,
            config,
        ));
    }

    if let Some(tooltip) = session.tooltip() {
        commands.extend(render_tooltip(tooltip, config));
    }
    if session.trash_visible() {
        commands.extend(render_trash(&session.drop_target(), config));
    }
    tracing::trace!(commands = commands.len(), surface_width, "rendered frame");
    commands
}
