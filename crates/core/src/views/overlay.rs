use skillspan_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::config::LayoutConfig;
use crate::interaction::{DropTarget, Tooltip};

const TRASH_LABEL: &str = "Delete";

/// Date label floating above the edge being resized.
pub fn render_tooltip(tooltip: &Tooltip, config: &LayoutConfig) -> Vec<RenderCommand> {
    let pad = config.font_size / 2.0;
    let w = tooltip.text.chars().count() as f64 * config.font_size * 0.6 + pad * 2.0;
    let h = config.font_size + pad * 2.0;
    let rect = Rect::new(
        (tooltip.anchor.x - w / 2.0).max(0.0),
        (tooltip.anchor.y - h - pad).max(0.0),
        w,
        h,
    );
    vec![
        RenderCommand::DrawRect {
            rect,
            color: ThemeToken::TooltipBackground,
            border_color: None,
            label: None,
            block_id: None,
        },
        RenderCommand::DrawText {
            position: Point::new(rect.x + w / 2.0, rect.y + pad + config.font_size * 0.8),
            text: tooltip.text.clone(),
            color: ThemeToken::TooltipText,
            font_size: config.font_size,
            align: TextAlign::Center,
        },
    ]
}

pub fn render_trash(target: &DropTarget, config: &LayoutConfig) -> Vec<RenderCommand> {
    let rect = target.rect();
    vec![
        RenderCommand::BeginGroup {
            id: "trash".into(),
            label: Some(TRASH_LABEL.into()),
        },
        RenderCommand::DrawRect {
            rect,
            color: ThemeToken::TrashFill,
            border_color: None,
            label: None,
            block_id: None,
        },
        RenderCommand::DrawText {
            position: Point::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0 + config.font_size / 3.0),
            text: TRASH_LABEL.into(),
            color: ThemeToken::TrashText,
            font_size: config.font_size,
            align: TextAlign::Center,
        },
        RenderCommand::EndGroup,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Edge;

    #[test]
    fn tooltip_stays_on_surface() {
        let tooltip = Tooltip {
            text: "2020/3".into(),
            edge: Edge::Left,
            anchor: Point::new(2.0, 4.0),
        };
        let cmds = render_tooltip(&tooltip, &LayoutConfig::default());
        let Some(RenderCommand::DrawRect { rect, .. }) = cmds.first() else {
            unreachable!("tooltip starts with its background");
        };
        assert!(rect.x >= 0.0 && rect.y >= 0.0);
        assert!(matches!(&cmds[1], RenderCommand::DrawText { text, .. } if text == "2020/3"));
    }

    #[test]
    fn trash_is_grouped() {
        let cfg = LayoutConfig::default();
        let target = DropTarget::anchored(800.0, 600.0, &cfg);
        let cmds = render_trash(&target, &cfg);
        assert!(matches!(&cmds[0], RenderCommand::BeginGroup { id, .. } if id == "trash"));
        assert!(matches!(
            &cmds[1],
            RenderCommand::DrawRect { rect, .. } if *rect == target.rect()
        ));
    }
}
