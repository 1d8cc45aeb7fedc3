use skillspan_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

use crate::config::LayoutConfig;
use crate::layout::LaneGeometry;
use crate::model::{ProgressBlock, Section, Selection};

/// Render one lane: background, section label, then its blocks in
/// collection order so later blocks paint over earlier ones.
pub fn render_lane(
    lane: &LaneGeometry,
    label: &str,
    blocks: &[ProgressBlock],
    selection: &Selection,
    width: f64,
    config: &LayoutConfig,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(lane.placements.len() + 5);
    let group_id = match lane.section {
        Section::Top => "lane-top",
        Section::Bottom => "lane-bottom",
    };

    commands.push(RenderCommand::BeginGroup {
        id: group_id.into(),
        label: Some(label.to_string()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: lane.bounds(width),
        color: ThemeToken::LaneBackground,
        border_color: Some(ThemeToken::LaneBorder),
        label: None,
        block_id: None,
    });

    for placement in &lane.placements {
        let Some(block) = blocks.iter().find(|b| b.id == placement.id) else {
            continue;
        };
        let border = if selection.contains(&block.id) {
            ThemeToken::SelectionRing
        } else {
            ThemeToken::BlockBorder
        };
        commands.push(RenderCommand::DrawRect {
            rect: placement.rect,
            color: block.color.theme_token(),
            border_color: Some(border),
            label: Some(block.name.clone()),
            block_id: Some(block.id.to_string()),
        });
    }

    // Top-left corner, drawn last so blocks never cover the lane name.
    commands.push(RenderCommand::DrawText {
        position: Point::new(config.font_size / 2.0, lane.top + config.font_size),
        text: label.to_string(),
        color: ThemeToken::LaneLabelText,
        font_size: config.font_size,
        align: TextAlign::Left,
    });
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockColor, BlockId, TimelineWindow};

    fn blocks() -> Vec<ProgressBlock> {
        ["a", "b"]
            .into_iter()
            .map(|id| ProgressBlock {
                id: BlockId::from(id),
                name: format!("block {id}"),
                color: BlockColor::Yellow,
                start_year: 2020,
                start_month: 1,
                end_year: 2020,
                end_month: 6,
                section: Section::Top,
                row: None,
            })
            .collect()
    }

    #[test]
    fn blocks_are_tagged_and_selection_ringed() {
        let cfg = LayoutConfig::default();
        let window = TimelineWindow::new(2020, 2021, 960.0).expect("valid window");
        let blocks = blocks();
        let lane = LaneGeometry::compute(&blocks, Section::Top, &window, &cfg, 0.0);
        let mut selection = Selection::new();
        selection.select(&BlockId::from("b"), false);

        let cmds = render_lane(&lane, "Work", &blocks, &selection, 960.0, &cfg);
        let tagged: Vec<(&str, ThemeToken)> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    block_id: Some(id),
                    border_color: Some(border),
                    ..
                } => Some((id.as_str(), *border)),
                _ => None,
            })
            .collect();
        assert_eq!(
            tagged,
            [("a", ThemeToken::BlockBorder), ("b", ThemeToken::SelectionRing)]
        );
        let label = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawText {
                position,
                text,
                align,
                ..
            } if text == "Work" => Some((*position, *align)),
            _ => None,
        });
        assert_eq!(
            label,
            Some((Point::new(cfg.font_size / 2.0, lane.top + cfg.font_size), TextAlign::Left))
        );
    }
}
