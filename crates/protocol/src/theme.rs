use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Block fills, one per block color
    BlockBlue,
    BlockGreen,
    BlockPurple,
    BlockRed,
    BlockYellow,
    BlockTeal,
    BlockIndigo,
    BlockBorder,
    BlockText,

    LaneBackground,
    LaneBorder,
    LaneLabelBackground,
    LaneLabelText,

    // Axis
    AxisBackground,
    AxisLine,
    AxisMajorTick,
    AxisMinorTick,
    AxisLabel,

    SelectionRing,
    TooltipBackground,
    TooltipText,

    // Deletion target
    TrashFill,
    TrashText,

    Background,
}
