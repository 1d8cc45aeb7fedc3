use std::fmt;

use rand::{Rng, distributions::Alphanumeric, thread_rng};
use serde::{Deserialize, Serialize};
use skillspan_protocol::ThemeToken;
use thiserror::Error;

use super::calendar::{AbsMonth, YearMonth, year_in_range};
use super::interval::MonthInterval;

const ID_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("month {month} is outside 1-12")]
    InvalidMonth { month: u32 },
    #[error("year {year} is outside the supported calendar")]
    YearOutOfRange { year: i32 },
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: YearMonth, end: YearMonth },
    #[error("no block with id {0}")]
    UnknownBlock(BlockId),
}

/// Opaque, immutable block key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// A fresh random id: short, lowercase alphanumeric.
    pub fn generate() -> Self {
        let id: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display category of a block. Closed set; serialized lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
    Teal,
    Indigo,
}

impl BlockColor {
    pub const ALL: [BlockColor; 7] = [
        BlockColor::Blue,
        BlockColor::Green,
        BlockColor::Purple,
        BlockColor::Red,
        BlockColor::Yellow,
        BlockColor::Teal,
        BlockColor::Indigo,
    ];

    pub fn theme_token(self) -> ThemeToken {
        match self {
            BlockColor::Blue => ThemeToken::BlockBlue,
            BlockColor::Green => ThemeToken::BlockGreen,
            BlockColor::Purple => ThemeToken::BlockPurple,
            BlockColor::Red => ThemeToken::BlockRed,
            BlockColor::Yellow => ThemeToken::BlockYellow,
            BlockColor::Teal => ThemeToken::BlockTeal,
            BlockColor::Indigo => ThemeToken::BlockIndigo,
        }
    }

    /// Parse the lowercase name used in documents and on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockColor::Blue => "blue",
            BlockColor::Green => "green",
            BlockColor::Purple => "purple",
            BlockColor::Red => "red",
            BlockColor::Yellow => "yellow",
            BlockColor::Teal => "teal",
            BlockColor::Indigo => "indigo",
        }
    }
}

/// One of the two independent lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Top,
    Bottom,
}

impl Section {
    pub const BOTH: [Section; 2] = [Section::Top, Section::Bottom];
}

/// A labeled, time-bounded interval placed in one lane.
///
/// Field names follow the exchanged JSON shape (`startYear`, `endMonth`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBlock {
    pub id: BlockId,
    pub name: String,
    pub color: BlockColor,
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
    pub section: Section,
    /// Preferred row. A hint for the packer, not layout state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i32>,
}

impl ProgressBlock {
    pub fn start(&self) -> YearMonth {
        YearMonth::new(self.start_year, self.start_month)
    }

    pub fn end(&self) -> YearMonth {
        YearMonth::new(self.end_year, self.end_month)
    }

    pub fn start_abs(&self) -> AbsMonth {
        self.start().abs()
    }

    pub fn end_abs(&self) -> AbsMonth {
        self.end().abs()
    }

    pub fn interval(&self) -> MonthInterval {
        MonthInterval::new(self.start_abs(), self.end_abs())
    }

    pub fn set_interval(&mut self, interval: MonthInterval) {
        let start = YearMonth::from_abs(interval.start);
        let end = YearMonth::from_abs(interval.end);
        self.start_year = start.year;
        self.start_month = start.month;
        self.end_year = end.year;
        self.end_month = end.month;
    }

    pub fn validate(&self) -> Result<(), BlockError> {
        validate_range(self.start(), self.end())
    }
}

fn validate_range(start: YearMonth, end: YearMonth) -> Result<(), BlockError> {
    for ym in [start, end] {
        if !ym.is_valid() {
            return Err(BlockError::InvalidMonth { month: ym.month });
        }
        if !year_in_range(ym.year) {
            return Err(BlockError::YearOutOfRange { year: ym.year });
        }
    }
    if start.abs() > end.abs() {
        return Err(BlockError::StartAfterEnd { start, end });
    }
    Ok(())
}

/// The add/edit form payload. Validated on confirmation; a rejected draft
/// changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDraft {
    pub name: String,
    pub color: BlockColor,
    pub start: YearMonth,
    pub end: YearMonth,
    pub section: Section,
}

impl BlockDraft {
    /// Form defaults for a window: January of the first year through
    /// December of the last, top lane, first color.
    pub fn for_window(start_year: i32, end_year: i32) -> Self {
        Self {
            name: String::new(),
            color: BlockColor::default(),
            start: YearMonth::new(start_year, 1),
            end: YearMonth::new(end_year, 12),
            section: Section::Top,
        }
    }

    /// Prefill from an existing block for editing.
    pub fn from_block(block: &ProgressBlock) -> Self {
        Self {
            name: block.name.clone(),
            color: block.color,
            start: block.start(),
            end: block.end(),
            section: block.section,
        }
    }

    pub fn validate(&self) -> Result<(), BlockError> {
        validate_range(self.start, self.end)
    }

    /// Build a block from this draft. `row` carries over the hint of the
    /// block being edited, if any.
    pub fn into_block(self, id: BlockId, row: Option<i32>) -> Result<ProgressBlock, BlockError> {
        self.validate()?;
        Ok(ProgressBlock {
            id,
            name: self.name,
            color: self.color,
            start_year: self.start.year,
            start_month: self.start.month,
            end_year: self.end.year,
            end_month: self.end.month,
            section: self.section,
            row,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_and_lowercase() {
        let id = BlockId::generate();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
        assert_ne!(BlockId::generate(), BlockId::generate());
    }

    #[test]
    fn block_json_uses_original_field_names() {
        let json = r#"{"id":"a1","name":"Rust","color":"teal","startYear":2020,"startMonth":1,
            "endYear":2020,"endMonth":12,"section":"bottom"}"#;
        let block: ProgressBlock = serde_json::from_str(json).expect("valid block json");
        assert_eq!(block.color, BlockColor::Teal);
        assert_eq!(block.section, Section::Bottom);
        assert_eq!(block.row, None);
        assert_eq!(block.interval(), MonthInterval::new(24240, 24251));

        let out = serde_json::to_string(&block).expect("serializes");
        assert!(out.contains("\"startMonth\":1"));
        assert!(!out.contains("\"row\""));
    }

    #[test]
    fn unknown_color_is_rejected() {
        let json = r#"{"id":"a1","name":"x","color":"magenta","startYear":2020,"startMonth":1,
            "endYear":2020,"endMonth":2,"section":"top"}"#;
        assert!(serde_json::from_str::<ProgressBlock>(json).is_err());
        assert_eq!(BlockColor::from_name("Indigo"), Some(BlockColor::Indigo));
        assert_eq!(BlockColor::from_name("magenta"), None);
    }

    #[test]
    fn draft_validation() {
        let mut draft = BlockDraft::for_window(2020, 2021);
        assert!(draft.validate().is_ok());

        draft.start = YearMonth::new(2021, 5);
        draft.end = YearMonth::new(2021, 4);
        assert!(matches!(draft.validate(), Err(BlockError::StartAfterEnd { .. })));

        draft.end = YearMonth::new(2021, 13);
        assert_eq!(draft.validate(), Err(BlockError::InvalidMonth { month: 13 }));

        draft.end = YearMonth::new(2_000_000_000, 1);
        assert_eq!(
            draft.validate(),
            Err(BlockError::YearOutOfRange {
                year: 2_000_000_000
            })
        );
    }

    #[test]
    fn set_interval_round_trips_through_calendar() {
        let mut block = BlockDraft::for_window(2020, 2021)
            .into_block(BlockId::from("b"), Some(2))
            .expect("valid draft");
        block.set_interval(MonthInterval::new(24245, 24257));
        assert_eq!(block.start(), YearMonth::new(2020, 6));
        assert_eq!(block.end(), YearMonth::new(2021, 6));
        assert_eq!(block.row, Some(2));
    }
}
