use serde::{Deserialize, Serialize};

use super::calendar::AbsMonth;

/// An inclusive range of absolute months. A block spanning a single month
/// has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthInterval {
    pub start: AbsMonth,
    pub end: AbsMonth,
}

impl MonthInterval {
    pub fn new(start: AbsMonth, end: AbsMonth) -> Self {
        Self { start, end }
    }

    /// An interval of `duration` months beginning at `start`.
    pub fn with_duration(start: AbsMonth, duration: i32) -> Self {
        Self {
            start,
            end: start + duration - 1,
        }
    }

    /// Number of month cells covered (inclusive on both ends).
    pub fn duration(&self) -> i32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, month: AbsMonth) -> bool {
        (self.start..=self.end).contains(&month)
    }

    /// Inclusive overlap: intervals that touch on a shared boundary month
    /// overlap.
    pub fn overlaps(&self, other: &MonthInterval) -> bool {
        !(self.end < other.start || self.start > other.end)
    }

    /// Same interval moved by `months`.
    pub fn translate(&self, months: i32) -> Self {
        Self {
            start: self.start + months,
            end: self.end + months,
        }
    }

    /// Rigidly translate this interval so that it lies inside `bounds`,
    /// preserving its duration. The start is clamped first and the end last,
    /// so an interval longer than `bounds` ends on `bounds.end` and overhangs
    /// the start.
    pub fn shift_into(&self, bounds: MonthInterval) -> Self {
        let duration = self.duration();
        let mut start = self.start.max(bounds.start);
        if start + duration - 1 > bounds.end {
            start = bounds.end - (duration - 1);
        }
        Self::with_duration(start, duration)
    }

    /// Move the start edge to `candidate`, clamped to `bounds.start` and never
    /// past the (fixed) end edge.
    pub fn resize_start(&self, candidate: AbsMonth, bounds: MonthInterval) -> Self {
        Self {
            start: candidate.max(bounds.start).min(self.end),
            end: self.end,
        }
    }

    /// Move the end edge to `candidate`, clamped to `bounds.end` and never
    /// before the (fixed) start edge.
    pub fn resize_end(&self, candidate: AbsMonth, bounds: MonthInterval) -> Self {
        Self {
            start: self.start,
            end: candidate.min(bounds.end).max(self.start),
        }
    }
}
