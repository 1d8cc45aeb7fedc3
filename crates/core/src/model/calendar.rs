use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based month count since year 0, January. Totally ordered over time.
pub type AbsMonth = i32;

/// Earliest year accepted anywhere a year enters the model.
pub const MIN_YEAR: i32 = -100_000;
/// Latest accepted year. Keeps every absolute month well inside `i32`.
pub const MAX_YEAR: i32 = 100_000;

pub fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Flatten a (year, month) pair into an absolute month index.
///
/// `month` is 1-based (1 = January).
pub fn to_abs_month(year: i32, month: u32) -> AbsMonth {
    year * 12 + (month as i32 - 1)
}

/// Exact inverse of [`to_abs_month`]. Floors toward negative infinity so that
/// years before 0 round-trip too.
pub fn from_abs_month(abs: AbsMonth) -> (i32, u32) {
    (abs.div_euclid(12), abs.rem_euclid(12) as u32 + 1)
}

/// Largest offset [`pixel_to_month_offset`] reports in either direction:
/// twice the whole calendar, so any absolute month plus an offset stays in
/// `i32`.
pub const MAX_MONTH_OFFSET: i32 = (MAX_YEAR - MIN_YEAR) * 12 * 2;

/// Snap a pixel offset to the nearest whole month.
///
/// A non-positive `month_width` (a surface that has not been measured yet)
/// snaps everything to zero. Pointers far off the surface saturate at
/// [`MAX_MONTH_OFFSET`].
pub fn pixel_to_month_offset(px: f64, month_width: f64) -> i32 {
    if month_width <= 0.0 || !px.is_finite() {
        return 0;
    }
    let limit = f64::from(MAX_MONTH_OFFSET);
    (px / month_width).round().clamp(-limit, limit) as i32
}

/// A calendar month, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn abs(self) -> AbsMonth {
        to_abs_month(self.year, self.month)
    }

    pub fn from_abs(abs: AbsMonth) -> Self {
        let (year, month) = from_abs_month(abs);
        Self { year, month }
    }

    pub fn is_valid(self) -> bool {
        (1..=12).contains(&self.month)
    }
}

/// Tooltip form used while resizing: `2021/3`.
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.month)
    }
}
