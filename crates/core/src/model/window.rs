use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::calendar::{AbsMonth, MAX_YEAR, MIN_YEAR, pixel_to_month_offset, year_in_range};
use super::interval::MonthInterval;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("start year {start_year} must be less than end year {end_year}")]
    InvalidYearRange { start_year: i32, end_year: i32 },
    #[error("year {year} is outside {}..={}", MIN_YEAR, MAX_YEAR)]
    YearOutOfRange { year: i32 },
    #[error("a window of {years} years exceeds the {}-year limit", MAX_SPAN_YEARS)]
    SpanTooWide { years: i32 },
}

/// Widest window that can be shown at once.
pub const MAX_SPAN_YEARS: i32 = 1000;

/// Reject a year range unless `start_year < end_year`, both years are in
/// range, and the window spans at most [`MAX_SPAN_YEARS`].
pub fn validate_years(start_year: i32, end_year: i32) -> Result<(), WindowError> {
    for year in [start_year, end_year] {
        if !year_in_range(year) {
            return Err(WindowError::YearOutOfRange { year });
        }
    }
    if start_year >= end_year {
        return Err(WindowError::InvalidYearRange {
            start_year,
            end_year,
        });
    }
    let years = end_year - start_year + 1;
    if years > MAX_SPAN_YEARS {
        return Err(WindowError::SpanTooWide { years });
    }
    Ok(())
}

/// The visible calendar range, stretched to fit a surface of `width` pixels
/// without scrolling. Derived state, recomputed when the years or the
/// surface width change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineWindow {
    pub start_year: i32,
    /// Inclusive.
    pub end_year: i32,
    pub width: f64,
}

impl TimelineWindow {
    pub fn new(start_year: i32, end_year: i32, width: f64) -> Result<Self, WindowError> {
        validate_years(start_year, end_year)?;
        Ok(Self {
            start_year,
            end_year,
            width: width.max(0.0),
        })
    }

    pub fn total_months(&self) -> i32 {
        (self.end_year - self.start_year + 1) * 12
    }

    /// Pixels per month.
    pub fn month_width(&self) -> f64 {
        self.width / f64::from(self.total_months())
    }

    pub fn start_abs(&self) -> AbsMonth {
        self.start_year * 12
    }

    /// Last visible month (December of `end_year`).
    pub fn end_abs(&self) -> AbsMonth {
        self.start_abs() + self.total_months() - 1
    }

    pub fn bounds(&self) -> MonthInterval {
        MonthInterval::new(self.start_abs(), self.end_abs())
    }

    /// Left pixel edge of an absolute month.
    pub fn month_to_x(&self, month: AbsMonth) -> f64 {
        f64::from(month - self.start_abs()) * self.month_width()
    }

    /// Absolute month whose left edge is nearest to pixel `x`.
    pub fn x_to_month(&self, x: f64) -> AbsMonth {
        self.start_abs() + pixel_to_month_offset(x, self.month_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_year_window() {
        let w = TimelineWindow::new(2020, 2021, 960.0).expect("valid window");
        assert_eq!(w.total_months(), 24);
        assert_eq!(w.start_abs(), 24240);
        assert_eq!(w.end_abs(), 24263);
        assert!((w.month_width() - 40.0).abs() < f64::EPSILON);
        assert!((w.month_to_x(24242) - 80.0).abs() < f64::EPSILON);
        assert_eq!(w.x_to_month(81.0), 24242);
    }

    #[test]
    fn rejects_non_increasing_years() {
        assert_eq!(
            TimelineWindow::new(2021, 2021, 100.0),
            Err(WindowError::InvalidYearRange {
                start_year: 2021,
                end_year: 2021
            })
        );
        assert!(validate_years(2022, 2020).is_err());
    }

    #[test]
    fn rejects_years_past_the_calendar_limits() {
        assert_eq!(
            validate_years(2_000_000_000, 2_000_000_001),
            Err(WindowError::YearOutOfRange {
                year: 2_000_000_000
            })
        );
        assert_eq!(
            validate_years(-5, MAX_YEAR + 1),
            Err(WindowError::YearOutOfRange { year: MAX_YEAR + 1 })
        );
        assert_eq!(
            validate_years(0, 1000),
            Err(WindowError::SpanTooWide { years: 1001 })
        );
        assert!(validate_years(1, 1000).is_ok());
        assert!(validate_years(MAX_YEAR - 1, MAX_YEAR).is_ok());
    }
}
