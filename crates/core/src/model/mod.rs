pub mod block;
pub mod calendar;
pub mod interval;
pub mod selection;
pub mod session;
pub mod window;

pub use block::{BlockColor, BlockDraft, BlockError, BlockId, ProgressBlock, Section};
pub use calendar::{
    AbsMonth, MAX_YEAR, MIN_YEAR, YearMonth, from_abs_month, pixel_to_month_offset, to_abs_month,
    year_in_range,
};
pub use interval::MonthInterval;
pub use selection::Selection;
pub use session::{ClearMode, Session};
pub use window::{MAX_SPAN_YEARS, TimelineWindow, WindowError, validate_years};
