//! Holiday calendars.
//!
//! Deterministic, pure logic. No IO, no wall-clock, no network.
//!
//! [`HolidayCalendar`] is the lookup capability the enrichment stage depends
//! on. [`BrazilCalendar`] computes Brazilian national holidays from a static
//! rule set (fixed dates plus the Easter-dependent Good Friday).
//! [`NoHolidays`] is the empty calendar.

mod brazil;
mod easter;

pub use brazil::BrazilCalendar;
pub use easter::easter_sunday;

use chrono::NaiveDate;

/// Answers whether a date is a designated holiday.
///
/// Implementations must be deterministic and must not fail: dates outside
/// the calendar's known range are simply not holidays.
pub trait HolidayCalendar: Send + Sync {
    /// Whether `date` is a holiday in this calendar.
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Calendar name for logging.
    fn name(&self) -> &str;
}

/// A calendar without holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }

    fn name(&self) -> &str {
        "none"
    }
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for &C {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for Box<C> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
