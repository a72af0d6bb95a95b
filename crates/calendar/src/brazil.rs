//! Brazilian national holidays.

use chrono::{Datelike, Duration, NaiveDate};

use crate::HolidayCalendar;
use crate::easter::easter_sunday;

/// First year covered by the rule set.
const FIRST_YEAR: i32 = 1890;
/// Last year covered by the rule set.
const LAST_YEAR: i32 = 2099;

/// Fixed-date national holidays: (month, day, first year observed, name).
const FIXED_HOLIDAYS: &[(u32, u32, i32, &str)] = &[
    (1, 1, FIRST_YEAR, "Confraternização Universal"),
    (4, 21, FIRST_YEAR, "Tiradentes"),
    (5, 1, 1925, "Dia do Trabalhador"),
    (9, 7, FIRST_YEAR, "Independência do Brasil"),
    (10, 12, 1980, "Nossa Senhora Aparecida"),
    (11, 2, FIRST_YEAR, "Finados"),
    (11, 15, FIRST_YEAR, "Proclamação da República"),
    (11, 20, 2024, "Consciência Negra"),
    (12, 25, FIRST_YEAR, "Natal"),
];

/// National holiday calendar for Brazil, 1890 through 2099.
///
/// Fixed dates come from [`FIXED_HOLIDAYS`]; Good Friday is derived from
/// Easter. Dates outside the covered years are never holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrazilCalendar;

impl BrazilCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Years this calendar has rules for.
    pub fn supported_years(&self) -> std::ops::RangeInclusive<i32> {
        FIRST_YEAR..=LAST_YEAR
    }

    /// Holiday name for a date, if any.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&'static str> {
        let year = date.year();
        if !self.supported_years().contains(&year) {
            return None;
        }

        let fixed = FIXED_HOLIDAYS.iter().find(|(month, day, since, _)| {
            *month == date.month() && *day == date.day() && year >= *since
        });
        if let Some(&(_, _, _, name)) = fixed {
            return Some(name);
        }

        let good_friday = easter_sunday(year).map(|e| e - Duration::days(2));
        (good_friday == Some(date)).then_some("Sexta-feira Santa")
    }
}

impl HolidayCalendar for BrazilCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    fn name(&self) -> &str {
        "BR"
    }
}
