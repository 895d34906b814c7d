/// Calendar date picker
///
/// The displayed month is independent of the selected date; only picking
/// a day touches the filter.

use chrono::{Datelike, NaiveDate};

use super::data::MonthKey;
use super::library::Library;

/// One day of the displayed month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    /// At least one record was captured on this day
    pub has_cat: bool,
}

/// Everything needed to draw a month page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: MonthKey,
    /// Disabled placeholder cells before day 1 (0 = month starts on Sunday)
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// Date picker popover state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    displayed: MonthKey,
    open: bool,
}

impl Calendar {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            displayed: MonthKey::of(today),
            open: false,
        }
    }

    pub fn displayed(&self) -> MonthKey {
        self.displayed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn prev_month(&mut self) {
        self.displayed = if self.displayed.month == 1 {
            MonthKey::new(self.displayed.year - 1, 12)
        } else {
            MonthKey::new(self.displayed.year, self.displayed.month - 1)
        };
    }

    pub fn next_month(&mut self) {
        self.displayed = if self.displayed.month == 12 {
            MonthKey::new(self.displayed.year + 1, 1)
        } else {
            MonthKey::new(self.displayed.year, self.displayed.month + 1)
        };
    }

    pub fn grid(&self, today: NaiveDate, selected: Option<NaiveDate>, library: &Library) -> MonthGrid {
        month_grid(self.displayed(), today, selected, |date| library.has_record_on(date))
    }
}

/// Number of days in a month
pub fn days_in_month(month: MonthKey) -> u32 {
    let first = first_day(month);
    let next = if month.month == 12 {
        NaiveDate::from_ymd_opt(month.year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month.year, month.month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

fn first_day(month: MonthKey) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(month.year, month.month, 1)
}

/// Lay out one month page
pub fn month_grid(
    month: MonthKey,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    has_cat: impl Fn(NaiveDate) -> bool,
) -> MonthGrid {
    let Some(first) = first_day(month) else {
        return MonthGrid {
            month,
            leading_blanks: 0,
            days: Vec::new(),
        };
    };

    let days = first
        .iter_days()
        .take(days_in_month(month) as usize)
        .map(|date| DayCell {
            date,
            is_today: date == today,
            is_selected: selected == Some(date),
            has_cat: has_cat(date),
        })
        .collect();

    MonthGrid {
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    }
}
