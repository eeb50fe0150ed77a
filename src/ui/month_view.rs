use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::app::AppState;
use crate::calendar::occurrence::days_in_month;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub weekdays: Vec<Weekday>,
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    pub is_current_month: bool,
    pub event_count: usize,
    pub has_recurring: bool,
    pub in_visual_selection: bool,
}

impl DayCell {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            is_selected: false,
            is_today: false,
            is_current_month: true,
            event_count: 0,
            has_recurring: false,
            in_visual_selection: false,
        }
    }

    pub fn has_events(&self) -> bool {
        self.event_count > 0
    }
}

pub fn calculate_layout(state: &AppState) -> MonthLayout {
    calculate_layout_at(state, chrono::Local::now().date_naive())
}

/// Full weeks from the week holding the 1st through the week holding the
/// last day of the selected month.
pub fn calculate_layout_at(state: &AppState, today: NaiveDate) -> MonthLayout {
    let year = state.selected_date.year();
    let month = state.selected_date.month();
    let weekdays = weekday_order(state.week_start);

    let first_day = NaiveDate::from_ymd_opt(year, month, 1);
    let last_day = days_in_month(year, month).and_then(|len| NaiveDate::from_ymd_opt(year, month, len));
    let (Some(first_day), Some(last_day)) = (first_day, last_day) else {
        return MonthLayout { year, month, weekdays, weeks: Vec::new() };
    };

    let grid_start = first_day.week(state.week_start).first_day();
    let grid_end = last_day.week(state.week_start).last_day();

    let mut weeks = Vec::new();
    let mut current_week = Week { days: Vec::with_capacity(7) };

    for date in grid_start.iter_days().take_while(|d| *d <= grid_end) {
        let events = state.get_events_for_date(date);

        current_week.days.push(DayCell {
            date,
            is_selected: date == state.selected_date,
            is_today: date == today,
            is_current_month: date.month() == month && date.year() == year,
            event_count: events.len(),
            has_recurring: events.iter().any(|e| e.is_recurring()),
            in_visual_selection: state.is_date_in_visual_selection(date),
        });

        if current_week.days.len() == 7 {
            weeks.push(std::mem::replace(&mut current_week, Week { days: Vec::with_capacity(7) }));
        }
    }

    MonthLayout { year, month, weekdays, weeks }
}

pub fn weekday_order(week_start: Weekday) -> Vec<Weekday> {
    std::iter::successors(Some(week_start), |d| Some(d.succ()))
        .take(7)
        .collect()
}

/// Same day in the month `months` away, clamped to that month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let number = date.year() * 12 + date.month0() as i32 + months;
    let year = number.div_euclid(12);
    let month = number.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = first_of_month(date)?;
    shift_month(first, 1)?.checked_sub_days(Days::new(1))
}
