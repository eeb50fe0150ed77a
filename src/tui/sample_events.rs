use chrono::{Datelike, Days, Local, NaiveDate, NaiveTime};
use calgrid::calendar::{Event, RecurrenceRule, RecurrenceType};
use calgrid::calendar::recurrence::weekday_index;

fn at(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Demo data around `today`: a few one-offs plus one event per recurrence
/// kind so every matcher path shows up in the grid.
pub fn sample_events_around(today: NaiveDate) -> Vec<Event> {
    let Some(tomorrow) = today.succ_opt() else { return Vec::new() };
    let Some(yesterday) = today.pred_opt() else { return Vec::new() };
    let Some(month_start) = today.checked_sub_days(Days::new(u64::from(today.day0()))) else {
        return Vec::new();
    };
    let Some(lessons_end) = today.checked_add_days(Days::new(90)) else { return Vec::new() };

    let timed = [
        ("Code Review", tomorrow, (10, 0), (11, 0), None),
        ("Team Sync", today, (14, 0), (15, 0), Some("work")),
        ("Lunch with Team", yesterday, (12, 30), (13, 30), Some("social")),
    ];

    let mut events: Vec<Event> = timed
        .into_iter()
        .enumerate()
        .filter_map(|(i, (title, date, (sh, sm), (eh, em), category))| {
            let mut event = Event::new(format!("sample_{}", i), title, date).with_times(at(sh, sm)?, at(eh, em)?);
            event.category = category.map(String::from);
            Some(event)
        })
        .collect();

    let weekday = weekday_index(today);
    let recurring = [
        (
            "Morning Standup",
            month_start,
            RecurrenceRule::weekly(1, [1, 2, 3, 4, 5]),
            at(9, 0).zip(at(9, 15)),
            "#22c55e",
        ),
        ("Gym", yesterday, RecurrenceRule::daily(2).times(20), at(7, 0).zip(at(8, 0)), "#f97316"),
        (
            "Guitar Lesson",
            today,
            RecurrenceRule::weekly(2, [weekday]).until(lessons_end),
            at(18, 0).zip(at(19, 0)),
            "#a855f7",
        ),
        ("Rent Due", month_start, RecurrenceRule::new(RecurrenceType::Monthly, 1), None, "#ef4444"),
    ];

    for (i, (title, start, rule, times, color)) in recurring.into_iter().enumerate() {
        let mut event = Event::new(format!("sample_recurring_{}", i), title, start).repeating(rule);
        if let Some((start_time, end_time)) = times {
            event = event.with_times(start_time, end_time);
        }
        event.color = color.to_string();
        events.push(event);
    }

    events
}

pub fn sample_events() -> Vec<Event> {
    sample_events_around(Local::now().date_naive())
}
