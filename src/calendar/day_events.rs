use chrono::NaiveDate;

use super::event::Event;
use super::occurrence::OccurrenceMatcher;

impl OccurrenceMatcher {
    /// Events occurring on `date`, earliest start time first. Untimed events
    /// go last; ties keep their order in `events`.
    pub fn events_on_date<'a, I>(&self, events: I, date: NaiveDate) -> Vec<&'a Event>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut matching: Vec<&Event> = events
            .into_iter()
            .filter(|event| self.occurs_on(event, date))
            .collect();
        matching.sort_by_key(|event| (event.start_time.is_none(), event.start_time));
        matching
    }
}

pub fn events_on_date(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    OccurrenceMatcher::default().events_on_date(events, date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::RecurrenceRule;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn timed(id: &str, on: NaiveDate, hour: u32) -> Event {
        Event::new(id, format!("Event {}", id), on).with_times(
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        )
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn returns_only_events_on_the_date() {
        let day = date(2024, 1, 15);
        let events = vec![timed("a", day, 9), timed("b", date(2024, 1, 16), 9)];

        assert_eq!(ids(&events_on_date(&events, day)), vec!["a"]);
    }

    #[test]
    fn includes_recurring_events_not_starting_that_day() {
        let day = date(2024, 1, 15);
        let events = vec![
            timed("weekly", date(2024, 1, 1), 8).repeating(RecurrenceRule::weekly(1, [1])),
            timed("daily-odd", date(2024, 1, 2), 7).repeating(RecurrenceRule::daily(2)),
        ];

        assert_eq!(ids(&events_on_date(&events, day)), vec!["weekly"]);
    }

    #[test]
    fn includes_multi_day_events_spanning_the_date() {
        let day = date(2024, 1, 15);
        let events = vec![Event::new("trip", "Trip", date(2024, 1, 14)).ending_on(date(2024, 1, 16))];

        assert_eq!(ids(&events_on_date(&events, day)), vec!["trip"]);
    }

    #[test]
    fn orders_by_start_time_with_untimed_last() {
        let day = date(2024, 1, 15);
        let events = vec![
            Event::new("all-day", "Holiday", day),
            timed("late", day, 16),
            timed("early", day, 8),
            timed("noon", day, 12),
        ];

        assert_eq!(ids(&events_on_date(&events, day)), vec!["early", "noon", "late", "all-day"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let day = date(2024, 1, 15);
        let events = vec![
            Event::new("untimed-1", "A", day),
            timed("nine-1", day, 9),
            Event::new("untimed-2", "B", day),
            timed("nine-2", day, 9),
        ];

        assert_eq!(
            ids(&events_on_date(&events, day)),
            vec!["nine-1", "nine-2", "untimed-1", "untimed-2"]
        );
    }

    #[test]
    fn empty_when_nothing_matches() {
        let events = vec![timed("a", date(2024, 1, 1), 9)];
        assert!(events_on_date(&events, date(2024, 2, 1)).is_empty());
    }
}
