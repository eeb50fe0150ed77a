use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::event::Event;
use super::recurrence::{weekday_index, RecurrencePolicy, RecurrenceRule, RecurrenceType, ShortMonths, SATURDAY};

/// Decides on which dates an event occurs. Stateless apart from the policy,
/// so one matcher can be shared freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccurrenceMatcher {
    policy: RecurrencePolicy,
}

impl OccurrenceMatcher {
    pub fn new(policy: RecurrencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RecurrencePolicy {
        self.policy
    }

    pub fn occurs_on(&self, event: &Event, date: NaiveDate) -> bool {
        let Some(rule) = &event.recurrence else {
            return event.start_date <= date && date <= event.end_date;
        };

        if date < event.start_date {
            return false;
        }
        if rule.end_date.is_some_and(|end| date > end) {
            return false;
        }
        if !self.matches_pattern(rule, event.start_date, date) {
            return false;
        }

        match rule.end_after_occurrences {
            None => true,
            Some(_) => self.occurrence_index(event, date).is_some(),
        }
    }

    /// 1-based position of `date` in the event's occurrence sequence.
    pub fn occurrence_index(&self, event: &Event, date: NaiveDate) -> Option<u32> {
        if date < event.start_date {
            return None;
        }

        let mut index = 0;
        for occurrence in self.occurrences(event) {
            if occurrence > date {
                return None;
            }
            index += 1;
            if occurrence == date {
                return Some(index);
            }
        }
        None
    }

    /// Every occurrence date in chronological order, ending at whichever stop
    /// condition is hit first. A one-off event yields its start date once.
    pub fn occurrences<'a>(&self, event: &'a Event) -> Occurrences<'a> {
        Occurrences::new(self.policy, event)
    }

    /// Dates within `[from, to]` on which the event occurs. Multi-day one-off
    /// events contribute every day they span.
    pub fn occurrences_between(&self, event: &Event, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        if from > to {
            return Vec::new();
        }

        if event.recurrence.is_none() {
            let first = event.start_date.max(from);
            let last = event.end_date.min(to);
            return first
                .iter_days()
                .take_while(|d| *d <= last)
                .collect();
        }

        self.occurrences(event)
            .skip_while(|d| *d < from)
            .take_while(|d| *d <= to)
            .collect()
    }

    fn matches_pattern(&self, rule: &RecurrenceRule, start: NaiveDate, date: NaiveDate) -> bool {
        let frequency = i64::from(rule.frequency.max(1));

        match rule.kind {
            RecurrenceType::Daily => (date - start).num_days() % frequency == 0,
            RecurrenceType::Weekly => {
                let weekdays = weekday_mask(rule, start);
                let weeks = (week_start(date) - week_start(start)).num_days() / 7;
                weekdays[weekday_index(date) as usize] && weeks % frequency == 0
            }
            RecurrenceType::Monthly => {
                let months = i64::from(month_number(date) - month_number(start));
                if months < 0 || months % frequency != 0 {
                    return false;
                }
                let anchor = start.day();
                match self.policy.short_months {
                    ShortMonths::Skip => date.day() == anchor,
                    ShortMonths::Clamp => days_in_month(date.year(), date.month())
                        .is_some_and(|len| date.day() == anchor.min(len)),
                }
            }
        }
    }
}

/// Default-policy shorthand for [`OccurrenceMatcher::occurs_on`].
pub fn occurs_on(event: &Event, date: NaiveDate) -> bool {
    OccurrenceMatcher::default().occurs_on(event, date)
}

pub struct Occurrences<'a> {
    event: &'a Event,
    policy: RecurrencePolicy,
    emitted: u32,
    step: u32,
    cursor: Option<NaiveDate>,
    weekdays: [bool; 7],
    finished: bool,
}

impl<'a> Occurrences<'a> {
    fn new(policy: RecurrencePolicy, event: &'a Event) -> Self {
        let weekdays = event
            .recurrence
            .as_ref()
            .map(|rule| weekday_mask(rule, event.start_date))
            .unwrap_or([false; 7]);

        Self {
            event,
            policy,
            emitted: 0,
            step: 0,
            cursor: Some(event.start_date),
            weekdays,
            finished: false,
        }
    }

    fn next_daily(&mut self, frequency: u32) -> Option<NaiveDate> {
        let offset = u64::from(self.step) * u64::from(frequency);
        self.step = self.step.checked_add(1)?;
        self.event.start_date.checked_add_days(Days::new(offset))
    }

    fn next_weekly(&mut self, frequency: u32) -> Option<NaiveDate> {
        let frequency = i64::from(frequency);
        let anchor_week = week_start(self.event.start_date);

        loop {
            let cursor = self.cursor?;
            let week = (week_start(cursor) - anchor_week).num_days() / 7;

            if week % frequency != 0 {
                let next_active = (week / frequency + 1) * frequency;
                self.cursor = u64::try_from(next_active * 7)
                    .ok()
                    .and_then(|days| anchor_week.checked_add_days(Days::new(days)));
                continue;
            }

            self.cursor = cursor.succ_opt();
            if self.weekdays[weekday_index(cursor) as usize] {
                return Some(cursor);
            }
        }
    }

    fn next_monthly(&mut self, frequency: u32) -> Option<NaiveDate> {
        let start = self.event.start_date;
        let anchor = start.day();
        let base = month_number(start);

        loop {
            let offset = i32::try_from(u64::from(self.step) * u64::from(frequency)).ok()?;
            self.step = self.step.checked_add(1)?;

            let number = base.checked_add(offset)?;
            let year = number.div_euclid(12);
            let month = number.rem_euclid(12) as u32 + 1;
            if year > NaiveDate::MAX.year() {
                return None;
            }

            let candidate = match self.policy.short_months {
                ShortMonths::Skip => NaiveDate::from_ymd_opt(year, month, anchor),
                ShortMonths::Clamp => days_in_month(year, month)
                    .and_then(|len| NaiveDate::from_ymd_opt(year, month, anchor.min(len))),
            };

            if candidate.is_some() {
                return candidate;
            }
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }

        let event = self.event;
        let Some(rule) = &event.recurrence else {
            self.finished = true;
            return Some(event.start_date);
        };

        if rule.end_after_occurrences.is_some_and(|limit| self.emitted >= limit) {
            self.finished = true;
            return None;
        }

        let frequency = rule.frequency.max(1);
        let candidate = match rule.kind {
            RecurrenceType::Daily => self.next_daily(frequency),
            RecurrenceType::Weekly => self.next_weekly(frequency),
            RecurrenceType::Monthly => self.next_monthly(frequency),
        };

        match candidate {
            Some(date) if rule.end_date.is_none_or(|end| date <= end) => {
                self.emitted += 1;
                Some(date)
            }
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

/// Weekdays a weekly rule fires on. Out-of-range indices are ignored; if
/// nothing valid remains the start date's weekday is used.
fn weekday_mask(rule: &RecurrenceRule, start: NaiveDate) -> [bool; 7] {
    let mut mask = [false; 7];
    for day in rule.effective_weekdays(start) {
        if day <= SATURDAY {
            mask[day as usize] = true;
        }
    }
    if !mask.contains(&true) {
        mask[weekday_index(start) as usize] = true;
    }
    mask
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Sun).first_day()
}

fn month_number(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month_first.and_then(|d| d.pred_opt()).map(|d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::recurrence::EmptyWeekdays;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn recurring(start: NaiveDate, rule: RecurrenceRule) -> Event {
        Event::new("r1", "Recurring", start).repeating(rule)
    }

    fn scan(event: &Event, from: NaiveDate, days: u64) -> Vec<NaiveDate> {
        from.iter_days()
            .take(days as usize)
            .filter(|d| occurs_on(event, *d))
            .collect()
    }

    #[test]
    fn one_off_event_occurs_on_its_start_date_only() {
        let event = Event::new("e1", "Dentist", date(2024, 2, 10));

        assert!(occurs_on(&event, date(2024, 2, 10)));
        assert!(!occurs_on(&event, date(2024, 2, 9)));
        assert!(!occurs_on(&event, date(2024, 2, 11)));
    }

    #[test]
    fn multi_day_event_occurs_on_every_spanned_day() {
        let event = Event::new("e1", "Conference", date(2024, 2, 10)).ending_on(date(2024, 2, 12));

        assert_eq!(
            scan(&event, date(2024, 2, 8), 7),
            vec![date(2024, 2, 10), date(2024, 2, 11), date(2024, 2, 12)]
        );
    }

    #[test]
    fn daily_every_day_occurs_on_all_later_dates() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::daily(1));

        assert!(!occurs_on(&event, date(2023, 12, 31)));
        assert_eq!(scan(&event, date(2024, 1, 1), 400).len(), 400);
    }

    #[test]
    fn daily_every_third_day() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::daily(3));

        assert_eq!(
            scan(&event, date(2024, 1, 1), 10),
            vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7), date(2024, 1, 10)]
        );
    }

    #[test]
    fn biweekly_monday_wednesday_friday() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::weekly(2, [1, 3, 5]));

        assert_eq!(
            scan(&event, date(2024, 1, 1), 21),
            vec![
                date(2024, 1, 1),
                date(2024, 1, 3),
                date(2024, 1, 5),
                date(2024, 1, 15),
                date(2024, 1, 17),
                date(2024, 1, 19),
            ]
        );
        for day in 8..=12 {
            assert!(!occurs_on(&event, date(2024, 1, day)));
        }
    }

    #[test]
    fn weekly_days_before_start_in_first_week_are_skipped() {
        // Starts Wednesday; the Monday of the same week is before the start.
        let event = recurring(date(2024, 1, 3), RecurrenceRule::weekly(1, [1, 3]));

        assert!(!occurs_on(&event, date(2024, 1, 1)));
        assert!(occurs_on(&event, date(2024, 1, 3)));
        assert!(occurs_on(&event, date(2024, 1, 8)));
    }

    #[test]
    fn weekly_start_off_pattern_is_not_an_occurrence() {
        // Starts Tuesday but repeats on Thursdays.
        let event = recurring(date(2024, 1, 2), RecurrenceRule::weekly(1, [4]));

        assert!(!occurs_on(&event, date(2024, 1, 2)));
        assert_eq!(event_occurrences(&event, 2), vec![date(2024, 1, 4), date(2024, 1, 11)]);
    }

    #[test]
    fn weekly_weeks_are_sunday_aligned() {
        // Saturday start, repeating Sunday and Saturday every second week:
        // the Sunday right after the start belongs to the following week.
        let event = recurring(date(2024, 1, 6), RecurrenceRule::weekly(2, [0, 6]));

        assert!(occurs_on(&event, date(2024, 1, 6)));
        assert!(!occurs_on(&event, date(2024, 1, 7)));
        assert!(!occurs_on(&event, date(2024, 1, 13)));
        assert!(occurs_on(&event, date(2024, 1, 14)));
        assert!(occurs_on(&event, date(2024, 1, 20)));
    }

    #[test]
    fn weekly_empty_set_uses_start_weekday() {
        let event = recurring(date(2024, 1, 4), RecurrenceRule::weekly(1, []));

        assert_eq!(
            scan(&event, date(2024, 1, 1), 21),
            vec![date(2024, 1, 4), date(2024, 1, 11), date(2024, 1, 18)]
        );
    }

    #[test]
    fn reject_policy_matcher_still_falls_back_for_empty_set() {
        let matcher = OccurrenceMatcher::new(RecurrencePolicy {
            empty_weekdays: EmptyWeekdays::Reject,
            ..RecurrencePolicy::default()
        });
        let event = recurring(date(2024, 1, 4), RecurrenceRule::weekly(1, []));

        assert!(matcher.occurs_on(&event, date(2024, 1, 11)));
    }

    #[test]
    fn monthly_on_31st_skips_short_months() {
        let event = recurring(date(2024, 1, 31), RecurrenceRule::monthly(1));

        assert!(occurs_on(&event, date(2024, 1, 31)));
        assert!(!occurs_on(&event, date(2024, 2, 29)));
        assert!(occurs_on(&event, date(2024, 3, 31)));
        assert!(!occurs_on(&event, date(2024, 4, 30)));
        assert!(occurs_on(&event, date(2024, 5, 31)));

        let feb_and_april: Vec<_> = scan(&event, date(2024, 2, 1), 29)
            .into_iter()
            .chain(scan(&event, date(2024, 4, 1), 30))
            .collect();
        assert!(feb_and_april.is_empty());
    }

    #[test]
    fn monthly_clamp_policy_uses_last_day_of_short_months() {
        let matcher = OccurrenceMatcher::new(RecurrencePolicy {
            short_months: ShortMonths::Clamp,
            ..RecurrencePolicy::default()
        });
        let event = recurring(date(2024, 1, 31), RecurrenceRule::monthly(1));

        assert!(matcher.occurs_on(&event, date(2024, 2, 29)));
        assert!(matcher.occurs_on(&event, date(2024, 4, 30)));
        assert!(!matcher.occurs_on(&event, date(2024, 4, 29)));
        assert_eq!(
            matcher.occurrences(&event).take(4).collect::<Vec<_>>(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn monthly_every_other_month_across_year_boundary() {
        let event = recurring(date(2024, 11, 15), RecurrenceRule::monthly(2));

        assert!(occurs_on(&event, date(2024, 11, 15)));
        assert!(!occurs_on(&event, date(2024, 12, 15)));
        assert!(occurs_on(&event, date(2025, 1, 15)));
        assert!(occurs_on(&event, date(2025, 3, 15)));
    }

    #[test]
    fn occurrence_count_limits_unbounded_scan() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::daily(2).times(3));

        let hits = scan(&event, date(2023, 12, 1), 365);

        assert_eq!(hits, vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)]);
    }

    #[test]
    fn occurrence_count_on_weekly_rule() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::weekly(1, [1, 3, 5]).times(3));

        assert_eq!(
            scan(&event, date(2024, 1, 1), 60),
            vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)]
        );
    }

    #[test]
    fn end_date_stops_before_occurrence_count() {
        // Would-be occurrences: Jan 1, 8, 15, 22, 29; end date falls between
        // the second and third.
        let rule = RecurrenceRule::weekly(1, [1]).times(5).until(date(2024, 1, 10));
        let event = recurring(date(2024, 1, 1), rule);

        assert_eq!(scan(&event, date(2024, 1, 1), 60), vec![date(2024, 1, 1), date(2024, 1, 8)]);
        assert_eq!(event_occurrences(&event, 10).len(), 2);
    }

    #[test]
    fn occurrence_count_stops_before_end_date() {
        let rule = RecurrenceRule::daily(1).times(2).until(date(2024, 12, 31));
        let event = recurring(date(2024, 1, 1), rule);

        assert_eq!(scan(&event, date(2024, 1, 1), 30), vec![date(2024, 1, 1), date(2024, 1, 2)]);
    }

    #[test]
    fn end_date_itself_is_included() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::daily(1).until(date(2024, 1, 3)));

        assert!(occurs_on(&event, date(2024, 1, 3)));
        assert!(!occurs_on(&event, date(2024, 1, 4)));
    }

    #[test]
    fn occurrence_index_is_one_based() {
        let matcher = OccurrenceMatcher::default();
        let event = recurring(date(2024, 1, 1), RecurrenceRule::weekly(2, [1, 3, 5]));

        assert_eq!(matcher.occurrence_index(&event, date(2024, 1, 1)), Some(1));
        assert_eq!(matcher.occurrence_index(&event, date(2024, 1, 15)), Some(4));
        assert_eq!(matcher.occurrence_index(&event, date(2024, 1, 9)), None);
    }

    #[test]
    fn occurrences_between_filters_range() {
        let matcher = OccurrenceMatcher::default();
        let event = recurring(date(2024, 1, 1), RecurrenceRule::daily(7));

        assert_eq!(
            matcher.occurrences_between(&event, date(2024, 1, 10), date(2024, 1, 31)),
            vec![date(2024, 1, 15), date(2024, 1, 22), date(2024, 1, 29)]
        );
    }

    #[test]
    fn occurrences_between_expands_multi_day_event() {
        let matcher = OccurrenceMatcher::default();
        let event = Event::new("e1", "Trip", date(2024, 1, 5)).ending_on(date(2024, 1, 9));

        assert_eq!(
            matcher.occurrences_between(&event, date(2024, 1, 8), date(2024, 1, 20)),
            vec![date(2024, 1, 8), date(2024, 1, 9)]
        );
    }

    #[test]
    fn zero_frequency_does_not_panic() {
        let event = recurring(date(2024, 1, 1), RecurrenceRule::daily(0));
        assert!(occurs_on(&event, date(2024, 1, 2)));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
    }

    fn event_occurrences(event: &Event, limit: usize) -> Vec<NaiveDate> {
        OccurrenceMatcher::default().occurrences(event).take(limit).collect()
    }

    fn rule_strategy() -> impl Strategy<Value = RecurrenceRule> {
        (
            prop_oneof![
                Just(RecurrenceType::Daily),
                Just(RecurrenceType::Weekly),
                Just(RecurrenceType::Monthly),
            ],
            1u32..=6,
            proptest::collection::btree_set(0u8..=6, 0..4),
            proptest::option::of(1u32..=20),
            proptest::option::of(0i64..400),
        )
            .prop_map(|(kind, frequency, days, count, end_offset)| RecurrenceRule {
                kind,
                frequency,
                days_of_week: if kind == RecurrenceType::Weekly { days } else { Default::default() },
                end_date: end_offset.map(|o| date(2024, 1, 1) + chrono::Duration::days(o)),
                end_after_occurrences: count,
            })
    }

    proptest! {
        #[test]
        fn iterator_agrees_with_matcher(rule in rule_strategy(), start_offset in 0i64..60) {
            let start = date(2023, 12, 1) + chrono::Duration::days(start_offset);
            let event = recurring(start, rule);
            let window_end = date(2025, 6, 30);

            let scanned: Vec<NaiveDate> = date(2023, 11, 1)
                .iter_days()
                .take_while(|d| *d <= window_end)
                .filter(|d| occurs_on(&event, *d))
                .collect();
            let generated: Vec<NaiveDate> = OccurrenceMatcher::default()
                .occurrences(&event)
                .take_while(|d| *d <= window_end)
                .collect();

            prop_assert_eq!(scanned, generated);
        }

        #[test]
        fn daily_every_day_matches_everything_after_start(offset in 0u64..2000) {
            let start = date(2024, 1, 1);
            let event = recurring(start, RecurrenceRule::daily(1));
            prop_assert!(occurs_on(&event, start + Days::new(offset)));
        }

        #[test]
        fn one_off_matches_exactly_its_span(span in 0u64..10, probe in 0u64..30) {
            let start = date(2024, 5, 10);
            let event = Event::new("e", "Span", start).ending_on(start + Days::new(span));
            let day = date(2024, 5, 1) + Days::new(probe);
            prop_assert_eq!(occurs_on(&event, day), start <= day && day <= event.end_date);
        }
    }
}
