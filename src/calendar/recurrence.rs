use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_FREQUENCY: u32 = 1;
pub const MAX_FREQUENCY: u32 = 52;
pub const MIN_OCCURRENCES: u32 = 1;
pub const MAX_OCCURRENCES: u32 = 365;

/// Highest weekday index; Sunday is 0.
pub const SATURDAY: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Frequency must be between 1 and 52, got {0}")]
    InvalidFrequency(u32),
    #[error("Occurrence count must be between 1 and 365, got {0}")]
    InvalidOccurrenceBound(u32),
    #[error("Recurrence ends on {end} which is before the event starts on {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Weekly recurrence needs at least one weekday")]
    EmptyWeekdaySet,
    #[error("Weekday index {0} is out of range (0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    pub fn next(self) -> Self {
        match self {
            RecurrenceType::Daily => RecurrenceType::Weekly,
            RecurrenceType::Weekly => RecurrenceType::Monthly,
            RecurrenceType::Monthly => RecurrenceType::Daily,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            RecurrenceType::Daily => RecurrenceType::Monthly,
            RecurrenceType::Weekly => RecurrenceType::Daily,
            RecurrenceType::Monthly => RecurrenceType::Weekly,
        }
    }

    /// Unit name used in "every N day(s)" labels.
    pub fn unit(self) -> &'static str {
        match self {
            RecurrenceType::Daily => "day",
            RecurrenceType::Weekly => "week",
            RecurrenceType::Monthly => "month",
        }
    }
}

/// How an event repeats. Stop conditions are independent; the first one
/// reached ends the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    pub frequency: u32,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub days_of_week: BTreeSet<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_after_occurrences: Option<u32>,
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceType, frequency: u32) -> Self {
        Self {
            kind,
            frequency,
            days_of_week: BTreeSet::new(),
            end_date: None,
            end_after_occurrences: None,
        }
    }

    pub fn daily(frequency: u32) -> Self {
        Self::new(RecurrenceType::Daily, frequency)
    }

    pub fn weekly(frequency: u32, days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            days_of_week: days.into_iter().collect(),
            ..Self::new(RecurrenceType::Weekly, frequency)
        }
    }

    pub fn monthly(frequency: u32) -> Self {
        Self::new(RecurrenceType::Monthly, frequency)
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn times(mut self, occurrences: u32) -> Self {
        self.end_after_occurrences = Some(occurrences);
        self
    }

    /// Weekdays a weekly rule fires on, falling back to the weekday of
    /// `start` when none were picked.
    pub fn effective_weekdays(&self, start: NaiveDate) -> BTreeSet<u8> {
        if self.days_of_week.is_empty() {
            BTreeSet::from([weekday_index(start)])
        } else {
            self.days_of_week.clone()
        }
    }

    pub fn summary(&self) -> String {
        let mut text = if self.frequency == 1 {
            format!("Every {}", self.kind.unit())
        } else {
            format!("Every {} {}s", self.frequency, self.kind.unit())
        };

        if self.kind == RecurrenceType::Weekly && !self.days_of_week.is_empty() {
            let days: Vec<&str> = self.days_of_week
                .iter()
                .filter_map(|&d| WEEKDAY_LABELS.get(d as usize).copied())
                .collect();
            text.push_str(&format!(" on {}", days.join(", ")));
        }

        if let Some(end) = self.end_date {
            text.push_str(&format!(" until {}", end.format("%Y-%m-%d")));
        }
        if let Some(count) = self.end_after_occurrences {
            text.push_str(&format!(", {} time{}", count, if count == 1 { "" } else { "s" }));
        }
        text
    }
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyWeekdays {
    /// An empty weekly set repeats on the start date's weekday.
    #[default]
    StartWeekday,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortMonths {
    /// Months without the anchor day get no occurrence.
    #[default]
    Skip,
    /// Months without the anchor day fire on their last day instead.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecurrencePolicy {
    pub empty_weekdays: EmptyWeekdays,
    pub short_months: ShortMonths,
}

impl RecurrencePolicy {
    pub fn validate(
        &self,
        rule: &RecurrenceRule,
        event_start: NaiveDate,
    ) -> Result<RecurrenceRule, ValidationError> {
        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&rule.frequency) {
            return Err(ValidationError::InvalidFrequency(rule.frequency));
        }

        if let Some(count) = rule.end_after_occurrences
            && !(MIN_OCCURRENCES..=MAX_OCCURRENCES).contains(&count)
        {
            return Err(ValidationError::InvalidOccurrenceBound(count));
        }

        if let Some(end) = rule.end_date
            && end < event_start
        {
            return Err(ValidationError::InvalidDateRange { start: event_start, end });
        }

        let mut normalized = rule.clone();
        match rule.kind {
            RecurrenceType::Weekly => {
                if let Some(&day) = rule.days_of_week.iter().find(|&&d| d > SATURDAY) {
                    return Err(ValidationError::InvalidWeekday(day));
                }
                if rule.days_of_week.is_empty() && self.empty_weekdays == EmptyWeekdays::Reject {
                    return Err(ValidationError::EmptyWeekdaySet);
                }
            }
            RecurrenceType::Daily | RecurrenceType::Monthly => normalized.days_of_week.clear(),
        }

        Ok(normalized)
    }
}

/// Validates `rule` for an event starting on `event_start` under the default
/// policy.
pub fn validate_recurrence(
    rule: &RecurrenceRule,
    event_start: NaiveDate,
) -> Result<RecurrenceRule, ValidationError> {
    RecurrencePolicy::default().validate(rule, event_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn accepts_rule_within_bounds() {
        let rule = RecurrenceRule::weekly(2, [1, 3, 5]).until(date(2024, 6, 1)).times(10);

        let validated = validate_recurrence(&rule, date(2024, 1, 1)).unwrap();

        assert_eq!(validated, rule);
    }

    #[test]
    fn rejects_zero_frequency() {
        let rule = RecurrenceRule::daily(0);
        assert_eq!(
            validate_recurrence(&rule, date(2024, 1, 1)),
            Err(ValidationError::InvalidFrequency(0))
        );
    }

    #[test]
    fn rejects_frequency_above_52() {
        let rule = RecurrenceRule::weekly(53, []);
        assert_eq!(
            validate_recurrence(&rule, date(2024, 1, 1)),
            Err(ValidationError::InvalidFrequency(53))
        );
    }

    #[test]
    fn accepts_frequency_at_both_limits() {
        assert!(validate_recurrence(&RecurrenceRule::daily(1), date(2024, 1, 1)).is_ok());
        assert!(validate_recurrence(&RecurrenceRule::daily(52), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn rejects_zero_occurrences() {
        let rule = RecurrenceRule::daily(1).times(0);
        assert_eq!(
            validate_recurrence(&rule, date(2024, 1, 1)),
            Err(ValidationError::InvalidOccurrenceBound(0))
        );
    }

    #[test]
    fn rejects_400_occurrences() {
        let rule = RecurrenceRule::daily(1).times(400);
        assert_eq!(
            validate_recurrence(&rule, date(2024, 1, 1)),
            Err(ValidationError::InvalidOccurrenceBound(400))
        );
    }

    #[test]
    fn rejects_end_date_before_start() {
        let rule = RecurrenceRule::monthly(1).until(date(2023, 12, 31));
        assert_eq!(
            validate_recurrence(&rule, date(2024, 1, 1)),
            Err(ValidationError::InvalidDateRange {
                start: date(2024, 1, 1),
                end: date(2023, 12, 31),
            })
        );
    }

    #[test]
    fn end_date_on_start_day_is_allowed() {
        let rule = RecurrenceRule::daily(1).until(date(2024, 1, 1));
        assert!(validate_recurrence(&rule, date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn empty_weekly_set_is_allowed_by_default() {
        let rule = RecurrenceRule::weekly(1, []);
        assert!(validate_recurrence(&rule, date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn reject_policy_refuses_empty_weekly_set() {
        let policy = RecurrencePolicy {
            empty_weekdays: EmptyWeekdays::Reject,
            ..RecurrencePolicy::default()
        };
        let rule = RecurrenceRule::weekly(1, []);

        assert_eq!(
            policy.validate(&rule, date(2024, 1, 1)),
            Err(ValidationError::EmptyWeekdaySet)
        );
    }

    #[test]
    fn reject_policy_ignores_non_weekly_rules() {
        let policy = RecurrencePolicy {
            empty_weekdays: EmptyWeekdays::Reject,
            ..RecurrencePolicy::default()
        };
        assert!(policy.validate(&RecurrenceRule::daily(1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn rejects_weekday_index_out_of_range() {
        let rule = RecurrenceRule::weekly(1, [2, 7]);
        assert_eq!(
            validate_recurrence(&rule, date(2024, 1, 1)),
            Err(ValidationError::InvalidWeekday(7))
        );
    }

    #[test]
    fn weekdays_are_dropped_from_non_weekly_rules() {
        let mut rule = RecurrenceRule::daily(3);
        rule.days_of_week.insert(4);

        let validated = validate_recurrence(&rule, date(2024, 1, 1)).unwrap();

        assert!(validated.days_of_week.is_empty());
    }

    #[test]
    fn empty_weekday_set_falls_back_to_start_weekday() {
        let rule = RecurrenceRule::weekly(1, []);
        // 2024-01-03 is a Wednesday.
        assert_eq!(rule.effective_weekdays(date(2024, 1, 3)), BTreeSet::from([3]));
    }

    #[test]
    fn wire_format_uses_type_and_camel_case() {
        let json = r#"{"type":"weekly","frequency":2,"daysOfWeek":[1,3],"endAfterOccurrences":4}"#;

        let rule: RecurrenceRule = serde_json::from_str(json).unwrap();

        assert_eq!(rule, RecurrenceRule::weekly(2, [1, 3]).times(4));
    }

    #[test]
    fn summary_describes_rule() {
        let rule = RecurrenceRule::weekly(2, [1, 5]).times(3);
        assert_eq!(rule.summary(), "Every 2 weeks on Mon, Fri, 3 times");
    }

    #[test]
    fn type_cycles_through_all_kinds() {
        let kind = RecurrenceType::Daily;
        assert_eq!(kind.next().next().next(), kind);
        assert_eq!(kind.next().prev(), kind);
    }
}
