//! Candidate slot generation.
//!
//! Turns a weekly availability into concrete start instants over a bounded
//! range of dates. Days are walked in order and each enabled day's window is
//! stepped by the slot granularity; a candidate is emitted while
//! `start + granularity <= window end`. The step is the granularity, not the
//! event duration, so the last candidate of a day may leave less than a full
//! event before the window closes.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::domain::models::availability::{TimeOfDay, WeekSchedule};
use crate::domain::models::event_type::EventType;
use crate::domain::services::policy::SchedulingPolicy;
use crate::error::AppError;

/// Inclusive range of local dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self { first, last }
    }

    /// Days 1 through `days` after `today`. Today itself is never offered.
    pub fn rolling(today: NaiveDate, days: u32) -> Self {
        Self {
            first: today.succ_opt().unwrap_or(NaiveDate::MAX),
            last: today.checked_add_days(Days::new(days as u64)).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }
}

/// Local calendar date of `now` in the scheduling locale.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub local_time: TimeOfDay,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SlotGenerator {
    schedule: WeekSchedule,
    range: DateRange,
    granularity_minutes: u32,
    duration_minutes: i32,
    tz: Tz,
}

impl SlotGenerator {
    pub fn new(
        schedule: WeekSchedule,
        range: DateRange,
        granularity_minutes: u32,
        duration_minutes: i32,
        tz: Tz,
    ) -> Self {
        Self { schedule, range, granularity_minutes, duration_minutes, tz }
    }

    /// Generator over the rolling booking window that follows `now`.
    pub fn for_event_type(
        event_type: &EventType,
        policy: &SchedulingPolicy,
        tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let schedule = event_type.availability()?.schedule().map_err(|e| {
            AppError::InternalWithMsg(format!(
                "Stored availability of {} is invalid: {}",
                event_type.id, e
            ))
        })?;
        let range = DateRange::rolling(local_today(now, tz), policy.booking_window_days);

        Ok(Self::new(
            schedule,
            range,
            policy.slot_granularity_minutes,
            event_type.duration_minutes,
            tz,
        ))
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Fresh pass over the candidates. Each call starts from the first date.
    pub fn iter(&self) -> Slots<'_> {
        Slots {
            generator: self,
            next_date: (!self.range.is_empty()).then_some(self.range.first),
            day: None,
        }
    }

    fn slot_at(&self, date: NaiveDate, minute: u32) -> Option<Slot> {
        let time = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)?;
        // Local times that do not exist or repeat around DST shifts are skipped.
        let starts_at = self
            .tz
            .from_local_datetime(&date.and_time(time))
            .single()?
            .with_timezone(&Utc);

        Some(Slot {
            date,
            local_time: TimeOfDay::from_minutes(minute),
            starts_at,
            ends_at: starts_at + Duration::minutes(self.duration_minutes as i64),
        })
    }
}

impl<'a> IntoIterator for &'a SlotGenerator {
    type Item = Slot;
    type IntoIter = Slots<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct DayCursor {
    date: NaiveDate,
    minute: u32,
    end: u32,
}

pub struct Slots<'a> {
    generator: &'a SlotGenerator,
    next_date: Option<NaiveDate>,
    day: Option<DayCursor>,
}

impl Iterator for Slots<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let step = self.generator.granularity_minutes;
        if step == 0 {
            return None;
        }

        loop {
            if let Some(day) = self.day.as_mut() {
                if day.minute + step <= day.end {
                    let (date, minute) = (day.date, day.minute);
                    day.minute += step;
                    if let Some(slot) = self.generator.slot_at(date, minute) {
                        return Some(slot);
                    }
                    continue;
                }
                self.day = None;
            }

            let date = self.next_date?;
            self.next_date = date.succ_opt().filter(|next| *next <= self.generator.range.last);

            if let Some(window) = self.generator.schedule.window_for(date.weekday()) {
                self.day = Some(DayCursor {
                    date,
                    minute: window.start.minutes(),
                    end: window.end.minutes(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::availability::{DayAvailability, WeeklyAvailability};
    use chrono::Weekday;
    use proptest::prelude::*;

    // 2030-01-07 is a Monday.
    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap()
    }

    fn weekdays(start: &str, end: &str) -> WeeklyAvailability {
        let mut week = WeeklyAvailability::default();
        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri] {
            *week.day_mut(day) = DayAvailability::new(true, start, end);
        }
        week
    }

    fn generator(
        week: &WeeklyAvailability,
        range: DateRange,
        granularity: u32,
        duration: i32,
    ) -> SlotGenerator {
        SlotGenerator::new(week.schedule().unwrap(), range, granularity, duration, chrono_tz::UTC)
    }

    fn times(slots: &[Slot]) -> Vec<String> {
        slots.iter().map(|s| s.local_time.to_string()).collect()
    }

    #[test]
    fn test_weekday_morning_yields_eight_slots() {
        let week = weekdays("08:00", "12:00");
        let monday = date(7);
        let slots: Vec<Slot> = generator(&week, DateRange::new(monday, monday), 30, 30)
            .iter()
            .collect();

        assert_eq!(
            times(&slots),
            ["08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
        assert_eq!(slots[0].starts_at.to_rfc3339(), "2030-01-07T08:00:00+00:00");
        assert_eq!(slots[7].ends_at.to_rfc3339(), "2030-01-07T12:00:00+00:00");
    }

    #[test]
    fn test_weekend_date_is_empty() {
        let week = weekdays("08:00", "12:00");
        let saturday = date(12);
        let sunday = date(13);
        assert_eq!(generator(&week, DateRange::new(saturday, sunday), 30, 30).iter().count(), 0);
    }

    #[test]
    fn test_all_days_disabled_is_empty() {
        let week = WeeklyAvailability::default();
        let range = DateRange::new(date(1), date(31));
        assert_eq!(generator(&week, range, 30, 30).iter().next(), None);
    }

    #[test]
    fn test_step_is_granularity_not_duration() {
        let week = weekdays("09:00", "10:00");
        let monday = date(7);
        let slots: Vec<Slot> = generator(&week, DateRange::new(monday, monday), 30, 60)
            .iter()
            .collect();

        // 09:30 is offered although a 60 minute event would overrun 10:00.
        assert_eq!(times(&slots), ["09:00", "09:30"]);
        assert_eq!(slots[1].ends_at.to_rfc3339(), "2030-01-07T10:30:00+00:00");
    }

    #[test]
    fn test_partial_tail_step_is_dropped() {
        let week = weekdays("09:00", "10:45");
        let monday = date(7);
        let slots: Vec<Slot> = generator(&week, DateRange::new(monday, monday), 30, 30)
            .iter()
            .collect();
        assert_eq!(times(&slots), ["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_rolling_window_skips_today() {
        let today = date(7);
        let range = DateRange::rolling(today, 14);
        assert_eq!(range.first, date(8));
        assert_eq!(range.last, date(21));
        assert!(DateRange::rolling(today, 0).is_empty());
    }

    #[test]
    fn test_window_follows_now() {
        let mut week = WeeklyAvailability::default();
        week.monday = DayAvailability::new(true, "09:00", "10:00");
        let event_type = crate::domain::models::event_type::EventType::new(
            crate::domain::models::event_type::NewEventTypeParams {
                user_id: "owner".into(),
                title: "Sync".into(),
                description: None,
                duration_minutes: 30,
                availability: week,
            },
        )
        .unwrap();

        // Monday morning: today's slots are not offered, next Monday's are.
        let now = Utc.with_ymd_and_hms(2030, 1, 7, 6, 0, 0).unwrap();
        let policy = SchedulingPolicy::default();
        let generator =
            SlotGenerator::for_event_type(&event_type, &policy, chrono_tz::UTC, now).unwrap();
        let starts: Vec<String> = generator.iter().map(|s| s.starts_at.to_rfc3339()).collect();

        assert_eq!(
            starts,
            [
                "2030-01-14T09:00:00+00:00",
                "2030-01-14T09:30:00+00:00",
                "2030-01-21T09:00:00+00:00",
                "2030-01-21T09:30:00+00:00",
            ]
        );
    }

    #[test]
    fn test_fixed_locale_converts_to_utc() {
        let week = weekdays("09:00", "10:00");
        let monday = date(7);
        let generator = SlotGenerator::new(
            week.schedule().unwrap(),
            DateRange::new(monday, monday),
            30,
            30,
            chrono_tz::Europe::Berlin,
        );
        let first = generator.iter().next().unwrap();
        assert_eq!(first.starts_at.to_rfc3339(), "2030-01-07T08:00:00+00:00");
        assert_eq!(first.local_time.to_string(), "09:00");
    }

    #[test]
    fn test_zero_granularity_yields_nothing() {
        let week = weekdays("09:00", "10:00");
        assert_eq!(generator(&week, DateRange::new(date(7), date(7)), 0, 30).iter().count(), 0);
    }

    fn arb_week() -> impl Strategy<Value = WeeklyAvailability> {
        proptest::collection::vec((any::<bool>(), 0u32..1439, 1u32..600), 7).prop_map(|days| {
            let mut week = WeeklyAvailability::default();
            let week_days = crate::domain::models::availability::WEEK.iter();
            for (day, (enabled, start, length)) in week_days.zip(days) {
                let end = (start + length).min(1439);
                *week.day_mut(*day) = DayAvailability::new(
                    enabled,
                    &TimeOfDay::from_minutes(start).to_string(),
                    &TimeOfDay::from_minutes(end).to_string(),
                );
            }
            week
        })
    }

    proptest! {
        #[test]
        fn slots_are_ordered_unique_and_inside_windows(
            week in arb_week(),
            first_day in 1u32..20,
            span in 0u32..12,
            granularity in prop::sample::select(vec![5u32, 10, 15, 30, 45, 60]),
        ) {
            let range = DateRange::new(date(first_day), date(first_day + span));
            let schedule = week.schedule().unwrap();
            let generator = SlotGenerator::new(schedule, range, granularity, 30, chrono_tz::UTC);
            let slots: Vec<Slot> = generator.iter().collect();

            for pair in slots.windows(2) {
                prop_assert!(pair[0].starts_at < pair[1].starts_at);
            }
            for slot in &slots {
                let window = schedule.window_for(slot.date.weekday());
                prop_assert!(window.is_some());
                let window = window.unwrap();
                prop_assert!(window.contains(slot.local_time));
                prop_assert!(slot.local_time.minutes() + granularity <= window.end.minutes());
                prop_assert!(slot.date >= range.first && slot.date <= range.last);
            }

            // restartable and deterministic
            let again: Vec<Slot> = generator.iter().collect();
            prop_assert_eq!(&slots, &again);
            if !schedule.is_bookable() {
                prop_assert!(slots.is_empty());
            }
        }
    }
}
