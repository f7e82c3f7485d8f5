use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("static time pattern")
});

/// Days in storage order, keyed 0..=6 starting from Sunday.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Minutes since local midnight, parsed from a 24-hour "HH:MM" string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub fn parse(value: &str) -> Option<Self> {
        if !TIME_PATTERN.is_match(value) {
            return None;
        }
        let (hours, minutes) = value.split_once(':')?;
        let hours: u32 = hours.parse().ok()?;
        let minutes: u32 = minutes.parse().ok()?;
        Some(TimeOfDay(hours * 60 + minutes))
    }

    pub fn from_minutes(minutes: u32) -> Self {
        TimeOfDay(minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    fn as_str(self) -> &'static str {
        match self {
            TimeField::Start => "start_time",
            TimeField::End => "end_time",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid time format (HH:MM): '{value}'")]
    MalformedTime { day: Weekday, field: TimeField, value: String },
    #[error("Start time must be before end time")]
    InvertedWindow { day: Weekday },
    #[error("At least one day of the week must be enabled")]
    NoEnabledDay,
}

impl AvailabilityError {
    /// Dotted path of the offending input field, e.g. `availability.monday.end_time`.
    pub fn field_path(&self) -> String {
        match self {
            AvailabilityError::MalformedTime { day, field, .. } => {
                format!("availability.{}.{}", day_name(*day), field.as_str())
            }
            // reported on the end time, like the booking form does
            AvailabilityError::InvertedWindow { day } => {
                format!("availability.{}.end_time", day_name(*day))
            }
            AvailabilityError::NoEnabledDay => "availability".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub enabled: bool,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
}

impl DayAvailability {
    pub fn new(enabled: bool, start_time: &str, end_time: &str) -> Self {
        Self {
            enabled,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    fn disabled(start_time: &str, end_time: &str) -> Self {
        Self::new(false, start_time, end_time)
    }

    fn weekday_default() -> Self {
        Self::disabled("08:00", "17:00")
    }

    fn weekend_default() -> Self {
        Self::disabled("10:00", "13:00")
    }

    /// Bookable window for this day, `None` when the day is switched off.
    pub fn window(&self, day: Weekday) -> Result<Option<DayWindow>, AvailabilityError> {
        let malformed = |field, value: &str| AvailabilityError::MalformedTime {
            day,
            field,
            value: value.to_string(),
        };
        let start = TimeOfDay::parse(&self.start_time)
            .ok_or_else(|| malformed(TimeField::Start, &self.start_time))?;
        let end = TimeOfDay::parse(&self.end_time)
            .ok_or_else(|| malformed(TimeField::End, &self.end_time))?;

        if !self.enabled {
            return Ok(None);
        }
        if start >= end {
            return Err(AvailabilityError::InvertedWindow { day });
        }
        Ok(Some(DayWindow { start, end }))
    }
}

fn monday_default() -> DayAvailability {
    DayAvailability::weekday_default()
}

fn saturday_default() -> DayAvailability {
    DayAvailability::weekend_default()
}

/// Canonical seven-day availability of an event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    #[serde(default = "saturday_default")]
    pub sunday: DayAvailability,
    #[serde(default = "monday_default")]
    pub monday: DayAvailability,
    #[serde(default = "monday_default")]
    pub tuesday: DayAvailability,
    #[serde(default = "monday_default")]
    pub wednesday: DayAvailability,
    #[serde(default = "monday_default")]
    pub thursday: DayAvailability,
    #[serde(default = "monday_default")]
    pub friday: DayAvailability,
    #[serde(default = "saturday_default")]
    pub saturday: DayAvailability,
}

impl Default for WeeklyAvailability {
    fn default() -> Self {
        Self {
            sunday: DayAvailability::weekend_default(),
            monday: DayAvailability::weekday_default(),
            tuesday: DayAvailability::weekday_default(),
            wednesday: DayAvailability::weekday_default(),
            thursday: DayAvailability::weekday_default(),
            friday: DayAvailability::weekday_default(),
            saturday: DayAvailability::weekend_default(),
        }
    }
}

impl WeeklyAvailability {
    pub fn day(&self, day: Weekday) -> &DayAvailability {
        match day {
            Weekday::Sun => &self.sunday,
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
        }
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut DayAvailability {
        match day {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayAvailability)> {
        WEEK.iter().map(move |day| (*day, self.day(*day)))
    }

    pub fn enabled_days(&self) -> usize {
        self.iter().filter(|(_, d)| d.enabled).count()
    }

    /// Every problem with this week, including the "no enabled day" rule.
    pub fn problems(&self) -> Vec<AvailabilityError> {
        let mut problems: Vec<AvailabilityError> = self
            .iter()
            .filter_map(|(day, availability)| availability.window(day).err())
            .collect();

        if self.enabled_days() == 0 {
            problems.push(AvailabilityError::NoEnabledDay);
        }
        problems
    }

    /// Resolves every day to its parsed window. A week with no enabled day is
    /// still a valid schedule, it simply offers nothing.
    pub fn schedule(&self) -> Result<WeekSchedule, AvailabilityError> {
        let mut days = [None; 7];
        for (index, (day, availability)) in self.iter().enumerate() {
            days[index] = availability.window(day)?;
        }
        Ok(WeekSchedule { days })
    }

    /// Two-bucket weekdays/weekends view derived from the per-day data.
    pub fn legacy_summary(&self) -> LegacyAvailability {
        LegacyAvailability {
            weekdays: self.bucket(&[
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]),
            weekends: self.bucket(&[Weekday::Sat, Weekday::Sun]),
        }
    }

    fn bucket(&self, days: &[Weekday]) -> LegacyBucket {
        let windows: Vec<DayWindow> = days
            .iter()
            .filter_map(|day| self.day(*day).window(*day).ok().flatten())
            .collect();

        match (windows.iter().map(|w| w.start).min(), windows.iter().map(|w| w.end).max()) {
            (Some(start), Some(end)) => LegacyBucket {
                enabled: true,
                start_time: start.to_string(),
                end_time: end.to_string(),
            },
            _ => {
                let first = self.day(days[0]);
                LegacyBucket {
                    enabled: false,
                    start_time: first.start_time.clone(),
                    end_time: first.end_time.clone(),
                }
            }
        }
    }
}

/// Half-open `[start, end)` window of one enabled day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl DayWindow {
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [Option<DayWindow>; 7],
}

impl WeekSchedule {
    pub fn window_for(&self, day: Weekday) -> Option<DayWindow> {
        self.days[day.num_days_from_sunday() as usize]
    }

    pub fn is_bookable(&self) -> bool {
        self.days.iter().any(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyBucket {
    pub enabled: bool,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyAvailability {
    pub weekdays: LegacyBucket,
    pub weekends: LegacyBucket,
}
