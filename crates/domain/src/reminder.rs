use chrono::Weekday;
use serde::{de::Visitor, Deserialize, Serialize};
use std::collections::HashSet;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// How the reminder times and days of a `Medication` are interpreted.
/// `TwiceDaily` matches exactly like `Daily`, it only signals the expected
/// number of entries in the reminder times list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    Daily,
    TwiceDaily,
    Weekly,
}

#[derive(Error, Debug)]
pub enum InvalidReminderError {
    #[error("Reminder frequency: {0} is malformed")]
    Frequency(String),
    #[error("Time of day: {0} is malformed")]
    TimeOfDay(String),
    #[error("Weekday: {0} is malformed")]
    Weekday(String),
}

impl FromStr for ReminderFrequency {
    type Err = InvalidReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "twice_daily" => Ok(Self::TwiceDaily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(InvalidReminderError::Frequency(s.to_string())),
        }
    }
}

impl Display for ReminderFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Daily => "daily",
            Self::TwiceDaily => "twice_daily",
            Self::Weekly => "weekly",
        };
        write!(f, "{}", s)
    }
}

/// A wall-clock hour and minute, the resolution at which reminders match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
}

impl TimeOfDay {
    pub fn new(hours: u32, minutes: u32) -> Option<Self> {
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(Self { hours, minutes })
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidReminderError::TimeOfDay(s.to_string());
        let parts = s.split(':').collect::<Vec<_>>();
        if parts.len() != 2 {
            return Err(malformed());
        }
        let hours = parts[0].parse::<u32>().map_err(|_| malformed())?;
        let minutes = parts[1].parse::<u32>().map_err(|_| malformed())?;
        TimeOfDay::new(hours, minutes).ok_or_else(malformed)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TimeOfDayVisitor;

        impl<'de> Visitor<'de> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A time of day in HH:MM format")
            }

            fn visit_str<E>(self, value: &str) -> Result<TimeOfDay, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<TimeOfDay>()
                    .map_err(|_| E::custom(format!("Malformed time of day: {}", value)))
            }
        }

        deserializer.deserialize_str(TimeOfDayVisitor)
    }
}

/// Sorts reminder times earliest first and removes duplicates.
pub fn normalize_reminder_times(mut times: Vec<TimeOfDay>) -> Vec<TimeOfDay> {
    times.sort();
    times.dedup();
    times
}

pub fn parse_reminder_times(values: &[String]) -> Result<Vec<TimeOfDay>, InvalidReminderError> {
    let times = values
        .iter()
        .map(|value| value.trim().parse::<TimeOfDay>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(normalize_reminder_times(times))
}

pub fn parse_weekday(value: &str) -> Result<Weekday, InvalidReminderError> {
    match value.trim().to_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(InvalidReminderError::Weekday(value.to_string())),
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn parse_reminder_days(values: &[String]) -> Result<HashSet<Weekday>, InvalidReminderError> {
    values.iter().map(|value| parse_weekday(value)).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_times_of_day() {
        let valid_times = vec!["00:00", "8:00", "08:00", "09:30", "23:59", "12:05"];

        for time in &valid_times {
            assert!(time.parse::<TimeOfDay>().is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_times_of_day() {
        let invalid_times = vec!["", "8", "24:00", "08:60", "8:5:0", "ten:30", "-1:30"];

        for time in &invalid_times {
            assert!(time.parse::<TimeOfDay>().is_err());
        }
    }

    #[test]
    fn it_formats_times_of_day_zero_padded() {
        let time = "8:5".parse::<TimeOfDay>().unwrap();
        assert_eq!(time.to_string(), "08:05");
    }

    #[test]
    fn it_orders_and_dedups_reminder_times() {
        let times = vec!["20:00".into(), "08:00".into(), "20:00".into()];
        let times = parse_reminder_times(&times).unwrap();
        assert_eq!(
            times,
            vec![
                TimeOfDay::new(8, 0).unwrap(),
                TimeOfDay::new(20, 0).unwrap()
            ]
        );
    }

    #[test]
    fn it_rejects_malformed_reminder_times_instead_of_dropping_them() {
        let times = vec!["08:00".into(), "25:00".into()];
        assert!(parse_reminder_times(&times).is_err());
    }

    #[test]
    fn it_parses_weekday_names() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("sunday").unwrap(), Weekday::Sun);
        assert!(parse_weekday("Mondays").is_err());
        assert!(parse_weekday("").is_err());
    }

    #[test]
    fn it_parses_reminder_day_sets() {
        let days = vec!["Monday".into(), "Friday".into(), "Monday".into()];
        let days = parse_reminder_days(&days).unwrap();
        assert_eq!(days.len(), 2);
        assert!(days.contains(&Weekday::Mon));
        assert!(days.contains(&Weekday::Fri));
    }

    #[test]
    fn it_roundtrips_frequency_tokens() {
        for token in &["daily", "twice_daily", "weekly"] {
            let freq = token.parse::<ReminderFrequency>().unwrap();
            assert_eq!(&freq.to_string(), token);
        }
        assert!("monthly".parse::<ReminderFrequency>().is_err());
    }
}
