use crate::reminder::{ReminderFrequency, TimeOfDay};
use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Datelike, Timelike, Weekday};
use chrono_tz::Tz;
use std::collections::HashSet;

/// A medication owned by a `User`, together with its reminder configuration.
/// The dispatcher is the only writer of `last_reminder_sent`.
#[derive(Debug, Clone)]
pub struct Medication {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub dosage: Option<String>,
    /// Free text intake description shown in notifications, e.g. "With meals"
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub reminder_frequency: Option<ReminderFrequency>,
    /// Ordered and unique. Empty means no reminder is ever due.
    pub reminder_times: Vec<TimeOfDay>,
    /// Only consulted for the `Weekly` frequency. Empty means never due.
    pub reminder_days: HashSet<Weekday>,
    /// Timestamp in millis of the last successfully dispatched reminder
    pub last_reminder_sent: Option<i64>,
}

impl Medication {
    pub fn new(user_id: ID, name: String) -> Self {
        Self {
            id: Default::default(),
            user_id,
            name,
            dosage: None,
            frequency: None,
            instructions: None,
            notes: None,
            is_active: true,
            reminder_frequency: None,
            reminder_times: Default::default(),
            reminder_days: Default::default(),
            last_reminder_sent: None,
        }
    }

    /// Returns the reminder time matching `now`, if any. Matching is exact
    /// hour:minute equality, so this has to be evaluated once per minute.
    /// `last_reminder_sent` is deliberately not consulted here, deduplication
    /// belongs to the dispatch loop.
    pub fn due_reminder_at(&self, now: &DateTime<Tz>) -> Option<TimeOfDay> {
        let frequency = self.reminder_frequency?;
        let now_time = TimeOfDay {
            hours: now.hour(),
            minutes: now.minute(),
        };
        let matched = self
            .reminder_times
            .iter()
            .find(|time| **time == now_time)
            .copied()?;

        match frequency {
            ReminderFrequency::Daily | ReminderFrequency::TwiceDaily => Some(matched),
            ReminderFrequency::Weekly => {
                if self.reminder_days.contains(&now.weekday()) {
                    Some(matched)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_due(&self, now: &DateTime<Tz>) -> bool {
        self.due_reminder_at(now).is_some()
    }
}

impl Entity for Medication {
    fn id(&self) -> &ID {
        &self.id
    }
}
