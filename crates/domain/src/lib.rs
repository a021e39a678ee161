mod medication;
mod reminder;
mod shared;
mod user;

pub use medication::Medication;
pub use reminder::{
    normalize_reminder_times, parse_reminder_days, parse_reminder_times, parse_weekday,
    weekday_name, InvalidReminderError, ReminderFrequency, TimeOfDay,
};
pub use shared::entity::{Entity, ID};
pub use user::User;
