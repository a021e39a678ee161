mod email;

pub use email::{EmailApiSender, INotificationSender, NoopNotificationSender, ReminderEmail};
