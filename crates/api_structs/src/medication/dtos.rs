use docucare_reminders_domain::{weekday_name, Medication, ReminderFrequency, TimeOfDay, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDTO {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub reminder_times: Vec<TimeOfDay>,
    /// Full weekday names, Monday first
    pub reminder_days: Vec<String>,
    pub last_reminder_sent: Option<i64>,
}

impl MedicationDTO {
    pub fn new(medication: Medication) -> Self {
        let mut days = medication.reminder_days.into_iter().collect::<Vec<_>>();
        days.sort_by_key(|day| day.num_days_from_monday());

        Self {
            id: medication.id,
            user_id: medication.user_id,
            name: medication.name,
            dosage: medication.dosage,
            frequency: medication.frequency,
            instructions: medication.instructions,
            notes: medication.notes,
            is_active: medication.is_active,
            reminder_frequency: medication.reminder_frequency,
            reminder_times: medication.reminder_times,
            reminder_days: days
                .into_iter()
                .map(|day| weekday_name(day).to_string())
                .collect(),
            last_reminder_sent: medication.last_reminder_sent,
        }
    }
}
