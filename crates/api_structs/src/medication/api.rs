use docucare_reminders_domain::{Medication, ReminderFrequency, TimeOfDay, ID};
use serde::{Deserialize, Serialize};

use crate::dtos::MedicationDTO;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationResponse {
    pub medication: MedicationDTO,
}

impl MedicationResponse {
    pub fn new(medication: Medication) -> Self {
        Self {
            medication: MedicationDTO::new(medication),
        }
    }
}

pub mod create_medication {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        #[serde(default)]
        pub dosage: Option<String>,
        #[serde(default)]
        pub frequency: Option<String>,
        #[serde(default)]
        pub instructions: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
        #[serde(default)]
        pub reminder_frequency: Option<ReminderFrequency>,
        #[serde(default)]
        pub reminder_times: Vec<TimeOfDay>,
        /// Full weekday names, e.g. "Monday"
        #[serde(default)]
        pub reminder_days: Vec<String>,
    }

    pub type APIResponse = MedicationResponse;
}

pub mod get_medication {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub medication_id: ID,
    }

    pub type APIResponse = MedicationResponse;
}

pub mod get_medications_by_user {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub medications: Vec<MedicationDTO>,
    }

    impl APIResponse {
        pub fn new(medications: Vec<Medication>) -> Self {
            Self {
                medications: medications.into_iter().map(MedicationDTO::new).collect(),
            }
        }
    }
}

pub mod update_medication {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub medication_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub dosage: Option<String>,
        #[serde(default)]
        pub frequency: Option<String>,
        #[serde(default)]
        pub instructions: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
        #[serde(default)]
        pub is_active: Option<bool>,
        #[serde(default)]
        pub reminder_frequency: Option<ReminderFrequency>,
        #[serde(default)]
        pub reminder_times: Option<Vec<TimeOfDay>>,
        #[serde(default)]
        pub reminder_days: Option<Vec<String>>,
    }

    pub type APIResponse = MedicationResponse;
}

pub mod delete_medication {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub medication_id: ID,
    }

    pub type APIResponse = MedicationResponse;
}
