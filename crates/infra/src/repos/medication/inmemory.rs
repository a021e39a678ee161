use super::IMedicationRepo;
use crate::repos::shared::inmemory_repo::*;
use docucare_reminders_domain::{Medication, ID};

pub struct InMemoryMedicationRepo {
    medications: std::sync::Mutex<Vec<Medication>>,
}

impl InMemoryMedicationRepo {
    pub fn new() -> Self {
        Self {
            medications: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IMedicationRepo for InMemoryMedicationRepo {
    async fn insert(&self, medication: &Medication) -> anyhow::Result<()> {
        insert(medication, &self.medications);
        Ok(())
    }

    async fn save(&self, medication: &Medication) -> anyhow::Result<()> {
        save(medication, &self.medications);
        Ok(())
    }

    async fn find(&self, medication_id: &ID) -> Option<Medication> {
        find(medication_id, &self.medications)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Medication> {
        find_by(&self.medications, |medication| {
            medication.user_id == *user_id
        })
    }

    async fn find_all_active(&self) -> anyhow::Result<Vec<Medication>> {
        Ok(find_by(&self.medications, |medication| medication.is_active))
    }

    async fn mark_reminder_sent(&self, medication_id: &ID, timestamp: i64) -> anyhow::Result<()> {
        if let Some(mut medication) = find(medication_id, &self.medications) {
            // The marker never moves backwards
            if medication.last_reminder_sent.unwrap_or(i64::MIN) <= timestamp {
                medication.last_reminder_sent = Some(timestamp);
                save(&medication, &self.medications);
            }
        }
        Ok(())
    }

    async fn delete(&self, medication_id: &ID) -> Option<Medication> {
        delete(medication_id, &self.medications)
    }
}
