mod inmemory;
mod postgres;

pub use inmemory::InMemoryMedicationRepo;
pub use postgres::PostgresMedicationRepo;

use docucare_reminders_domain::{Medication, ID};

#[async_trait::async_trait]
pub trait IMedicationRepo: Send + Sync {
    async fn insert(&self, medication: &Medication) -> anyhow::Result<()>;
    async fn save(&self, medication: &Medication) -> anyhow::Result<()>;
    async fn find(&self, medication_id: &ID) -> Option<Medication>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Medication>;
    /// All medications with `is_active = true`, the evaluation set of the
    /// reminder dispatcher
    async fn find_all_active(&self) -> anyhow::Result<Vec<Medication>>;
    /// Records that a reminder went out at `timestamp` (millis). The stored
    /// marker never moves backwards.
    async fn mark_reminder_sent(&self, medication_id: &ID, timestamp: i64) -> anyhow::Result<()>;
    async fn delete(&self, medication_id: &ID) -> Option<Medication>;
}
