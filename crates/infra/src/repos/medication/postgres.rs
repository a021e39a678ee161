use super::IMedicationRepo;
use docucare_reminders_domain::{
    parse_reminder_days, parse_reminder_times, weekday_name, Medication, ReminderFrequency, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::warn;

pub struct PostgresMedicationRepo {
    pool: PgPool,
}

impl PostgresMedicationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MedicationRaw {
    medication_uid: Uuid,
    user_uid: Uuid,
    name: String,
    dosage: Option<String>,
    frequency: Option<String>,
    instructions: Option<String>,
    notes: Option<String>,
    is_active: bool,
    reminder_frequency: Option<String>,
    reminder_times: Vec<String>,
    reminder_days: Vec<String>,
    last_reminder_sent: Option<i64>,
}

impl TryFrom<MedicationRaw> for Medication {
    type Error = anyhow::Error;

    fn try_from(raw: MedicationRaw) -> anyhow::Result<Self> {
        let reminder_frequency = raw
            .reminder_frequency
            .as_deref()
            .map(|f| f.parse::<ReminderFrequency>())
            .transpose()?;
        Ok(Self {
            id: raw.medication_uid.into(),
            user_id: raw.user_uid.into(),
            name: raw.name,
            dosage: raw.dosage,
            frequency: raw.frequency,
            instructions: raw.instructions,
            notes: raw.notes,
            is_active: raw.is_active,
            reminder_frequency,
            reminder_times: parse_reminder_times(&raw.reminder_times)?,
            reminder_days: parse_reminder_days(&raw.reminder_days)?,
            last_reminder_sent: raw.last_reminder_sent,
        })
    }
}

fn reminder_times_raw(medication: &Medication) -> Vec<String> {
    medication
        .reminder_times
        .iter()
        .map(|time| time.to_string())
        .collect()
}

fn reminder_days_raw(medication: &Medication) -> Vec<String> {
    medication
        .reminder_days
        .iter()
        .map(|day| weekday_name(*day).to_string())
        .collect()
}

#[async_trait::async_trait]
impl IMedicationRepo for PostgresMedicationRepo {
    async fn insert(&self, medication: &Medication) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO medications
            (medication_uid, user_uid, name, dosage, frequency, instructions, notes,
             is_active, reminder_frequency, reminder_times, reminder_days, last_reminder_sent)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(medication.id.inner_ref())
        .bind(medication.user_id.inner_ref())
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(&medication.frequency)
        .bind(&medication.instructions)
        .bind(&medication.notes)
        .bind(medication.is_active)
        .bind(medication.reminder_frequency.map(|f| f.to_string()))
        .bind(reminder_times_raw(medication))
        .bind(reminder_days_raw(medication))
        .bind(medication.last_reminder_sent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, medication: &Medication) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE medications
            SET name = $2,
            dosage = $3,
            frequency = $4,
            instructions = $5,
            notes = $6,
            is_active = $7,
            reminder_frequency = $8,
            reminder_times = $9,
            reminder_days = $10,
            last_reminder_sent = $11
            WHERE medication_uid = $1
            "#,
        )
        .bind(medication.id.inner_ref())
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(&medication.frequency)
        .bind(&medication.instructions)
        .bind(&medication.notes)
        .bind(medication.is_active)
        .bind(medication.reminder_frequency.map(|f| f.to_string()))
        .bind(reminder_times_raw(medication))
        .bind(reminder_days_raw(medication))
        .bind(medication.last_reminder_sent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, medication_id: &ID) -> Option<Medication> {
        let raw = sqlx::query_as::<_, MedicationRaw>(
            r#"
            SELECT * FROM medications AS m
            WHERE m.medication_uid = $1
            "#,
        )
        .bind(medication_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()?;

        match Medication::try_from(raw) {
            Ok(medication) => Some(medication),
            Err(e) => {
                warn!(
                    "Medication: {} has malformed reminder configuration: {:?}",
                    medication_id, e
                );
                None
            }
        }
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Medication> {
        let raws = sqlx::query_as::<_, MedicationRaw>(
            r#"
            SELECT * FROM medications AS m
            WHERE m.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        raws.into_iter()
            .filter_map(|raw| match Medication::try_from(raw) {
                Ok(medication) => Some(medication),
                Err(e) => {
                    warn!("Skipping malformed medication row: {:?}", e);
                    None
                }
            })
            .collect()
    }

    async fn find_all_active(&self) -> anyhow::Result<Vec<Medication>> {
        let raws = sqlx::query_as::<_, MedicationRaw>(
            r#"
            SELECT * FROM medications AS m
            WHERE m.is_active = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        raws.into_iter()
            .map(Medication::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
    }

    async fn mark_reminder_sent(&self, medication_id: &ID, timestamp: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE medications
            SET last_reminder_sent = $2
            WHERE medication_uid = $1
            AND (last_reminder_sent IS NULL OR last_reminder_sent <= $2)
            "#,
        )
        .bind(medication_id.inner_ref())
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, medication_id: &ID) -> Option<Medication> {
        let raw = sqlx::query_as::<_, MedicationRaw>(
            r#"
            DELETE FROM medications AS m
            WHERE m.medication_uid = $1
            RETURNING *
            "#,
        )
        .bind(medication_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()?;

        Medication::try_from(raw).ok()
    }
}
