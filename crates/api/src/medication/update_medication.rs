use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docucare_reminders_api_structs::update_medication::*;
use docucare_reminders_domain::{
    normalize_reminder_times, parse_reminder_days, Medication, ReminderFrequency, TimeOfDay, ID,
};
use docucare_reminders_infra::DocucareContext;

pub async fn update_medication_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let body = body.0;
    let usecase = UpdateMedicationUseCase {
        medication_id: path_params.medication_id.clone(),
        name: body.name,
        dosage: body.dosage,
        frequency: body.frequency,
        instructions: body.instructions,
        notes: body.notes,
        is_active: body.is_active,
        reminder_frequency: body.reminder_frequency,
        reminder_times: body.reminder_times,
        reminder_days: body.reminder_days,
    };

    execute(usecase, &ctx)
        .await
        .map(|medication| HttpResponse::Ok().json(APIResponse::new(medication)))
        .map_err(DocucareError::from)
}

/// Partial update, only the provided fields are touched.
#[derive(Debug)]
pub struct UpdateMedicationUseCase {
    pub medication_id: ID,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub reminder_times: Option<Vec<TimeOfDay>>,
    pub reminder_days: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
    NotFound(ID),
    InvalidReminderDays(String),
}

impl From<UseCaseError> for DocucareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::NotFound(medication_id) => Self::NotFound(format!(
                "The medication with id: {}, was not found.",
                medication_id
            )),
            UseCaseError::InvalidReminderDays(msg) => Self::BadClientData(msg),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateMedicationUseCase {
    type Response = Medication;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateMedication";

    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        let mut medication = ctx
            .repos
            .medications
            .find(&self.medication_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.medication_id.clone()))?;

        if let Some(name) = &self.name {
            medication.name = name.clone();
        }
        if let Some(dosage) = &self.dosage {
            medication.dosage = Some(dosage.clone());
        }
        if let Some(frequency) = &self.frequency {
            medication.frequency = Some(frequency.clone());
        }
        if let Some(instructions) = &self.instructions {
            medication.instructions = Some(instructions.clone());
        }
        if let Some(notes) = &self.notes {
            medication.notes = Some(notes.clone());
        }
        if let Some(is_active) = self.is_active {
            medication.is_active = is_active;
        }
        if let Some(reminder_frequency) = self.reminder_frequency {
            medication.reminder_frequency = Some(reminder_frequency);
        }
        if let Some(reminder_times) = &self.reminder_times {
            medication.reminder_times = normalize_reminder_times(reminder_times.clone());
        }
        if let Some(reminder_days) = &self.reminder_days {
            medication.reminder_days = parse_reminder_days(reminder_days)
                .map_err(|e| UseCaseError::InvalidReminderDays(e.to_string()))?;
        }

        ctx.repos
            .medications
            .save(&medication)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(medication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docucare_reminders_domain::User;

    fn usecase_for(medication_id: ID) -> UpdateMedicationUseCase {
        UpdateMedicationUseCase {
            medication_id,
            name: None,
            dosage: None,
            frequency: None,
            instructions: None,
            notes: None,
            is_active: None,
            reminder_frequency: None,
            reminder_times: None,
            reminder_days: None,
        }
    }

    #[tokio::test]
    async fn unknown_medication_is_not_found() {
        let ctx = DocucareContext::create_inmemory();

        assert!(matches!(
            execute(usecase_for(Default::default()), &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn untouched_fields_survive_a_partial_update() {
        let ctx = DocucareContext::create_inmemory();
        let user = User::new(Some("ada@example.com".into()));
        ctx.repos.users.insert(&user).await.unwrap();

        let mut medication = Medication::new(user.id.clone(), "Lisinopril".into());
        medication.dosage = Some("10mg".into());
        ctx.repos.medications.insert(&medication).await.unwrap();

        let mut usecase = usecase_for(medication.id.clone());
        usecase.is_active = Some(false);
        let updated = execute(usecase, &ctx).await.unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.name, "Lisinopril");
        assert_eq!(updated.dosage, Some("10mg".into()));
    }

    #[tokio::test]
    async fn malformed_reminder_days_leave_the_medication_untouched() {
        let ctx = DocucareContext::create_inmemory();
        let user = User::new(Some("ada@example.com".into()));
        ctx.repos.users.insert(&user).await.unwrap();

        let medication = Medication::new(user.id.clone(), "Alendronate".into());
        ctx.repos.medications.insert(&medication).await.unwrap();

        let mut usecase = usecase_for(medication.id.clone());
        usecase.name = Some("Risedronate".into());
        usecase.reminder_days = Some(vec!["Blursday".into()]);

        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidReminderDays(_))
        ));

        let stored = ctx.repos.medications.find(&medication.id).await.unwrap();
        assert_eq!(stored.name, "Alendronate");
    }
}
