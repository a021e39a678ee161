use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docucare_reminders_api_structs::create_medication::*;
use docucare_reminders_domain::{
    normalize_reminder_times, parse_reminder_days, Medication, ReminderFrequency, TimeOfDay, ID,
};
use docucare_reminders_infra::DocucareContext;

pub async fn create_medication_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let body = body.0;
    let usecase = CreateMedicationUseCase {
        user_id: path_params.user_id.clone(),
        name: body.name,
        dosage: body.dosage,
        frequency: body.frequency,
        instructions: body.instructions,
        notes: body.notes,
        reminder_frequency: body.reminder_frequency,
        reminder_times: body.reminder_times,
        reminder_days: body.reminder_days,
    };

    execute(usecase, &ctx)
        .await
        .map(|medication| HttpResponse::Created().json(APIResponse::new(medication)))
        .map_err(DocucareError::from)
}

#[derive(Debug)]
pub struct CreateMedicationUseCase {
    pub user_id: ID,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub reminder_times: Vec<TimeOfDay>,
    pub reminder_days: Vec<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
    UserNotFound(ID),
    InvalidReminderDays(String),
}

impl From<UseCaseError> for DocucareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::InvalidReminderDays(msg) => Self::BadClientData(msg),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateMedicationUseCase {
    type Response = Medication;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateMedication";

    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }

        let reminder_days = parse_reminder_days(&self.reminder_days)
            .map_err(|e| UseCaseError::InvalidReminderDays(e.to_string()))?;

        let mut medication = Medication::new(self.user_id.clone(), self.name.clone());
        medication.dosage = self.dosage.clone();
        medication.frequency = self.frequency.clone();
        medication.instructions = self.instructions.clone();
        medication.notes = self.notes.clone();
        medication.reminder_frequency = self.reminder_frequency;
        medication.reminder_times = normalize_reminder_times(self.reminder_times.clone());
        medication.reminder_days = reminder_days;

        ctx.repos
            .medications
            .insert(&medication)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(medication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docucare_reminders_domain::User;

    #[tokio::test]
    async fn rejects_unknown_user() {
        let ctx = DocucareContext::create_inmemory();

        let usecase = CreateMedicationUseCase {
            user_id: Default::default(),
            name: "Lisinopril".into(),
            dosage: None,
            frequency: None,
            instructions: None,
            notes: None,
            reminder_frequency: None,
            reminder_times: vec![],
            reminder_days: vec![],
        };

        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_malformed_reminder_days() {
        let ctx = DocucareContext::create_inmemory();
        let user = User::new(Some("ada@example.com".into()));
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateMedicationUseCase {
            user_id: user.id.clone(),
            name: "Alendronate".into(),
            dosage: None,
            frequency: None,
            instructions: None,
            notes: None,
            reminder_frequency: Some(ReminderFrequency::Weekly),
            reminder_times: vec!["09:00".parse().unwrap()],
            reminder_days: vec!["Someday".into()],
        };

        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidReminderDays(_))
        ));
    }

    #[tokio::test]
    async fn stores_reminder_times_ordered_and_unique() {
        let ctx = DocucareContext::create_inmemory();
        let user = User::new(Some("ada@example.com".into()));
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateMedicationUseCase {
            user_id: user.id.clone(),
            name: "Metformin".into(),
            dosage: None,
            frequency: None,
            instructions: None,
            notes: None,
            reminder_frequency: Some(ReminderFrequency::TwiceDaily),
            reminder_times: vec![
                "20:00".parse().unwrap(),
                "08:00".parse().unwrap(),
                "20:00".parse().unwrap(),
            ],
            reminder_days: vec![],
        };

        let medication = execute(usecase, &ctx).await.unwrap();
        assert_eq!(
            medication.reminder_times,
            vec!["08:00".parse().unwrap(), "20:00".parse().unwrap()]
        );
    }
}
