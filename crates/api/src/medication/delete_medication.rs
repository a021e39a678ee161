use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docucare_reminders_api_structs::delete_medication::*;
use docucare_reminders_domain::{Medication, ID};
use docucare_reminders_infra::DocucareContext;

pub async fn delete_medication_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let usecase = DeleteMedicationUseCase {
        medication_id: path_params.medication_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|medication| HttpResponse::Ok().json(APIResponse::new(medication)))
        .map_err(DocucareError::from)
}

#[derive(Debug)]
pub struct DeleteMedicationUseCase {
    pub medication_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for DocucareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(medication_id) => Self::NotFound(format!(
                "The medication with id: {}, was not found.",
                medication_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteMedicationUseCase {
    type Response = Medication;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteMedication";

    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .medications
            .delete(&self.medication_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.medication_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docucare_reminders_domain::User;

    #[tokio::test]
    async fn deleted_medication_is_gone() {
        let ctx = DocucareContext::create_inmemory();
        let user = User::new(Some("ada@example.com".into()));
        ctx.repos.users.insert(&user).await.unwrap();

        let medication = Medication::new(user.id.clone(), "Lisinopril".into());
        ctx.repos.medications.insert(&medication).await.unwrap();

        let usecase = DeleteMedicationUseCase {
            medication_id: medication.id.clone(),
        };
        let deleted = execute(usecase, &ctx).await.unwrap();
        assert_eq!(deleted.id, medication.id);

        assert!(ctx.repos.medications.find(&medication.id).await.is_none());
    }
}
