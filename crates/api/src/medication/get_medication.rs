use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docucare_reminders_api_structs::get_medication::*;
use docucare_reminders_domain::{Medication, ID};
use docucare_reminders_infra::DocucareContext;

pub async fn get_medication_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let usecase = GetMedicationUseCase {
        medication_id: path_params.medication_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|medication| HttpResponse::Ok().json(APIResponse::new(medication)))
        .map_err(DocucareError::from)
}

#[derive(Debug)]
pub struct GetMedicationUseCase {
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
impl UseCase for GetMedicationUseCase {
    type Response = Medication;
    type Error = UseCaseError;

    const NAME: &'static str = "GetMedication";

    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .medications
            .find(&self.medication_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.medication_id.clone()))
    }
}
