use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docucare_reminders_api_structs::get_medications_by_user::*;
use docucare_reminders_domain::{Medication, ID};
use docucare_reminders_infra::DocucareContext;

pub async fn get_medications_by_user_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let usecase = GetMedicationsByUserUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|medications| HttpResponse::Ok().json(APIResponse::new(medications)))
        .map_err(DocucareError::from)
}

#[derive(Debug)]
pub struct GetMedicationsByUserUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
}

impl From<UseCaseError> for DocucareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetMedicationsByUserUseCase {
    type Response = Vec<Medication>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetMedicationsByUser";

    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }

        Ok(ctx.repos.medications.find_by_user(&self.user_id).await)
    }
}
