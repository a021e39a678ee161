use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docucare_reminders_api_structs::create_user::*;
use docucare_reminders_domain::User;
use docucare_reminders_infra::DocucareContext;

pub async fn create_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let usecase = CreateUserUseCase {
        email: body.0.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(DocucareError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub email: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for DocucareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        let user = User::new(self.email.clone());

        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_user_without_email() {
        let ctx = DocucareContext::create_inmemory();

        let user = execute(CreateUserUseCase { email: None }, &ctx)
            .await
            .unwrap();

        let found = ctx.repos.users.find(&user.id).await.unwrap();
        assert!(found.email.is_none());
    }
}
