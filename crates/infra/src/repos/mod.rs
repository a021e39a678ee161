mod medication;
mod shared;
mod user;

use medication::{InMemoryMedicationRepo, PostgresMedicationRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use user::{InMemoryUserRepo, PostgresUserRepo};

pub use medication::IMedicationRepo;
pub use user::IUserRepo;

#[derive(Clone)]
pub struct Repos {
    pub medications: Arc<dyn IMedicationRepo>,
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            medications: Arc::new(PostgresMedicationRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            medications: Arc::new(InMemoryMedicationRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
        }
    }
}
