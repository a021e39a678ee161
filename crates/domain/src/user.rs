use crate::shared::entity::{Entity, ID};

/// The owner of medications. The email is the recipient address for
/// reminder notifications, a user without one is skipped by the dispatcher.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub email: Option<String>,
}

impl User {
    pub fn new(email: Option<String>) -> Self {
        Self {
            id: Default::default(),
            email,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
