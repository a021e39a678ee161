mod medication;
mod reminder;
mod status;
mod user;

pub mod dtos {
    pub use crate::medication::dtos::*;
    pub use crate::user::dtos::*;
}

pub use crate::medication::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::user::api::*;
