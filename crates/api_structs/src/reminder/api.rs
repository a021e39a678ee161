use serde::{Deserialize, Serialize};

pub mod send_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
        pub evaluated: usize,
        pub sent: usize,
        pub failures: usize,
    }
}
