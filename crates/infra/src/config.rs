use chrono_tz::Tz;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Timezone in which reminder times and days are evaluated.
    /// Matching is exact to the minute, so this decides which wall clock
    /// the stored `HH:MM` values refer to.
    pub timezone: Tz,
    /// Email delivery API to POST reminder notifications to
    pub email_api_url: String,
    /// Optional api key sent along with every delivery request
    pub email_api_key: Option<String>,
    /// Sender address for reminder emails
    pub email_from: String,
    /// Whether the built-in minutely reminder job should run. Off by
    /// default: deployments normally let an external cron own the cadence
    /// by hitting the trigger endpoint, and only one of the two may run.
    pub enable_reminder_job: bool,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let timezone = std::env::var("REMINDER_TIMEZONE").unwrap_or_else(|_| "UTC".into());
        let timezone = match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given REMINDER_TIMEZONE: {} is not valid, falling back to UTC.",
                    timezone
                );
                chrono_tz::UTC
            }
        };

        let email_api_url = match std::env::var("EMAIL_API_URL") {
            Ok(url) => url,
            Err(_) => {
                let url = "http://localhost:8025/api/send".to_string();
                info!(
                    "Did not find EMAIL_API_URL environment variable. Using local default: {}",
                    url
                );
                url
            }
        };
        let email_api_key = std::env::var("EMAIL_API_KEY").ok();
        let email_from =
            std::env::var("EMAIL_FROM").unwrap_or_else(|_| "reminders@docucare.ai".into());

        let enable_reminder_job = std::env::var("REMINDER_JOB_ENABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            port,
            timezone,
            email_api_url,
            email_api_key,
            email_from,
            enable_reminder_job,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
