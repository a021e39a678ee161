use crate::config::Config;
use serde::Serialize;
use tracing::info;

/// Content of one reminder notification, addressed and ready to deliver.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Delivers reminder notifications. Injected into the context so that the
/// dispatch loop can be tested without a mail provider.
#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()>;
}

/// Sender that POSTs the email as JSON to an HTTP email delivery API.
pub struct EmailApiSender {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl EmailApiSender {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[async_trait::async_trait]
impl INotificationSender for EmailApiSender {
    async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()> {
        let body = SendEmailBody {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
        };

        let mut req = self.client.post(&self.api_url).json(&body);
        if let Some(api_key) = &self.api_key {
            req = req.header("docucare-email-api-key", api_key);
        }
        req.send().await?.error_for_status()?;

        Ok(())
    }
}

/// Sender that drops all notifications, for tests and environments
/// without a configured email delivery API.
pub struct NoopNotificationSender {}

#[async_trait::async_trait]
impl INotificationSender for NoopNotificationSender {
    async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()> {
        info!("Dropping reminder email to: {}", email.to);
        Ok(())
    }
}
