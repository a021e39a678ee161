use crate::error::DocucareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::TimeZone;
use docucare_reminders_api_structs::send_reminders::APIResponse;
use docucare_reminders_domain::{Medication, TimeOfDay, User};
use docucare_reminders_infra::{DocucareContext, ReminderEmail};
use std::collections::HashMap;
use tracing::{error, warn};

pub async fn send_reminders_controller(
    ctx: web::Data<DocucareContext>,
) -> Result<HttpResponse, DocucareError> {
    let usecase = SendRemindersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|report| {
            HttpResponse::Ok().json(APIResponse {
                message: format!("Reminder check completed. {} emails sent.", report.sent),
                evaluated: report.evaluated,
                sent: report.sent,
                failures: report.failures,
            })
        })
        .map_err(DocucareError::from)
}

/// Runs one dispatch cycle: decides for every active medication whether a
/// reminder is due right now and sends at most one notification per
/// medication. One medication failing never affects its siblings.
#[derive(Debug)]
pub struct SendRemindersUseCase {}

#[derive(Debug, Default, PartialEq)]
pub struct RemindersReport {
    pub evaluated: usize,
    pub sent: usize,
    pub failures: usize,
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

async fn get_owners_of_medications(
    medications: &[Medication],
    ctx: &DocucareContext,
) -> anyhow::Result<HashMap<String, User>> {
    let user_ids = medications
        .iter()
        .map(|m| m.user_id.clone())
        .collect::<Vec<_>>();
    let owners = ctx
        .repos
        .users
        .find_many(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.as_string(), u))
        .collect();
    Ok(owners)
}

fn compose_email(medication: &Medication, recipient: &str, matched_time: TimeOfDay) -> ReminderEmail {
    let dosage = medication.dosage.as_deref().unwrap_or("N/A");
    let instructions = medication.instructions.as_deref().unwrap_or("N/A");

    ReminderEmail {
        to: recipient.to_string(),
        subject: format!(
            "Medication Reminder: {} at {}",
            medication.name, matched_time
        ),
        text: format!(
            "Hi,\n\nThis is a reminder to take your {}.\nDosage: {}\nInstructions: {}\n\nBest regards,\nDocuCare AI",
            medication.name, dosage, instructions
        ),
        html: format!(
            "<p>Hi,</p>\n<p>This is a reminder to take your <strong>{}</strong>.</p>\n<p><strong>Dosage:</strong> {}</p>\n<p><strong>Instructions:</strong> {}</p>\n<p>Best regards,<br/>DocuCare AI</p>",
            medication.name, dosage, instructions
        ),
    }
}

// A matched minute must produce at most one send, even when the trigger
// fires several times within it.
fn sent_within_current_minute(last_reminder_sent: Option<i64>, now: i64) -> bool {
    match last_reminder_sent {
        Some(ts) => ts / 60_000 == now / 60_000,
        None => false,
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendRemindersUseCase {
    type Response = RemindersReport;
    type Error = UseCaseError;

    const NAME: &'static str = "SendReminders";

    /// Expected to be invoked once every minute, matching is exact to the
    /// minute so less frequent invocations miss the due minutes in between.
    async fn execute(&mut self, ctx: &DocucareContext) -> Result<Self::Response, Self::Error> {
        let now_millis = ctx.sys.get_timestamp_millis();
        let now = ctx.config.timezone.timestamp_millis(now_millis);

        let medications = ctx
            .repos
            .medications
            .find_all_active()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let owners = get_owners_of_medications(&medications, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut report = RemindersReport::default();
        for medication in medications {
            report.evaluated += 1;

            let matched_time = match medication.due_reminder_at(&now) {
                Some(time) => time,
                None => continue,
            };
            if sent_within_current_minute(medication.last_reminder_sent, now_millis) {
                continue;
            }

            let recipient = owners
                .get(&medication.user_id.as_string())
                .and_then(|owner| owner.email.clone());
            let recipient = match recipient {
                Some(email) => email,
                None => {
                    warn!(
                        "No email found for owner of medication: {}. Skipping it.",
                        medication.id
                    );
                    continue;
                }
            };

            let email = compose_email(&medication, &recipient, matched_time);
            if let Err(e) = ctx.notification_sender.send(&email).await {
                error!(
                    "Error sending reminder for medication: {} : {:?}",
                    medication.id, e
                );
                report.failures += 1;
                continue;
            }
            report.sent += 1;

            if let Err(e) = ctx
                .repos
                .medications
                .mark_reminder_sent(&medication.id, now_millis)
                .await
            {
                // The email went out, so it still counts as sent
                error!(
                    "Error updating last reminder sent for medication: {} : {:?}",
                    medication.id, e
                );
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docucare_reminders_domain::{ReminderFrequency, ID};
    use docucare_reminders_infra::{IMedicationRepo, INotificationSender, ISys};
    use std::sync::{Arc, Mutex};

    struct StubSys {
        timestamp: i64,
    }
    impl ISys for StubSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.timestamp
        }
    }

    /// Records every delivered email and fails deliveries to `fail_for`
    struct RecordingSender {
        sent: Mutex<Vec<ReminderEmail>>,
        fail_for: Option<String>,
    }

    impl RecordingSender {
        fn new() -> Self {
            Self {
                sent: Mutex::new(vec![]),
                fail_for: None,
            }
        }

        fn failing_for(recipient: &str) -> Self {
            Self {
                sent: Mutex::new(vec![]),
                fail_for: Some(recipient.to_string()),
            }
        }

        fn recipients(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|email| email.to.clone())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl INotificationSender for RecordingSender {
        async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()> {
            if self.fail_for.as_deref() == Some(email.to.as_str()) {
                anyhow::bail!("Delivery rejected for recipient: {}", email.to);
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn setup_ctx(timestamp: i64, sender: Arc<RecordingSender>) -> DocucareContext {
        let mut ctx = DocucareContext::create_inmemory();
        ctx.config.timezone = chrono_tz::UTC;
        ctx.sys = Arc::new(StubSys { timestamp });
        ctx.notification_sender = sender;
        ctx
    }

    // Monday 2024-01-01 08:00:00 UTC
    fn monday_8am() -> i64 {
        use chrono::TimeZone;
        Utc.ymd(2024, 1, 1).and_hms(8, 0, 0).timestamp_millis()
    }

    async fn insert_user(ctx: &DocucareContext, email: Option<&str>) -> ID {
        let user = User::new(email.map(|e| e.to_string()));
        ctx.repos.users.insert(&user).await.unwrap();
        user.id
    }

    async fn insert_daily_medication(ctx: &DocucareContext, user_id: &ID, name: &str) -> ID {
        let mut medication = Medication::new(user_id.clone(), name.into());
        medication.reminder_frequency = Some(ReminderFrequency::Daily);
        medication.reminder_times = vec!["08:00".parse().unwrap()];
        ctx.repos.medications.insert(&medication).await.unwrap();
        medication.id
    }

    #[tokio::test]
    async fn sends_one_reminder_per_due_medication() {
        let sender = Arc::new(RecordingSender::new());
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        let medication_id = insert_daily_medication(&ctx, &user_id, "Lisinopril").await;

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(
            report,
            RemindersReport {
                evaluated: 1,
                sent: 1,
                failures: 0
            }
        );
        assert_eq!(sender.recipients(), vec!["ada@example.com".to_string()]);

        let medication = ctx.repos.medications.find(&medication_id).await.unwrap();
        assert_eq!(medication.last_reminder_sent, Some(monday_8am()));
    }

    #[tokio::test]
    async fn not_due_medications_are_evaluated_but_not_sent() {
        let sender = Arc::new(RecordingSender::new());
        // 08:01, one minute past the configured reminder time
        let ctx = setup_ctx(monday_8am() + 60_000, sender.clone());

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        insert_daily_medication(&ctx, &user_id, "Lisinopril").await;

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(
            report,
            RemindersReport {
                evaluated: 1,
                sent: 0,
                failures: 0
            }
        );
        assert!(sender.recipients().is_empty());
    }

    #[tokio::test]
    async fn inactive_medications_are_not_evaluated() {
        let sender = Arc::new(RecordingSender::new());
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        let mut medication = Medication::new(user_id, "Lisinopril".into());
        medication.is_active = false;
        medication.reminder_frequency = Some(ReminderFrequency::Daily);
        medication.reminder_times = vec!["08:00".parse().unwrap()];
        ctx.repos.medications.insert(&medication).await.unwrap();

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(report, RemindersReport::default());
        assert!(sender.recipients().is_empty());
    }

    #[tokio::test]
    async fn one_failing_delivery_does_not_abort_the_batch() {
        let sender = Arc::new(RecordingSender::failing_for("two@example.com"));
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user1 = insert_user(&ctx, Some("one@example.com")).await;
        let user2 = insert_user(&ctx, Some("two@example.com")).await;
        let user3 = insert_user(&ctx, Some("three@example.com")).await;
        let med1 = insert_daily_medication(&ctx, &user1, "Lisinopril").await;
        let med2 = insert_daily_medication(&ctx, &user2, "Metformin").await;
        let med3 = insert_daily_medication(&ctx, &user3, "Atorvastatin").await;

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(
            report,
            RemindersReport {
                evaluated: 3,
                sent: 2,
                failures: 1
            }
        );
        assert_eq!(
            sender.recipients(),
            vec!["one@example.com".to_string(), "three@example.com".to_string()]
        );

        let med1 = ctx.repos.medications.find(&med1).await.unwrap();
        let med3 = ctx.repos.medications.find(&med3).await.unwrap();
        assert_eq!(med1.last_reminder_sent, Some(monday_8am()));
        assert_eq!(med3.last_reminder_sent, Some(monday_8am()));

        // The failed medication keeps its previous marker
        let med2 = ctx.repos.medications.find(&med2).await.unwrap();
        assert_eq!(med2.last_reminder_sent, None);
    }

    #[tokio::test]
    async fn missing_recipient_is_skipped_not_failed() {
        let sender = Arc::new(RecordingSender::new());
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user_id = insert_user(&ctx, None).await;
        insert_daily_medication(&ctx, &user_id, "Lisinopril").await;

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(
            report,
            RemindersReport {
                evaluated: 1,
                sent: 0,
                failures: 0
            }
        );
        assert!(sender.recipients().is_empty());
    }

    #[tokio::test]
    async fn repeated_trigger_within_the_same_minute_does_not_resend() {
        let sender = Arc::new(RecordingSender::new());
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        insert_daily_medication(&ctx, &user_id, "Lisinopril").await;

        let first = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(first.sent, 1);

        // Second trigger 30 seconds later, still inside the matched minute
        let mut ctx_later = ctx.clone();
        ctx_later.sys = Arc::new(StubSys {
            timestamp: monday_8am() + 30_000,
        });
        let second = execute(SendRemindersUseCase {}, &ctx_later).await.unwrap();
        assert_eq!(second.sent, 0);
        assert_eq!(sender.recipients().len(), 1);

        // The next day's matching minute sends again
        let mut ctx_next_day = ctx.clone();
        ctx_next_day.sys = Arc::new(StubSys {
            timestamp: monday_8am() + 24 * 60 * 60 * 1000,
        });
        let next_day = execute(SendRemindersUseCase {}, &ctx_next_day).await.unwrap();
        assert_eq!(next_day.sent, 1);
        assert_eq!(sender.recipients().len(), 2);
    }

    /// Medication repo whose marker update always fails
    struct MarkerFailingMedicationRepo {
        medications: Mutex<Vec<Medication>>,
    }

    #[async_trait::async_trait]
    impl IMedicationRepo for MarkerFailingMedicationRepo {
        async fn insert(&self, medication: &Medication) -> anyhow::Result<()> {
            self.medications.lock().unwrap().push(medication.clone());
            Ok(())
        }

        async fn save(&self, _medication: &Medication) -> anyhow::Result<()> {
            Ok(())
        }

        async fn find(&self, medication_id: &ID) -> Option<Medication> {
            self.medications
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == *medication_id)
                .cloned()
        }

        async fn find_by_user(&self, user_id: &ID) -> Vec<Medication> {
            self.medications
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.user_id == *user_id)
                .cloned()
                .collect()
        }

        async fn find_all_active(&self) -> anyhow::Result<Vec<Medication>> {
            Ok(self
                .medications
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.is_active)
                .cloned()
                .collect())
        }

        async fn mark_reminder_sent(
            &self,
            _medication_id: &ID,
            _timestamp: i64,
        ) -> anyhow::Result<()> {
            anyhow::bail!("Marker update rejected")
        }

        async fn delete(&self, _medication_id: &ID) -> Option<Medication> {
            None
        }
    }

    #[tokio::test]
    async fn marker_persist_failure_still_counts_the_send() {
        let sender = Arc::new(RecordingSender::new());
        let mut ctx = setup_ctx(monday_8am(), sender.clone());
        ctx.repos.medications = Arc::new(MarkerFailingMedicationRepo {
            medications: Mutex::new(vec![]),
        });

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        insert_daily_medication(&ctx, &user_id, "Lisinopril").await;

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(
            report,
            RemindersReport {
                evaluated: 1,
                sent: 1,
                failures: 0
            }
        );
        assert_eq!(sender.recipients().len(), 1);
    }

    #[tokio::test]
    async fn weekly_medication_is_due_on_configured_day_only() {
        let sender = Arc::new(RecordingSender::new());
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        let mut medication = Medication::new(user_id, "Alendronate".into());
        medication.reminder_frequency = Some(ReminderFrequency::Weekly);
        medication.reminder_times = vec!["08:00".parse().unwrap()];
        medication.reminder_days = vec![chrono::Weekday::Mon].into_iter().collect();
        ctx.repos.medications.insert(&medication).await.unwrap();

        let report = execute(SendRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(report.sent, 1);

        // Tuesday 08:00
        let mut ctx_tuesday = ctx.clone();
        ctx_tuesday.sys = Arc::new(StubSys {
            timestamp: monday_8am() + 24 * 60 * 60 * 1000,
        });
        let report = execute(SendRemindersUseCase {}, &ctx_tuesday).await.unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(sender.recipients().len(), 1);
    }

    #[tokio::test]
    async fn notification_contains_the_display_fields_and_matched_time() {
        let sender = Arc::new(RecordingSender::new());
        let ctx = setup_ctx(monday_8am(), sender.clone());

        let user_id = insert_user(&ctx, Some("ada@example.com")).await;
        let mut medication = Medication::new(user_id, "Lisinopril".into());
        medication.dosage = Some("10 mg".into());
        medication.instructions = Some("Take with water".into());
        medication.reminder_frequency = Some(ReminderFrequency::Daily);
        medication.reminder_times = vec!["08:00".parse().unwrap()];
        ctx.repos.medications.insert(&medication).await.unwrap();

        execute(SendRemindersUseCase {}, &ctx).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Medication Reminder: Lisinopril at 08:00");
        assert!(sent[0].text.contains("Dosage: 10 mg"));
        assert!(sent[0].text.contains("Instructions: Take with water"));
    }
}
