use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use rand::Rng;

use crate::{
    constants::{CONSULTATION_ID_PREFIX, NEXT_STEPS},
    email::templates::{render_admin_notification, render_customer_confirmation},
    entities::consultation::{
        ConsultationData, ConsultationDetails, ConsultationResponse, ContactInfo,
        EmailDispatchResult, EmailIds, Priority, TrackingInfo,
    },
    errors::AppError,
    mailer::{EmailMessage, EmailSender},
    settings::{AppConfig, ContactDetails},
};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 6;

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Human-shareable reference such as `CONS-MGX3K2AB-4F9QZT`.
///
/// Timestamp plus six random characters: fine for people quoting it back,
/// not unique enough to deduplicate on.
pub fn generate_consultation_id() -> String {
    let timestamp = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}-{}-{}", CONSULTATION_ID_PREFIX, to_base36(timestamp), suffix).to_uppercase()
}

/// Addresses the two consultation emails are sent from and to.
#[derive(Debug, Clone)]
pub struct MailRouting {
    pub from: String,
    pub admin_email: String,
    pub contact: ContactDetails,
}

impl From<&AppConfig> for MailRouting {
    fn from(config: &AppConfig) -> Self {
        MailRouting {
            from: config.email_from.clone(),
            admin_email: config.admin_email.clone(),
            contact: config.contact_details(),
        }
    }
}

pub struct ConsultationHandler {
    pub mailer: Option<Arc<dyn EmailSender>>,
    pub routing: MailRouting,
}

impl ConsultationHandler {
    pub fn new(mailer: Option<Arc<dyn EmailSender>>, routing: MailRouting) -> Self {
        ConsultationHandler { mailer, routing }
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    /// Notifies the sales inbox, then confirms to the customer.
    ///
    /// The admin email must succeed; a failed confirmation is logged and
    /// left out of `email_ids`.
    pub async fn dispatch_emails(
        &self,
        mailer: &dyn EmailSender,
        data: &ConsultationData,
        consultation_id: &str,
        priority: Priority,
    ) -> EmailDispatchResult {
        let mut email_ids = EmailIds::default();

        let admin = render_admin_notification(data, consultation_id, priority);
        let admin_message = EmailMessage {
            from: self.routing.from.clone(),
            to: vec![self.routing.admin_email.clone()],
            subject: admin.subject,
            html: admin.html,
            text: admin.text,
            reply_to: Some(data.email.clone()),
        };

        match mailer.send(&admin_message).await {
            Ok(sent) => {
                tracing::info!(consultation_id, email_id = %sent.id, "Admin notification sent");
                email_ids.admin = Some(sent.id);
            }
            Err(e) => {
                tracing::error!(consultation_id, error = %e, "Admin notification failed");
                return EmailDispatchResult {
                    success: false,
                    consultation_id: consultation_id.to_string(),
                    email_ids,
                    error: Some(e.to_string()),
                };
            }
        }

        let customer = render_customer_confirmation(data, consultation_id, priority, &self.routing.contact);
        let customer_message = EmailMessage {
            from: self.routing.from.clone(),
            to: vec![data.email.clone()],
            subject: customer.subject,
            html: customer.html,
            text: customer.text,
            reply_to: Some(self.routing.admin_email.clone()),
        };

        match mailer.send(&customer_message).await {
            Ok(sent) => {
                tracing::info!(consultation_id, email_id = %sent.id, "Customer confirmation sent");
                email_ids.customer = Some(sent.id);
            }
            Err(e) => {
                tracing::warn!(consultation_id, error = %e, "Customer confirmation failed");
            }
        }

        EmailDispatchResult {
            success: true,
            consultation_id: consultation_id.to_string(),
            email_ids,
            error: None,
        }
    }

    /// Handles a validated consultation end to end.
    pub async fn submit_consultation(
        &self,
        data: &ConsultationData,
    ) -> Result<ConsultationResponse, AppError> {
        let mailer = self.mailer.as_deref().ok_or(AppError::ServiceNotConfigured)?;

        let consultation_id = generate_consultation_id();
        let priority = Priority::from_timeline(&data.timeline);

        let result = self.dispatch_emails(mailer, data, &consultation_id, priority).await;
        if !result.success {
            return Err(AppError::InternalError(
                result.error.unwrap_or_else(|| "Admin notification failed".to_string()),
            ));
        }

        tracing::info!(
            consultation_id = %consultation_id,
            priority = %priority,
            project_type = %data.project_type,
            "Consultation request processed"
        );

        let contact = &self.routing.contact;
        Ok(ConsultationResponse {
            success: true,
            message: format!(
                "Thank you, {}. Your consultation request has been received.",
                data.full_name
            ),
            reference_id: consultation_id.clone(),
            consultation_id: consultation_id.clone(),
            details: ConsultationDetails {
                consultation_id: consultation_id.clone(),
                submitted_at: data.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                priority,
                estimated_response: priority.estimated_response().to_string(),
                next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
                contact: ContactInfo {
                    phone: contact.phone.clone(),
                    email: contact.email.clone(),
                    hours: contact.hours.clone(),
                },
            },
            tracking: TrackingInfo {
                email_ids: result.email_ids,
                reference_id: consultation_id,
                tracking_enabled: true,
            },
        })
    }
}
