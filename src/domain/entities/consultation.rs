use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Untrusted form body as posted by the website.
///
/// Every field is optional here; presence and shape are enforced by
/// [`validate_consultation_data`](crate::validation::validate_consultation_data).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub message: Option<String>,
    pub preferred_contact_method: Option<String>,
    pub hear_about_us: Option<String>,
    pub source: Option<String>,
}

/// Caller details captured from the HTTP request rather than the form.
#[derive(Debug, Default, Clone)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Email,
    Phone,
}

impl ContactMethod {
    /// Anything other than an explicit `"phone"` falls back to email.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("phone") => ContactMethod::Phone,
            _ => ContactMethod::Email,
        }
    }
}

/// A consultation that passed validation. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub message: Option<String>,
    pub preferred_contact_method: ContactMethod,
    pub hear_about_us: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Urgent,
    High,
    Standard,
}

impl Priority {
    /// `"asap"` is urgent; any timeline mentioning `1-3` is high.
    pub fn from_timeline(timeline: &str) -> Self {
        if timeline == "asap" {
            Priority::Urgent
        } else if timeline.contains("1-3") {
            Priority::High
        } else {
            Priority::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "URGENT",
            Priority::High => "HIGH",
            Priority::Standard => "STANDARD",
        }
    }

    pub fn estimated_response(&self) -> &'static str {
        match self {
            Priority::Urgent => "Within 4-8 hours",
            Priority::High => "Within 24 hours",
            Priority::Standard => "Within 48 hours",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

/// Outcome of sending the admin notification and customer confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDispatchResult {
    pub success: bool,
    pub consultation_id: String,
    pub email_ids: EmailIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub hours: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDetails {
    pub consultation_id: String,
    pub submitted_at: String,
    pub priority: Priority,
    pub estimated_response: String,
    pub next_steps: Vec<String>,
    pub contact: ContactInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub email_ids: EmailIds,
    pub reference_id: String,
    pub tracking_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub success: bool,
    pub message: String,
    pub reference_id: String,
    pub consultation_id: String,
    pub details: ConsultationDetails,
    pub tracking: TrackingInfo,
}
