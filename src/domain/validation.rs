use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::{
    constants::DEFAULT_SOURCE,
    entities::consultation::{ContactMethod, ConsultationData, ConsultationRequest, RequestMeta},
};

const MIN_NAME_LENGTH: usize = 2;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern is valid"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));
// E.164 or UK local form, after separators are stripped. ASCII digits only
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+[0-9]{10,15}|0[0-9]{9,14})$").expect("phone pattern is valid"));

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Trimmed, non-empty value of an optional form field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn validate_full_name(name: Option<&str>) -> Result<(), ValidationError> {
    match name {
        None => Err(field_error("required", "Full name is required")),
        Some(n) if n.chars().count() < MIN_NAME_LENGTH => Err(field_error(
            "length",
            "Full name must be at least 2 characters",
        )),
        Some(n) if !NAME_RE.is_match(n) => Err(field_error(
            "pattern",
            "Full name can only contain letters, spaces, hyphens and apostrophes",
        )),
        Some(_) => Ok(()),
    }
}

pub fn validate_email(email: Option<&str>) -> Result<(), ValidationError> {
    match email {
        None => Err(field_error("required", "Email address is required")),
        Some(e) if !EMAIL_RE.is_match(e) => {
            Err(field_error("email", "Please enter a valid email address"))
        }
        Some(_) => Ok(()),
    }
}

/// Strips spaces, hyphens and parentheses before matching.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

pub fn validate_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    match phone {
        None => Err(field_error("required", "Phone number is required")),
        Some(p) if !PHONE_RE.is_match(&normalize_phone(p)) => Err(field_error(
            "phone",
            "Please enter a valid UK or international phone number",
        )),
        Some(_) => Ok(()),
    }
}

fn require(value: Option<&str>, message: &'static str) -> Result<(), ValidationError> {
    value.map(|_| ()).ok_or_else(|| field_error("required", message))
}

/// Checks every field and reports all failures together, then builds the
/// normalized [`ConsultationData`].
pub fn validate_consultation_data(
    request: &ConsultationRequest,
    meta: RequestMeta,
) -> Result<ConsultationData, ValidationErrors> {
    let full_name = present(&request.full_name);
    let email = present(&request.email);
    let phone = present(&request.phone);
    let project_type = present(&request.project_type);
    let budget = present(&request.budget);
    let timeline = present(&request.timeline);

    let checks = [
        ("fullName", validate_full_name(full_name)),
        ("email", validate_email(email)),
        ("phone", validate_phone(phone)),
        ("projectType", require(project_type, "Please select a project type")),
        ("budget", require(budget, "Please select a budget range")),
        ("timeline", require(timeline, "Please select a project timeline")),
    ];

    let mut errors = ValidationErrors::new();
    for (field, result) in checks {
        if let Err(e) = result {
            errors.add(field, e);
        }
    }

    let (
        Some(full_name),
        Some(email),
        Some(phone),
        Some(project_type),
        Some(budget),
        Some(timeline),
    ) = (full_name, email, phone, project_type, budget, timeline)
    else {
        return Err(errors);
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ConsultationData {
        full_name: full_name.to_string(),
        email: email.to_lowercase(),
        phone: phone.to_string(),
        company: present(&request.company).map(str::to_string),
        project_type: project_type.to_string(),
        budget: budget.to_string(),
        timeline: timeline.to_string(),
        message: present(&request.message).map(str::to_string),
        preferred_contact_method: ContactMethod::parse(request.preferred_contact_method.as_deref()),
        hear_about_us: present(&request.hear_about_us).map(str::to_string),
        submitted_at: Utc::now(),
        source: present(&request.source)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        ip_address: meta.ip_address,
        user_agent: meta.user_agent,
    })
}
