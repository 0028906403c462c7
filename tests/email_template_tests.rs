use chrono::Utc;
use consultation_api::{
    email::templates::{render_admin_notification, render_customer_confirmation},
    entities::consultation::{ConsultationData, ContactMethod, Priority},
    settings::{AppConfig, ContactDetails},
};

fn sample_data() -> ConsultationData {
    ConsultationData {
        full_name: "Tom O'Brien".into(),
        email: "tom@example.com".into(),
        phone: "07911 123456".into(),
        company: Some("<b>Acme</b> & Sons".into()),
        project_type: "smart-home".into(),
        budget: "mystery-budget".into(),
        timeline: "1-3-months".into(),
        message: Some("<script>alert(1)</script>".into()),
        preferred_contact_method: ContactMethod::Phone,
        hear_about_us: None,
        submitted_at: Utc::now(),
        source: "website-consultation-form".into(),
        ip_address: Some("198.51.100.7".into()),
        user_agent: None,
    }
}

fn contact() -> ContactDetails {
    AppConfig::default().contact_details()
}

#[test]
fn admin_notification_carries_reference_and_priority() {
    let email = render_admin_notification(&sample_data(), "CONS-ABC-123456", Priority::High);

    assert!(email.subject.contains("CONS-ABC-123456"));
    assert!(email.subject.contains("HIGH"));
    assert!(email.text.contains("Within 24 hours"));
    assert!(email.text.contains("Smart Home Devices"));
    assert!(email.text.contains("198.51.100.7"));
}

#[test]
fn admin_notification_escapes_user_input_in_html() {
    let email = render_admin_notification(&sample_data(), "CONS-ABC-123456", Priority::High);

    assert!(!email.html.contains("<script>"));
    assert!(!email.html.contains("<b>Acme</b>"));
    assert!(email.html.contains("&lt;script&gt;"));
}

#[test]
fn unknown_codes_are_shown_verbatim() {
    let email = render_admin_notification(&sample_data(), "CONS-ABC-123456", Priority::High);

    assert!(email.text.contains("Budget: mystery-budget"));
    assert!(email.text.contains("Heard about us: -"));
}

#[test]
fn customer_confirmation_uses_contact_details() {
    let contact = contact();
    let email = render_customer_confirmation(&sample_data(), "CONS-ABC-123456", Priority::Urgent, &contact);

    assert!(email.subject.contains("CONS-ABC-123456"));
    assert!(email.text.contains("Thank you, Tom O'Brien"));
    assert!(email.text.contains("within 4-8 hours"));
    assert!(email.text.contains(&contact.phone));
    assert!(email.html.contains("CONS-ABC-123456"));
    assert!(!email.text.contains("198.51.100.7"));
}
