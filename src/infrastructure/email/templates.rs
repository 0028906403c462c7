//! HTML and plain-text bodies for the two consultation emails.
//!
//! Every user-supplied value is escaped with `ammonia::clean_text` before it
//! is placed in the HTML part.

use ammonia::clean_text;
use chrono::SecondsFormat;

use crate::{
    entities::{
        consultation::{ConsultationData, Priority},
        labels::{budget_label, contact_method_label, hear_about_us_label, project_type_label, timeline_label},
    },
    settings::ContactDetails,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn detail_rows(data: &ConsultationData) -> Vec<(&'static str, String)> {
    vec![
        ("Name", data.full_name.clone()),
        ("Email", data.email.clone()),
        ("Phone", data.phone.clone()),
        ("Company", or_dash(data.company.as_deref()).to_string()),
        ("Project type", project_type_label(&data.project_type).to_string()),
        ("Budget", budget_label(&data.budget).to_string()),
        ("Timeline", timeline_label(&data.timeline).to_string()),
        ("Preferred contact", contact_method_label(data.preferred_contact_method).to_string()),
        (
            "Heard about us",
            or_dash(data.hear_about_us.as_deref().map(hear_about_us_label)).to_string(),
        ),
    ]
}

fn html_table(rows: &[(&'static str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td style=\"padding:6px 12px;font-weight:bold;\">{}</td><td style=\"padding:6px 12px;\">{}</td></tr>",
                label,
                clean_text(value)
            )
        })
        .collect();
    format!("<table style=\"border-collapse:collapse;\">{}</table>", body)
}

fn text_lines(rows: &[(&'static str, String)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_admin_notification(
    data: &ConsultationData,
    consultation_id: &str,
    priority: Priority,
) -> RenderedEmail {
    let rows = detail_rows(data);
    let submitted = data.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let message = or_dash(data.message.as_deref());

    let subject = format!(
        "[{}] New consultation request from {} ({})",
        priority, data.full_name, consultation_id
    );

    let html = format!(
        "<h2>New consultation request</h2>\
         <p><strong>Reference:</strong> {id}<br><strong>Priority:</strong> {priority} ({response})<br><strong>Submitted:</strong> {submitted}</p>\
         {table}\
         <h3>Message</h3><p>{message}</p>\
         <p style=\"color:#666;font-size:12px;\">Source: {source} | IP: {ip} | User agent: {ua}</p>",
        id = consultation_id,
        priority = priority,
        response = priority.estimated_response(),
        submitted = submitted,
        table = html_table(&rows),
        message = clean_text(message),
        source = clean_text(&data.source),
        ip = clean_text(or_dash(data.ip_address.as_deref())),
        ua = clean_text(or_dash(data.user_agent.as_deref())),
    );

    let text = format!(
        "New consultation request\n\nReference: {id}\nPriority: {priority} ({response})\nSubmitted: {submitted}\n\n{lines}\n\nMessage:\n{message}\n\nSource: {source}\nIP: {ip}\nUser agent: {ua}\n",
        id = consultation_id,
        priority = priority,
        response = priority.estimated_response(),
        submitted = submitted,
        lines = text_lines(&rows),
        message = message,
        source = data.source,
        ip = or_dash(data.ip_address.as_deref()),
        ua = or_dash(data.user_agent.as_deref()),
    );

    RenderedEmail { subject, html, text }
}

pub fn render_customer_confirmation(
    data: &ConsultationData,
    consultation_id: &str,
    priority: Priority,
    contact: &ContactDetails,
) -> RenderedEmail {
    let subject = format!(
        "Your {} consultation request ({})",
        contact.brand_name, consultation_id
    );

    let summary = vec![
        ("Project type", project_type_label(&data.project_type).to_string()),
        ("Budget", budget_label(&data.budget).to_string()),
        ("Timeline", timeline_label(&data.timeline).to_string()),
        ("Preferred contact", contact_method_label(data.preferred_contact_method).to_string()),
    ];

    let html = format!(
        "<h2>Thank you, {name}</h2>\
         <p>We have received your consultation request. Your reference is <strong>{id}</strong>.</p>\
         <p>We aim to respond <strong>{response}</strong>.</p>\
         {table}\
         <p>Questions in the meantime? Call {phone} or email {email} ({hours}).</p>\
         <p>{brand}</p>",
        name = clean_text(&data.full_name),
        id = consultation_id,
        response = priority.estimated_response().to_lowercase(),
        table = html_table(&summary),
        phone = clean_text(&contact.phone),
        email = clean_text(&contact.email),
        hours = clean_text(&contact.hours),
        brand = clean_text(&contact.brand_name),
    );

    let text = format!(
        "Thank you, {name}\n\nWe have received your consultation request. Your reference is {id}.\nWe aim to respond {response}.\n\n{lines}\n\nQuestions in the meantime? Call {phone} or email {email} ({hours}).\n\n{brand}\n",
        name = data.full_name,
        id = consultation_id,
        response = priority.estimated_response().to_lowercase(),
        lines = text_lines(&summary),
        phone = contact.phone,
        email = contact.email,
        hours = contact.hours,
        brand = contact.brand_name,
    );

    RenderedEmail { subject, html, text }
}
