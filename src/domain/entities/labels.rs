//! Display labels for the coded select values on the consultation form.
//!
//! Unknown codes are shown verbatim; validation never rejects them.

use super::consultation::ContactMethod;

pub fn project_type_label(code: &str) -> &str {
    match code {
        "wall-panels" => "Wall Panels",
        "flooring" => "Flooring",
        "smart-home" => "Smart Home Devices",
        "full-renovation" => "Full Renovation",
        "commercial" => "Commercial Project",
        "other" => "Other",
        _ => code,
    }
}

pub fn budget_label(code: &str) -> &str {
    match code {
        "under-5k" => "Under £5,000",
        "5k-15k" => "£5,000 - £15,000",
        "15k-30k" => "£15,000 - £30,000",
        "30k-50k" => "£30,000 - £50,000",
        "over-50k" => "Over £50,000",
        _ => code,
    }
}

pub fn timeline_label(code: &str) -> &str {
    match code {
        "asap" => "As soon as possible",
        "1-3-months" => "Within 1-3 months",
        "3-6-months" => "Within 3-6 months",
        "6-12-months" => "Within 6-12 months",
        "flexible" => "Flexible / just researching",
        _ => code,
    }
}

pub fn hear_about_us_label(code: &str) -> &str {
    match code {
        "google" => "Google search",
        "social-media" => "Social media",
        "referral" => "Friend or colleague referral",
        "showroom" => "Visited our showroom",
        "trade-show" => "Trade show",
        "other" => "Other",
        _ => code,
    }
}

pub fn contact_method_label(method: ContactMethod) -> &'static str {
    match method {
        ContactMethod::Email => "Email",
        ContactMethod::Phone => "Phone",
    }
}
