use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const CONSULTATION_ID_PREFIX: &str = "CONS";
pub const DEFAULT_SOURCE: &str = "website-consultation-form";

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
pub const CORS_MAX_AGE_SECS: &str = "86400";
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; frame-ancestors 'none'";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub const NEXT_STEPS: [&str; 4] = [
    "Our product specialist will review your project details",
    "We will contact you using your preferred contact method",
    "We will arrange a free consultation at a time that suits you",
    "You will receive a tailored quote with product samples on request",
];

pub const ALTERNATIVE_OPTIONS: [&str; 3] = [
    "Call us directly during business hours",
    "Email us your project details",
    "Visit our showroom for an in-person consultation",
];
