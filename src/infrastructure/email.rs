pub mod resend;
pub mod templates;
