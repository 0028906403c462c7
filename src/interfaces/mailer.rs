use async_trait::async_trait;
use serde::Serialize;

use crate::errors::EmailError;

/// One outbound transactional message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub id: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError>;
}
