use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    errors::EmailError,
    mailer::{EmailMessage, EmailSender, SentEmail},
    settings::AppConfig,
};

/// Sends mail through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct ResendSuccess {
    id: String,
}

#[derive(Deserialize)]
struct ResendFailure {
    message: String,
}

impl ResendMailer {
    pub fn new(base_url: &str, api_key: Zeroizing<String>) -> anyhow::Result<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join("/emails"))
            .with_context(|| format!("Invalid email provider URL: {base_url}"))?;

        let client = Client::builder()
            .user_agent(concat!("consultation-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(endpoint = %endpoint, "Email provider client initialized");

        Ok(Self { client, endpoint, api_key })
    }

    /// Builds a mailer only when an API key is configured.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Option<Self>> {
        config
            .resend_api_key
            .clone()
            .map(|key| Self::new(&config.resend_base_url, key))
            .transpose()
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError> {
        let payload = ResendPayload {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
            reply_to: message.reply_to.as_deref(),
        };

        let response = self.client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: ResendSuccess = response
                .json()
                .await
                .map_err(|e| EmailError::InvalidResponse(e.to_string()))?;
            Ok(SentEmail { id: body.id })
        } else {
            let message = response
                .json::<ResendFailure>()
                .await
                .map(|f| f.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            Err(EmailError::Provider { status: status.as_u16(), message })
        }
    }
}
