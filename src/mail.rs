use std::future::Future;

use serde::Serialize;
use thiserror::Error;

pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Template parameters sent with every contact message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    pub to_email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailSettings {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub recipient: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MailError {
    #[error("mail delivery is not configured")]
    Unconfigured,
    #[error("mail request failed: {0}")]
    Transport(String),
    #[error("mail service answered with status {0}")]
    Rejected(u16),
}

impl MailError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Unconfigured => "mail_unconfigured",
            Self::Transport(_) => "mail_transport_failed",
            Self::Rejected(_) => "mail_rejected",
        }
    }
}

pub trait MailTransport {
    fn send(&self, message: &MailMessage) -> impl Future<Output = Result<(), MailError>>;
}

/// JSON body of an EmailJS send call.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a MailMessage,
}

impl<'a> SendRequest<'a> {
    pub fn new(settings: &'a MailSettings, message: &'a MailMessage) -> Self {
        Self {
            service_id: &settings.service_id,
            template_id: &settings.template_id,
            user_id: &settings.public_key,
            template_params: message,
        }
    }
}

/// Posts messages to the EmailJS REST endpoint.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug, PartialEq)]
pub struct EmailJsTransport {
    settings: Option<MailSettings>,
}

#[cfg(target_arch = "wasm32")]
impl EmailJsTransport {
    pub fn new(settings: Option<MailSettings>) -> Self {
        Self { settings }
    }
}

#[cfg(target_arch = "wasm32")]
impl MailTransport for EmailJsTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let settings = self.settings.as_ref().ok_or(MailError::Unconfigured)?;

        let response = gloo_net::http::Request::post(&settings.endpoint)
            .json(&SendRequest::new(settings, message))
            .map_err(|error| MailError::Transport(error.to_string()))?
            .send()
            .await
            .map_err(|error| MailError::Transport(error.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            Err(MailError::Rejected(response.status()))
        }
    }
}
