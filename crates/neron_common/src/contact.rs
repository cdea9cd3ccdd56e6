//! Contact form delivery.
//!
//! Transports are tried in order; the first success wins. When all of them
//! fail (or none is configured) the caller gets a pre-filled `mailto:` link
//! instead, so a message is never lost to a misconfiguration.

use crate::config::{ContactConfig, EmailJsConfig, FormspreeConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("Invalid contact message: {0}")]
    Invalid(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Delivery rejected with HTTP {status}")]
    Rejected { status: u16 },
}

impl From<reqwest::Error> for ContactError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// May be empty.
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        if !self.email.contains('@') {
            return Err(ContactError::Invalid(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        if self.message.is_empty() {
            return Err(ContactError::Invalid("message is empty".to_string()));
        }
        Ok(())
    }

    /// Name as used in subjects, "клиента" when none was given.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "клиента"
        } else {
            &self.name
        }
    }

    pub fn subject(&self) -> String {
        format!("NeronExpert - заявка от {}", self.display_name())
    }
}

#[async_trait]
pub trait ContactTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError>;
}

/// EmailJS REST API.
pub struct EmailJsTransport {
    client: Client,
    config: EmailJsConfig,
    to_email: String,
}

impl EmailJsTransport {
    pub fn new(client: Client, config: EmailJsConfig, to_email: &str) -> Self {
        Self {
            client,
            config,
            to_email: to_email.to_string(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/api/v1.0/email/send",
            self.config.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ContactTransport for EmailJsTransport {
    fn name(&self) -> &'static str {
        "emailjs"
    }

    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        if !self.config.is_complete() {
            return Err(ContactError::MissingConfig("EmailJS"));
        }

        let body = json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": {
                "from_name": message.name,
                "from_email": message.email,
                "message": message.message,
                "to_email": self.to_email,
                "reply_to": message.email,
            }
        });

        let response = self.client.post(self.url()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Formspree form endpoint.
pub struct FormspreeTransport {
    client: Client,
    config: FormspreeConfig,
    to_email: String,
}

impl FormspreeTransport {
    pub fn new(client: Client, config: FormspreeConfig, to_email: &str) -> Self {
        Self {
            client,
            config,
            to_email: to_email.to_string(),
        }
    }
}

#[async_trait]
impl ContactTransport for FormspreeTransport {
    fn name(&self) -> &'static str {
        "formspree"
    }

    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        if self.config.form_id.trim().is_empty() {
            return Err(ContactError::MissingConfig("Formspree"));
        }

        let url = format!(
            "{}/f/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.form_id.trim()
        );
        let subject = message.subject();
        let form = [
            ("name", message.name.as_str()),
            ("email", message.email.as_str()),
            ("message", message.message.as_str()),
            ("_to", self.to_email.as_str()),
            ("_subject", subject.as_str()),
        ];

        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Pre-filled `mailto:` link for a message.
pub fn mailto_link(to_email: &str, message: &ContactMessage) -> String {
    let body = format!(
        "Имя: {}\nEmail: {}\n\nСообщение:\n{}",
        message.name, message.email, message.message
    );
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(to_email),
        urlencoding::encode(&message.subject()),
        urlencoding::encode(&body)
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { via: &'static str },
    /// Nothing got through; hand this link to the user's mail client.
    Mailto { link: String, failures: Vec<String> },
}

/// Ordered delivery chain with the mailto fallback.
pub struct ContactForm {
    transports: Vec<Box<dyn ContactTransport>>,
    to_email: String,
}

impl ContactForm {
    pub fn new(to_email: &str) -> Self {
        Self {
            transports: Vec::new(),
            to_email: to_email.to_string(),
        }
    }

    pub fn with_transport(mut self, transport: Box<dyn ContactTransport>) -> Self {
        self.transports.push(transport);
        self
    }

    /// EmailJS first, then Formspree when configured.
    pub fn from_config(config: &ContactConfig) -> Result<Self, ContactError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        let mut form = Self::new(&config.to_email).with_transport(Box::new(
            EmailJsTransport::new(client.clone(), config.emailjs.clone(), &config.to_email),
        ));
        if let Some(formspree) = &config.formspree {
            form = form.with_transport(Box::new(FormspreeTransport::new(
                client,
                formspree.clone(),
                &config.to_email,
            )));
        }
        Ok(form)
    }

    pub fn transport_names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// Validate and deliver. Only an invalid message is an error; every
    /// transport failure degrades to the mailto link.
    pub async fn submit(&self, message: &ContactMessage) -> Result<Delivery, ContactError> {
        message.validate()?;

        let mut failures = Vec::new();
        for transport in &self.transports {
            match transport.send(message).await {
                Ok(()) => {
                    info!(via = transport.name(), "contact message sent");
                    return Ok(Delivery::Sent {
                        via: transport.name(),
                    });
                }
                Err(e) => {
                    warn!("Contact delivery via {} failed: {}", transport.name(), e);
                    failures.push(format!("{}: {}", transport.name(), e));
                }
            }
        }

        Ok(Delivery::Mailto {
            link: mailto_link(&self.to_email, message),
            failures,
        })
    }
}
