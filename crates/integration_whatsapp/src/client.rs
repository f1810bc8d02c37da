//! WhatsApp client for sending messages
//!
//! Uses the Meta Graph API messages endpoint for both text replies and the
//! typing indicator.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// WhatsApp API errors
#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: i32, message: String },

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Missing configuration: {0}")]
    Configuration(String),
}

/// WhatsApp client configuration
#[derive(Debug, Clone)]
pub struct WhatsAppClientConfig {
    /// Meta Graph API access token
    pub access_token: String,
    /// Phone number ID from WhatsApp Business
    pub phone_number_id: String,
    /// API version (default: v18.0)
    pub api_version: String,
    /// Graph API base URL (default: https://graph.facebook.com)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WhatsAppClientConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            phone_number_id: String::new(),
            api_version: "v18.0".to_string(),
            base_url: "https://graph.facebook.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// WhatsApp client for the Meta Graph API
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: Client,
    access_token: String,
    messages_url: String,
}

/// Message send request
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    msg_type: &'static str,
    text: TextContent<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<TypingAction>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct TypingAction {
    #[serde(rename = "type")]
    action_type: &'static str,
}

/// API response for sent message
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    /// Ids of the created messages
    #[serde(default)]
    pub messages: Vec<MessageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct MessageInfo {
    pub id: String,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: i32,
    message: String,
}

impl WhatsAppClient {
    /// Create a new WhatsApp client
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, WhatsAppError> {
        if config.access_token.is_empty() {
            return Err(WhatsAppError::Configuration(
                "access_token is required".to_string(),
            ));
        }
        if config.phone_number_id.is_empty() {
            return Err(WhatsAppError::Configuration(
                "phone_number_id is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let messages_url = format!(
            "{}/{}/{}/messages",
            config.base_url.trim_end_matches('/'),
            config.api_version,
            config.phone_number_id
        );

        Ok(Self {
            client,
            access_token: config.access_token,
            messages_url,
        })
    }

    /// Endpoint every outbound call is posted to
    #[must_use]
    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    /// Send a text message
    #[instrument(skip(self, message), fields(to = %to))]
    pub async fn send_message(
        &self,
        to: &str,
        message: &str,
    ) -> Result<SendMessageResponse, WhatsAppError> {
        debug!(message_len = message.len(), "Sending WhatsApp message");

        self.post(&SendMessageRequest {
            messaging_product: "whatsapp",
            to,
            msg_type: "text",
            text: TextContent { body: message },
            action: None,
        })
        .await
    }

    /// Show a typing indicator to `to`
    ///
    /// Sent as an empty text message carrying a `typing_on` action.
    #[instrument(skip(self), fields(to = %to))]
    pub async fn send_typing_indicator(
        &self,
        to: &str,
    ) -> Result<SendMessageResponse, WhatsAppError> {
        debug!("Sending WhatsApp typing indicator");

        self.post(&SendMessageRequest {
            messaging_product: "whatsapp",
            to,
            msg_type: "text",
            text: TextContent { body: "" },
            action: Some(TypingAction {
                action_type: "typing_on",
            }),
        })
        .await
    }

    async fn post(
        &self,
        request: &SendMessageRequest<'_>,
    ) -> Result<SendMessageResponse, WhatsAppError> {
        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(error) => Err(WhatsAppError::Api {
                code: error.error.code,
                message: error.error.message,
            }),
            Err(_) => Err(WhatsAppError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
