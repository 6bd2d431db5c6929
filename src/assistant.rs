//! Text-generation assistant used for diagnosis hints and client messages.
//!
//! The assistant is an external collaborator: both operations always return
//! text. When no API key is configured or the remote call fails, the caller
//! gets [`FALLBACK_MESSAGE`] instead of an error.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Text returned in place of generated content when generation is unavailable.
pub const FALLBACK_MESSAGE: &str =
    "Could not reach the AI assistant. Check the GEMINI_API_KEY configuration and try again.";

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Narrow interface to the text-completion collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Suggests a technical diagnosis for a printer problem.
    async fn diagnose(&self, equipment_model: &str, problem: &str) -> String;

    /// Drafts a short message telling a client about their order.
    async fn compose_client_message(
        &self,
        client_name: &str,
        equipment_model: &str,
        status: &str,
        details: &str,
    ) -> String;
}

/// Prompt sent for a diagnosis suggestion.
#[must_use]
pub fn diagnosis_prompt(equipment_model: &str, problem: &str) -> String {
    format!(
        "You are an experienced printer repair technician. \
         Equipment: {equipment_model}. Reported problem: {problem}. \
         List the most likely causes, the checks to perform and the parts that may need replacement. \
         Be concise and practical."
    )
}

/// Prompt sent for a client notification.
#[must_use]
pub fn client_message_prompt(
    client_name: &str,
    equipment_model: &str,
    status: &str,
    details: &str,
) -> String {
    format!(
        "Write a short, friendly message (suitable for WhatsApp or SMS) from a printer repair shop \
         to the client {client_name}. Their equipment {equipment_model} is now in status \"{status}\". \
         Details: {details}. Do not invent prices or dates that are not given."
    )
}

/// Assistant backed by the Google Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiAssistant {
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GeminiAssistant {
    /// Creates an assistant. A `None` or empty key makes every call return the fallback.
    #[must_use]
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            client: Client::new(),
        }
    }

    /// Creates an assistant reading `GEMINI_API_KEY` from the environment.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        Self::new(std::env::var("GEMINI_API_KEY").ok(), model)
    }

    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        )
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            return Err(Error::TextGeneration {
                message: "GEMINI_API_KEY is not configured".to_string(),
            });
        };

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: Some(prompt) }],
            }],
        };

        debug!("Sending generateContent request (model: {})", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TextGeneration {
                message: format!("status {status}: {body}"),
            });
        }

        let body: GeminiResponse = response.json().await?;
        extract_text(body)
    }

    async fn generate_or_fallback(&self, prompt: String) -> String {
        match self.generate(prompt).await {
            Ok(text) => {
                info!("Generated {} characters of text", text.len());
                text
            }
            Err(Error::TextGeneration { message }) if self.api_key.is_none() => {
                warn!("Text generation skipped: {message}");
                FALLBACK_MESSAGE.to_string()
            }
            Err(e) => {
                error!("Text generation failed: {e}");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiAssistant {
    async fn diagnose(&self, equipment_model: &str, problem: &str) -> String {
        self.generate_or_fallback(diagnosis_prompt(equipment_model, problem))
            .await
    }

    async fn compose_client_message(
        &self,
        client_name: &str,
        equipment_model: &str,
        status: &str,
        details: &str,
    ) -> String {
        self.generate_or_fallback(client_message_prompt(
            client_name,
            equipment_model,
            status,
            details,
        ))
        .await
    }
}

fn extract_text(response: GeminiResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::TextGeneration {
            message: "Empty response from Gemini".to_string(),
        });
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_missing_key_returns_fallback() {
        let assistant = GeminiAssistant::new(None, DEFAULT_MODEL);
        assert_eq!(
            assistant.diagnose("HP LaserJet P1102", "Paper jam").await,
            FALLBACK_MESSAGE
        );
        assert_eq!(
            assistant
                .compose_client_message("Ana", "HP LaserJet P1102", "Ready", "Total $120.00")
                .await,
            FALLBACK_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let assistant = GeminiAssistant::new(Some("   ".to_string()), DEFAULT_MODEL);
        assert_eq!(assistant.diagnose("Epson", "No power").await, FALLBACK_MESSAGE);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Check the "},{"text":"fuser."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "Check the fuser.");
    }

    #[test]
    fn test_extract_text_rejects_empty_response() {
        let body: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(body).unwrap_err(),
            Error::TextGeneration { message: _ }
        ));
    }

    #[test]
    fn test_prompts_mention_inputs() {
        let prompt = client_message_prompt("Ana", "Brother HL-1212", "Ready", "Total $80.00");
        assert!(prompt.contains("Ana"));
        assert!(prompt.contains("Brother HL-1212"));
        assert!(prompt.contains("\"Ready\""));
        assert!(diagnosis_prompt("Epson L3150", "Streaks").contains("Streaks"));
    }
}
