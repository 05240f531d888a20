//! Schema-constrained itinerary generation over the OpenAI Responses API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::services::itinerary_schema::{ItinerarySchema, SCHEMA_NAME};

const SYSTEM_PROMPT: &str = "You are a professional travel planner.";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid generation endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("generation provider answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("generation provider refused: {0}")]
    Refused(String),
    #[error("generation provider returned no text output")]
    MissingOutput,
    #[error("generated text is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    /// Requests an itinerary for `city` shaped by `schema` and returns the
    /// parsed JSON document.
    async fn generate(
        &self,
        city: &str,
        schema: &ItinerarySchema,
    ) -> Result<Value, GenerationError>;
}

pub fn user_prompt(city: &str, days: u32) -> String {
    format!(
        "Create a {}-day travel itinerary for {} in strict JSON format.",
        days, city
    )
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage>,
    text: TextOptions,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: Vec<InputContent>,
}

#[derive(Debug, Serialize)]
struct InputContent {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl InputMessage {
    fn new(role: &'static str, text: String) -> Self {
        Self {
            role,
            content: vec![InputContent {
                kind: "input_text",
                text,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: TextFormat,
}

#[derive(Debug, Serialize)]
struct TextFormat {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl ResponsesResponse {
    /// Concatenates every `output_text` fragment, the way SDKs expose `output_text`.
    fn output_text(&self) -> Result<String, GenerationError> {
        let mut text = String::new();
        for content in self.output.iter().flat_map(|item| &item.content) {
            match content.kind.as_str() {
                "output_text" => text.push_str(content.text.as_deref().unwrap_or_default()),
                "refusal" => {
                    return Err(GenerationError::Refused(
                        content.refusal.clone().unwrap_or_default(),
                    ))
                }
                _ => {}
            }
        }

        if text.trim().is_empty() {
            return Err(GenerationError::MissingOutput);
        }
        Ok(text)
    }

    fn document(&self) -> Result<Value, GenerationError> {
        Ok(serde_json::from_str(&self.output_text()?)?)
    }
}

#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    responses_url: Url,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(
        base_url: &Url,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            responses_url: base_url.join("responses")?,
            api_key,
            model,
        })
    }

    fn build_request<'a>(&'a self, city: &str, schema: &ItinerarySchema) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: &self.model,
            input: vec![
                InputMessage::new("system", SYSTEM_PROMPT.to_string()),
                InputMessage::new("user", user_prompt(city, schema.day_count)),
            ],
            text: TextOptions {
                format: TextFormat {
                    name: SCHEMA_NAME,
                    kind: "json_schema",
                    schema: schema.to_json_schema(),
                },
            },
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl ItineraryGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        city: &str,
        schema: &ItinerarySchema,
    ) -> Result<Value, GenerationError> {
        let response = self
            .client
            .post(self.responses_url.clone())
            .bearer_auth(&self.api_key)
            .json(&self.build_request(city, schema))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let parsed: ResponsesResponse = response.json().await?;
        parsed.document()
    }
}
