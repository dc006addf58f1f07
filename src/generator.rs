//! Prayer generation through the Gemini `generateContent` API.
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    Config, Denomination, JournalError, PrayerRequest, PrayerResponse, PrayerStyle, Result,
};

/// Something that turns a request into a structured prayer
#[async_trait]
pub trait PrayerGenerator: Send + Sync {
    async fn generate(&self, request: &PrayerRequest) -> Result<PrayerResponse>;
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

fn style_instruction(style: PrayerStyle) -> &'static str {
    match style {
        PrayerStyle::Modern => {
            "Write in simple, warm, contemporary language. Like a conversation with a close \
             friend. Avoid archaic words."
        }
        PrayerStyle::Classic => {
            "Write in a solemn, liturgical, and poetic style. Use reverence similar to the \
             Psalms. (For English use formal language if appropriate; For Russian use high style)."
        }
        PrayerStyle::Short => {
            "Keep the prayer extremely concise (max 3-4 short sentences). Focus strictly on the \
             core request. Micro-prayer format."
        }
    }
}

fn denomination_instruction(denomination: Denomination) -> &'static str {
    match denomination {
        Denomination::Orthodox => {
            "Reflect Eastern Orthodox Christian theology and spirituality. Focus on humility, \
             mercy, and mystery."
        }
        Denomination::Catholic => {
            "Reflect Catholic Christian tradition. You may subtly reference grace, intercession, \
             or sacramental themes if relevant."
        }
        Denomination::Protestant => {
            "Reflect Protestant/Evangelical spirituality. Focus on personal relationship, grace, \
             and scripture reliance."
        }
        Denomination::General => {
            "Use general Christian spirituality acceptable to all denominations. Focus on \
             universal biblical themes."
        }
    }
}

/// Builds the system prompt for a request
pub fn system_instruction(request: &PrayerRequest) -> String {
    format!(
        "You are a Christian prayer assistant named SoulScribe.\n\
         Your goal is to help users articulate their feelings into prayer.\n\
         Target Language: \"{language}\".\n\
         \n\
         INSTRUCTIONS:\n\
         1. Analyze the User Input to understand their emotion.\n\
         2. Compose a supportive, structured prayer based on the input.\n\
         3. Find 1 most relevant Bible verse (Synodal translation for Russian, \
         KJV/WEB for English).\n\
         4. Ensure the tone is empathetic, non-judgmental, and deeply spiritual.\n\
         \n\
         PERSONALIZATION SETTINGS:\n\
         - Tone/Style: {style}\n\
         - Tradition/Denomination: {denomination}\n",
        language = request.language.display_name(),
        style = style_instruction(request.style),
        denomination = denomination_instruction(request.denomination),
    )
}

/// JSON schema the model's answer has to follow
pub fn prayer_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A short, comforting title for the prayer (3-5 words)."
            },
            "prayer": { "type": "STRING", "description": "The content of the prayer." },
            "verse": { "type": "STRING", "description": "A relevant Bible verse text." },
            "reference": {
                "type": "STRING",
                "description": "The book, chapter, and verse reference (e.g., Psalm 23:1)."
            }
        },
        "required": ["title", "prayer", "verse", "reference"]
    })
}

/// Extracts the prayer from a raw `generateContent` response body
pub fn parse_generation_response(body: &str) -> Result<PrayerResponse> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        JournalError::Generation {
            message: format!("unexpected response body: {}", e),
        }
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(JournalError::Generation {
            message: "no response from model".to_string(),
        });
    }

    serde_json::from_str(&text).map_err(|e| JournalError::Generation {
        message: format!("model returned malformed prayer: {}", e),
    })
}

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: &str, api_base: &str, model: &str, temperature: f32) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    /// Builds a client from config, failing if no API key is available
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with_key(config, config.api_key())
    }

    /// Builds a client from config with an already resolved API key
    pub fn from_config_with_key(config: &Config, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| JournalError::ConfigError {
            message: "no API key configured; set API_KEY or api_key in the config file"
                .to_string(),
        })?;
        Ok(Self::new(
            &api_key,
            &config.api_base,
            &config.model,
            config.temperature,
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(&self, request: &PrayerRequest) -> GenerateRequest {
        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction(request),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.user_input.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prayer_schema(),
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl PrayerGenerator for GeminiClient {
    async fn generate(&self, request: &PrayerRequest) -> Result<PrayerResponse> {
        info!(
            "Generating {} prayer ({}, {}) with {}",
            request.language, request.style, request.denomination, self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| {
                error!("Error generating prayer: {}", e);
                JournalError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Generation API returned {}: {}", status, body);
            return Err(JournalError::Generation {
                message: format!("API error {}", status),
            });
        }

        debug!("Received {} bytes from generation API", body.len());
        parse_generation_response(&body)
    }
}
