/// AI content generation client
///
/// Generates platform-ready marketing copy from a business profile and a
/// topic. The real implementation calls an OpenAI-compatible chat
/// completions endpoint; the mock produces deterministic copy so the
/// generation pipeline (retry policy included) is testable offline.
///
/// Healthcare-flagged requests get an extra system instruction covering
/// AHPRA advertising guidelines: no testimonials, no outcome guarantees,
/// no comparative claims.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Content generation failure
///
/// All variants are upstream faults; the caller decides whether to retry.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Provider returned a non-success status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider response did not contain usable content
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// What to generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Target platform (e.g. "facebook", "linkedin")
    pub platform: String,

    /// Topic or prompt from the user
    pub topic: String,

    /// Business name for context
    pub business_name: String,

    /// Industry label
    pub industry: String,

    /// Brand voice guidance, if the profile has any
    pub brand_voice: Option<String>,

    /// Whether AHPRA advertising rules apply
    pub is_healthcare: bool,
}

/// Generated copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Post body
    pub content: String,

    /// Suggested hashtags
    pub hashtags: Vec<String>,

    /// Platform the copy was written for
    pub platform: String,
}

/// Generates marketing content from a request
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Generates content for the request
    async fn generate(&self, req: &GenerationRequest) -> Result<GeneratedContent, GenerationError>;
}

/// OpenAI-compatible chat completions client
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl OpenAiGenerator {
    /// Creates a client against the default OpenAI endpoint
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the base URL (for compatible providers or test servers)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn system_prompt(req: &GenerationRequest) -> String {
        let mut prompt = format!(
            "You are a social media copywriter for {business}, an Australian {industry} \
             small business. Write a {platform} post. Respond with JSON: \
             {{\"content\": \"...\", \"hashtags\": [\"...\"]}}.",
            business = req.business_name,
            industry = req.industry,
            platform = req.platform,
        );

        if let Some(voice) = &req.brand_voice {
            prompt.push_str(&format!(" Brand voice: {}.", voice));
        }

        if req.is_healthcare {
            prompt.push_str(
                " This is a registered healthcare business. Follow AHPRA advertising \
                 guidelines: no patient testimonials, no guaranteed outcomes, no \
                 comparisons with other practitioners, no inducements.",
            );
        }

        prompt
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedPayload {
    content: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<GeneratedContent, GenerationError> {
        let system = Self::system_prompt(req);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &req.topic,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| GenerationError::Malformed("no choices in response".to_string()))?;

        let payload: GeneratedPayload = serde_json::from_str(content)
            .map_err(|e| GenerationError::Malformed(format!("invalid content JSON: {}", e)))?;

        Ok(GeneratedContent {
            content: payload.content,
            hashtags: payload.hashtags,
            platform: req.platform.clone(),
        })
    }
}

/// Deterministic generator for development and tests
pub struct MockGenerator;

#[async_trait]
impl ContentGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<GeneratedContent, GenerationError> {
        Ok(GeneratedContent {
            content: format!(
                "{}: {} - brought to you by {}",
                req.platform, req.topic, req.business_name
            ),
            hashtags: vec![
                format!("#{}", req.industry.replace(' ', "")),
                "#australianbusiness".to_string(),
            ],
            platform: req.platform.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(is_healthcare: bool) -> GenerationRequest {
        GenerationRequest {
            platform: "facebook".to_string(),
            topic: "Spring checkup special".to_string(),
            business_name: "Coastal Dental".to_string(),
            industry: "dental".to_string(),
            brand_voice: Some("warm and professional".to_string()),
            is_healthcare,
        }
    }

    #[test]
    fn test_healthcare_prompt_includes_ahpra_rules() {
        let prompt = OpenAiGenerator::system_prompt(&request(true));
        assert!(prompt.contains("AHPRA"));
        assert!(prompt.contains("no patient testimonials"));
    }

    #[test]
    fn test_non_healthcare_prompt_omits_ahpra_rules() {
        let prompt = OpenAiGenerator::system_prompt(&request(false));
        assert!(!prompt.contains("AHPRA"));
        assert!(prompt.contains("warm and professional"));
    }

    #[tokio::test]
    async fn test_mock_generator_echoes_request() {
        let generated = MockGenerator.generate(&request(false)).await.unwrap();
        assert_eq!(generated.platform, "facebook");
        assert!(generated.content.contains("Coastal Dental"));
        assert!(!generated.hashtags.is_empty());
    }
}
