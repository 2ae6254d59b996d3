use error_stack::Report;
use serde::Deserialize;
use serde_json::json;

use kernel::interface::recommend::{RecommendationRequest, Recommender};
use kernel::KernelError;

use crate::env;
use crate::error::{ConvertError, DriverError};

static GEMINI_API_KEY: &str = "GEMINI_API_KEY";
static GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
static GEMINI_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiRecommender {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiRecommender {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        // Keys pasted into env files tend to arrive wrapped in quotes.
        let api_key = env(GEMINI_API_KEY)
            .convert_error()?
            .trim()
            .replace(['"', '\''], "");
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
        })
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<CandidateRecord>,
}

#[derive(Deserialize)]
struct CandidateRecord {
    content: CandidateContentRecord,
}

#[derive(Deserialize)]
struct CandidateContentRecord {
    #[serde(default)]
    parts: Vec<CandidatePartRecord>,
}

#[derive(Deserialize)]
struct CandidatePartRecord {
    text: Option<String>,
}

#[async_trait::async_trait]
impl Recommender for GeminiRecommender {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> error_stack::Result<String, KernelError> {
        let url = format!(
            "{GEMINI_ENDPOINT}/{GEMINI_MODEL}:generateContent?key={}",
            self.api_key
        );
        let body = json!({
            "system_instruction": { "parts": [{ "text": request.system_instruction() }] },
            "contents": [{ "parts": [{ "text": request.prompt() }] }],
        });
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        if !response.status().is_success() {
            return Err(Report::new(KernelError::Internal).attach_printable(format!(
                "recommendation request failed with status {}",
                response.status()
            )));
        }
        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                Report::new(KernelError::Internal).attach_printable("model returned no text")
            })?;
        Ok(text)
    }
}
