use super::{ProviderOptions, TranslationProvider};
use crate::error::TranslateError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.mymemory.translated.net/get";

const USER_AGENT: &str = concat!("martins-translator/", env!("CARGO_PKG_VERSION"));

/// Wire shape of a MyMemory `/get` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_status: StatusField,
    #[serde(default)]
    response_data: Option<ResponseData>,
    #[serde(default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: String,
}

// MyMemory sends the status as a number on success and sometimes as a string on errors
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusField {
    Number(i64),
    Text(String),
}

impl StatusField {
    fn code(&self) -> Option<i64> {
        match self {
            StatusField::Number(code) => Some(*code),
            StatusField::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Result of a well-formed MyMemory response
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Translated(String),
    Rejected { status: i64, details: String },
}

impl ApiOutcome {
    pub fn into_result(self) -> Result<String, TranslateError> {
        match self {
            ApiOutcome::Translated(text) => Ok(text),
            ApiOutcome::Rejected { status, details } => {
                Err(TranslateError::Rejected { status, details })
            }
        }
    }
}

/// Parse a response body into a typed outcome.
/// Anything that does not match the schema is a `MalformedResponse`.
pub fn parse_response(body: &str) -> Result<ApiOutcome, TranslateError> {
    let response: MyMemoryResponse = serde_json::from_str(body)?;

    let status = response.response_status.code().ok_or_else(|| {
        TranslateError::MalformedResponse("responseStatus is not numeric".to_string())
    })?;

    if status != 200 {
        let details = response
            .response_details
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Ok(ApiOutcome::Rejected { status, details });
    }

    match response.response_data {
        Some(data) => Ok(ApiOutcome::Translated(data.translated_text)),
        None => Err(TranslateError::MalformedResponse(
            "missing responseData".to_string(),
        )),
    }
}

pub struct MyMemoryProvider {
    client: Client,
    api_url: Url,
    email: Option<String>,
}

impl MyMemoryProvider {
    pub fn new(options: &ProviderOptions) -> Result<Self, TranslateError> {
        let api_url = Url::parse(options.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TranslateError::Transport(e.to_string()))?;

        let email = options
            .email
            .as_ref()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            client,
            api_url,
            email,
        })
    }

    /// Build the `/get` URL with `q` and `langpair` query parameters
    pub fn request_url(&self, text: &str, from: &str, to: &str) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", text)
                .append_pair("langpair", &format!("{}|{}", from, to));
            if let Some(email) = &self.email {
                query.append_pair("de", email);
            }
        }
        url
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    async fn translate_text(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslateError> {
        let url = self.request_url(text, from, to);
        log::debug!("MyMemory request {}|{} ({} chars)", from, to, text.chars().count());

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TranslateError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;

        parse_response(&body)?.into_result()
    }

    fn name(&self) -> &str {
        "MyMemory"
    }
}
