//! Requirements generation
//!
//! [`GenerationProxy`] forwards a prompt to the AI generation service named in
//! the config and answers with a status code and JSON body, like an HTTP
//! route would. [`parse_generated_requirements`] turns the service's answer
//! into requirements and epics.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::transport::{ApiRequest, Method, Transport};
use crate::config::Config;
use crate::error::ParseError;
use crate::models::{Epic, Requirement};
use crate::parse::{parse_epics, parse_requirements};

/// Error body returned when no generation service is configured
pub const GENERATION_NOT_CONFIGURED: &str = "Requirements generation service URL is not configured";

/// Body accepted by the proxy and forwarded upstream unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub message: String,
    /// Ask the service to keep the answer in its knowledge base
    #[serde(default)]
    pub save_to_kb: bool,
}

/// What the proxy answers with
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Forwards generation requests to the upstream service
pub struct GenerationProxy {
    upstream_url: Option<String>,
    transport: Arc<dyn Transport>,
}

impl GenerationProxy {
    pub fn new(upstream_url: Option<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            upstream_url,
            transport,
        }
    }

    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::new(config.generation_url.clone(), transport)
    }

    /// Forwards one request
    ///
    /// - no upstream configured: 500
    /// - transport failure: 500
    /// - upstream non-success: same status, upstream message as `error`
    /// - success: upstream JSON, or `{"response": text}` when it is not JSON
    pub fn handle(&self, request: &GenerationRequest) -> ProxyResponse {
        let Some(url) = self
            .upstream_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        else {
            log::error!("{}", GENERATION_NOT_CONFIGURED);
            return ProxyResponse::error(500, GENERATION_NOT_CONFIGURED);
        };

        let body = match serde_json::to_value(request) {
            Ok(body) => body,
            Err(e) => return ProxyResponse::error(500, e.to_string()),
        };
        let upstream = ApiRequest {
            method: Method::Post,
            url: url.to_string(),
            body: Some(body),
        };
        log::debug!("Forwarding generation request to {}", url);

        match self.transport.send(&upstream) {
            Err(e) => {
                log::warn!("Generation service unreachable: {}", e);
                ProxyResponse::error(500, e.to_string())
            }
            Ok(response) if !response.is_success() => {
                log::warn!("Generation service returned {}", response.status);
                ProxyResponse::error(response.status, response.error_message())
            }
            Ok(response) => {
                let body = serde_json::from_str(&response.body)
                    .unwrap_or_else(|_| json!({ "response": response.body }));
                ProxyResponse {
                    status: response.status,
                    body,
                }
            }
        }
    }
}

/// Requirements and epics produced by the generation service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedRequirements {
    pub requirements: Vec<Requirement>,
    pub epics: Vec<Epic>,
}

/// Slice out the JSON document of a model answer
///
/// Prefers a fenced code block, then the outermost `{...}` span.
fn extract_json(text: &str) -> &str {
    if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        let content_start = after_fence.find('\n').map_or(0, |i| i + 1);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim();
        }
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text.trim(),
    }
}

/// Parses a generation answer given as text
pub fn parse_generated_requirements(text: &str) -> Result<GeneratedRequirements, ParseError> {
    let value: Value = serde_json::from_str(extract_json(text))
        .map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    parse_generated_value(&value)
}

/// Parses a generation answer already decoded as JSON
///
/// Accepts `{"requirements": [...], "epics": [...]}` directly, or wrapped as
/// a string under `response`. Any other object is an error rather than an
/// empty result. Epics reuse the uuids of the generated
/// requirements they mention.
pub fn parse_generated_value(value: &Value) -> Result<GeneratedRequirements, ParseError> {
    match value {
        Value::String(text) => parse_generated_requirements(text),
        Value::Object(map) if map.contains_key("requirements") || map.contains_key("epics") => {
            let requirements = match map.get("requirements") {
                Some(list) => parse_requirements(list)?,
                None => Vec::new(),
            };
            let epics = match map.get("epics") {
                Some(list) => parse_epics(list, &requirements)?,
                None => Vec::new(),
            };
            Ok(GeneratedRequirements {
                requirements,
                epics,
            })
        }
        Value::Object(map) => match map.get("response") {
            Some(Value::String(text)) => parse_generated_requirements(text),
            _ => Err(ParseError::InvalidJson(
                "unrecognized generation response shape".to_string(),
            )),
        },
        _ => Err(ParseError::InvalidJson(
            "expected an object with requirements or epics".to_string(),
        )),
    }
}
