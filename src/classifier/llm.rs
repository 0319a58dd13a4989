use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_prompt, is_completed_answer, ClassifierError, OrderClassifier};
use crate::config::Config;
use crate::orders::Order;

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    text: Option<String>,
}

/// Classifier backed by a hosted language model.
///
/// Without an API key the classifier runs in degraded mode: every order is
/// reported as uncompleted and no request is made.
#[derive(Debug, Clone)]
pub struct LlmClassifier {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl LlmClassifier {
    /// Create a classifier from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: config.classifier_api_key.clone(),
            endpoint: format!(
                "{}/responses",
                config.classifier_base_url.trim_end_matches('/')
            ),
            model: config.classifier_model.clone(),
        })
    }

    /// Whether requests are sent to the model at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a prompt and return the text of the first output item.
    async fn request_answer(&self, api_key: &str, prompt: &str) -> Result<String, ClassifierError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&ResponsesRequest {
                model: &self.model,
                input: prompt,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClassifierError::Status { status, body });
        }

        let reply: ResponsesReply = serde_json::from_str(&body)
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        reply
            .output
            .into_iter()
            .next()
            .and_then(|item| item.content.into_iter().next())
            .and_then(|content| content.text)
            .ok_or_else(|| {
                ClassifierError::MalformedResponse("missing output[0].content[0].text".to_string())
            })
    }
}

#[async_trait]
impl OrderClassifier for LlmClassifier {
    async fn classify(&self, order: &Order) -> Result<bool, ClassifierError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(false);
        };

        let prompt = build_prompt(order);
        let answer = self.request_answer(api_key, &prompt).await?;
        let completed = is_completed_answer(&answer);

        debug!(
            post_index = order.post_index,
            username = %order.form.username,
            answer = %answer.trim(),
            completed,
            "Classified order"
        );

        Ok(completed)
    }
}
