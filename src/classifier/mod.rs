//! Order fulfilment classification.

mod llm;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::constants::{COMPLETED_TOKEN, MAX_PROMPT_REPLIES};
use crate::orders::Order;

pub use llm::LlmClassifier;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("classifier returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// Decides whether an order has been fulfilled.
#[async_trait]
pub trait OrderClassifier: Send + Sync {
    /// Returns `true` if the order is completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the verdict cannot be obtained. Callers treat this
    /// as fatal for the whole batch.
    async fn classify(&self, order: &Order) -> Result<bool, ClassifierError>;
}

/// Whether a model answer means "completed".
///
/// The answer is trimmed and uppercased, then must equal the completed token
/// exactly.
#[must_use]
pub fn is_completed_answer(answer: &str) -> bool {
    answer.trim().to_uppercase() == COMPLETED_TOKEN
}

/// Build the classification prompt for an order.
///
/// Only the first replies are included; they are separated by blank lines.
#[must_use]
pub fn build_prompt(order: &Order) -> String {
    let replies = order
        .replies
        .iter()
        .take(MAX_PROMPT_REPLIES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n");
    let form = &order.form;

    format!(
        "You are analyzing a Scratch forum shop order.\n\
         An order is COMPLETED if there is a reply suggesting the order is fulfilled, \
         work delivered, communication to external shops, or a status update that it is done.\n\
         It is UNCOMPLETED if there are no such replies or confirmation.\n\n\
         Order form:\n\
         Username: {username}\n\
         Service Required: {service}\n\
         Description: {description}\n\
         Preferred Shop: {shop}\n\
         Other: {other}\n\n\
         Replies referencing this order:\n{replies}\n\n\
         Respond only with COMPLETED or UNCOMPLETED.",
        username = form.username,
        service = form.service_required,
        description = form.description,
        shop = form.preferred_shop,
        other = form.other,
    )
}
