//! Order form parsing.
//!
//! An order form is a post containing six labelled fields in a fixed order.
//! Labels are matched case-insensitively. A field's value is everything
//! between its label and the first occurrence of the next label, so values
//! may span several lines. The last field runs to the end of the post.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// The labelled fields of an order form, in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Username,
    ServiceRequired,
    Description,
    PreferredShop,
    AgreedToS,
    Other,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Username,
        FormField::ServiceRequired,
        FormField::Description,
        FormField::PreferredShop,
        FormField::AgreedToS,
        FormField::Other,
    ];

    /// The label text introducing this field in a post.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FormField::Username => "Username:",
            FormField::ServiceRequired => "Service Required:",
            FormField::Description => "Description:",
            FormField::PreferredShop => "Preferred Shop (optional):",
            FormField::AgreedToS => "Do you agree to our Terms of Service:",
            FormField::Other => "Other:",
        }
    }
}

static LABEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    FormField::ALL
        .iter()
        .map(|field| {
            Regex::new(&format!("(?i){}", regex::escape(field.label()))).expect("valid regex")
        })
        .collect()
});

/// The six trimmed values of a parsed order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderForm {
    pub username: String,
    pub service_required: String,
    pub description: String,
    pub preferred_shop: String,
    #[serde(rename = "AgreedToS")]
    pub agreed_to_tos: String,
    pub other: String,
}

/// Locate the raw (untrimmed) value of every field in `text`.
///
/// Returns one byte range per entry of [`FormField::ALL`], or `None` if any
/// label is missing or out of order.
#[must_use]
pub fn locate_fields(text: &str) -> Option<Vec<Range<usize>>> {
    let mut spans = Vec::with_capacity(FormField::ALL.len());
    let mut value_start: Option<usize> = None;

    for pattern in LABEL_PATTERNS.iter() {
        let cursor = value_start.unwrap_or(0);
        let label = pattern.find_at(text, cursor)?;
        if let Some(start) = value_start {
            spans.push(start..label.start());
        }
        value_start = Some(label.end());
    }

    spans.push(value_start?..text.len());
    Some(spans)
}

/// Parse a post as an order form.
///
/// Returns `None` if the post is not an order form.
#[must_use]
pub fn parse_order_form(text: &str) -> Option<OrderForm> {
    let mut values = locate_fields(text)?
        .into_iter()
        .map(|span| text[span].trim().to_string());
    let mut next = || values.next().unwrap_or_default();

    // Initializers run in source order, matching FormField::ALL.
    Some(OrderForm {
        username: next(),
        service_required: next(),
        description: next(),
        preferred_shop: next(),
        agreed_to_tos: next(),
        other: next(),
    })
}
