use scraper::{Html, Selector};

/// CSS selector for the element wrapping each post's body in the forum markup.
const POST_BODY_SELECTOR: &str = ".postbody";

/// Extract the visible text of every post body on a forum page.
///
/// Text nodes are concatenated as-is and the result is trimmed. Posts are
/// returned in document order.
#[must_use]
pub fn extract_post_bodies(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(POST_BODY_SELECTOR).expect("Invalid selector");

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}
