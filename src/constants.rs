//! Shared constants used across the application.

/// User agent string sent with every forum page request.
///
/// The forum rejects requests that do not look like they come from a browser.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Leading posts of the thread that are announcements, never orders.
pub const SKIPPED_LEADING_POSTS: usize = 3;

/// Added to a post's position to get its display index in the thread
/// (the skipped leading posts plus 1-based numbering).
pub const POST_INDEX_OFFSET: usize = SKIPPED_LEADING_POSTS + 1;

/// Maximum number of referencing replies included in a classifier prompt.
pub const MAX_PROMPT_REPLIES: usize = 10;

/// Answer token that marks an order as fulfilled.
pub const COMPLETED_TOKEN: &str = "COMPLETED";
