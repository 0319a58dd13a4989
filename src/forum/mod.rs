//! Forum thread scraping.

mod fetcher;
mod post_extractor;

pub use fetcher::{page_outcome, PageOutcome, PostFetcher};
pub use post_extractor::extract_post_bodies;
