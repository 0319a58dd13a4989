//! Forum order tracker library.
//!
//! Scrapes a forum thread for shop order forms, gathers the replies that
//! mention each order, and asks a language model whether each order has
//! been fulfilled.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod forum;
pub mod orders;
pub mod pipeline;
pub mod web;
