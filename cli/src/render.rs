//! Plain-text rendering of replies, product cards and history.
//!
//! Every value shown comes from `storefront::display`, so the terminal and
//! the web client agree on prices, titles and labels.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use storefront::Product;
use storefront::display::{self, ProductCard};
use storefront::session::HistoryEntry;
use storefront::types::{SessionList, SessionTranscript};

/// One product as an indented block, numbered from 1.
pub fn product_block(position: usize, product: &Product) -> String {
    let card = ProductCard::from_product(product);
    let mut out = format!("{position:>3}. {}\n", card.title);

    if let Some(line) = &card.category_line {
        let _ = writeln!(out, "     {line}");
    }

    let mut price = card.price_label.clone();
    if let Some(original) = &card.original_price_label {
        let _ = write!(price, " (was {original})");
    }
    if let Some(pct) = card.discount_percent {
        let _ = write!(price, " [{pct}% off]");
    }
    let _ = writeln!(out, "     {price}");

    if let Some(sizes) = &card.sizes {
        let _ = writeln!(out, "     Sizes: {sizes}");
    }
    if let Some(url) = &card.target_url {
        let _ = writeln!(out, "     {url}");
    }
    out
}

/// Current results with the "Results for" header.
pub fn results(query: Option<&str>, products: &[Product]) -> String {
    if products.is_empty() {
        return "Search for products to see recommendations\n".to_owned();
    }

    let mut out = String::new();
    if let Some(q) = query {
        let _ = writeln!(out, "Results for: \"{q}\"");
    }
    let _ = writeln!(out, "{}", display::results_count_label(products.len()));
    for (i, product) in products.iter().enumerate() {
        out.push_str(&product_block(i + 1, product));
    }
    out
}

/// Collapsed history listing, newest first.
pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No search history yet\nYour previous searches will appear here\n".to_owned();
    }

    let mut out = format!("Search History ({})\n", display::history_count_label(entries.len()));
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}  {} · {}",
            i + 1,
            entry.query,
            display::format_history_timestamp(entry.timestamp_ms),
            display::product_count_label(entry.products.len())
        );
    }
    out
}

/// One history entry with its products expanded.
pub fn history_entry(entry: &HistoryEntry) -> String {
    let mut out = format!(
        "{} ({}, {})\n",
        entry.query,
        display::format_history_timestamp(entry.timestamp_ms),
        display::product_count_label(entry.products.len())
    );
    if entry.products.is_empty() {
        out.push_str("No products found\n");
    }
    for (i, product) in entry.products.iter().enumerate() {
        out.push_str(&product_block(i + 1, product));
    }
    out
}

pub fn session_list(list: &SessionList) -> String {
    if list.sessions.is_empty() {
        return "no active sessions\n".to_owned();
    }
    list.sessions.iter().fold(String::new(), |mut out, id| {
        let _ = writeln!(out, "{id}");
        out
    })
}

pub fn session_transcript(transcript: &SessionTranscript) -> String {
    let mut out = format!("session {}\n", transcript.session_id);
    for turn in &transcript.history {
        let _ = writeln!(out, "[{}] {}", turn.role, turn.content);
    }
    out
}
