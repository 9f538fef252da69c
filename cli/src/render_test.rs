use super::*;
use storefront::ProductMeta;
use storefront::types::SessionTurn;

fn product(title: &str, sale: Option<f64>, original: Option<f64>) -> Product {
    Product {
        metadata: ProductMeta {
            title: Some(title.to_owned()),
            category: Some("Shoes".to_owned()),
            sub_category: Some("Running".to_owned()),
            sale_price: sale,
            original_price: original,
            available_sizes: Some("40, 41, 42".to_owned()),
            product_url: Some("https://shop.test/p/1".to_owned()),
            ..ProductMeta::default()
        },
        content: None,
    }
}

fn entry(id: &str, query: &str, products: Vec<Product>) -> HistoryEntry {
    HistoryEntry { id: id.to_owned(), timestamp_ms: 1_760_803_500_000, query: query.to_owned(), products }
}

// =============================================================
// Product blocks
// =============================================================

#[test]
fn product_block_shows_discount_and_original_price() {
    let out = product_block(1, &product("Trail Runner", Some(800.0), Some(1000.0)));
    assert!(out.starts_with("  1. Trail Runner\n"));
    assert!(out.contains("Shoes • Running"));
    assert!(out.contains("EGP 800 (was EGP 1000) [20% off]"));
    assert!(out.contains("Sizes: 40, 41, 42"));
    assert!(out.contains("https://shop.test/p/1"));
}

#[test]
fn product_block_without_price() {
    let out = product_block(2, &product("Mystery Box", None, None));
    assert!(out.contains("Price N/A"));
    assert!(!out.contains("was"));
    assert!(!out.contains("% off"));
}

// =============================================================
// Results and history
// =============================================================

#[test]
fn results_empty_state() {
    assert_eq!(results(None, &[]), "Search for products to see recommendations\n");
}

#[test]
fn results_header_and_count() {
    let out = results(Some("red shoes"), &[product("A", Some(10.0), None), product("B", Some(20.0), None)]);
    assert!(out.starts_with("Results for: \"red shoes\"\nFound 2 products\n"));
    assert!(out.contains("  1. A\n"));
    assert!(out.contains("  2. B\n"));
}

#[test]
fn history_empty_state() {
    assert!(history(&[]).starts_with("No search history yet"));
}

#[test]
fn history_lists_newest_first_with_counts() {
    let entries = vec![
        entry("2", "blue jackets", vec![product("J", Some(1.0), None)]),
        entry("1", "red shoes", vec![product("A", None, None), product("B", None, None)]),
    ];
    let out = history(&entries);
    assert!(out.starts_with("Search History (2 previous searches)\n"));
    let blue = out.find("blue jackets").unwrap();
    let red = out.find("red shoes").unwrap();
    assert!(blue < red);
    assert!(out.contains("1 product\n"));
    assert!(out.contains("2 products\n"));
}

#[test]
fn history_entry_expands_products() {
    let out = history_entry(&entry("1", "red shoes", vec![product("A", Some(5.0), None)]));
    assert!(out.starts_with("red shoes (Oct 18, "));
    assert!(out.contains("  1. A\n"));
}

#[test]
fn history_entry_without_products() {
    assert!(history_entry(&entry("1", "q", Vec::new())).contains("No products found"));
}

// =============================================================
// Session admin
// =============================================================

#[test]
fn session_list_one_per_line() {
    let list = SessionList { sessions: vec!["a".into(), "b".into()] };
    assert_eq!(session_list(&list), "a\nb\n");
    assert_eq!(session_list(&SessionList { sessions: Vec::new() }), "no active sessions\n");
}

#[test]
fn session_transcript_prefixes_roles() {
    let transcript = SessionTranscript {
        session_id: "s-1".into(),
        history: vec![
            SessionTurn { role: "user".into(), content: "hi".into() },
            SessionTurn { role: "assistant".into(), content: "hello".into() },
        ],
    };
    assert_eq!(session_transcript(&transcript), "session s-1\n[user] hi\n[assistant] hello\n");
}
