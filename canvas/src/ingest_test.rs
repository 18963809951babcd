#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn url_list_splits_on_commas_and_newlines() {
    let urls = parse_url_list("https://a.test/1.png, https://a.test/2.png\nhttps://a.test/3.png");
    assert_eq!(urls, vec!["https://a.test/1.png", "https://a.test/2.png", "https://a.test/3.png"]);
}

#[test]
fn url_list_drops_empty_and_whitespace_entries() {
    let urls = parse_url_list(" ,\n\n  https://a.test/x.png  ,, \r\n");
    assert_eq!(urls, vec!["https://a.test/x.png"]);
}

#[test]
fn url_list_empty_text_yields_nothing() {
    assert!(parse_url_list("").is_empty());
    assert!(parse_url_list("   \n , ").is_empty());
}

#[test]
fn raw_images_become_inline_default_entries() {
    let entries = entries_from_raw(vec![RawImage::new("image/png", vec![1]), RawImage::new("image/gif", vec![2])]);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source, ImageSource::inline("image/png", vec![1]));
    assert_eq!(entries[1].source.to_src(), "data:image/gif;base64,Ag==");
    assert!(entries.iter().all(|e| e.x == 0.0 && e.y == 0.0 && e.rotation == 0));
}

#[test]
fn surviving_drops_failures_in_order() {
    let results: Vec<Result<&str, ()>> = vec![Ok("first"), Err(()), Ok("third")];
    assert_eq!(surviving(results), vec!["first", "third"]);
}
