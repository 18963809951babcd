#![allow(clippy::float_cmp)]

use super::*;

fn entry(tag: &str) -> PlacedImage {
    PlacedImage::new(ImageSource::uri(tag))
}

fn batch(prefix: &str, n: usize) -> Vec<PlacedImage> {
    (0..n).map(|i| entry(&format!("{prefix}-{i}"))).collect()
}

fn tags(store: &ImageStore) -> Vec<String> {
    store.images().iter().map(|img| img.source.to_src()).collect()
}

// =============================================================
// ImageSource
// =============================================================

#[test]
fn inline_source_serializes_as_data_uri() {
    let src = ImageSource::inline("image/png", vec![1, 2, 3]);
    assert_eq!(src.to_src(), "data:image/png;base64,AQID");
}

#[test]
fn data_uri_parses_back_to_inline() {
    let src = ImageSource::parse("data:image/png;base64,AQID");
    assert_eq!(src, ImageSource::inline("image/png", vec![1, 2, 3]));
    assert!(src.is_inline());
    assert_eq!(src.inline_data(), Some(&[1u8, 2, 3][..]));
}

#[test]
fn non_base64_data_uri_stays_reference() {
    let raw = "data:image/svg+xml;utf8,<svg/>";
    let src = ImageSource::parse(raw);
    assert_eq!(src, ImageSource::uri(raw));
    assert_eq!(src.to_src(), raw);
}

#[test]
fn corrupt_base64_stays_reference() {
    let raw = "data:image/png;base64,@@@";
    assert_eq!(ImageSource::parse(raw), ImageSource::uri(raw));
}

#[test]
fn plain_url_is_reference() {
    let src = ImageSource::parse("https://example.com/a.png");
    assert!(!src.is_inline());
    assert!(src.inline_data().is_none());
}

#[test]
fn source_debug_hides_payload() {
    let src = ImageSource::inline("image/jpeg", vec![0; 2048]);
    assert_eq!(format!("{src:?}"), "Inline(image/jpeg, 2048 bytes)");
}

// =============================================================
// PlacedImage
// =============================================================

#[test]
fn new_image_has_defaults() {
    let img = entry("a");
    assert_eq!((img.x, img.y), (0.0, 0.0));
    assert_eq!((img.width, img.height), (100.0, 100.0));
    assert_eq!(img.rotation, 0);
    assert!(!img.aspect_locked);
    assert_eq!(img.mask, ShapeMask::None);
}

#[test]
fn placed_image_wire_names() {
    let img = entry("https://example.com/x.png");
    let json = serde_json::to_value(&img).unwrap();
    assert_eq!(json["src"], "https://example.com/x.png");
    assert_eq!(json["rotate"], 0);
    assert_eq!(json["lockAspectRatio"], false);
    assert_eq!(json["shape"], "none");
}

#[test]
fn placed_image_optional_fields_default() {
    let json = r#"{"src":"a.png","x":1,"y":2,"width":30,"height":40,"rotate":180}"#;
    let img: PlacedImage = serde_json::from_str(json).unwrap();
    assert_eq!(img.rotation, 180);
    assert!(!img.aspect_locked);
    assert_eq!(img.mask, ShapeMask::None);
}

#[test]
fn rotating_four_times_is_identity() {
    for start in [0, 90, 180, 270] {
        let mut img = entry("a");
        img.rotation = start;
        for _ in 0..4 {
            img.rotate_quarter();
        }
        assert_eq!(img.rotation, start);
    }
}

#[test]
fn rotation_wraps_at_360() {
    assert_eq!(next_rotation(270), 0);
    assert_eq!(next_rotation(0), 90);
}

#[test]
fn normalize_rotation_snaps_to_quarter_turns() {
    assert_eq!(normalize_rotation(450), 90);
    assert_eq!(normalize_rotation(100), 90);
    assert_eq!(normalize_rotation(360), 0);
}

// =============================================================
// ImageStore: append / capacity
// =============================================================

#[test]
fn append_returns_accepted_entries() {
    let mut store = ImageStore::with_capacity(10);
    let accepted = store.append(batch("a", 3));
    assert_eq!(accepted.len(), 3);
    assert_eq!(store.len(), 3);
}

#[test]
fn append_twelve_into_ceiling_ten_keeps_ten() {
    let mut store = ImageStore::with_capacity(10);
    let accepted = store.append(batch("a", 12)).len();
    assert_eq!(accepted, 10);
    assert_eq!(store.len(), 10);
    assert_eq!(tags(&store).last().map(String::as_str), Some("a-9"));
}

#[test]
fn append_keeps_existing_and_truncates_new() {
    let mut store = ImageStore::with_capacity(5);
    store.append(batch("old", 3));
    let accepted: Vec<String> = store.append(batch("new", 4)).iter().map(|i| i.source.to_src()).collect();
    assert_eq!(accepted, vec!["new-0", "new-1"]);
    assert_eq!(tags(&store), vec!["old-0", "old-1", "old-2", "new-0", "new-1"]);
}

#[test]
fn append_when_full_accepts_nothing() {
    let mut store = ImageStore::with_capacity(2);
    store.append(batch("a", 2));
    assert!(store.append(batch("b", 1)).is_empty());
    assert!(!store.has_room());
}

#[test]
fn store_length_never_exceeds_ceiling_across_appends() {
    let mut store = ImageStore::with_capacity(7);
    for round in 0..10 {
        store.append(batch(&format!("r{round}"), round % 4 + 1));
        assert!(store.len() <= 7);
    }
    let all = tags(&store);
    assert_eq!(all[0], "r0-0");
}

#[test]
fn append_preserves_input_order() {
    let mut store = ImageStore::with_capacity(10);
    store.append(batch("a", 4));
    assert_eq!(tags(&store), vec!["a-0", "a-1", "a-2", "a-3"]);
}

#[test]
fn snapshot_over_capacity_is_kept_and_blocks_appends() {
    let mut store = ImageStore::with_capacity(2);
    store.load_snapshot(batch("saved", 4));
    assert_eq!(store.len(), 4);
    assert!(store.append(batch("x", 1)).is_empty());
    assert_eq!(store.len(), 4);
}

// =============================================================
// ImageStore: update / remove / rotate
// =============================================================

#[test]
fn update_merges_present_fields_only() {
    let mut store = ImageStore::with_capacity(10);
    store.append(batch("a", 1));
    store
        .update(0, &PartialPlacedImage { x: Some(5.0), mask: Some(ShapeMask::Circle), ..Default::default() })
        .unwrap();
    let img = store.get(0).unwrap();
    assert_eq!(img.x, 5.0);
    assert_eq!(img.y, 0.0);
    assert_eq!(img.mask, ShapeMask::Circle);
    assert_eq!(img.width, 100.0);
}

#[test]
fn update_out_of_range_errors() {
    let mut store = ImageStore::with_capacity(10);
    store.append(batch("a", 2));
    let err = store.update(2, &PartialPlacedImage::position(1.0, 1.0)).unwrap_err();
    assert_eq!(err, StoreError::IndexOutOfRange { index: 2, len: 2 });
}

#[test]
fn remove_shifts_later_entries_down() {
    let mut store = ImageStore::with_capacity(10);
    store.append(batch("a", 3));
    let removed = store.remove(1).unwrap();
    assert_eq!(removed.source.to_src(), "a-1");
    assert_eq!(tags(&store), vec!["a-0", "a-2"]);
}

#[test]
fn remove_out_of_range_errors() {
    let mut store = ImageStore::with_capacity(10);
    assert!(matches!(store.remove(0), Err(StoreError::IndexOutOfRange { index: 0, len: 0 })));
}

#[test]
fn rotate_reports_new_angle() {
    let mut store = ImageStore::with_capacity(10);
    store.append(batch("a", 1));
    assert_eq!(store.rotate(0).unwrap(), 90);
    assert_eq!(store.rotate(0).unwrap(), 180);
    assert!(store.rotate(3).is_err());
}

#[test]
fn partial_rotation_is_normalized() {
    let mut store = ImageStore::with_capacity(10);
    store.append(batch("a", 1));
    store.update(0, &PartialPlacedImage { rotation: Some(530), ..Default::default() }).unwrap();
    assert_eq!(store.get(0).unwrap().rotation, 90);
}
