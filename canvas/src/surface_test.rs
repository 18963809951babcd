#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_canvas_is_thirty_by_twenty_cm() {
    let canvas = Canvas::default();
    assert_eq!(canvas.unit, Unit::Cm);
    assert!((canvas.pixel_width() - 18.0).abs() < 1e-9);
    assert!((canvas.pixel_height() - 12.0).abs() < 1e-9);
    assert_eq!(canvas.background_color, "#ffffff");
}

#[test]
fn pixel_size_tracks_unit_changes() {
    let mut canvas = Canvas::default();
    canvas.unit = Unit::M;
    assert_eq!(canvas.pixel_width(), 1800.0);
    canvas.unit = Unit::Ft;
    assert_eq!(canvas.pixel_width(), 600.0);
}

#[test]
fn pixel_size_tracks_input_changes() {
    let mut canvas = Canvas::default();
    canvas.set_dimensions(100.0, 50.0).unwrap();
    assert!((canvas.pixel_width() - 60.0).abs() < 1e-9);
    assert!((canvas.pixel_height() - 30.0).abs() < 1e-9);
}

#[test]
fn set_dimensions_rejects_nan_and_negative() {
    let mut canvas = Canvas::default();
    assert!(matches!(canvas.set_dimensions(f64::NAN, 1.0), Err(ValidationError::Dimension { field: "width", .. })));
    assert!(matches!(canvas.set_dimensions(1.0, -2.0), Err(ValidationError::Dimension { field: "height", .. })));
    assert_eq!(canvas.width_input, DEFAULT_WIDTH_INPUT);
    assert_eq!(canvas.height_input, DEFAULT_HEIGHT_INPUT);
}

#[test]
fn background_color_validation() {
    let mut canvas = Canvas::default();
    canvas.set_background_color("#a1b2c3").unwrap();
    assert_eq!(canvas.background_color, "#a1b2c3");
    assert!(canvas.set_background_color("red").is_err());
    assert!(canvas.set_background_color("#12345").is_err());
    assert_eq!(canvas.background_color, "#a1b2c3");
}

#[test]
fn parse_hex_color_long_and_short() {
    assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
    assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
    assert_eq!(parse_hex_color("#0a0"), Some([0, 170, 0]));
    assert_eq!(parse_hex_color("ff8000"), None);
    assert_eq!(parse_hex_color("#gg0000"), None);
}
