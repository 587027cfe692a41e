use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_transparent_keyword() {
    let c: Color = serde_json::from_value(json!("transparent")).unwrap();
    assert_eq!(c, Color::transparent());
    assert_eq!("Transparent".parse::<Color>().unwrap(), Color::transparent());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<Color>(json!([0.25, 0.5])).is_err());
}

#[test]
fn parses_hsla_object() {
    let c: Color = serde_json::from_value(json!({"h": 0.0, "s": 1.0, "l": 0.5})).unwrap();
    assert!((c.r - 1.0).abs() < 1e-9);
    assert!(c.g.abs() < 1e-9);
    assert!(c.b.abs() < 1e-9);
}

#[test]
fn parses_short_hex() {
    assert_eq!("#fff".parse::<Color>().unwrap(), Color::rgba(1.0, 1.0, 1.0, 1.0));
    let c = "#0f08".parse::<Color>().unwrap();
    assert_eq!(c.to_rgba8_straight(), [0x00, 0xff, 0x00, 0x88]);
}

#[test]
fn hsl_primaries_and_greys() {
    let green: Color = serde_json::from_value(json!({"h": 120.0, "s": 1.0, "l": 0.5})).unwrap();
    assert_eq!(green.to_rgba8_straight(), [0, 255, 0, 255]);
    let blue: Color = serde_json::from_value(json!({"h": -120.0, "s": 1.0, "l": 0.5})).unwrap();
    assert_eq!(blue.to_rgba8_straight(), [0, 0, 255, 255]);
    let grey: Color =
        serde_json::from_value(json!({"h": 45.0, "s": 0.0, "l": 0.5, "a": 0.5})).unwrap();
    assert_eq!(grey.to_rgba8_straight(), [128, 128, 128, 128]);
}

#[test]
fn rejects_malformed_strings() {
    assert!("#12345".parse::<Color>().is_err());
    assert!("#gg0000".parse::<Color>().is_err());
    assert!("blue".parse::<Color>().is_err());
}

#[test]
fn quantizes_to_straight_and_premul() {
    let c = "#236292".parse::<Color>().unwrap();
    assert_eq!(c.to_rgba8_straight(), [0x23, 0x62, 0x92, 0xff]);
    assert_eq!(c.to_rgba8_premul().to_array(), [0x23, 0x62, 0x92, 0xff]);

    let half = Color::rgba(1.0, 1.0, 1.0, 0.5);
    assert_eq!(half.to_rgba8_straight(), [255, 255, 255, 128]);
    assert_eq!(half.to_rgba8_premul().to_array(), [128, 128, 128, 128]);
}
