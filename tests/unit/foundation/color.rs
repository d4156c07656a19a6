use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);

    let c = Color::parse_hex("#fff").unwrap();
    assert_eq!(c, Color::WHITE);
}

#[test]
fn malformed_hex_falls_back() {
    assert!(Color::parse_hex("#12").is_err());
    assert_eq!(Color::from_hex_or("nope", Color::BLACK), Color::BLACK);
}

#[test]
fn hex_roundtrips_through_serde() {
    let c = Color::rgb8(0x39, 0xff, 0x14);
    let v = serde_json::to_value(c).unwrap();
    assert_eq!(v, json!("#39ff14"));
}

#[test]
fn parses_hsla_object() {
    let c: Color = serde_json::from_value(json!({"h": 0.0, "s": 1.0, "l": 0.5})).unwrap();
    assert!((c.r - 1.0).abs() < 1e-9);
    assert!(c.g.abs() < 1e-9);
    assert!(c.b.abs() < 1e-9);
}

#[test]
fn desaturate_moves_toward_grey() {
    let c = Color::rgb(1.0, 0.0, 0.0).desaturate(1.0);
    assert!((c.r - c.g).abs() < 1e-9);
    assert!((c.g - c.b).abs() < 1e-9);
}
