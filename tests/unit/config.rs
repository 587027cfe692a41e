use super::*;
use crate::mask::spec::{TextAlign, TextBaseline};

#[test]
fn empty_object_yields_defaults() {
    let cfg = SprayConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg.width, 900.0);
    assert_eq!(cfg.height, 300.0);
    assert_eq!(cfg.flow_rate, 2500.0);
    assert_eq!(cfg.nozzle_radius, 12.0);
    assert_eq!(cfg.sweep_speed, 220.0);
    assert_eq!(cfg.seed, 1337);
    assert!(!cfg.looping);
    assert!(matches!(cfg.mask, MaskSpec::Rect));
    assert_eq!(cfg.color.to_rgba8_straight(), [0x0a, 0x0a, 0x0a, 0xff]);
    assert_eq!(cfg.background, Color::transparent());
}

#[test]
fn parses_full_configuration() {
    let cfg = SprayConfig::from_json_str(
        r##"{
            "width": 1920, "height": 240,
            "color": "#ffffff", "background": "#236292",
            "flow_rate": 80000, "nozzle_radius": 8,
            "droplet_mean": 2.5, "droplet_sigma": 1.0, "droplet_min": 1.0, "droplet_max": 5.0,
            "sweep_speed": 2400, "loop": true, "seed": 2468, "label": "bottom",
            "alpha_min": 0.04, "alpha_max": 0.12
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.width, 1920.0);
    assert!(cfg.looping);
    assert_eq!(cfg.seed, 2468);
    assert_eq!(cfg.display_label(), "bottom");
    assert_eq!(cfg.background.to_rgba8_straight(), [0x23, 0x62, 0x92, 0xff]);
    assert_eq!(cfg.emitter_params().size.max, 5.0);
}

#[test]
fn parses_text_and_path_masks() {
    let cfg = SprayConfig::from_json_str(
        r#"{"mask": {"text": {"text": "PAINT", "font_path": "fonts/x.ttf", "size_px": 120,
            "align": "start", "baseline": "alphabetic"}}}"#,
    )
    .unwrap();
    let MaskSpec::Text(opts) = &cfg.mask else {
        panic!("expected text mask");
    };
    assert_eq!(opts.text, "PAINT");
    assert_eq!(opts.size_px, 120.0);
    assert_eq!(opts.align, TextAlign::Left);
    assert_eq!(opts.baseline, TextBaseline::Alphabetic);

    let cfg =
        SprayConfig::from_json_str(r#"{"mask": {"path": {"svg": "M0,0 L10,0 L10,10 Z"}}}"#)
            .unwrap();
    let MaskSpec::Path(builder) = &cfg.mask else {
        panic!("expected path mask");
    };
    assert!(!builder.build(100.0, 100.0).is_empty());
}

#[test]
fn rejects_bad_svg_path() {
    let err = SprayConfig::from_json_str(r#"{"mask": {"path": {"svg": "M0,0 Q"}}}"#).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn validation_rejects_nonsense() {
    let bad = [
        r#"{"width": 0}"#,
        r#"{"height": -1}"#,
        r#"{"flow_rate": -5}"#,
        r#"{"droplet_min": 4, "droplet_max": 3}"#,
        r#"{"droplet_min": 0.1, "droplet_max": 0.2}"#,
        r#"{"sweep_speed": -1}"#,
    ];
    for json in bad {
        let err = SprayConfig::from_json_str(json).unwrap_err();
        assert!(
            err.to_string().contains("validation error:"),
            "{json}: {err}"
        );
    }
}

#[test]
fn seed_zero_is_accepted() {
    let cfg = SprayConfig::from_json_str(r#"{"seed": 0}"#).unwrap();
    assert_eq!(cfg.seed, 0);
}

#[test]
fn from_path_resolves_relative_font_paths() {
    let dir = std::path::PathBuf::from("target").join("config_font_resolve");
    std::fs::create_dir_all(&dir).unwrap();
    let cfg_path = dir.join("cfg.json");
    std::fs::write(
        &cfg_path,
        r#"{"mask": {"text": {"text": "A", "font_path": "fonts/a.ttf"}}}"#,
    )
    .unwrap();

    let cfg = SprayConfig::from_path(&cfg_path).unwrap();
    let MaskSpec::Text(opts) = &cfg.mask else {
        panic!("expected text mask");
    };
    assert_eq!(opts.font_path.as_deref(), Some(dir.join("fonts/a.ttf").as_path()));
}
