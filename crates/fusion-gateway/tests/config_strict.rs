#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use fusion_core::FusionConfig;
use fusion_gateway::config;

#[test]
fn json_patch_applies_recognized_keys_only() {
    let patch = config::parse_json(
        r#"{"outlier_threshold": 2.0, "min_confidence": 0.85, "sensor": "ignored"}"#,
    )
    .expect("must parse");

    let cfg = patch.apply(&FusionConfig::default()).expect("valid");
    assert_eq!(cfg.outlier_threshold, 2.0);
    assert_eq!(cfg.min_confidence, 0.85);
    assert!(cfg.enable_outlier_detection);
}

#[test]
fn empty_object_keeps_current_values() {
    let patch = config::parse_json("{}").expect("must parse");
    assert!(patch.is_empty());

    let base = FusionConfig {
        outlier_threshold: 1.5,
        min_confidence: 0.5,
        enable_outlier_detection: false,
    };
    assert_eq!(patch.apply(&base).unwrap(), base);
}

#[test]
fn non_object_is_rejected() {
    for bad in ["[1, 2, 3]", "3.0", "\"x\"", "null", "", "{not json"] {
        let err = config::parse_json(bad).expect_err("must fail");
        assert_eq!(err.class().as_str(), "invalid_config", "input={bad:?}");
    }
}

#[test]
fn wrong_type_is_rejected() {
    let err = config::parse_json(r#"{"enable_outlier_detection": "yes"}"#).expect_err("must fail");
    assert_eq!(err.class().as_str(), "invalid_config");
}

#[test]
fn out_of_range_values_are_rejected() {
    for bad in [
        r#"{"outlier_threshold": 0}"#,
        r#"{"outlier_threshold": -1.0}"#,
        r#"{"min_confidence": 1.5}"#,
        r#"{"min_confidence": -0.1}"#,
    ] {
        let patch = config::parse_json(bad).expect("parses");
        let err = patch.apply(&FusionConfig::default()).expect_err("must fail");
        assert_eq!(err.class().as_str(), "invalid_config", "input={bad}");
    }
}

#[test]
fn yaml_and_json_boot_files() {
    let yaml = r#"
outlier_threshold: 2.5
enable_outlier_detection: false
"#;
    let patch = config::load_from_str(yaml).expect("yaml parses");
    assert_eq!(patch.outlier_threshold, Some(2.5));
    assert_eq!(patch.enable_outlier_detection, Some(false));
    assert_eq!(patch.min_confidence, None);

    let json = r#"{"min_confidence": 0.9}"#;
    let patch = config::load_from_str(json).expect("json is yaml");
    assert_eq!(patch.min_confidence, Some(0.9));

    let err = config::load_from_str("- 1\n- 2\n").expect_err("sequence must fail");
    assert_eq!(err.class().as_str(), "invalid_config");
}

#[test]
fn missing_boot_file_is_an_error() {
    let err = config::load_from_file(std::path::Path::new("/nonexistent/fusion.yaml"))
        .expect_err("must fail");
    assert_eq!(err.class().as_str(), "invalid_config");
}

#[test]
fn boot_config_resolves_against_defaults() {
    let dir = std::env::temp_dir().join(format!("fusion-boot-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let partial = dir.join("partial.yaml");
    std::fs::write(&partial, "outlier_threshold: 2.0\n").unwrap();
    let cfg = config::load_boot_config(&partial).unwrap();
    assert_eq!(
        cfg,
        FusionConfig {
            outlier_threshold: 2.0,
            ..FusionConfig::default()
        }
    );

    let unrecognized = dir.join("unrecognized.yaml");
    std::fs::write(&unrecognized, "sensor: thermo\n").unwrap();
    assert_eq!(config::load_boot_config(&unrecognized).unwrap(), FusionConfig::default());

    let invalid = dir.join("invalid.yaml");
    std::fs::write(&invalid, "min_confidence: 2.0\n").unwrap();
    let err = config::load_boot_config(&invalid).expect_err("out of range");
    assert_eq!(err.class().as_str(), "invalid_config");

    std::fs::remove_dir_all(&dir).unwrap();
}
