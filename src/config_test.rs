use crate::config::{Args, Config, ConfigError, DisplayKind};
use clap::Parser;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_defaults_are_valid() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(
        config.labels,
        vec!["Circle", "Triangle", "Square", "Error", "Empty"]
    );
    assert_eq!(config.window_depth, 10);
    assert_eq!(config.confidence_threshold, 0.7);
    assert_eq!(config.serial.baud_rate, 115200);
    assert_eq!(config.ack_grace_period, Duration::from_millis(100));
    assert_eq!(config.display, DisplayKind::Console);
}

#[test]
fn test_file_overrides_only_what_it_names() {
    let config = Config::from_toml_str(
        r#"
        labels = ["Circle", "Square"]
        window_depth = 3
        display = "none"

        [serial]
        port = "COM5"
        ack_grace_ms = 250

        [model]
        width = 64
        height = 48
        "#,
    )
    .unwrap();

    assert_eq!(config.labels, vec!["Circle", "Square"]);
    assert_eq!(config.window_depth, 3);
    assert_eq!(config.display, DisplayKind::None);
    assert_eq!(config.serial.port, "COM5");
    assert_eq!(config.serial.baud_rate, 115200);
    assert_eq!(config.ack_grace_period, Duration::from_millis(250));
    assert_eq!(config.model.input_shape, (64, 48));
    assert_eq!(config.confidence_threshold, 0.7);
}

#[test]
fn test_file_labels_are_trimmed() {
    let config = Config::from_toml_str(r#"labels = ["Circle ", " Square"]"#).unwrap();

    assert_eq!(config.labels, vec!["Circle", "Square"]);
}

#[test]
fn test_unknown_keys_are_rejected() {
    let result = Config::from_toml_str("window_size = 4");

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        "window_depth = 0",
        "confidence_threshold = 1.5",
        "labels = []",
        "labels = [\"Circle\", \"Circle\"]",
        "labels = [\"Circle\", \"  \"]",
        "labels = [\"Cir\\ncle\"]",
        "utc_offset_minutes = 100000",
        "[model]\nchannels = 2",
        "[serial]\nbaud_rate = 0",
    ];

    for raw in cases {
        assert!(
            matches!(Config::from_toml_str(raw), Err(ConfigError::Invalid(_))),
            "{} should be invalid",
            raw
        );
    }
}

#[test]
fn test_flags_override_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "labels = [\"A\", \"B\", \"C\"]\nwindow_depth = 4").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let args = Args::try_parse_from([
        "shape-relay",
        "--config",
        path.as_str(),
        "--labels",
        "Circle, Square",
        "--confidence-threshold",
        "0.9",
        "--display",
        "gui",
        "--simulate",
    ])
    .unwrap();
    let config = Config::load(&args).unwrap();

    assert_eq!(config.labels, vec!["Circle", "Square"]);
    assert_eq!(config.window_depth, 4);
    assert_eq!(config.confidence_threshold, 0.9);
    assert_eq!(config.display, DisplayKind::Gui);
    assert!(config.simulate);
}

#[test]
fn test_missing_file_is_a_read_error() {
    let args = Args {
        config: Some("/nonexistent/shape-relay.toml".into()),
        ..Args::default()
    };

    assert!(matches!(Config::load(&args), Err(ConfigError::Read { .. })));
}
