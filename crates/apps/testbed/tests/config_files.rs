//! Loading run configs from disk

use std::io::Write;
use std::path::Path;

use devices::{Button, InputEvent, Key, TimedInput};
use meshwalk_physics::{ContactEvent, PhysicsError};
use testbed::{Testbed, TestbedConfig};

#[test]
fn test_shipped_demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/demo.toml");
    let config = TestbedConfig::load(&path).unwrap();

    assert_eq!(config.log_interval, 0.5);
    assert_eq!(config.script.len(), 6);
    assert_eq!(
        config.script[0],
        TimedInput::new(0.0, InputEvent::Press(Button::Key(Key::W)))
    );
    assert_eq!(config.script[3].event, InputEvent::SetAnalog(0, -1.0));
    assert!((config.run_duration() - 6.1).abs() < 1e-9);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "duration = 0.5\n\n[controller]\nair_control = 0.25").unwrap();

    let config = TestbedConfig::load(file.path()).unwrap();
    let defaults = TestbedConfig::default();

    assert_eq!(config.duration, Some(0.5));
    assert_eq!(config.controller.air_control, 0.25);
    assert_eq!(config.controller.walk_speed, defaults.controller.walk_speed);
    assert_eq!(config.dt, defaults.dt);
    assert_eq!(config.script, defaults.script);
}

#[test]
fn test_malformed_config_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "dt = \"fast\"").unwrap();

    let err = TestbedConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, PhysicsError::Config(_)));
}

#[test]
fn test_jump_script_leaves_and_relands() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
dt = 0.05
duration = 2.0

[[script]]
time = 0.2
event = {{ Press = {{ Key = "Space" }} }}
"#
    )
    .unwrap();
    let config = TestbedConfig::load(file.path()).unwrap();
    let mut testbed = Testbed::new(&config).unwrap();
    let ground = testbed.course().ground;
    let body = testbed.controller().body();

    let summary = testbed.run(config.run_duration()).unwrap();

    let left = summary.count(|e| *e == ContactEvent::FloorEndTouch { body, surface: ground });
    assert_eq!(left, 1);
    assert_eq!(summary.final_body.floor, Some(ground));
    assert_eq!(summary.count(|e| matches!(e, ContactEvent::FloorStartTouch { .. })), 2);
}
