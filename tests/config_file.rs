//! Loading tuning from disk and installing it into an app.

use std::fs;
use std::path::PathBuf;

use brood::{CameraSettings, GameConfig, PlayerController, PlayerSettings, WorldSettings};
use rstest::{fixture, rstest};
use test_utils::headless_app;

/// Writes `contents` to a file unique to this test process.
fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("brood-{}-{name}.json", std::process::id()));
    fs::write(&path, contents).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
    path
}

#[fixture]
fn tuned() -> GameConfig {
    let path = write_config(
        "tuned",
        r#"{
            "player": { "max_airborne_jumps": 3, "move_speed": 7.5 },
            "camera": { "initial_distance": 9.0 },
            "world": { "total_ducklings": 12, "seed": 42 }
        }"#,
    );
    let config = GameConfig::load(&path).unwrap_or_else(|e| panic!("{e}"));
    fs::remove_file(&path).unwrap_or_else(|e| panic!("cleanup: {e}"));
    config
}

#[rstest]
fn file_values_override_defaults(tuned: GameConfig) {
    assert_eq!(tuned.player.max_airborne_jumps, 3);
    assert!((tuned.player.move_speed - 7.5).abs() < f32::EPSILON);
    assert_eq!(tuned.world.total_ducklings, 12);
    assert_eq!(tuned.world.seed, Some(42));
    assert_eq!(tuned.ducklings, GameConfig::default().ducklings);
}

#[rstest]
fn installed_config_reaches_the_plugin(tuned: GameConfig) {
    let app = headless_app(tuned);
    let world = app.world();
    assert_eq!(world.resource::<PlayerSettings>().max_airborne_jumps, 3);
    assert_eq!(world.resource::<WorldSettings>().seed, Some(42));
    assert!((world.resource::<CameraSettings>().initial_distance - 9.0).abs() < f32::EPSILON);
    let orbit = world.resource::<PlayerController>().camera().distance;
    assert!((orbit - 9.0).abs() < f32::EPSILON);
}

#[test]
fn out_of_range_file_is_rejected() {
    let path = write_config("invalid", r#"{ "player": { "gravity": 4.0 } }"#);
    let result = GameConfig::load(&path);
    fs::remove_file(&path).unwrap_or_else(|e| panic!("cleanup: {e}"));
    let err = result.err().unwrap_or_else(|| panic!("upward gravity should be rejected"));
    assert!(err.to_string().contains("player.gravity"), "{err}");
}
