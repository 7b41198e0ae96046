/// Smoke tests to verify the binary runs without panicking
use std::io::Write;
use std::process::{Command, Output};

fn skytrace(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute cargo run")
}

#[test]
fn binary_shows_help() {
    let output = skytrace(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("skytrace"), "Help output should mention skytrace");
    assert!(stdout.contains("frame"));
}

#[test]
fn binary_shows_version() {
    let output = skytrace(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = skytrace(&["nonexistent-command"]);

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn frame_renders_every_surface() {
    for surface in ["weather", "route", "map"] {
        let output = skytrace(&["frame", "--surface", surface, "--width", "40", "--height", "12", "--seed", "7"]);

        assert!(
            output.status.success(),
            "frame --surface {} failed: {}",
            surface,
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.lines().count(), 12);
        assert!(stdout.contains("\x1b[48;2;"), "{} output should be truecolor", surface);
    }
}

#[test]
fn frame_rejects_unknown_surface() {
    let output = skytrace(&["frame", "--surface", "radar"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown surface"));
    assert!(!stderr.contains("panicked at"));
}

#[test]
fn frame_replays_route_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"latitude": 40.0, "longitude": -74.0, "timestamp_millis": 0, "speed_mps": 2.0}},
           {{"latitude": 40.001, "longitude": -74.002, "timestamp_millis": 5000, "speed_mps": 6.0}}]"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let output = skytrace(&["frame", "--surface", "route", "--route-file", path, "--network", "2g"]);
    assert!(
        output.status.success(),
        "route replay failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn broken_explicit_config_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[display\n").unwrap();
    let path = file.path().to_str().unwrap();

    let output = skytrace(&["frame", "--config", path]);
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("panicked at"));
}
