use std::process::Command;

fn bomb_arena() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bomb-arena"))
}

#[test]
fn default_round_runs_to_completion() {
    let output = bomb_arena()
        .args(["--ticks", "120", "--render-every", "60", "--seed", "3"])
        .output()
        .expect("failed to launch bomb-arena");

    assert!(output.status.success(), "bomb-arena exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#############"), "frame missing:\n{stdout}");
    assert!(stdout.contains("detonations"), "summary missing:\n{stdout}");
}

#[test]
fn missing_level_file_fails() {
    let output = bomb_arena()
        .args(["--level", "does/not/exist.txt", "--ticks", "1"])
        .output()
        .expect("failed to launch bomb-arena");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read level file"), "{stderr}");
}

#[test]
fn more_players_than_spawn_points_fails() {
    let output = bomb_arena()
        .args(["--players", "5", "--ticks", "1"])
        .output()
        .expect("failed to launch bomb-arena");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spawn points"), "{stderr}");
}
