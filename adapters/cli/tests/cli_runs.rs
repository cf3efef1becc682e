use std::process::Command;

fn galaxy_shooter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_galaxy-shooter"))
}

#[test]
fn dump_config_prints_parseable_toml() {
    let output = galaxy_shooter()
        .args(["--dump-config", "--seed", "42"])
        .output()
        .expect("failed to invoke galaxy-shooter");

    assert!(output.status.success(), "--dump-config should succeed");
    let rendered = String::from_utf8(output.stdout).expect("utf-8 output");
    let config =
        galaxy_shooter_simulation::parse_config(&rendered).expect("dumped config parses back");
    assert_eq!(config.seed, 42);
}

#[test]
fn headless_session_prints_summary() {
    let output = galaxy_shooter()
        .args(["--ticks", "300", "--hz", "30"])
        .output()
        .expect("failed to invoke galaxy-shooter");

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("Welcome to Galaxy Shooter."));
    assert!(stdout.contains("score:"));
}

#[test]
fn missing_config_file_fails() {
    let output = galaxy_shooter()
        .args(["--config", "/definitely/not/here.toml"])
        .output()
        .expect("failed to invoke galaxy-shooter");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("/definitely/not/here.toml"));
}

#[test]
fn dumped_config_loads_back_through_the_config_flag() {
    let dumped = galaxy_shooter()
        .args(["--dump-config", "--seed", "7"])
        .output()
        .expect("failed to invoke galaxy-shooter");
    assert!(dumped.status.success(), "--dump-config should succeed");

    let path = std::path::Path::new(env!("CARGO_TARGET_TMPDIR"))
        .join(format!("dumped-config-{}.toml", std::process::id()));
    std::fs::write(&path, &dumped.stdout).expect("write dumped config");

    let reloaded = galaxy_shooter()
        .arg("--config")
        .arg(&path)
        .arg("--dump-config")
        .output()
        .expect("failed to invoke galaxy-shooter");
    let run = galaxy_shooter()
        .arg("--config")
        .arg(&path)
        .args(["--ticks", "120", "--hz", "30"])
        .output()
        .expect("failed to invoke galaxy-shooter");
    std::fs::remove_file(&path).expect("remove dumped config");

    assert!(
        reloaded.status.success(),
        "{}",
        String::from_utf8_lossy(&reloaded.stderr)
    );
    assert_eq!(reloaded.stdout, dumped.stdout, "dump is a fixed point");
    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
    let stdout = String::from_utf8(run.stdout).expect("utf-8 output");
    assert!(stdout.contains("score:"));
}
