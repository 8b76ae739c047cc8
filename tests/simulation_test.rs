use std::process::Command;

fn run_headless(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_avenue_sim"))
        .args(args)
        .env("RUST_LOG", "warn,avenue_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode until every car has left
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&["--cars", "10", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
    assert!(stderr.contains("Total cars: 10"), "Missing car count");
}

/// Test that each snapshot is emitted as a JSON line
#[test]
fn test_json_output() {
    let output = run_headless(&["--cars", "3", "--seed", "1", "--json"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("Line is not JSON"))
        .collect();

    assert!(lines.len() >= 3);
    assert_eq!(
        lines[0]["carInitialPositions"].as_array().map(Vec::len),
        Some(3)
    );
    assert_eq!(lines[1]["trafficLights"].as_array().map(Vec::len), Some(2));
    assert_eq!(lines[lines.len() - 1]["carCount"], 3);
}

/// Test that an avenue too short for its intersections is rejected
#[test]
fn test_invalid_lane_length_fails() {
    let output = run_headless(&["--lane-length", "2"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "stderr: {}", stderr);
}
