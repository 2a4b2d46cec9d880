use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

// Builds runtime_main and returns its path from cargo's JSON messages
fn get_binary_path() -> Result<PathBuf, String> {
    let output = Command::new(env!("CARGO"))
        .arg("build")
        .arg("--bin")
        .arg("runtime_main")
        .arg("--message-format=json")
        .output()
        .map_err(|e| format!("Failed to execute cargo build: {e}"))?;

    if !output.status.success() {
        return Err(format!(
            "Cargo build failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let reader = BufReader::new(output.stdout.as_slice());
    for line in reader.lines() {
        let line = line.map_err(|e| format!("Failed to read line: {e}"))?;
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&line) {
            if json["reason"] == "compiler-artifact" && json["target"]["name"] == "runtime_main" {
                if let Some(executable) = json["executable"].as_str() {
                    return Ok(PathBuf::from(executable));
                }
            }
        }
    }
    Err("Could not find executable path from cargo build output".to_string())
}

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("runtime crate lives two levels below the workspace root")
        .to_path_buf()
}

struct RunOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

fn drain(mut pipe: impl Read + Send + 'static) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        let _ = pipe.read_to_string(&mut text);
        text
    })
}

fn run_runtime(args: &[&str]) -> RunOutput {
    let binary_path = get_binary_path().unwrap_or_else(|e| panic!("Failed to get binary path: {e}"));

    let mut child = Command::new(binary_path)
        .args(args)
        .current_dir(workspace_root())
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn runtime_main process");

    let stdout_handle = drain(child.stdout.take().expect("Failed to capture stdout"));
    let stderr_handle = drain(child.stderr.take().expect("Failed to capture stderr"));

    let timeout = Duration::from_secs(30);
    let start = std::time::Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().expect("Failed to wait for runtime_main") {
            break status;
        }
        if start.elapsed() > timeout {
            child.kill().expect("Failed to kill timed-out process");
            panic!("runtime_main process timed out after {timeout:?}");
        }
        thread::sleep(Duration::from_millis(50));
    };

    let output = RunOutput {
        status,
        stdout: stdout_handle.join().expect("Stdout reader thread panicked"),
        stderr: stderr_handle.join().expect("Stderr reader thread panicked"),
    };
    eprintln!("--- runtime_main STDOUT ---\n{}", output.stdout);
    eprintln!("--- runtime_main STDERR ---\n{}", output.stderr);
    output
}

#[test]
fn default_scene_runs_headless() {
    let output = run_runtime(&["--ticks", "120", "--report-every", "30"]);
    assert!(output.status.success(), "runtime_main exited with {:?}", output.status.code());
    assert!(output.stdout.contains("Running in headless mode"));
    assert!(output.stdout.contains("Simulation finished"));
    assert!(output.stdout.contains("tick=120"));
}

#[test]
fn scene_file_runs_at_double_speed() {
    let output = run_runtime(&[
        "--scene",
        "crates/scene/tests/data/launch.json",
        "--ticks",
        "60",
        "--speed",
        "2.0",
    ]);
    assert!(output.status.success(), "runtime_main exited with {:?}", output.status.code());
    assert!(!output.stdout.contains("Running in headless mode"));
    assert!(output.stdout.contains("Simulation finished"));
}

#[test]
fn fast_run_stops_at_requested_tick() {
    let output = run_runtime(&["--ticks", "61", "--speed", "2", "--report-every", "0"]);
    assert!(output.status.success(), "runtime_main exited with {:?}", output.status.code());
    assert!(output.stdout.contains("tick=61"));
    assert!(!output.stdout.contains("tick=62"));
}

#[test]
fn bad_arguments_fail() {
    let output = run_runtime(&["--ticks", "10", "--speed", "0"]);
    assert!(!output.status.success());
    assert!(output.stderr.contains("speed must be positive"));

    let output = run_runtime(&["--scene", "does/not/exist.json"]);
    assert!(!output.status.success());
    assert!(output.stderr.contains("cannot read scene"));
}
