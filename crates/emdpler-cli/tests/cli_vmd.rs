use std::process::Command;

fn cli_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_emdpler-rs"))
}

#[test]
fn print_input_renders_the_deck_without_a_solver() {
    let output = cli_command()
        .args([
            "vmd",
            "--offset",
            "100",
            "--res",
            "100,100",
            "--thk",
            "50",
            "--print-input",
        ])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("utf-8 deck");
    assert!(stdout.starts_with("DIPOLE CHARACTERISTIC PARAMETERS:"));
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[lines.len() - 2], "    2");
    assert_eq!(lines[lines.len() - 1], " 100.000  100.000  50.000");
}

#[test]
fn missing_model_is_a_usage_error() {
    let output = cli_command()
        .args(["vmd", "--offset", "100"])
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--res or --model"));
}

#[test]
fn bad_list_entry_is_a_usage_error() {
    let output = cli_command()
        .args(["vmd", "--offset", "100", "--res", "100,abc", "--print-input"])
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn model_file_supplies_the_layer_stack() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let model_path = temp.path().join("model.json");
    std::fs::write(&model_path, r#"{ "res": [100.0, 100.0], "thk": [50.0] }"#)
        .expect("model file writes");

    let output = cli_command()
        .args(["vmd", "--offset", "100", "--print-input"])
        .arg("--model")
        .arg(&model_path)
        .output()
        .expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 deck");
    assert!(stdout.ends_with(" 100.000  100.000  50.000\n"));
}

#[cfg(unix)]
#[test]
fn json_output_carries_the_decoded_sweeps() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::TempDir::new().expect("tempdir");
    let solver = temp.path().join("emdpler");
    std::fs::write(
        &solver,
        "#!/bin/sh\n\
         echo '100000.0 1.5 190.0' > RESULT1.DAT\n\
         echo '31.6 0.9 45.0' > RESULT2.DAT\n\
         echo '100000.0 0.99 12.0' > RESULT3.DAT\n\
         exit 0\n",
    )
    .expect("solver script writes");
    let mut permissions = std::fs::metadata(&solver).expect("metadata").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&solver, permissions).expect("chmod");

    let output = cli_command()
        .args(["vmd", "--offset", "100", "--res", "100", "--json"])
        .arg("--exe")
        .arg(&solver)
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["frequency"]["freq"][0], 100000.0);
    assert_eq!(value["frequency"]["phase"][0], 10.0);
    assert_eq!(value["induction"]["induction_number"][0], 31.6);
}

#[cfg(unix)]
#[test]
fn failing_solver_maps_to_the_run_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::TempDir::new().expect("tempdir");
    let solver = temp.path().join("emdpler");
    std::fs::write(&solver, "#!/bin/sh\nexit 9\n").expect("solver script writes");
    let mut permissions = std::fs::metadata(&solver).expect("metadata").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&solver, permissions).expect("chmod");

    let output = cli_command()
        .args(["vmd", "--offset", "100", "--res", "100"])
        .arg("--exe")
        .arg(&solver)
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exit code 9"));
}
