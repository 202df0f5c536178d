// Shared test helpers for integration tests
#![allow(dead_code)]

use script_acceptance::execution::{RunContext, RunOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{TempDir, tempdir};

/// The four scripts of the acceptance scenarios, written for the `cat`
/// collaborator: each script file holds exactly what the interpreter prints.
/// `counter` is deliberately off by one.
pub const SCENARIO_SCRIPTS: &[(&str, &str)] = &[
    ("exp", "4294967296\n256\n"),
    ("fibonacci", "55\n"),
    ("counter", "-3\n200\n"),
    ("object", "o1\no2\no3\no2\n"),
];

/// Writes `<name>.script` files into `dir`.
pub fn write_scripts(dir: &Path, scripts: &[(&str, &str)]) {
    fs::create_dir_all(dir).expect("Failed to create scripts directory");
    for (name, content) in scripts {
        fs::write(dir.join(format!("{name}.script")), content).expect("Failed to write script");
    }
}

/// A temporary directory holding the given scripts directly.
pub fn scripts_dir_with(scripts: &[(&str, &str)]) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    write_scripts(temp_dir.path(), scripts);
    temp_dir
}

/// A context whose "interpreter" is `program` run on the script file.
pub fn context_for(program: &str, scripts_dir: &Path) -> RunContext {
    RunContext {
        program: program.to_string(),
        args: vec![],
        scripts_dir: scripts_dir.to_path_buf(),
        extension: "script".to_string(),
        working_dir: None,
        timeout: Some(Duration::from_secs(10)),
    }
}

/// `cat` prints the script verbatim, which makes the script its own expected output.
pub fn cat_context(scripts_dir: &Path) -> RunContext {
    context_for("cat", scripts_dir)
}

/// `sh` executes the script, for collaborators that write to stderr, exit non-zero or hang.
pub fn sh_context(scripts_dir: &Path) -> RunContext {
    context_for("sh", scripts_dir)
}

pub fn quiet_options() -> RunOptions {
    RunOptions {
        quiet: true,
        ..RunOptions::default()
    }
}

/// Writes a `Harness.toml` with the given body into `dir` and returns its path.
pub fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("Harness.toml");
    fs::write(&path, body).expect("Failed to write Harness.toml");
    path
}

/// A project layout with `scripts/` holding the scenario scripts and a
/// `Harness.toml` that runs them through `cat`.
pub fn scenario_project() -> (TempDir, PathBuf) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    write_scripts(&temp_dir.path().join("scripts"), SCENARIO_SCRIPTS);
    let config = write_config(
        temp_dir.path(),
        r#"
language = "en"
command = "cat"
scripts_dir = "scripts"
timeout_secs = 10

[[cases]]
name = "exp"
expected = ["4294967296", "256"]

[[cases]]
name = "fibonacci"
expected = ["55"]

[[cases]]
name = "counter"
expected = ["-3", "201"]

[[cases]]
name = "object"
expected = ["o1", "o2", "o3", "o2"]
"#,
    );
    (temp_dir, config)
}
