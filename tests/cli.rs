//! End-to-end tests for the `bitloop` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An install root with a one-file template and an empty working directory
struct Install {
    _dir: TempDir,
    root: PathBuf,
    work: PathBuf,
}

impl Install {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("bitloop");
        let work = dir.path().join("work");
        let template = root.join("framework/templates/default/SIM_NAME");
        fs::create_dir_all(&template).unwrap();
        fs::create_dir_all(&work).unwrap();
        fs::write(template.join("SIM_NAME.cpp"), "#include \"SIM_NAME.h\"\nSIM_BEG({SIM_NAME})\n")
            .unwrap();

        Self {
            _dir: dir,
            root,
            work,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bitloop").unwrap();
        cmd.current_dir(&self.work).env("BITLOOP_ROOT", &self.root);
        cmd
    }

    #[cfg(unix)]
    fn fake_vcpkg(&self, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let dir = self.root.join("vcpkg");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vcpkg");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn missing_command_prints_usage() {
    let install = Install::new();
    install
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn new_requires_known_entity() {
    let install = Install::new();
    install.cmd().arg("new").assert().failure();
    install.cmd().args(["new", "widget"]).assert().failure();
    assert!(entries(&install.work).is_empty());
}

#[test]
fn new_project_with_name() {
    let install = Install::new();
    install
        .cmd()
        .args(["new", "project", "Tiger"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created new project 'Tiger'"));

    let source = install.work.join("Tiger/SIM_NAME/SIM_NAME.cpp");
    assert_eq!(
        fs::read_to_string(source).unwrap(),
        "#include \"SIM_NAME.h\"\nSIM_BEG(Tiger)\n"
    );
}

#[test]
fn new_project_prompts_for_name() {
    let install = Install::new();
    install
        .cmd()
        .args(["new", "project"])
        .write_stdin("Mandelbrot\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter new project name: "));

    assert!(install.work.join("Mandelbrot/SIM_NAME/SIM_NAME.cpp").is_file());
}

#[test]
fn new_project_with_empty_input_fails() {
    let install = Install::new();
    install
        .cmd()
        .args(["new", "project"])
        .write_stdin("   \n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project name cannot be empty"));

    assert!(entries(&install.work).is_empty());
}

#[test]
fn new_project_into_existing_directory_conflicts() {
    let install = Install::new();
    fs::create_dir(install.work.join("Tiger")).unwrap();
    fs::write(install.work.join("Tiger/main.cpp"), "int main() {}").unwrap();

    install
        .cmd()
        .args(["new", "project", "Tiger"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Conflict"));

    assert_eq!(entries(&install.work.join("Tiger")), vec!["main.cpp".to_string()]);
}

#[cfg(not(target_os = "linux"))]
#[test]
fn bootstrap_refuses_other_platforms() {
    let install = Install::new();
    let profile = install.work.join(".bashrc");
    install
        .cmd()
        .args(["bootstrap", "--profile"])
        .arg(&profile)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("only supported on Linux"));

    assert!(!profile.exists());
}

#[cfg(unix)]
#[test]
fn vcpkg_without_args_forwards_help() {
    let install = Install::new();
    install.fake_vcpkg("echo \"args:$*\"; exit 5");

    install
        .cmd()
        .arg("vcpkg")
        .assert()
        .code(5)
        .stdout("args:--help\n");
}

#[cfg(unix)]
#[test]
fn vcpkg_strips_separator() {
    let install = Install::new();
    install.fake_vcpkg("echo \"args:$*\"");

    install
        .cmd()
        .args(["vcpkg", "--", "--version"])
        .assert()
        .success()
        .stdout("args:--version\n");
}

#[cfg(unix)]
#[test]
fn vcpkg_receives_flags_bitloop_also_defines() {
    let install = Install::new();
    install.fake_vcpkg("echo \"args:$*\"");

    install
        .cmd()
        .args(["vcpkg", "--debug", "install", "fmt"])
        .assert()
        .success()
        .stdout("args:--debug install fmt\n");
}

#[cfg(unix)]
#[test]
fn vcpkg_runs_in_its_own_directory() {
    let install = Install::new();
    install.fake_vcpkg("pwd");
    let expected = install.root.join("vcpkg").canonicalize().unwrap();

    install
        .cmd()
        .args(["vcpkg", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", expected.display())));
}

#[test]
fn vcpkg_missing_binary_fails_to_launch() {
    let install = Install::new();
    install
        .cmd()
        .args(["vcpkg", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to run"));
}

#[cfg(target_os = "linux")]
#[test]
fn bootstrap_twice_keeps_single_profile_entries() {
    let install = Install::new();
    fs::write(install.root.join("bitloop.sh"), "#!/bin/sh\n").unwrap();
    let profile = install.work.join(".bashrc");

    for _ in 0..2 {
        install
            .cmd()
            .env("SHELL", "/bin/sh")
            .args(["bootstrap", "--skip-deps", "--profile"])
            .arg(&profile)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Bootstrap complete: profile, executable bit, symlink",
            ));
    }

    let content = fs::read_to_string(&profile).unwrap();
    assert_eq!(content.matches("export BITLOOP_ROOT=").count(), 1);
    assert_eq!(content.matches("export PATH=\"$BITLOOP_ROOT:$PATH\"").count(), 1);
    assert!(fs::symlink_metadata(install.root.join("bitloop")).is_ok());
}
