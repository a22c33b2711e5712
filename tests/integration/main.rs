//! Integration tests for bower-gate

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn bower_gate() -> Command {
        let mut cmd = cargo_bin_cmd!("bower-gate");
        cmd.env_remove("BOWER_GATE_CONFIG");
        cmd
    }

    /// Write a bower-gate.toml into `dir` and return its path
    fn write_config(dir: &Path, installer: &str, extra: &str) -> PathBuf {
        fs::create_dir_all(dir.join("public")).unwrap();
        let path = dir.join("bower-gate.toml");
        fs::write(
            &path,
            format!(
                r#"
[paths]
public_root = "public"
cache_root = "cache"

[bower]
directory = "lib"

[bower.dependencies]
jquery = "1.9.0"

[installer]
command = "{installer}"
{extra}
"#
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn help_displays() {
        bower_gate()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("boot-time Bower"));
    }

    #[test]
    fn version_displays() {
        bower_gate()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("bower-gate"));
    }

    #[test]
    fn completions_generate() {
        bower_gate()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("bower-gate"));
    }

    #[test]
    fn missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        bower_gate()
            .current_dir(dir.path())
            .args(["--config", "nope.toml", "check"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "bower", "");

        let first = bower_gate()
            .current_dir(dir.path())
            .arg("fingerprint")
            .assert()
            .success()
            .stdout(predicate::str::is_match("^[0-9a-f]{64}\n$").unwrap())
            .get_output()
            .stdout
            .clone();

        let second = bower_gate()
            .current_dir(dir.path())
            .arg("fingerprint")
            .output()
            .unwrap()
            .stdout;
        assert_eq!(first, second);
    }

    #[test]
    fn check_reports_pending_install_without_writing() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "bower", "");

        bower_gate()
            .current_dir(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Install needed"));

        bower_gate()
            .current_dir(dir.path())
            .args(["check", "--exit-code"])
            .assert()
            .code(1);

        assert!(!dir.path().join("cache").join(".bower-checksum").exists());
        assert!(!dir.path().join("public").join("bower.json").exists());
    }

    #[test]
    fn config_show_and_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "bower", "");

        bower_gate()
            .current_dir(dir.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[bower]"))
            .stdout(predicate::str::contains("jquery"));

        bower_gate()
            .current_dir(dir.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(path.display().to_string()));
    }

    #[cfg(unix)]
    mod boot {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Stub installer that records its arguments and exits with `code`
        fn fake_bower(dir: &Path, code: i32) -> String {
            let path = dir.join("fake-bower");
            fs::write(
                &path,
                format!(
                    "#!/bin/sh\n\
                     test -f bower.json || exit 42\n\
                     test -f .bowerrc || exit 43\n\
                     echo \"$@\" >> \"{log}\"\n\
                     echo \"resolving jquery\"\n\
                     echo \"warn something\" >&2\n\
                     exit {code}\n",
                    log = dir.join("calls.log").display(),
                ),
            )
            .unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path.display().to_string()
        }

        fn calls(dir: &Path) -> usize {
            fs::read_to_string(dir.join("calls.log"))
                .map(|s| s.lines().count())
                .unwrap_or(0)
        }

        #[test]
        fn boot_installs_once_then_skips() {
            let dir = TempDir::new().unwrap();
            let installer = fake_bower(dir.path(), 0);
            write_config(dir.path(), &installer, "");

            bower_gate()
                .current_dir(dir.path())
                .arg("boot")
                .assert()
                .success()
                .stdout(predicate::str::contains("Dependencies installed"))
                .stderr(predicate::str::contains("resolving jquery"))
                .stderr(predicate::str::contains("warn something"));
            assert_eq!(calls(dir.path()), 1);
            assert!(dir.path().join("public").join("lib").is_dir());
            assert!(dir.path().join("cache").join(".bower-checksum").is_file());
            assert!(!dir.path().join("public").join("bower.json").exists());
            assert!(!dir.path().join("public").join(".bowerrc").exists());

            bower_gate()
                .current_dir(dir.path())
                .arg("boot")
                .assert()
                .success()
                .stdout(predicate::str::contains("up to date"));
            assert_eq!(calls(dir.path()), 1);
            assert!(!dir.path().join("public").join("bower.json").exists());
        }

        #[test]
        fn reset_forces_reinstall() {
            let dir = TempDir::new().unwrap();
            let installer = fake_bower(dir.path(), 0);
            write_config(dir.path(), &installer, "");

            bower_gate().current_dir(dir.path()).arg("boot").assert().success();
            bower_gate()
                .current_dir(dir.path())
                .arg("reset")
                .assert()
                .success()
                .stdout(predicate::str::contains("Removed"));
            bower_gate().current_dir(dir.path()).arg("boot").assert().success();

            assert_eq!(calls(dir.path()), 2);
        }

        #[test]
        fn failed_install_fails_boot() {
            let dir = TempDir::new().unwrap();
            let installer = fake_bower(dir.path(), 7);
            write_config(dir.path(), &installer, "");

            bower_gate()
                .current_dir(dir.path())
                .arg("boot")
                .assert()
                .failure()
                .stderr(predicate::str::contains("Installer failed (exit code: 7)"));
            assert!(!dir.path().join("public").join("bower.json").exists());
            assert!(!dir.path().join("public").join(".bowerrc").exists());
        }

        #[test]
        fn warn_policy_continues_after_failure() {
            let dir = TempDir::new().unwrap();
            let installer = fake_bower(dir.path(), 7);
            write_config(dir.path(), &installer, "on_failure = \"warn\"");

            bower_gate()
                .current_dir(dir.path())
                .arg("boot")
                .assert()
                .success()
                .stdout(predicate::str::contains("continuing"));
        }

        #[test]
        fn allow_root_is_forwarded() {
            let dir = TempDir::new().unwrap();
            let installer = fake_bower(dir.path(), 0);
            let config = write_config(dir.path(), &installer, "");
            let text = fs::read_to_string(&config)
                .unwrap()
                .replace("directory = \"lib\"", "directory = \"lib\"\nallow_root = true");
            fs::write(&config, text).unwrap();

            bower_gate().current_dir(dir.path()).arg("boot").assert().success();

            let log = fs::read_to_string(dir.path().join("calls.log")).unwrap();
            assert_eq!(log.trim(), "update --allow-root");
        }

        #[test]
        fn missing_installer_reports_hint() {
            let dir = TempDir::new().unwrap();
            write_config(dir.path(), "/nonexistent/bower", "");

            bower_gate()
                .current_dir(dir.path())
                .arg("boot")
                .assert()
                .failure()
                .stderr(predicate::str::contains("exit code: none"))
                .stderr(predicate::str::contains("npm install -g bower"));
        }
    }
}
