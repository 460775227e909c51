#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A service directory plus a scratch area for stub binaries and config.
pub struct Fixture {
    pub service: TempDir,
    pub bins: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            service: TempDir::new().unwrap(),
            bins: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.service.path()
    }

    pub fn canonical_root(&self) -> PathBuf {
        fs::canonicalize(self.root()).unwrap()
    }

    pub fn write(&self, name: &str, contents: &str) -> &Self {
        fs::write(self.root().join(name), contents).unwrap();
        self
    }

    pub fn exists(&self, name: &str) -> bool {
        self.root().join(name).exists()
    }

    /// Where stub binaries record the arguments they were called with.
    pub fn args_log(&self) -> PathBuf {
        self.bins.path().join("args.log")
    }

    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.args_log())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    /// Write an executable shell stub that logs its argv and then runs `body`.
    pub fn stub(&self, name: &str, body: &str) -> PathBuf {
        let path = self.bins.path().join(name);
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n{body}\n",
            self.args_log().display()
        );
        fs::write(&path, script).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
        }

        path
    }

    /// The binary, pointed at this fixture and isolated from user config.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("python-requirements");
        cmd.arg("--service-path")
            .arg(self.root())
            .env(
                "PYTHON_REQUIREMENTS_CONFIG",
                self.bins.path().join("config.toml"),
            )
            .env("RUST_LOG", "info")
            .env_remove("PYTHON_REQUIREMENTS_BIN_PIP")
            .env_remove("PYTHON_REQUIREMENTS_BIN_DOCKER")
            .env_remove("PYTHON_REQUIREMENTS_BIN_PYTHON");
        cmd
    }
}

/// Stub pip that installs a single module into `.requirements`.
pub const INSTALLING_PIP: &str = "mkdir -p .requirements/six_pkg\n\
     echo '# six' > .requirements/six.py\n\
     echo '' > .requirements/six_pkg/__init__.py";

pub const CONFLICTING_PIP: &str = "echo conflict >&2\nexit 1";
