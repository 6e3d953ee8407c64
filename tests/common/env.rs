//! Test environment builder for isolated Shipyard testing.
//!
//! Provides `TestEnv` - a git project directory and a separate deployment
//! root standing in for the host, plus helpers to run the CLI.

use std::path::PathBuf;
use std::process::{Command, Output};

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

use super::fixtures::*;

/// Result of running a Shipyard CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Check if command succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse each stdout line as JSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON {l:?}: {e}")))
            .collect()
    }
}

/// Isolated project + deployment root.
pub struct TestEnv {
    /// Git working tree with `shipyard.toml`
    pub project_root: TempDir,
    /// Stands in for `base_remote_path` on the `local` host
    pub deploy_root: TempDir,
    shipyard_bin: PathBuf,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn base_path(&self, relative: &str) -> PathBuf {
        self.deploy_root.path().join(relative)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }

    /// Stage everything (honouring .gitignore) and commit; returns the abbreviated id
    pub fn commit(&self, message: &str) -> String {
        let repo = Repository::open(self.project_root.path()).expect("open repo");
        let mut index = repo.index().expect("index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("add_all");
        index.write().expect("write index");
        let tree = repo
            .find_tree(index.write_tree().expect("write tree"))
            .expect("find tree");
        let sig = Signature::now("Shipyard Test", "test@example.com").expect("signature");
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit");
        self.short_id(&oid.to_string())
    }

    /// Abbreviated id the way shipyard names releases
    pub fn short_id(&self, rev: &str) -> String {
        let repo = Repository::open(self.project_root.path()).expect("open repo");
        let object = repo.revparse_single(rev).expect("revparse");
        let buf = object.short_id().expect("short id");
        buf.as_str().expect("utf-8").to_string()
    }

    /// Populate `build/` the way a real build would
    pub fn write_build(&self) {
        self.write_project_file("build/app.py", APP_SOURCE);
        self.write_project_file("build/project/settings/__init__.py", SETTINGS_MODULE);
        self.write_project_file("build/collected-static/app.css", APP_CSS);
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.shipyard_bin);
        cmd.current_dir(self.project_root.path()).args(args);
        for var in [
            "SHIPYARD_BASE_REMOTE_PATH",
            "SHIPYARD_BUILD_DIR",
            "SHIPYARD_MAX_KEEP",
            "SHIPYARD_CACHE_PREFIX",
            "SHIPYARD_BRANCH",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("Failed to execute shipyard");
        output_to_result(output)
    }

    /// Trimmed content of a stamp file under `build/`
    pub fn read_project_stamp(&self, name: &str) -> String {
        std::fs::read_to_string(self.project_path("build").join(name))
            .unwrap_or_else(|e| panic!("Failed to read stamp {name}: {e}"))
            .trim()
            .to_string()
    }

    pub fn read_base_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.base_path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// Release directory names on the host, sorted
    pub fn releases(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.base_path("code"))
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Builder for `TestEnv`
pub struct TestEnvBuilder {
    config: Option<String>,
    initial_commit: bool,
    build: bool,
}

impl TestEnvBuilder {
    fn new() -> Self {
        Self {
            config: None,
            initial_commit: true,
            build: true,
        }
    }

    /// Custom `shipyard.toml`; `{base}` is replaced with the deployment root
    pub fn with_config(mut self, config: &str) -> Self {
        self.config = Some(config.to_string());
        self
    }

    pub fn without_commit(mut self) -> Self {
        self.initial_commit = false;
        self
    }

    pub fn without_build(mut self) -> Self {
        self.build = false;
        self
    }

    pub fn build(self) -> TestEnv {
        let env = TestEnv {
            project_root: TempDir::new().expect("project tempdir"),
            deploy_root: TempDir::new().expect("deploy tempdir"),
            shipyard_bin: PathBuf::from(env!("CARGO_BIN_EXE_shipyard")),
        };
        Repository::init(env.project_root.path()).expect("git init");

        let config = self
            .config
            .as_deref()
            .unwrap_or(LOCAL_CONFIG)
            .replace("{base}", &env.deploy_root.path().display().to_string());
        env.write_project_file("shipyard.toml", &config);
        env.write_project_file(".gitignore", GITIGNORE);
        env.write_project_file("app.py", APP_SOURCE);
        env.write_project_file("static/app.css", APP_CSS);
        env.write_project_file("templates/base_settings", BASE_SETTINGS_TEMPLATE);

        if self.initial_commit {
            env.commit("initial");
        }
        if self.build {
            env.write_build();
        }
        env
    }
}
