#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_file(&self, file_name: &str) -> PathBuf {
        self.dir.path().join("store").join(file_name)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.store_file("%40lazytask_tasks.json")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.store_file("app_settings.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_json(&self, path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = lazytask_cmd();
        cmd.env("LAZYTASK_DATA_DIR", self.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

pub fn lazytask_cmd() -> Command {
    Command::cargo_bin("lazytask").expect("lazytask binary")
}
