#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use folder_audit::config::AuditConfig;
use folder_audit::log::Logger;
use folder_audit::pipeline::{Orchestrator, RunOutcome};
use tempfile::TempDir;

/// Scratch input folder plus a separate root for output folders.
pub struct TestEnv {
    _tmp: TempDir,
    pub input: PathBuf,
    pub out: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let input = tmp.path().join("input");
        let out = tmp.path().join("out");
        fs::create_dir_all(&input).expect("create input folder");
        fs::create_dir_all(&out).expect("create output root");
        Self {
            _tmp: tmp,
            input,
            out,
        }
    }

    pub fn file(&self, name: &str, bytes: impl AsRef<[u8]>) -> &Self {
        fs::write(self.input.join(name), bytes).expect("write input file");
        self
    }

    pub fn orchestrator(&self) -> Orchestrator {
        let config = AuditConfig {
            output_root: Some(self.out.clone()),
            ..AuditConfig::default()
        };
        Orchestrator::new(config).with_logger(Logger::silent())
    }

    pub fn run(&self) -> (RunOutcome, Orchestrator) {
        let mut orch = self.orchestrator();
        let outcome = orch.run(&self.input);
        (outcome, orch)
    }

    pub fn output_folders(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(&self.out)
            .expect("list output root")
            .map(|e| e.expect("dir entry").path())
            .collect();
        dirs.sort();
        dirs
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output file")
}
