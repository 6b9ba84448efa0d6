/// Test utilities and mock implementations - never touch real devices.
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::runner::ProcessRunner;

/// Scripted process runner: hands out queued exit codes and records every
/// invocation. An empty queue answers with exit code 0.
#[derive(Clone, Default)]
pub struct MockRunner {
    calls: Arc<Mutex<Vec<(PathBuf, Vec<OsString>)>>>,
    results: Arc<Mutex<Vec<io::Result<i32>>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(code: i32) -> Self {
        let runner = Self::new();
        runner.push_result(Ok(code));
        runner
    }

    pub fn push_result(&self, result: io::Result<i32>) {
        self.results.lock().unwrap().push(result);
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<OsString>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ProcessRunner for MockRunner {
    fn execute(&self, program: &Path, args: &[&OsStr]) -> io::Result<i32> {
        self.calls.lock().unwrap().push((
            program.to_path_buf(),
            args.iter().map(|arg| arg.to_os_string()).collect(),
        ));

        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            Ok(0)
        } else {
            results.remove(0)
        }
    }
}
