//! Test doubles for the filesystem and process capabilities.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::ToolFailure;
use crate::filesystem::FileSystem;
use crate::process::ProcessRunner;
use crate::tool::Invocation;

/// In-memory filesystem. Directory creation can be made to fail.
#[derive(Debug, Default)]
pub struct FakeFileSystem {
    files: BTreeSet<PathBuf>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    created: RefCell<Vec<PathBuf>>,
    fail_create: Option<std::io::ErrorKind>,
}

impl FakeFileSystem {
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.borrow_mut().insert(path.into());
        self
    }

    pub fn failing_create(mut self, kind: std::io::ErrorKind) -> Self {
        self.fail_create = Some(kind);
        self
    }

    /// Directories passed to `create_dir_all`, in call order.
    pub fn created(&self) -> Vec<PathBuf> {
        self.created.borrow().clone()
    }
}

impl FileSystem for FakeFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        self.created.borrow_mut().push(path.to_path_buf());
        if let Some(kind) = self.fail_create {
            return Err(std::io::Error::new(kind, "Error creating directory"));
        }
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}

/// Records every invocation and answers with scripted results. Once the
/// script is exhausted every run succeeds.
#[derive(Debug, Default)]
pub struct FakeRunner {
    results: RefCell<VecDeque<Result<(), ToolFailure>>>,
    calls: RefCell<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn then(self, result: Result<(), ToolFailure>) -> Self {
        self.results.borrow_mut().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(Invocation::program_name)
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolFailure> {
        self.calls.borrow_mut().push(invocation.clone());
        self.results.borrow_mut().pop_front().unwrap_or(Ok(()))
    }
}

pub fn exit_failure(program: &str, code: i32) -> Result<(), ToolFailure> {
    Err(ToolFailure::ExitStatus {
        program: program.to_string(),
        code: Some(code),
        stderr: String::new(),
    })
}

pub fn launch_failure(program: &str) -> Result<(), ToolFailure> {
    Err(ToolFailure::Launch {
        program: program.to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })
}
