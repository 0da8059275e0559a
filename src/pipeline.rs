use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::{dex_path, Config};
use crate::error::{Error, Stage};
use crate::filesystem::FileSystem;
use crate::process::ProcessRunner;
use crate::tool::Tool;

/// Paths produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub dex_path: PathBuf,
    pub smali_dir: PathBuf,
}

/// Extracts an APK and disassembles its `classes.dex` into smali. Every step
/// has to succeed before the next one starts, nothing is retried and partial
/// output is left in place on failure.
#[derive(Debug)]
pub struct Pipeline<F, R> {
    fs: F,
    runner: R,
    unzip: Tool,
    baksmali: Tool,
}

impl<F: FileSystem, R: ProcessRunner> Pipeline<F, R> {
    pub fn new(fs: F, runner: R, unzip: Tool, baksmali: Tool) -> Self {
        Self {
            fs,
            runner,
            unzip,
            baksmali,
        }
    }

    /// Pipeline running the tools named in `config`.
    pub fn with_config(fs: F, runner: R, config: &Config) -> Self {
        Self::new(fs, runner, config.unzip.clone(), config.baksmali.clone())
    }

    pub fn verify_file_path(&self, path: &Path) -> Result<(), Error> {
        if self.fs.is_file(path) {
            Ok(())
        } else {
            Err(Error::MissingInput(path.to_path_buf()))
        }
    }

    /// Makes sure `dir` exists, leaving existing contents alone.
    pub fn create_output_dir(&self, dir: &Path) -> Result<(), Error> {
        if self.fs.is_dir(dir) {
            return Ok(());
        }

        log::debug!("Creating directory {}", dir.display());
        self.fs
            .create_dir_all(dir)
            .map_err(|source| Error::DirectoryCreation {
                path: dir.to_path_buf(),
                source,
            })
    }

    pub fn unzip_apk(&self, apk_path: &Path, extract_dir: &Path) -> Result<(), Error> {
        self.create_output_dir(extract_dir)?;

        let args = [
            OsStr::new("-o"),
            apk_path.as_os_str(),
            OsStr::new("-d"),
            extract_dir.as_os_str(),
        ];
        let invocation = self.unzip.invocation(args).map_err(Error::Extraction)?;
        self.runner.run(&invocation).map_err(Error::Extraction)
    }

    pub fn decompile_dex_to_smali(&self, dex_path: &Path, smali_dir: &Path) -> Result<(), Error> {
        self.create_output_dir(smali_dir)?;

        let args = [
            OsStr::new("d"),
            dex_path.as_os_str(),
            OsStr::new("-o"),
            smali_dir.as_os_str(),
        ];
        let invocation = self
            .baksmali
            .invocation(args)
            .map_err(Error::Decompilation)?;
        self.runner.run(&invocation).map_err(Error::Decompilation)
    }

    pub fn run(&self, config: &Config) -> Result<Outcome, Error> {
        let apk_path = config.apk_path.as_path();
        let extract_dir = config.extract_dir.as_path();
        let smali_dir = config.smali_dir.as_path();

        log::info!("[{}] {}", Stage::Verify, apk_path.display());
        self.verify_file_path(apk_path)?;

        log::info!("[{}] {}", Stage::Extract, extract_dir.display());
        self.unzip_apk(apk_path, extract_dir)?;

        let dex_path = dex_path(extract_dir);
        log::info!("[{}] {}", Stage::Decompile, dex_path.display());
        self.decompile_dex_to_smali(&dex_path, smali_dir)?;

        Ok(Outcome {
            dex_path,
            smali_dir: smali_dir.to_path_buf(),
        })
    }
}
