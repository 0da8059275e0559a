use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Pipeline stage, used to tell the user where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Verify,
    CreateDirectory,
    Extract,
    Decompile,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(match self {
            Self::Verify => "verify",
            Self::CreateDirectory => "create directory",
            Self::Extract => "extract",
            Self::Decompile => "decompile",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Input file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction failed: {0}")]
    Extraction(#[source] ToolFailure),

    #[error("Decompilation failed: {0}")]
    Decompilation(#[source] ToolFailure),
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Self::MissingInput(_) => Stage::Verify,
            Self::DirectoryCreation { .. } => Stage::CreateDirectory,
            Self::Extraction(_) => Stage::Extract,
            Self::Decompilation(_) => Stage::Decompile,
        }
    }

    /// Process exit status reported by the binary, distinct per stage and
    /// from the 2 clap uses for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self.stage() {
            Stage::Verify => 3,
            Stage::CreateDirectory => 4,
            Stage::Extract => 5,
            Stage::Decompile => 6,
        }
    }
}

/// Why an external tool did not complete successfully.
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("{program} could not be found, is it installed?")]
    NotFound { program: String },

    #[error("Failed to run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {}s", timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },

    #[error("{program} exited with {}{}", exit_code_to_string(*code), stderr_suffix(stderr))]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_code_to_string(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |code| format!("status {code}"))
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
