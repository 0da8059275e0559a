use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::error::ToolFailure;

pub const DEFAULT_UNZIP: &str = "unzip";
pub const DEFAULT_BAKSMALI: &str = "baksmali";
pub const DEFAULT_BAKSMALI_JAR: &str = "baksmali.jar";

/// An external command line tool, either a native executable or a JAR
/// package that has to be started through Java.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    Executable(PathBuf),
    Jar(PathBuf),
}

impl Tool {
    /// Interprets a user-supplied tool path, `.jar` files run through Java.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".jar") {
            Self::Jar(PathBuf::from(path))
        } else {
            Self::Executable(PathBuf::from(path))
        }
    }

    /// Builds the command line running this tool with the given arguments.
    pub fn invocation<I, S>(&self, args: I) -> Result<Invocation, ToolFailure>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut invocation = match self {
            Self::Executable(path) => Invocation::new(path),
            Self::Jar(jar) => {
                let java = which::which("java").map_err(|_| ToolFailure::NotFound {
                    program: "java".to_string(),
                })?;
                let mut invocation = Invocation::new(java);
                invocation.arg("-jar").arg(jar);
                invocation
            }
        };
        for arg in args {
            invocation.arg(arg);
        }
        Ok(invocation)
    }
}

/// Locates the extraction tool, defaulting to `unzip` from `PATH`.
pub fn locate_unzip(unzip_path: Option<String>) -> Tool {
    unzip_path.map_or_else(
        || Tool::Executable(PathBuf::from(DEFAULT_UNZIP)),
        |path| Tool::from_path(&path),
    )
}

/// Locates the disassembler. Without an explicit path a `baksmali` wrapper on
/// `PATH` is preferred, falling back to `baksmali.jar` in the working
/// directory.
pub fn locate_baksmali(baksmali_path: Option<String>) -> Tool {
    if let Some(baksmali_path) = baksmali_path {
        Tool::from_path(&baksmali_path)
    } else if let Ok(baksmali_path) = which::which(DEFAULT_BAKSMALI) {
        Tool::Executable(baksmali_path)
    } else {
        log::debug!(
            "{DEFAULT_BAKSMALI} not found on PATH, falling back to {DEFAULT_BAKSMALI_JAR}"
        );
        Tool::Jar(PathBuf::from(DEFAULT_BAKSMALI_JAR))
    }
}

/// A program with its arguments, ready to be launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Short program name used in diagnostics, e.g. `unzip` for `/usr/bin/unzip`.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
