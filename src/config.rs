use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::tool::Tool;

pub const DEFAULT_EXTRACT_DIR: &str = "./extracted_apk";
pub const DEFAULT_SMALI_DIR: &str = "./smali_output";
pub const DEX_FILE_NAME: &str = "classes.dex";

/// Everything a single decompilation run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub apk_path: PathBuf,
    pub extract_dir: PathBuf,
    pub smali_dir: PathBuf,
    pub unzip: Tool,
    pub baksmali: Tool,
    /// Upper limit for each external process, `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Location of the dex file once the APK has been extracted.
pub fn dex_path(extract_dir: &Path) -> PathBuf {
    extract_dir.join(DEX_FILE_NAME)
}
