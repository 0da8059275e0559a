#![deny(elided_lifetimes_in_paths)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(meta_variable_misuse)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![warn(noop_method_call)]
#![deny(single_use_lifetimes)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![warn(unused_crate_dependencies)]
#![deny(unused_import_braces)]
#![deny(unused_lifetimes)]
#![warn(unused_macro_rules)]
#![deny(variant_size_differences)]

pub mod config;
pub mod error;
pub mod filesystem;
pub mod pipeline;
pub mod process;
pub mod summary;
#[cfg(test)]
mod testing;
pub mod tool;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::{Config, DEFAULT_EXTRACT_DIR, DEFAULT_SMALI_DIR};
use crate::filesystem::RealFileSystem;
use crate::pipeline::Pipeline;
use crate::process::SystemRunner;

#[derive(Parser, Debug)]
#[command(version, about = "Extract an APK and disassemble its classes.dex into smali")]
struct Args {
    /// Path to the unzip command
    #[arg(short, long)]
    unzip_path: Option<String>,

    /// Path to the baksmali command or baksmali.jar package
    #[arg(short, long)]
    baksmali_path: Option<String>,

    /// Give up on an external tool after this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Enable debug output, including the output of external tools
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: ArgsCommand,
}

#[derive(Subcommand, Debug)]
enum ArgsCommand {
    /// Decompile APK into smali code
    Decompile {
        apk_path: PathBuf,

        /// Directory the APK contents are extracted to
        #[arg(short, long, default_value = DEFAULT_EXTRACT_DIR)]
        extract_dir: PathBuf,

        /// Directory the smali files are written to
        #[arg(short, long, default_value = DEFAULT_SMALI_DIR)]
        smali_dir: PathBuf,
    },
}

impl Args {
    fn into_config(self) -> Config {
        match self.command {
            ArgsCommand::Decompile {
                apk_path,
                extract_dir,
                smali_dir,
            } => Config {
                apk_path,
                extract_dir,
                smali_dir,
                unzip: tool::locate_unzip(self.unzip_path),
                baksmali: tool::locate_baksmali(self.baksmali_path),
                timeout: self.timeout.map(Duration::from_secs),
            },
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.into_config();
    let pipeline = Pipeline::with_config(
        RealFileSystem,
        SystemRunner::new(config.timeout),
        &config,
    );

    match pipeline.run(&config) {
        Ok(outcome) => {
            summary::report(&outcome);
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("Stage '{}' failed: {error}", error.stage());
            ExitCode::from(error.exit_code())
        }
    }
}
