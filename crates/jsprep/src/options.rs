// crates/jsprep/src/options.rs
//
// Command-line arguments plus an optional TOML config file. Command-line
// values always win over file values.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG: &str = "jsprep.toml";
const DEFAULT_TESTDIR: &str = "testfiles";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "jsprep",
    version,
    about = "Resolve comment-embedded directives in JavaScript sources"
)]
pub struct Args {
    /// Predefine a variable; VALUE defaults to 0
    #[arg(long = "def", value_name = "NAME[=VALUE]")]
    pub defs: Vec<String>,

    /// Parse a single file and print the result to stdout
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Process every file under this directory
    #[arg(short = 's', long = "srcdir", value_name = "DIR")]
    pub srcdir: Option<PathBuf>,

    /// Output directory for --srcdir mode
    #[arg(short = 'd', long = "dstdir", value_name = "DIR")]
    pub dstdir: Option<PathBuf>,

    /// Skip DIR (relative to srcdir) and everything under it
    #[arg(short = 'e', long = "exclude", value_name = "DIR")]
    pub excludes: Vec<String>,

    /// Save mismatching test output next to the expectation file
    #[arg(long)]
    pub savefail: bool,

    /// Run every test case under the test directory
    #[arg(long)]
    pub testall: bool,

    /// Run a single test case by number (numbering starts at 0)
    #[arg(long, value_name = "NUM")]
    pub test: Option<usize>,

    /// Directory scanned for in.js/out.js test pairs
    #[arg(long, value_name = "DIR")]
    pub testdir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Configuration that can be loaded from a `jsprep.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub defs: Option<Vec<String>>,
    pub srcdir: Option<PathBuf>,
    pub dstdir: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub testdir: Option<PathBuf>,
    pub savefail: Option<bool>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// The merged settings the rest of the program runs on.
#[derive(Debug)]
pub struct Options {
    pub defs: Vec<String>,
    pub file: Option<PathBuf>,
    pub srcdir: Option<PathBuf>,
    pub dstdir: Option<PathBuf>,
    pub excludes: Vec<String>,
    pub savefail: bool,
    pub testall: bool,
    pub test: Option<usize>,
    pub testdir: PathBuf,
}

impl Options {
    /// Merge command-line arguments with the config file, if any. An
    /// explicitly named config file must load; the default location is
    /// probed and silently skipped when absent.
    pub fn from_args_and_config(args: Args) -> Result<Self, ConfigError> {
        let file_config = match args.config.as_ref() {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::from_file(Path::new(DEFAULT_CONFIG)).unwrap_or_default(),
        };

        // Definitions are first-wins, so command-line ones take precedence
        // by coming first.
        let mut defs = args.defs;
        defs.extend(file_config.defs.unwrap_or_default());

        let excludes = if args.excludes.is_empty() {
            file_config.exclude.unwrap_or_default()
        } else {
            args.excludes
        };

        Ok(Self {
            defs,
            file: args.file,
            srcdir: args.srcdir.or(file_config.srcdir),
            dstdir: args.dstdir.or(file_config.dstdir),
            excludes,
            savefail: args.savefail || file_config.savefail.unwrap_or(false),
            testall: args.testall,
            test: args.test,
            testdir: args
                .testdir
                .or(file_config.testdir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TESTDIR)),
        })
    }
}
