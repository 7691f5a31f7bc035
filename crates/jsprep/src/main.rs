// crates/jsprep/src/main.rs

mod batch;
mod harness;
mod options;

use std::process;

use clap::Parser;
use thiserror::Error;

use jsprep_engine::{MacroError, Preprocessor};
use options::{Args, ConfigError, Options};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Macro(#[from] MacroError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// Apply one `--def NAME[=VALUE]` argument; VALUE defaults to 0.
fn apply_definition(engine: &mut Preprocessor, spec: &str) -> Result<(), CliError> {
    match spec.split_once('=') {
        Some((name, token)) => engine.define(name, token)?,
        None => engine.define_default(spec)?,
    }
    Ok(())
}

fn run(opts: Options) -> Result<(), CliError> {
    let mut engine = Preprocessor::new();
    engine.save_failure_output = opts.savefail;
    for def in &opts.defs {
        apply_definition(&mut engine, def)?;
    }

    if opts.testall || opts.test.is_some() {
        match opts.test {
            Some(number) => println!("Running only test {}.", number),
            None => println!("Running all tests."),
        }
        harness::run_cases(&mut engine, &opts.testdir, opts.test)?;
        println!("Done.");
        return Ok(());
    }

    if let Some(file) = &opts.file {
        print!("{}", engine.parse_file(file)?);
        return Ok(());
    }

    if let Some(dstdir) = &opts.dstdir {
        let srcdir = opts
            .srcdir
            .as_ref()
            .ok_or_else(|| CliError::Usage("--dstdir requires --srcdir".into()))?;
        batch::process_tree(&mut engine, srcdir, dstdir, &opts.excludes)?;
        return Ok(());
    }

    Err(CliError::Usage(
        "nothing to do: pass --file, --srcdir/--dstdir, --testall or --test".into(),
    ))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = Options::from_args_and_config(args)
        .map_err(CliError::from)
        .and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
