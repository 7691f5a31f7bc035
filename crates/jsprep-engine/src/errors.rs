// crates/jsprep-engine/src/errors.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacroError {
    #[error("Invalid literal `{token}` for `{name}`")]
    InvalidLiteral { name: String, token: String },

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Include not found: {}", .0.display())]
    IncludeNotFound(PathBuf),

    #[error("Circular include: {}", .0.display())]
    CircularInclude(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type MacroResult<T> = Result<T, MacroError>;
