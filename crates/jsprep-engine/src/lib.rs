// src/lib.rs
//
// The directive-resolution pipeline: a Preprocessor owns the variable
// environment and turns one "development" source buffer into its
// "production" variant by resolving comment-embedded directives.

pub mod blocks;
pub mod builtins;
pub mod directives;
pub mod engine;
pub mod env;
pub mod errors;

pub use engine::Preprocessor;
pub use env::{MacroEnv, Value};
pub use errors::{MacroError, MacroResult};
