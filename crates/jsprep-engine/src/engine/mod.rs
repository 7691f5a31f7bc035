// crates/jsprep-engine/src/engine/mod.rs
//
// The pipeline orchestrator. A Preprocessor owns the variable environment,
// feeds one file's text through the staged transformations, and expands
// `include` directives by recursing on the referenced file with the same
// environment and timestamp.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::blocks;
use crate::builtins;
use crate::directives;
use crate::env::MacroEnv;
use crate::errors::{MacroError, MacroResult};

#[cfg(test)]
mod tests;

pub struct Preprocessor {
    env: MacroEnv,
    open_includes: HashSet<PathBuf>,
    /// Read by the test harness: save mismatching output to a file instead
    /// of printing it.
    pub save_failure_output: bool,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            env: MacroEnv::new(),
            open_includes: HashSet::new(),
            save_failure_output: false,
        }
    }

    /// Predefine a variable from a value token. First definition wins, so
    /// a command-line definition overrides any later in-file `define`.
    pub fn define(&mut self, name: &str, token: &str) -> MacroResult<()> {
        self.env.define(name, token)
    }

    /// Predefine a variable with the default value `0`.
    pub fn define_default(&mut self, name: &str) -> MacroResult<()> {
        self.env.define_default(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.env.is_defined(name)
    }

    /// Clear all definitions and any in-flight include tracking. Never
    /// called implicitly; definitions survive across parses until then.
    pub fn reset(&mut self) {
        self.env.reset();
        self.open_includes.clear();
    }

    /// Parse one file and return the transformed text.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> MacroResult<String> {
        let now = Local::now();
        self.parse_file_at(path.as_ref(), &now)
    }

    /// Parse an in-memory buffer under a nominal path. The path supplies
    /// the `__file__` value and the base directory for `include` targets.
    pub fn parse_text(&mut self, text: &str, path: &Path) -> MacroResult<String> {
        let now = Local::now();
        self.run_stages(text, path, &now)
    }

    fn parse_file_at(&mut self, path: &Path, now: &DateTime<Local>) -> MacroResult<String> {
        let text = fs::read_to_string(path)?;
        self.run_stages(&text, path, now)
    }

    /// The fixed stage order. Built-in tokens go first, against the
    /// untouched buffer; defines are collected over the whole buffer
    /// before any include runs, so a define below an include line still
    /// reaches the included file; directive lines are deleted only after
    /// that; blocks resolve last, when the environment is complete.
    fn run_stages(&mut self, text: &str, path: &Path, now: &DateTime<Local>) -> MacroResult<String> {
        let text = builtins::substitute_line_numbers(text);
        let text = builtins::substitute_stamps(&text, &path.to_string_lossy(), now);
        directives::collect_defines(&text, &mut self.env)?;
        let text = self.resolve_includes(&text, path, now)?;
        let text = directives::delete_define_lines(&text);
        let text = directives::delete_strip_lines(&text);
        Ok(blocks::resolve_blocks(&text, &self.env))
    }

    fn resolve_includes(
        &mut self,
        text: &str,
        path: &Path,
        now: &DateTime<Local>,
    ) -> MacroResult<String> {
        let base = path.parent().unwrap_or(Path::new("."));
        let mut out = String::with_capacity(text.len());
        for line in text.split_inclusive('\n') {
            match directives::parse_include(line) {
                Some(target) => out.push_str(&self.expand_include(base, target, now)?),
                None => out.push_str(line),
            }
        }
        Ok(out)
    }

    /// Run the full pipeline on an included file and return its output,
    /// which replaces the directive line. Targets resolve relative to the
    /// including file's directory; the in-flight set turns self- and
    /// mutual inclusion into an error instead of unbounded recursion.
    fn expand_include(
        &mut self,
        base: &Path,
        target: &str,
        now: &DateTime<Local>,
    ) -> MacroResult<String> {
        let candidate = base.join(target);
        let path = candidate
            .canonicalize()
            .map_err(|_| MacroError::IncludeNotFound(candidate.clone()))?;
        if self.open_includes.contains(&path) {
            return Err(MacroError::CircularInclude(path));
        }
        self.open_includes.insert(path.clone());
        let expanded = self.parse_file_at(&path, now)?;
        self.open_includes.remove(&path);
        Ok(expanded)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
