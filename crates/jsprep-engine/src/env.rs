// crates/jsprep-engine/src/env.rs

use std::collections::HashMap;
use std::fmt;

use crate::errors::{MacroError, MacroResult};

/// Value token assumed when a `define` directive carries none.
pub const DEFINE_DEFAULT: &str = "0";

/// The evaluated form of a define value token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    /// `0` and `false` are the only falsy values.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Bool(b) => *b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Evaluate a define value token as a literal.
///
/// Accepts non-negative integers (decimal, `0x`/`0o`/`0b` prefixed, with `_`
/// separators) and `true`/`false` in any case. Value tokens are single word
/// tokens by grammar, so there is nothing else to accept.
fn eval_literal(token: &str) -> Option<Value> {
    if token.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }

    let digits: String = token.chars().filter(|&c| c != '_').collect();
    let (radix, rest) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0o") | Some("0O") => (8, &digits[2..]),
        Some("0b") | Some("0B") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };
    if rest.is_empty() {
        return None;
    }
    i64::from_str_radix(rest, radix).ok().map(Value::Int)
}

/// The variable environment consulted by conditional directives.
///
/// Definitions are first-wins: once a name is present, later `define`s for it
/// are no-ops, whether they come from a file or from the command line. The
/// environment is never cleared implicitly; callers that want isolation
/// between independent parses call [`MacroEnv::reset`].
#[derive(Debug, Default)]
pub struct MacroEnv {
    vars: HashMap<String, Value>,
}

impl MacroEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` from a value token, unless it is already defined.
    pub fn define(&mut self, name: &str, token: &str) -> MacroResult<()> {
        if self.vars.contains_key(name) {
            return Ok(());
        }
        let value = eval_literal(token).ok_or_else(|| MacroError::InvalidLiteral {
            name: name.to_string(),
            token: token.to_string(),
        })?;
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Define `name` with the default value token `0`.
    pub fn define_default(&mut self, name: &str) -> MacroResult<()> {
        self.define(name, DEFINE_DEFAULT)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> MacroResult<&Value> {
        self.vars
            .get(name)
            .ok_or_else(|| MacroError::UndefinedVariable(name.to_string()))
    }

    /// Clear every definition.
    pub fn reset(&mut self) {
        self.vars.clear();
    }
}
