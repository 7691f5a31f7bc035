// crates/jsprep-engine/src/directives.rs
//
// Line grammar for the comment-embedded directives. A directive line is
// introduced by `//` plus one of the two marker characters, `@` or `#`;
// both forms are matched at all times, so one file may mix them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::env::MacroEnv;
use crate::errors::MacroResult;

lazy_static! {
    // `define`, `include` and `strip` match their keyword case-insensitively.
    static ref DEFINE_RE: Regex =
        Regex::new(r"(?i)^[ \t]*//[@#]define[ \t]+(\w+)(?:[ \t]+(\w+))?$")
            .expect("Invalid define pattern");
    static ref INCLUDE_RE: Regex =
        Regex::new(r"(?i)^[ \t]*//[@#]include[ \t]+(.+)$").expect("Invalid include pattern");
    static ref STRIP_RE: Regex = Regex::new(r"(?i)//[@#]strip").expect("Invalid strip pattern");

    // The block family is lowercase-only.
    static ref OPEN_RE: Regex =
        Regex::new(r"^[ \t]*//[@#](ifndef|ifdef|if)[ \t]+(\w+)").expect("Invalid open pattern");
    static ref CLOSE_RE: Regex =
        Regex::new(r"^[ \t]*//[@#]end(?:if)?[ \t]*$").expect("Invalid close pattern");
    static ref ELSE_RE: Regex = Regex::new(r"^[ \t]*//[@#]else$").expect("Invalid else pattern");
}

/// The closed set of block directive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Ifdef,
    Ifndef,
}

/// A physical line without its terminator.
pub fn line_content(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Match a `define` line, yielding the name and the optional value token.
pub fn parse_define(line: &str) -> Option<(&str, Option<&str>)> {
    let caps = DEFINE_RE.captures(line_content(line))?;
    let name = caps.get(1)?.as_str();
    Some((name, caps.get(2).map(|m| m.as_str())))
}

pub fn is_define(line: &str) -> bool {
    DEFINE_RE.is_match(line_content(line))
}

/// Match an `include` line, yielding the trimmed target path.
pub fn parse_include(line: &str) -> Option<&str> {
    let caps = INCLUDE_RE.captures(line_content(line))?;
    let target = caps.get(1)?.as_str().trim();
    if target.is_empty() {
        return None;
    }
    Some(target)
}

/// True for any line carrying the strip marker, wherever it sits in the line.
pub fn is_strip(line: &str) -> bool {
    STRIP_RE.is_match(line_content(line))
}

/// Match a block opener, yielding the kind and its argument token.
///
/// The argument must be a single word token; text after it is ignored. A
/// line like `//@if (A or B)` is not an opener and passes through untouched.
pub fn parse_block_open(line: &str) -> Option<(BlockKind, &str)> {
    let caps = OPEN_RE.captures(line_content(line))?;
    let kind = match caps.get(1)?.as_str() {
        "if" => BlockKind::If,
        "ifdef" => BlockKind::Ifdef,
        "ifndef" => BlockKind::Ifndef,
        _ => return None,
    };
    Some((kind, caps.get(2)?.as_str()))
}

/// True for `//@end` and `//@endif` lines (and their `#` forms).
pub fn is_block_close(line: &str) -> bool {
    CLOSE_RE.is_match(line_content(line))
}

pub fn is_block_else(line: &str) -> bool {
    ELSE_RE.is_match(line_content(line))
}

/// Collect every `define` directive into the environment, in source order.
///
/// Collection and deletion are separate passes so that both always see the
/// unmodified buffer.
pub fn collect_defines(text: &str, env: &mut MacroEnv) -> MacroResult<()> {
    for line in text.split_inclusive('\n') {
        if let Some((name, token)) = parse_define(line) {
            match token {
                Some(token) => env.define(name, token)?,
                None => env.define_default(name)?,
            }
        }
    }
    Ok(())
}

/// Drop every `define` directive line, terminator included.
pub fn delete_define_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !is_define(line))
        .collect()
}

/// Drop every line carrying the strip marker. The environment plays no
/// part in this; a marked line goes away no matter what is defined.
pub fn delete_strip_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !is_strip(line))
        .collect()
}
