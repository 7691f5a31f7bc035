// crates/jsprep-engine/src/builtins.rs
//
// Substitution of the built-in `__...__` tokens. `__line__` runs on its
// own, before everything else, because it refers to the line numbering of
// the untouched buffer and every later stage may change the line count.

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

lazy_static! {
    // Tokens are `<marker>__name__`, marker `@` or `#`, case-insensitive,
    // matched anywhere in a line.
    static ref LINE_RE: Regex = Regex::new(r"(?i)[@#]__line__").expect("Invalid line pattern");
    static ref DATE_RE: Regex = Regex::new(r"(?i)[@#]__date__").expect("Invalid date pattern");
    static ref TIME_RE: Regex = Regex::new(r"(?i)[@#]__time__").expect("Invalid time pattern");
    static ref DATETIME_RE: Regex =
        Regex::new(r"(?i)[@#]__datetime__").expect("Invalid datetime pattern");
    static ref FILE_RE: Regex = Regex::new(r"(?i)[@#]__file__").expect("Invalid file pattern");
}

/// Replace every `__line__` token with the 1-based physical line number.
///
/// Single forward scan: each line is rewritten on its own, so line
/// boundaries survive byte-for-byte and a final line without a terminator
/// still gets its number.
pub fn substitute_line_numbers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let number = (idx + 1).to_string();
        out.push_str(&LINE_RE.replace_all(line, NoExpand(&number)));
    }
    out
}

/// Replace the `__date__`, `__time__`, `__datetime__` and `__file__`
/// tokens.
///
/// `now` is captured once per top-level parse and reused across includes,
/// so every substitution in one run agrees. The file name keeps whatever
/// the caller supplied, with backslash separators normalized to `/`.
pub fn substitute_stamps(text: &str, file_name: &str, now: &DateTime<Local>) -> String {
    let file_name = file_name.replace('\\', "/");
    let date = now.format("%b %d, %Y").to_string();
    let time = now.format("%I:%M%p").to_string();
    let datetime = now.format("%b %d, %Y %I:%M%p").to_string();

    let text = FILE_RE.replace_all(text, NoExpand(&file_name));
    let text = DATETIME_RE.replace_all(&text, NoExpand(&datetime));
    let text = TIME_RE.replace_all(&text, NoExpand(&time));
    DATE_RE.replace_all(&text, NoExpand(&date)).into_owned()
}
