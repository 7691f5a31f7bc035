// crates/jsprep-engine/src/blocks.rs
//
// Resolution of the conditional blocks: `if`/`ifdef`/`ifndef` openers, an
// optional `else`, closed by `end` or `endif`.

use log::warn;

use crate::directives::{self, BlockKind};
use crate::env::MacroEnv;

/// Resolve every conditional block in `text` against `env`.
///
/// Blocks are matched in a single forward scan: an opener pairs with the
/// nearest closer line after it, so blocks never nest. A same-shaped block
/// inside a body is cut short at the first closer and its leftovers stay
/// in the output as plain text. An opener with no closer at all is left in
/// place untouched, as is a closer with no opener. Resolved output is not
/// rescanned.
pub fn resolve_blocks(text: &str, env: &MacroEnv) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());

    let mut idx = 0;
    while idx < lines.len() {
        if let Some((kind, arg)) = directives::parse_block_open(lines[idx]) {
            if let Some(close_idx) =
                (idx + 1..lines.len()).find(|&j| directives::is_block_close(lines[j]))
            {
                out.push_str(&resolve_block(kind, arg, &lines[idx + 1..close_idx], env));
                idx = close_idx + 1;
                continue;
            }
        }
        out.push_str(lines[idx]);
        idx += 1;
    }
    out
}

/// Split a body on its `else` marker lines.
///
/// Segment 0 is the true branch and segment 1 the false branch. Extra
/// segments only matter for the undefined-`if` fallback, which keeps the
/// whole body.
fn split_on_else(body: &[&str]) -> Vec<String> {
    let mut segments = vec![String::new()];
    for line in body {
        if directives::is_block_else(line) {
            segments.push(String::new());
        } else if let Some(last) = segments.last_mut() {
            last.push_str(line);
        }
    }
    segments
}

fn resolve_block(kind: BlockKind, arg: &str, body: &[&str], env: &MacroEnv) -> String {
    let segments = split_on_else(body);
    let segment = |idx: usize| segments.get(idx).cloned().unwrap_or_default();

    match kind {
        BlockKind::If => match env.get(arg) {
            Ok(value) if value.is_truthy() => segment(0),
            Ok(_) => segment(1),
            Err(_) => {
                warn!("{} is not defined, using unmodified block", arg);
                segments.concat()
            }
        },
        BlockKind::Ifdef => {
            if env.is_defined(arg) {
                segment(0)
            } else {
                segment(1)
            }
        }
        BlockKind::Ifndef => {
            if env.is_defined(arg) {
                segment(1)
            } else {
                segment(0)
            }
        }
    }
}
