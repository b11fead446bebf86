//! Recover a JSON object from a free-form model reply.
//!
//! Stages, in order:
//! 1. Parse the whole reply as is (surrounding whitespace and a leading BOM aside).
//! 2. Parse the body of a markdown code fence that wraps the entire reply.
//! 3. Scan for balanced `{...}` blocks, skipping braces inside JSON strings,
//!    and parse each candidate in order of its opening brace.
//! 4. Last resort: the greedy slice from the first `{` to the last `}`.
//!
//! The reply text is never rewritten, so string values come back verbatim.
//! Only JSON objects are accepted; arrays or scalars count as "not found".

use serde_json::{Map, Value};

/// Returns the first JSON object found in `raw`, or `None`.
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    if let Some(obj) = parse_object(raw) {
        return Some(obj);
    }

    if let Some(obj) = unwrap_fence(raw).and_then(parse_object) {
        return Some(obj);
    }

    if let Some(obj) = balanced_blocks(raw).find_map(parse_object) {
        return Some(obj);
    }

    greedy_block(raw).and_then(parse_object)
}

/// Body of a fence enclosing the whole reply: an opening line starting with
/// three backticks (optionally followed by a language tag) and a closing
/// three backticks at the very end.
fn unwrap_fence(s: &str) -> Option<&str> {
    let s = trim_reply(s);
    let rest = s.strip_prefix("```")?;
    let (_lang, body) = rest.split_once('\n')?;
    body.trim_end().strip_suffix("```")
}

fn trim_reply(s: &str) -> &str {
    s.trim().trim_start_matches('\u{feff}').trim_start()
}

fn parse_object(s: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(trim_reply(s)) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Every balanced `{...}` block, ordered by its opening brace.
///
/// Nested blocks are yielded too (after their parent), so a malformed outer
/// block does not hide a well-formed inner one.
fn balanced_blocks(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices()
        .filter(|&(_, c)| c == '{')
        .filter_map(move |(start, _)| matching_close(s, start).map(|end| &s[start..=end]))
}

/// Byte index of the `}` closing the `{` at `start`, ignoring braces in strings.
fn matching_close(s: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// First `{` through last `}` inclusive.
fn greedy_block(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    (end > start).then(|| &s[start..=end])
}
