//! Best-effort recovery of JSON values from free-form model output.
//!
//! Models are asked to answer in JSON but routinely wrap it in prose, code
//! fences or both. Three strategies run in a fixed order and the first one
//! that yields a parseable value wins:
//!
//! | Order | Strategy | Example input |
//! |-------|----------|---------------|
//! | 1 | fenced block tagged `json` or untagged | ```` ```json\n{"a":1}\n``` ```` |
//! | 2 | first balanced `{…}` span, else first `[…]` span | `Sure! {"a": 1} Hope it helps.` |
//! | 3 | the whole trimmed text | `{"a": 1}` |

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// Failure to recover any structured value from a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("response is empty")]
    Empty,

    #[error("no JSON value recoverable from response: {0}")]
    Unrecoverable(String),
}

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*([A-Za-z0-9_+-]*)[ \t]*\r?\n?(.*?)```").expect("valid regex")
});

/// Extract a JSON value from model output.
///
/// # Examples
///
/// ```
/// use thesis_domain::text::extract_json;
///
/// let value = extract_json("```json\n{\"a\":1}\n```").unwrap();
/// assert_eq!(value["a"], 1);
///
/// assert!(extract_json("hello world").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<Value, ExtractionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::Empty);
    }

    if let Some(value) = from_fenced_block(trimmed) {
        return Ok(value);
    }

    for open in ['{', '['] {
        if let Some(span) = balanced_span(trimmed, open)
            && let Ok(value) = serde_json::from_str(span)
        {
            return Ok(value);
        }
    }

    serde_json::from_str(trimmed).map_err(|e| ExtractionError::Unrecoverable(e.to_string()))
}

/// Strategy 1: the first `json`/untagged fence whose body parses.
fn from_fenced_block(text: &str) -> Option<Value> {
    FENCED_BLOCK.captures_iter(text).find_map(|caps| {
        let tag = caps.get(1).map_or("", |m| m.as_str());
        if !tag.is_empty() && !tag.eq_ignore_ascii_case("json") {
            return None;
        }
        let body = caps.get(2)?.as_str().trim();
        if !body.starts_with('{') && !body.starts_with('[') {
            return None;
        }
        serde_json::from_str(body).ok()
    })
}

/// Strategy 2: the span from the first `open` to the point where nesting
/// returns to zero. Objects are tried before arrays, so bracketed citations
/// in prose (`see [3]`) never shadow a trailing object. Brackets inside
/// string literals are not counted.
fn balanced_span(text: &str, open: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
