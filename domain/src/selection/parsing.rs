//! Vote token parsing for selection rounds.
//!
//! The judge is asked to answer with the number of the best candidate, but
//! answers arrive as free text ("I pick Candidate 2 because ..."). The first
//! standalone integer in the (sanitized) answer is taken as the vote.

use serde::{Deserialize, Serialize};

/// What a single selection round contributed to the tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteChoice {
    /// A vote for the candidate with this 1-based index
    Valid { index: usize },
    /// An integer token was found but names no candidate
    OutOfRange { token: String },
    /// No integer token in the answer
    Missing,
    /// The judge call itself failed
    Failed { reason: String },
}

impl VoteChoice {
    pub fn index(&self) -> Option<usize> {
        match self {
            VoteChoice::Valid { index } => Some(*index),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, VoteChoice::Valid { .. })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Decimal value of an ASCII or full-width (`０`..`９`) digit.
fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

fn is_digit(c: char) -> bool {
    digit_value(c).is_some()
}

/// First run of digits not glued to an ASCII letter or underscore.
///
/// ASCII and full-width digits both count. Other non-ASCII text (CJK
/// punctuation and prose) is a separator, so `选择2号` and `候选２` yield a
/// token while `v2` and `2nd` yield nothing.
pub fn first_integer_token(text: &str) -> Option<&str> {
    let mut chars = text.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((start, c)) = chars.next() {
        if !is_digit(c) {
            prev = Some(c);
            continue;
        }

        let mut end = start + c.len_utf8();
        let mut last = c;
        while let Some(&(i, d)) = chars.peek() {
            if !is_digit(d) {
                break;
            }
            end = i + d.len_utf8();
            last = d;
            chars.next();
        }
        let next = chars.peek().map(|&(_, n)| n);

        let glued_before = prev.is_some_and(is_word_char);
        let glued_after = next.is_some_and(is_word_char);
        if !glued_before && !glued_after {
            return Some(&text[start..end]);
        }
        prev = Some(last);
    }

    None
}

/// Interpret a judge answer against a candidate set of size `candidate_count`.
///
/// # Examples
///
/// ```
/// use thesis_domain::selection::{parse_choice, VoteChoice};
///
/// assert_eq!(parse_choice("Candidate 2 is clearly best", 3), VoteChoice::Valid { index: 2 });
/// assert_eq!(parse_choice("7", 3), VoteChoice::OutOfRange { token: "7".into() });
/// assert_eq!(parse_choice("the second one", 3), VoteChoice::Missing);
/// ```
pub fn parse_choice(answer: &str, candidate_count: usize) -> VoteChoice {
    let Some(token) = first_integer_token(answer) else {
        return VoteChoice::Missing;
    };
    match token_value(token) {
        Some(index) if (1..=candidate_count).contains(&index) => VoteChoice::Valid { index },
        _ => VoteChoice::OutOfRange {
            token: token.to_string(),
        },
    }
}

/// Numeric value of a digit token; `None` on overflow.
fn token_value(token: &str) -> Option<usize> {
    token.chars().try_fold(0usize, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)? as usize)
    })
}
