//! Removal of reasoning spans from raw model responses.
//!
//! Reasoning models wrap their chain of thought in marker pairs
//! (`<think> ... </think>` by default) ahead of the final answer. Only the
//! final answer takes part in voting and revision, so those spans are cut
//! before any further parsing.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default reasoning-start marker
pub const THINK_START: &str = "<think>";
/// Default reasoning-end marker
pub const THINK_END: &str = "</think>";

/// Start/end delimiters of a reasoning span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningMarkers {
    pub start: String,
    pub end: String,
}

impl Default for ReasoningMarkers {
    fn default() -> Self {
        Self {
            start: THINK_START.to_string(),
            end: THINK_END.to_string(),
        }
    }
}

impl ReasoningMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Remove every reasoning span and trim the result.
    ///
    /// Removal is repeated until no complete span is left, so text such as
    /// `<thi<think>x</think>nk>y</think>` is fully cleaned and a second call
    /// is always a no-op. An unterminated start marker is kept verbatim.
    pub fn strip(&self, text: &str) -> String {
        if self.start.is_empty() || self.end.is_empty() {
            return text.trim().to_string();
        }

        let mut current = self.strip_pass(text);
        loop {
            let next = self.strip_pass(&current);
            if next.len() == current.len() {
                break;
            }
            current = next;
        }
        current.trim().to_string()
    }

    /// One left-to-right pass removing non-overlapping spans.
    fn strip_pass(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(&self.start) {
            let after_start = start + self.start.len();
            let Some(end) = rest[after_start..].find(&self.end) else {
                break;
            };
            out.push_str(&rest[..start]);
            rest = &rest[after_start + end + self.end.len()..];
        }

        out.push_str(rest);
        out
    }
}

/// Remove `<think>` spans with the default markers.
///
/// # Examples
///
/// ```
/// use thesis_domain::text::sanitize;
///
/// assert_eq!(sanitize("<think>compare 1 and 2</think>\nCandidate 2"), "Candidate 2");
/// assert_eq!(sanitize("  plain answer \n"), "plain answer");
/// ```
pub fn sanitize(text: &str) -> String {
    ReasoningMarkers::default().strip(text)
}

/// Decides per model whether a response gets sanitized.
///
/// Responses from models outside the configured subset are treated as
/// already final and pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningFilter {
    markers: ReasoningMarkers,
    models: BTreeSet<Model>,
}

impl Default for ReasoningFilter {
    fn default() -> Self {
        Self {
            markers: ReasoningMarkers::default(),
            models: Model::ALL
                .into_iter()
                .filter(Model::emits_reasoning)
                .collect(),
        }
    }
}

impl ReasoningFilter {
    pub fn new(markers: ReasoningMarkers, models: impl IntoIterator<Item = Model>) -> Self {
        Self {
            markers,
            models: models.into_iter().collect(),
        }
    }

    pub fn applies_to(&self, model: &Model) -> bool {
        self.models.contains(model)
    }

    pub fn markers(&self) -> &ReasoningMarkers {
        &self.markers
    }

    /// Final answer text for a response produced by `model`.
    pub fn apply(&self, model: &Model, raw: &str) -> String {
        if self.applies_to(model) {
            self.markers.strip(raw)
        } else {
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_removes_multiline_span() {
        let raw = "<think>\nweighing candidate 1\nagainst 3\n</think>\n\n3";
        assert_eq!(sanitize(raw), "3");
    }

    #[test]
    fn test_removes_every_span() {
        let raw = "<think>a</think>first <think>b</think>second";
        assert_eq!(sanitize(raw), "first second");
    }

    #[test]
    fn test_interleaved_markers_fully_removed() {
        let raw = "<thi<think>x</think>nk>y</think>answer";
        assert_eq!(sanitize(raw), "answer");
    }

    #[test]
    fn test_unterminated_marker_kept() {
        assert_eq!(sanitize("<think>never closed"), "<think>never closed");
    }

    #[test]
    fn test_custom_markers() {
        let markers = ReasoningMarkers::new("[[r]]", "[[/r]]");
        assert_eq!(markers.strip("[[r]]hmm[[/r]] done"), "done");
    }

    #[test]
    fn test_filter_passes_through_non_reasoning_models() {
        let filter = ReasoningFilter::default();
        let raw = "<think>kept</think> answer ";
        assert_eq!(filter.apply(&Model::Gpt41, raw), raw);
        assert_eq!(filter.apply(&Model::DeepSeekR1, raw), "answer");
    }

    #[test]
    fn test_filter_custom_subset() {
        let filter = ReasoningFilter::new(ReasoningMarkers::default(), [Model::Gpt41]);
        assert!(filter.applies_to(&Model::Gpt41));
        assert!(!filter.applies_to(&Model::DeepSeekR1));
    }

    fn markup() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("<think>"),
                Just("</think>"),
                Just("<thi"),
                Just("nk>"),
                Just("</"),
                Just("x"),
                Just(" "),
                Just("\n"),
            ],
            0..24,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(text in markup()) {
            let once = sanitize(&text);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_sanitize_without_markers_is_trim(text in "[a-z0-9 \n\t{}]*") {
            prop_assert_eq!(sanitize(&text), text.trim());
        }
    }
}
