//! Candidate texts competing in a selection run

use serde::{Deserialize, Serialize};

/// One full text produced by a single generation attempt.
///
/// `sequence_index` is the 1-based label the candidate carries in the
/// comparison prompt and in vote tokens; it never changes during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Model identifier or file label the text came from
    pub source_id: String,
    pub content: String,
    pub sequence_index: usize,
}

/// Ordered, immutable set of candidates with stable 1-based labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Number the given `(source, content)` pairs 1..=N in order.
    pub fn numbered<I, S, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<String>,
    {
        let candidates = entries
            .into_iter()
            .enumerate()
            .map(|(i, (source, content))| Candidate {
                source_id: source.into(),
                content: content.into(),
                sequence_index: i + 1,
            })
            .collect();
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Look up a candidate by its 1-based label.
    pub fn get(&self, sequence_index: usize) -> Option<&Candidate> {
        sequence_index
            .checked_sub(1)
            .and_then(|i| self.candidates.get(i))
    }

    /// Render the candidates the way the comparison prompt embeds them.
    pub fn render_for_comparison(&self) -> String {
        self.candidates
            .iter()
            .map(|c| format!("Candidate {}:\n{}", c.sequence_index, c.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_is_one_based() {
        let set = CandidateSet::numbered([("dsr1", "alpha"), ("gpt-4.1", "beta")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().content, "alpha");
        assert_eq!(set.get(2).unwrap().source_id, "gpt-4.1");
        assert!(set.get(0).is_none());
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_render_for_comparison() {
        let set = CandidateSet::numbered([("a", "first"), ("b", "second")]);
        assert_eq!(
            set.render_for_comparison(),
            "Candidate 1:\nfirst\nCandidate 2:\nsecond"
        );
    }
}
