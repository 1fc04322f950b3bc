//! Vote tallying and plurality election
//!
//! Each selection round contributes at most one vote. Rounds without a
//! usable vote still count towards `rounds`, which is what keeps
//! `total_votes() <= rounds()` true at all times.

use super::parsing::VoteChoice;
use serde::{Deserialize, Serialize};

/// Per-candidate vote counts over a sequence of selection rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// `counts[i]` holds the votes for candidate `i + 1`
    counts: Vec<usize>,
    rounds: usize,
}

impl VoteTally {
    pub fn new(candidate_count: usize) -> Self {
        Self {
            counts: vec![0; candidate_count],
            rounds: 0,
        }
    }

    /// Build a tally from already-parsed round outcomes.
    pub fn from_choices<'a>(
        candidate_count: usize,
        choices: impl IntoIterator<Item = &'a VoteChoice>,
    ) -> Self {
        let mut tally = Self::new(candidate_count);
        for choice in choices {
            tally.record(choice);
        }
        tally
    }

    /// Record the outcome of one round.
    ///
    /// Returns `true` when the round produced a counted vote. A `Valid`
    /// choice outside the candidate range is treated as no vote.
    pub fn record(&mut self, choice: &VoteChoice) -> bool {
        self.rounds += 1;
        match choice
            .index()
            .and_then(|index| index.checked_sub(1))
            .and_then(|slot| self.counts.get_mut(slot))
        {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.counts.len()
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn total_votes(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Votes for the candidate with 1-based `index`.
    pub fn votes_for(&self, index: usize) -> usize {
        index
            .checked_sub(1)
            .and_then(|slot| self.counts.get(slot))
            .copied()
            .unwrap_or(0)
    }

    /// `(index, votes)` pairs for candidates with at least one vote.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, votes)| **votes > 0)
            .map(|(slot, &votes)| (slot + 1, votes))
    }

    /// Plurality winner; ties go to the lowest index.
    pub fn elect(&self) -> Election {
        let mut best: Option<(usize, usize)> = None;
        for (index, votes) in self.entries() {
            if best.is_none_or(|(_, top)| votes > top) {
                best = Some((index, votes));
            }
        }

        match best {
            Some((index, votes)) => Election::Winner {
                index,
                votes,
                rounds: self.rounds,
            },
            None => Election::NoSelection {
                rounds: self.rounds,
            },
        }
    }

    /// Visual summary, e.g. `1:1 2:3 3:1 (5/5 rounds counted)`
    pub fn summary(&self) -> String {
        let counts = (1..=self.counts.len())
            .map(|i| format!("{}:{}", i, self.votes_for(i)))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{} ({}/{} rounds counted)",
            counts,
            self.total_votes(),
            self.rounds
        )
    }
}

/// Result of electing a winner from a [`VoteTally`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Election {
    Winner {
        index: usize,
        votes: usize,
        rounds: usize,
    },
    /// No round produced a valid vote
    NoSelection { rounds: usize },
}

impl Election {
    pub fn winner_index(&self) -> Option<usize> {
        match self {
            Election::Winner { index, .. } => Some(*index),
            Election::NoSelection { .. } => None,
        }
    }
}

impl std::fmt::Display for Election {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Election::Winner {
                index,
                votes,
                rounds,
            } => write!(f, "Candidate {} ({}/{} votes)", index, votes, rounds),
            Election::NoSelection { rounds } => {
                write!(f, "No selection ({} rounds, no valid votes)", rounds)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn votes(indices: &[usize]) -> Vec<VoteChoice> {
        indices
            .iter()
            .map(|&index| VoteChoice::Valid { index })
            .collect()
    }

    #[test]
    fn test_plurality_winner() {
        let tally = VoteTally::from_choices(3, &votes(&[2, 2, 1, 3, 2]));
        assert_eq!(
            tally.elect(),
            Election::Winner {
                index: 2,
                votes: 3,
                rounds: 5
            }
        );
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let tally = VoteTally::from_choices(3, &votes(&[3, 1, 3, 1]));
        assert_eq!(tally.elect().winner_index(), Some(1));

        // order of arrival does not matter
        let tally = VoteTally::from_choices(3, &votes(&[1, 3, 3, 1]));
        assert_eq!(tally.elect().winner_index(), Some(1));
    }

    #[test]
    fn test_no_valid_votes_is_no_selection() {
        let choices = vec![
            VoteChoice::Missing,
            VoteChoice::OutOfRange {
                token: "9".to_string(),
            },
            VoteChoice::Failed {
                reason: "timeout".to_string(),
            },
        ];
        let tally = VoteTally::from_choices(3, &choices);
        assert_eq!(tally.rounds(), 3);
        assert_eq!(tally.total_votes(), 0);
        assert_eq!(tally.elect(), Election::NoSelection { rounds: 3 });
    }

    #[test]
    fn test_invalid_rounds_count_towards_rounds_only() {
        let mut tally = VoteTally::new(2);
        assert!(tally.record(&VoteChoice::Valid { index: 2 }));
        assert!(!tally.record(&VoteChoice::Missing));
        assert!(!tally.record(&VoteChoice::Valid { index: 5 }));
        assert_eq!(tally.rounds(), 3);
        assert_eq!(tally.total_votes(), 1);
        assert_eq!(tally.votes_for(2), 1);
        assert_eq!(tally.votes_for(5), 0);
    }

    #[test]
    fn test_summary() {
        let tally = VoteTally::from_choices(3, &votes(&[2, 2, 1, 3, 2]));
        assert_eq!(tally.summary(), "1:1 2:3 3:1 (5/5 rounds counted)");
    }

    #[test]
    fn test_election_display() {
        assert_eq!(
            Election::NoSelection { rounds: 4 }.to_string(),
            "No selection (4 rounds, no valid votes)"
        );
    }

    fn choice() -> impl Strategy<Value = VoteChoice> {
        prop_oneof![
            (0usize..12).prop_map(|index| VoteChoice::Valid { index }),
            Just(VoteChoice::Missing),
            "[0-9]{1,3}".prop_map(|token| VoteChoice::OutOfRange { token }),
        ]
    }

    proptest! {
        #[test]
        fn prop_tally_never_exceeds_rounds(
            candidate_count in 1usize..8,
            choices in prop::collection::vec(choice(), 1..20),
        ) {
            let tally = VoteTally::from_choices(candidate_count, &choices);
            prop_assert_eq!(tally.rounds(), choices.len());
            prop_assert!(tally.total_votes() <= tally.rounds());
            for (index, _) in tally.entries() {
                prop_assert!((1..=candidate_count).contains(&index));
            }
            if let Some(winner) = tally.elect().winner_index() {
                prop_assert!((1..=candidate_count).contains(&winner));
            }
        }
    }
}
