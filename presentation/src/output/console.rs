//! Console output formatter for pipeline results

use colored::Colorize;
use serde_json::json;
use thesis_application::{GenerationOutcome, RefinementOutcome, SelectionOutcome};
use thesis_domain::{CandidateSet, Election, VoteChoice};

/// Formats pipeline outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Candidates produced and models excluded
    pub fn format_generation(outcome: &GenerationOutcome, location: &str) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Candidate Generation"));
        output.push_str(&format!("{} {}\n", "Run:".cyan().bold(), location));

        for candidate in outcome.candidates.iter() {
            output.push_str(&format!(
                "  {} {:<18} {} chars\n",
                format!("[{}]", candidate.sequence_index).yellow().bold(),
                candidate.source_id,
                candidate.content.chars().count()
            ));
        }
        for excluded in &outcome.excluded {
            output.push_str(&format!(
                "  {} {:<18} {}\n",
                "[-]".red().bold(),
                excluded.model.as_str(),
                excluded.reason.dimmed()
            ));
        }

        output
    }

    /// Per-round votes, the tally and the winner
    pub fn format_selection(
        outcome: &SelectionOutcome,
        candidates: &CandidateSet,
        location: &str,
    ) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Best-of-N Selection"));
        output.push_str(&format!("{} {}\n", "Run:".cyan().bold(), location));

        for round in &outcome.rounds {
            let verdict = match &round.choice {
                VoteChoice::Valid { index } => format!("candidate {}", index).green().to_string(),
                VoteChoice::OutOfRange { token } => {
                    format!("out of range ({})", token).yellow().to_string()
                }
                VoteChoice::Missing => "no number in answer".yellow().to_string(),
                VoteChoice::Failed { reason } => format!("failed: {}", reason).red().to_string(),
            };
            output.push_str(&format!("  Round {}: {}\n", round.round, verdict));
        }

        output.push_str(&format!("\n{}\n", "Tally:".cyan().bold()));
        for (index, votes) in outcome.tally.entries() {
            let source = candidates
                .get(index)
                .map(|c| c.source_id.as_str())
                .unwrap_or("?");
            output.push_str(&format!(
                "  {:>2}. {:<18} {} {}\n",
                index,
                source,
                "#".repeat(votes).green(),
                votes
            ));
        }

        let verdict = match outcome.election {
            Election::Winner { .. } => outcome.election.to_string().green().bold(),
            Election::NoSelection { .. } => outcome.election.to_string().red().bold(),
        };
        output.push_str(&format!("\n{} {}\n", "Result:".cyan().bold(), verdict));
        if let Some(winner) = &outcome.winner {
            output.push_str(&format!("{} {}\n", "Source:".cyan().bold(), winner.source_id));
        }

        output
    }

    /// What each round did and where the final draft lives
    pub fn format_refinement(outcome: &RefinementOutcome, location: &str) -> String {
        let result = &outcome.result;
        let mut output = String::new();

        output.push_str(&Self::section_header("Critique / Revise"));
        output.push_str(&format!("{} {}\n", "Run:".cyan().bold(), location));

        for round in &result.history {
            let critique = if round.critique.is_some() {
                "critique".green()
            } else {
                "no critique".yellow()
            };
            let revision = if round.applied {
                "revised".green()
            } else {
                "unchanged".yellow()
            };
            output.push_str(&format!("  Round {:>2}: {}, {}\n", round.round, critique, revision));
        }

        output.push_str(&format!(
            "\n{} {}/{} rounds revised, final draft {} chars\n",
            "Result:".cyan().bold(),
            result.revisions_applied(),
            result.rounds_run(),
            result.final_draft.chars().count()
        ));

        output
    }

    pub fn format_selection_json(outcome: &SelectionOutcome, location: &str) -> String {
        let value = json!({
            "run": location,
            "rounds": outcome.rounds,
            "tally": outcome.tally,
            "election": outcome.election,
            "winner": outcome.winner,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_generation_json(outcome: &GenerationOutcome, location: &str) -> String {
        let excluded: Vec<_> = outcome
            .excluded
            .iter()
            .map(|e| json!({"model": e.model, "reason": e.reason}))
            .collect();
        let value = json!({
            "run": location,
            "candidates": outcome.candidates,
            "excluded": excluded,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_refinement_json(outcome: &RefinementOutcome, location: &str) -> String {
        let value = json!({
            "run": location,
            "rounds_run": outcome.result.rounds_run(),
            "revisions_applied": outcome.result.revisions_applied(),
            "history": outcome.result.history,
            "final_draft": outcome.result.final_draft,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesis_application::RunHandle;
    use thesis_domain::{RefinementState, RunScope, SelectionRound, VoteTally};

    fn plain() {
        colored::control::set_override(false);
    }

    fn selection(choices: &[&str]) -> (SelectionOutcome, CandidateSet) {
        let candidates = CandidateSet::numbered(vec![("gpt-4.1", "A"), ("dsv3", "B"), ("qwen3", "C")]);
        let mut tally = VoteTally::new(candidates.len());
        let rounds: Vec<_> = choices
            .iter()
            .enumerate()
            .map(|(i, answer)| SelectionRound::judged(i + 1, *answer, *answer, candidates.len()))
            .collect();
        for round in &rounds {
            tally.record(&round.choice);
        }
        let election = tally.elect();
        let winner = election
            .winner_index()
            .and_then(|i| candidates.get(i))
            .cloned();
        (
            SelectionOutcome {
                run: RunHandle::new(RunScope::Comparison, "r1"),
                rounds,
                tally,
                election,
                winner,
            },
            candidates,
        )
    }

    #[test]
    fn test_selection_summary() {
        plain();
        let (outcome, candidates) = selection(&["2", "2", "1", "none", "9"]);
        let text = ConsoleFormatter::format_selection(&outcome, &candidates, "data/r1");

        assert!(text.contains("Round 1: candidate 2"));
        assert!(text.contains("Round 4: no number in answer"));
        assert!(text.contains("Round 5: out of range (9)"));
        assert!(text.contains("Candidate 2 (2/5 votes)"));
        assert!(text.contains("Source: dsv3"));
    }

    #[test]
    fn test_selection_json_names_the_winner() {
        let (outcome, _) = selection(&["3"]);
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_selection_json(&outcome, "x")).unwrap();
        assert_eq!(value["winner"]["source_id"], "qwen3");
        assert_eq!(value["election"]["outcome"], "winner");
    }

    #[test]
    fn test_refinement_summary() {
        plain();
        let mut state = RefinementState::new("v0", 2).unwrap();
        state.complete_round(Some("too short".into()), Some("v1".into()));
        state.complete_round(None, None);
        let outcome = RefinementOutcome {
            run: RunHandle::new(RunScope::Refinement, "run_1_x"),
            result: state.finish(),
        };

        let text = ConsoleFormatter::format_refinement(&outcome, "data/run_1_x");
        assert!(text.contains("Round  1: critique, revised"));
        assert!(text.contains("Round  2: no critique, unchanged"));
        assert!(text.contains("1/2 rounds revised"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
