//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary of the run
    Summary,
    /// Machine-readable JSON
    Json,
}

/// CLI arguments for thesis-quorum
#[derive(Parser, Debug)]
#[command(name = "thesis-quorum")]
#[command(author, version, about = "Thesis section drafting with best-of-N voting and critique/revise loops")]
#[command(long_about = r#"
thesis-quorum drafts and improves thesis sections with several LLMs.

  generate   every candidate model drafts the section, a judge votes on the best
  select     the judge votes over existing candidate files
  refine     a critique/revise loop improves one draft for N rounds

Every run writes its artifacts to its own directory under the archive base
(default: data/backups).

Configuration files are loaded from (in priority order):
1. --config <path>              Explicit config file
2. ./thesis-quorum.toml         Project-level config
3. ~/.config/thesis-quorum/config.toml   Global config

Example:
  thesis-quorum generate -t prompts/method.txt -s essay=paper.txt -s 章节名=chapter.txt -o best.txt
  thesis-quorum refine thesis/ch3/method/best.txt --essay paper.txt --rounds 5
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Result output format
    #[arg(long, global = true, value_enum, default_value = "summary")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draft a section with every candidate model and elect the best one
    Generate(GenerateArgs),
    /// Elect the best of existing candidate files
    Select(SelectArgs),
    /// Improve a draft through critique and revision rounds
    Refine(RefineArgs),
    /// Show configuration file locations and the merged configuration
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Writing prompt template with `{slot}` placeholders
    #[arg(short, long, value_name = "PATH")]
    pub template: PathBuf,

    /// Fill `{NAME}` with the contents of PATH (repeatable)
    #[arg(short, long = "slot", value_name = "NAME=PATH", value_parser = parse_slot)]
    pub slots: Vec<(String, PathBuf)>,

    /// Reference essay shown to the judge
    #[arg(long, value_name = "PATH")]
    pub essay: Option<PathBuf>,

    /// Candidate models (repeatable, overrides [models] candidates)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Judge model
    #[arg(long, value_name = "MODEL")]
    pub judge: Option<String>,

    /// Voting rounds
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Write the elected candidate here
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Candidate files, numbered 1..N in the order given
    #[arg(required = true, value_name = "CANDIDATE")]
    pub candidates: Vec<PathBuf>,

    /// Writing prompt the candidates answered
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Reference essay shown to the judge
    #[arg(long, value_name = "PATH")]
    pub essay: Option<PathBuf>,

    /// Judge model
    #[arg(long, value_name = "MODEL")]
    pub judge: Option<String>,

    /// Voting rounds
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Write the elected candidate here
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RefineArgs {
    /// Draft to improve; its last four path segments name the run
    #[arg(value_name = "DRAFT")]
    pub draft: PathBuf,

    /// Reference essay (omitted means empty)
    #[arg(long, value_name = "PATH")]
    pub essay: Option<PathBuf>,

    /// Exemplar section the critic compares against
    #[arg(long, value_name = "PATH")]
    pub exemplar: Option<PathBuf>,

    /// Writing directive the draft should follow
    #[arg(long, value_name = "PATH")]
    pub directive: Option<PathBuf>,

    /// Overview of the whole thesis
    #[arg(long, value_name = "PATH")]
    pub overview: Option<PathBuf>,

    /// Critique/revise rounds
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Model that critiques and revises
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Copy the final draft here
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Parse `NAME=PATH`.
fn parse_slot(raw: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{}'", raw));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_with_slots() {
        let cli = Cli::try_parse_from([
            "thesis-quorum",
            "-vv",
            "generate",
            "-t",
            "method.txt",
            "-s",
            "essay=paper.txt",
            "--slot",
            "章节名=ch.txt",
            "-m",
            "gpt-4.1",
            "-m",
            "dsv3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(
            args.slots,
            vec![
                ("essay".to_string(), PathBuf::from("paper.txt")),
                ("章节名".to_string(), PathBuf::from("ch.txt")),
            ]
        );
        assert_eq!(args.model, vec!["gpt-4.1", "dsv3"]);
    }

    #[test]
    fn test_bad_slot_rejected() {
        assert!(parse_slot("essay").is_err());
        assert!(parse_slot("=x").is_err());
        assert!(
            Cli::try_parse_from(["thesis-quorum", "generate", "-t", "a", "-s", "nope"]).is_err()
        );
    }

    #[test]
    fn test_select_requires_candidates() {
        assert!(Cli::try_parse_from(["thesis-quorum", "select"]).is_err());
        let cli =
            Cli::try_parse_from(["thesis-quorum", "select", "a.txt", "b.txt", "--rounds", "3"])
                .unwrap();
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        assert_eq!(args.candidates.len(), 2);
        assert_eq!(args.rounds, Some(3));
    }

    #[test]
    fn test_refine_essay_is_optional() {
        let cli = Cli::try_parse_from(["thesis-quorum", "refine", "draft.txt", "--quiet"]).unwrap();
        assert!(cli.quiet);
        let Command::Refine(args) = cli.command else {
            panic!("expected refine");
        };
        assert!(args.essay.is_none());
        assert_eq!(args.draft, PathBuf::from("draft.txt"));
    }
}
