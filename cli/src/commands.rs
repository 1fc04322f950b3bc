//! One handler per subcommand

use crate::context::{AppContext, model_or, parse_model, write_output};
use anyhow::{Result, bail};
use std::path::Path;
use thesis_application::{
    GenerateCandidatesUseCase, PipelineError, RefineDraftInput, RefineDraftUseCase,
    SelectCandidateInput, SelectCandidateUseCase, WriteSectionInput, WriteSectionUseCase,
};
use thesis_domain::{CandidateSet, DomainError, Model, RunNaming};
use thesis_infrastructure::{load_optional, load_text};
use thesis_presentation::{ConsoleFormatter, GenerateArgs, OutputFormat, RefineArgs, SelectArgs};
use tracing::{info, warn};

/// `generate`: draft with every candidate model, then elect the best.
pub async fn generate(ctx: &AppContext, args: GenerateArgs, format: OutputFormat) -> Result<()> {
    let models = if args.model.is_empty() {
        ctx.config.models.parse_candidates().0
    } else {
        args.model.iter().map(|m| parse_model(m)).collect::<Result<Vec<_>>>()?
    };
    let judge = model_or(args.judge.as_deref(), ctx.config.models.parse_judge().0, "judge")?;
    let rounds = args.rounds.unwrap_or(ctx.params.comparison_rounds);

    let writing_template = load_text(&args.template)?;
    let mut slots = Vec::with_capacity(args.slots.len());
    for (name, path) in &args.slots {
        slots.push((name.clone(), load_text(path)?));
    }
    let essay_content = load_optional(args.essay.as_deref())?;

    let mut in_use = models.clone();
    in_use.push(judge);
    let gateway = ctx.gateway(&in_use)?;

    let generate = GenerateCandidatesUseCase::new(gateway.clone(), ctx.archive.clone())
        .with_conversation_logger(ctx.conversation_logger.clone())
        .with_reasoning_filter(ctx.reasoning.clone())
        .with_throttle(ctx.params.throttle);
    let select = SelectCandidateUseCase::new(gateway, ctx.archive.clone())
        .with_conversation_logger(ctx.conversation_logger.clone())
        .with_reasoning_filter(ctx.reasoning.clone());

    let input = WriteSectionInput {
        system_prompt: ctx.prompts.system.clone(),
        writing_template,
        slots,
        essay_content,
        compare_template: ctx.prompts.compare.clone(),
        models,
        judge,
        rounds,
    };
    let outcome = WriteSectionUseCase::new(generate, select)
        .execute_with_progress(input, ctx.progress.as_ref())
        .await?;

    let generation_at = ctx.archive.location(&outcome.generation.run);
    let selection_at = ctx.archive.location(&outcome.selection.run);
    match format {
        OutputFormat::Summary => {
            println!(
                "{}",
                ConsoleFormatter::format_generation(&outcome.generation, &generation_at)
            );
            println!(
                "{}",
                ConsoleFormatter::format_selection(
                    &outcome.selection,
                    &outcome.generation.candidates,
                    &selection_at
                )
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                ConsoleFormatter::format_generation_json(&outcome.generation, &generation_at)
            );
            println!(
                "{}",
                ConsoleFormatter::format_selection_json(&outcome.selection, &selection_at)
            );
        }
    }

    if let Some(path) = &args.output {
        write_output(path, &outcome.best.content)?;
    }
    Ok(())
}

/// Label of a candidate file: its file name.
fn candidate_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `select`: elect the best of existing candidate files.
pub async fn select(ctx: &AppContext, args: SelectArgs, format: OutputFormat) -> Result<()> {
    let judge = model_or(args.judge.as_deref(), ctx.config.models.parse_judge().0, "judge")?;
    let rounds = args.rounds.unwrap_or(ctx.params.comparison_rounds);

    let mut entries = Vec::with_capacity(args.candidates.len());
    for path in &args.candidates {
        entries.push((candidate_label(path), load_text(path)?));
    }
    let candidates = usable_candidates(entries)?;
    let writing_prompt = load_optional(args.template.as_deref())?;
    let essay_content = load_optional(args.essay.as_deref())?;

    let gateway = ctx.gateway(&[judge])?;
    let use_case = SelectCandidateUseCase::new(gateway, ctx.archive.clone())
        .with_conversation_logger(ctx.conversation_logger.clone())
        .with_reasoning_filter(ctx.reasoning.clone());

    let input = SelectCandidateInput::new(candidates.clone())
        .with_prompts(ctx.prompts.system.clone(), writing_prompt, essay_content)
        .with_compare_template(ctx.prompts.compare.clone())
        .with_rounds(rounds)
        .with_judge(judge);
    let outcome = use_case
        .execute_with_progress(input, ctx.progress.as_ref())
        .await?;

    let location = ctx.archive.location(&outcome.run);
    match format {
        OutputFormat::Summary => println!(
            "{}",
            ConsoleFormatter::format_selection(&outcome, &candidates, &location)
        ),
        OutputFormat::Json => {
            println!("{}", ConsoleFormatter::format_selection_json(&outcome, &location))
        }
    }

    let Some(winner) = &outcome.winner else {
        bail!(PipelineError::NoSelection {
            rounds: outcome.tally.rounds()
        });
    };
    if let Some(path) = &args.output {
        write_output(path, &winner.content)?;
    }
    Ok(())
}

/// `refine`: critique/revise loop over one draft.
pub async fn refine(ctx: &AppContext, args: RefineArgs, format: OutputFormat) -> Result<()> {
    let model: Model =
        model_or(args.model.as_deref(), ctx.config.models.parse_refiner().0, "refiner")?;
    let rounds = args.rounds.unwrap_or(ctx.params.refine_rounds);

    let draft = load_text(&args.draft)?;
    let essay = load_optional(args.essay.as_deref())?;
    let exemplar = load_optional(args.exemplar.as_deref())?;
    let directive = load_optional(args.directive.as_deref())?;
    let overview = load_optional(args.overview.as_deref())?;

    let gateway = ctx.gateway(&[model])?;
    let use_case = RefineDraftUseCase::new(gateway, ctx.archive.clone())
        .with_conversation_logger(ctx.conversation_logger.clone())
        .with_reasoning_filter(ctx.reasoning.clone())
        .with_retry(ctx.params.retry);

    let input = RefineDraftInput::new(draft)
        .with_context(essay, exemplar, directive, overview)
        .with_system_prompt(ctx.prompts.system.clone())
        .with_templates(ctx.prompts.critique.clone(), ctx.prompts.revise.clone())
        .with_rounds(rounds)
        .with_model(model)
        .with_naming(RunNaming::after_path(&args.draft));
    info!("Refining {} with {} for {} rounds", args.draft.display(), model, rounds);

    let outcome = use_case
        .execute_with_progress(input, ctx.progress.as_ref())
        .await?;

    let location = ctx.archive.location(&outcome.run);
    match format {
        OutputFormat::Summary => {
            println!("{}", ConsoleFormatter::format_refinement(&outcome, &location))
        }
        OutputFormat::Json => {
            println!("{}", ConsoleFormatter::format_refinement_json(&outcome, &location))
        }
    }

    if let Some(path) = &args.output {
        write_output(path, &outcome.result.final_draft)?;
    }
    Ok(())
}

/// Number the non-blank candidates; blank ones never reach the judge.
fn usable_candidates(entries: Vec<(String, String)>) -> Result<CandidateSet> {
    let usable: Vec<_> = entries
        .into_iter()
        .filter(|(label, content)| {
            let blank = content.trim().is_empty();
            if blank {
                warn!("Excluding blank candidate {}", label);
            }
            !blank
        })
        .collect();
    if usable.is_empty() {
        bail!(DomainError::NoCandidates);
    }
    Ok(CandidateSet::numbered(usable))
}
