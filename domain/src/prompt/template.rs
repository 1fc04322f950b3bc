//! Prompt templates and placeholder substitution
//!
//! Templates are plain text with `{name}` slots. Substitution is a single
//! left-to-right pass: each slot whose name is in the mapping is replaced
//! by its value verbatim, inserted values are never scanned again, and
//! slots without a mapping are left as they are.

use std::collections::HashMap;

/// Fill `{name}` slots in `template`.
///
/// # Examples
///
/// ```
/// use thesis_domain::prompt::substitute;
///
/// let filled = substitute("Draft: {draft}\nNotes: {notes}", [("draft", "v1 {notes}")]);
/// assert_eq!(filled, "Draft: v1 {notes}\nNotes: {notes}");
/// ```
pub fn substitute<'a>(
    template: &str,
    slots: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let slots: HashMap<&str, &str> = slots.into_iter().collect();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let filled = after_open.find('}').and_then(|close| {
            let name = &after_open[..close];
            if name.contains('{') {
                return None;
            }
            slots.get(name).map(|value| (*value, close))
        });

        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Slot names used by the built-in and user-supplied templates.
pub mod slots {
    /// Comparison template: system framing
    pub const SYSTEM_PROMPT: &str = "sys_prompt";
    /// Comparison template: original writing instruction
    pub const WRITING_PROMPT: &str = "writing_prompt";
    /// Comparison template: reference essay content
    pub const ESSAY_CONTENT: &str = "essay_content";
    /// Comparison template: rendered candidate list
    pub const CANDIDATES: &str = "candidates";

    /// Critique/revision templates: current draft
    pub const DRAFT: &str = "draft";
    /// Critique/revision templates: source essay text
    pub const ESSAY: &str = "essay";
    /// Critique template: style exemplar
    pub const EXEMPLAR: &str = "exemplar";
    /// Critique template: original writing directive
    pub const DIRECTIVE: &str = "directive";
    /// Revision template: review text from the critique stage
    pub const CRITIQUE: &str = "critique";
    /// Revision template: higher-level overview of the chapter
    pub const OVERVIEW: &str = "overview";
}

/// Built-in templates used when no template file is configured
pub struct PromptTemplate;

impl PromptTemplate {
    /// Default system framing for every stage
    pub fn system() -> &'static str {
        r#"You are an experienced academic writing advisor helping to turn a published research paper into a chapter of a doctoral thesis.
Be rigorous, faithful to the source material, and precise in wording."#
    }

    /// Comparison prompt: the judge must answer with a candidate number
    pub fn compare() -> &'static str {
        r#"{sys_prompt}

The following candidates were written for this instruction:
{writing_prompt}

Reference material:
{essay_content}

Candidates:
{candidates}

Which candidate best fulfils the instruction while staying faithful to the reference material?
Answer with the number of the best candidate only."#
    }

    /// Critique prompt: answer is a JSON object with a `review` field
    pub fn critique() -> &'static str {
        r#"You are reviewing a thesis draft.

Writing instruction the draft was produced for:
{directive}

Source paper:
{essay}

Style exemplar from an accepted thesis:
{exemplar}

Draft under review:
{draft}

Point out factual deviations from the source paper, missing content, structural problems and style problems compared with the exemplar.
Respond with JSON only: {"review": "<your review>"}"#
    }

    /// Revision prompt: answer is a JSON object with a `revised_text` field
    pub fn revise() -> &'static str {
        r#"Revise the thesis draft below according to the review.

Chapter overview:
{overview}

Source paper:
{essay}

Original draft:
{draft}

Review:
{critique}

Keep everything the review does not object to. Respond with JSON only: {"revised_text": "<the full revised draft>"}"#
    }
}
