//! Essay requirements.
//!
//! Each selected award asks for a number of essay groups. A group lists
//! alternative prompts, and a response to any one of them satisfies it.
//! Several prompts come in a `newmember_` and an `established_` flavour,
//! and only the flavour matching the applicant's tenure is offered.

use std::collections::BTreeSet;

use nonempty::NonEmpty;
use tracing::instrument;

use super::{Context, RecordKind, RuleError, award};
use crate::{
    domain::{Application, EssayPrompt, RecordId, Slug},
    validation::{Code, Issue, IssueSet, Section},
};

const NEW_MEMBER_PREFIX: &str = "newmember";
const ESTABLISHED_PREFIX: &str = "established";

/// A set of alternative prompts, any one of which satisfies the group.
pub type EssayGroup<'a> = NonEmpty<&'a EssayPrompt>;

/// Whether the prompt is offered to an applicant of the given tenure.
#[must_use]
pub fn offered_to(prompt: &Slug, new_member: bool) -> bool {
    if prompt.has_prefix(NEW_MEMBER_PREFIX) {
        new_member
    } else if prompt.has_prefix(ESTABLISHED_PREFIX) {
        !new_member
    } else {
        true
    }
}

/// Whether the applicant counts as a new member in the due semester.
///
/// Applicants who have not said when they were initiated are treated as
/// established members.
#[must_use]
pub fn is_new_member(application: &Application, context: &Context) -> bool {
    application
        .semester_initiated
        .is_some_and(|initiated| context.config.is_new_member(initiated, context.due))
}

/// The essay groups the application must answer, resolved to the latest
/// prompt revisions.
///
/// Groups are collected award by award in selection order. A group
/// requested by more than one award appears once.
///
/// # Errors
///
/// Returns [`RuleError`] if a selection is not in the catalog or a prompt
/// cannot be resolved.
pub fn required<'a>(
    application: &Application,
    context: &Context<'a>,
) -> Result<Vec<EssayGroup<'a>>, RuleError> {
    let new_member = is_new_member(application, context);
    let policy = &context.config.awards;
    let prompts = &context.catalog.prompts;

    let mut seen: BTreeSet<Vec<RecordId>> = BTreeSet::new();
    let mut groups = Vec::new();

    for selection in award::selected(application, context)? {
        for group in policy.essay_groups(&selection.identifier) {
            let resolved = group
                .iter()
                .filter(|identifier| offered_to(identifier, new_member))
                .map(|identifier| prompts.latest(identifier))
                .collect::<Result<Vec<_>, _>>()?;

            let Some(group) = NonEmpty::from_vec(resolved) else {
                continue;
            };

            let mut key: Vec<RecordId> = group.iter().map(|prompt| prompt.id).collect();
            key.sort_unstable();
            if seen.insert(key) {
                groups.push(group);
            }
        }
    }

    tracing::debug!(
        "{} essay group(s) required for a{} member",
        groups.len(),
        if new_member { " new" } else { "n established" }
    );
    Ok(groups)
}

/// Checks essay responses against the selected awards.
///
/// # Errors
///
/// Returns [`RuleError`] if a response or selection refers to a record the
/// catalog lacks, or a prompt cannot be resolved.
#[instrument(level = "debug", skip_all)]
pub fn validate(
    application: &Application,
    context: &Context,
    issues: &mut IssueSet,
) -> Result<(), RuleError> {
    for response in &application.essays {
        let prompt = context
            .catalog
            .prompts
            .get(response.prompt)
            .ok_or(RuleError::UnknownRecord {
                kind: RecordKind::EssayPrompt,
                id: response.prompt,
            })?;

        let limit = context.config.word_limit_with_grace(prompt.word_limit);
        if response.word_count() as u64 > limit {
            issues.add(Issue::subfield(
                Section::Essay,
                "responses",
                prompt.id.into(),
                Code::MaxLength,
            ));
        }
    }

    for group in required(application, context)? {
        let answered = group
            .iter()
            .any(|prompt| application.response_to(prompt.id).is_some());
        if answered {
            continue;
        }

        let field = if group.len() == 1 {
            "responses"
        } else {
            "response_groups"
        };
        issues.add(Issue::subfield(
            Section::Essay,
            field,
            group.head.id.into(),
            Code::Required,
        ));
    }

    Ok(())
}
