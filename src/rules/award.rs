//! Award selection rules.
//!
//! Issues raised here:
//!
//! | location | code | when |
//! | --- | --- | --- |
//! | `award/selected/<index>` | `invalid` | not offered in the due semester (or a stale revision) |
//! | `award/selected/<index>` | `prohibited` | an endowment selected by a graduating senior |
//! | `basicinfo/semester_graduating` | `prohibited` | as above |
//! | `basicinfo/major` | `prohibited` | the applicant's major does not qualify |
//! | `award` | `min-length` | no eligible award selected |

use std::collections::BTreeSet;

use tracing::instrument;

use super::{Context, RecordKind, RuleError};
use crate::{
    domain::{Application, Award, RecordId},
    validation::{Code, Issue, IssueSet, Section},
};

/// Minimum number of eligible awards an application must select.
pub const MIN_AWARDS: usize = 1;

/// The latest revision of every award offered in the due semester, in
/// display order.
///
/// # Errors
///
/// Returns [`RuleError::BrokenChain`] if any offered award cannot be
/// resolved.
pub fn offered<'a>(context: &Context<'a>) -> Result<Vec<&'a Award>, RuleError> {
    let catalog = context.catalog;
    context
        .config
        .awards
        .offered_in(context.due.term())
        .iter()
        .map(|identifier| catalog.awards.latest(identifier).map_err(RuleError::from))
        .collect()
}

/// The awards the application selects, in selection order.
///
/// # Errors
///
/// Returns [`RuleError::UnknownRecord`] if a selection is not in the
/// catalog.
pub fn selected<'a>(
    application: &Application,
    context: &Context<'a>,
) -> Result<Vec<&'a Award>, RuleError> {
    let catalog = context.catalog;
    application
        .awards
        .iter()
        .map(|&id| {
            catalog.awards.get(id).ok_or(RuleError::UnknownRecord {
                kind: RecordKind::Award,
                id,
            })
        })
        .collect()
}

/// Checks the award selections of an application.
///
/// # Errors
///
/// Returns [`RuleError`] if the catalog is corrupt or a selection is not in
/// it.
#[instrument(level = "debug", skip_all)]
pub fn validate(
    application: &Application,
    context: &Context,
    issues: &mut IssueSet,
) -> Result<(), RuleError> {
    let policy = &context.config.awards;
    let offered_ids: BTreeSet<RecordId> = offered(context)?.iter().map(|award| award.id).collect();
    let graduating = application.graduates_in(context.due);

    let mut eligible = 0;
    for (index, award) in (0_i64..).zip(selected(application, context)?) {
        if !offered_ids.contains(&award.id) {
            tracing::debug!("{} is not offered in {}", award.identifier, context.due);
            issues.add(Issue::subfield(Section::Award, "selected", index, Code::Invalid));
        } else if graduating && policy.is_endowment(&award.identifier) {
            tracing::debug!("{} is an endowment and the applicant is graduating", award.identifier);
            issues.add(Issue::subfield(Section::Award, "selected", index, Code::Prohibited));
            issues.add(Issue::field(Section::BasicInfo, "semester_graduating", Code::Prohibited));
        } else {
            eligible += 1;
        }

        let qualifies = policy.restriction(&award.identifier).is_none_or(|restriction| {
            restriction.permits(application.major.as_deref(), application.emch_minor)
        });
        if !qualifies {
            issues.add(Issue::field(Section::BasicInfo, "major", Code::Prohibited));
        }
    }

    if eligible < MIN_AWARDS {
        issues.add(Issue::section(Section::Award, Code::MinLength));
    }

    Ok(())
}
