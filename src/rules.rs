//! Eligibility rules.
//!
//! Every rule has the same shape: it reads the application, consults the
//! [`Context`], and appends issues to a caller-supplied [`IssueSet`]. Rules
//! never stop at the first problem. An `Err` is reserved for structural
//! failures such as a corrupt catalog, which no amount of editing the
//! application can fix.

use std::fmt;

use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{Application, BrokenChain, Catalog, Config, RecordId, Semester, SemesterError},
    validation::IssueSet,
};

pub mod award;
pub mod basic_info;
pub mod essay;
pub mod feedback;
pub mod finaid;

#[cfg(test)]
mod fixtures;

/// Everything a rule needs besides the application itself.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Cycle configuration.
    pub config: &'a Config,
    /// Every award and essay prompt revision.
    pub catalog: &'a Catalog,
    /// The semester the application is due in.
    pub due: Semester,
}

impl<'a> Context<'a> {
    /// Bundles the inputs shared by every rule.
    #[must_use]
    pub const fn new(config: &'a Config, catalog: &'a Catalog, due: Semester) -> Self {
        Self {
            config,
            catalog,
            due,
        }
    }
}

/// The kinds of catalog record an application can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// An [`Award`](crate::domain::Award).
    Award,
    /// An [`EssayPrompt`](crate::domain::EssayPrompt).
    EssayPrompt,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Award => "award",
            Self::EssayPrompt => "essay prompt",
        })
    }
}

/// A structural failure that prevents a rule from running.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// A version chain in the catalog is corrupt.
    #[error(transparent)]
    BrokenChain(#[from] BrokenChain),

    /// The application refers to a record the catalog does not contain.
    #[error("application refers to unknown {kind} {id}")]
    UnknownRecord {
        /// What kind of record was referred to.
        kind: RecordKind,
        /// The missing identity.
        id: RecordId,
    },

    /// The application's due date does not fall within a semester.
    #[error("application due date has no semester: {0}")]
    DueDate(#[from] SemesterError),
}

/// Runs every rule against an application and returns the issues found.
///
/// Each call starts from an empty set, so the result reflects the
/// application exactly as it is now.
///
/// # Errors
///
/// Returns [`RuleError`] if the due date has no semester, the catalog is
/// corrupt, or the application refers to records the catalog lacks.
#[instrument(level = "debug", skip_all, fields(applicant = %application.applicant))]
pub fn validate_application(
    application: &Application,
    config: &Config,
    catalog: &Catalog,
) -> Result<IssueSet, RuleError> {
    let context = Context::new(config, catalog, application.due_semester()?);
    let mut issues = IssueSet::new();

    award::validate(application, &context, &mut issues)?;
    basic_info::validate(application, &context, &mut issues);
    finaid::validate(application, &context, &mut issues);
    essay::validate(application, &context, &mut issues)?;
    feedback::validate(application, &context, &mut issues);

    tracing::debug!("validation found {} issue(s)", issues.len());
    Ok(issues)
}

/// Why an application could not be submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The application still has issues.
    #[error("application has {} outstanding issue(s)", .0.len())]
    Outstanding(IssueSet),

    /// The application was already submitted.
    #[error("application has already been submitted")]
    AlreadySubmitted,

    /// Validation could not run.
    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Validates the application and marks it submitted if nothing is wrong.
///
/// # Errors
///
/// Returns [`SubmitError::Outstanding`] with every issue found if the
/// application is incomplete. The application is left unsubmitted.
#[instrument(level = "debug", skip_all, fields(applicant = %application.applicant))]
pub fn submit(
    application: &mut Application,
    config: &Config,
    catalog: &Catalog,
) -> Result<(), SubmitError> {
    if application.submitted {
        return Err(SubmitError::AlreadySubmitted);
    }

    let issues = validate_application(application, config, catalog)?;
    if !issues.is_empty() {
        return Err(SubmitError::Outstanding(issues));
    }

    application.submitted = true;
    tracing::info!("application from {} submitted", application.applicant);
    Ok(())
}
