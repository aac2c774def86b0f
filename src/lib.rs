//! Scholarship Application Validation
//!
//! Applications are checked against a catalog of versioned awards and essay
//! prompts. Every problem found becomes an [`Issue`] in an [`IssueSet`],
//! which the wizard and the command line query to decide what to show.

pub mod domain;
pub use domain::{Application, Catalog, Config, Semester};

pub mod rules;
pub use rules::{RuleError, SubmitError, submit, validate_application};

pub mod storage;
pub use storage::LoadError;

pub mod validation;
pub use validation::{Issue, IssueSet, Query};

pub mod wizard;
