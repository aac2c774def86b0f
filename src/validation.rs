//! Structured validation issues.
//!
//! Business-rule violations are never raised as errors. Each one becomes an
//! [`Issue`] located by a three-level hierarchy (section, field, subfield)
//! and tagged with one of a closed set of [`Code`]s. A validation pass
//! collects every issue into an [`IssueSet`], which the presentation layer
//! then queries to decide which pages may be entered and which form fields
//! to annotate.
//!
//! ```
//! use scholarship::validation::{Code, Issue, IssueSet, Query, Section};
//!
//! let mut issues = IssueSet::new();
//! issues.add(Issue::section(Section::Award, Code::MinLength));
//! issues.add(Issue::field(Section::BasicInfo, "major", Code::Prohibited));
//!
//! let award = issues.search(&Query::new().section(Section::Award)).unwrap();
//! assert_eq!(award.len(), 1);
//! ```

use std::fmt;

mod issue;
pub use issue::{Code, Issue, Section, UnknownSection};

mod query;
pub use query::{Filter, Query};

mod set;
pub use set::IssueSet;

/// A level of the issue hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// The outermost level, e.g. `award`.
    Section,
    /// A field within a section, e.g. `selected`.
    Field,
    /// A numbered entry within a field, e.g. a row or record identity.
    Subfield,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Section => "section",
            Self::Field => "field",
            Self::Subfield => "subfield",
        })
    }
}

/// Misuse of the issue API.
///
/// These indicate a bug in the caller, not a problem with the application
/// being validated.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A level was given while one of its ancestors was not.
    #[error("illegal issue hierarchy at {level}")]
    Hierarchy {
        /// The first level that breaks the hierarchy.
        level: Level,
    },

    /// The code is not one of the well-known codes.
    #[error("unknown code provided: '{0}'")]
    UnknownCode(String),

    /// An aggregate search matched issues at more than one location.
    #[error("aggregate spans multiple issues")]
    AmbiguousAggregate,
}
