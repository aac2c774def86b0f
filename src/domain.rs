//! Domain models for scholarship applications.
//!
//! This module contains the value types (semesters, slugs, amounts), the
//! versioned catalog of awards and essay prompts, the application fact base
//! and the cycle configuration.

/// Academic semesters.
pub mod semester;
pub use semester::{Error as SemesterError, Semester, Term};

mod slug;
pub use slug::{InvalidSlugError, Slug};

pub mod version;
pub use version::{
    Arena, BrokenChain, ChainReport, DuplicateRecord, RecordId, Versioned, latest_version,
};

/// Awards and essay prompts.
pub mod catalog;
pub use catalog::{Award, Catalog, EssayPrompt};

/// The application fact base.
pub mod application;
pub use application::{Application, EssayResponse};

/// Financial aid declared by applicants.
pub mod finaid;
pub use finaid::{Amount, FinancialAid, InstallmentFrequency};

/// Peer feedback.
pub mod feedback;
pub use feedback::{Feedback, Peer, PeerId, eligible_peers};

mod config;
pub use config::{AwardPolicy, Config, ConfigError, MajorRestriction, OTHER_MAJOR};
