use serde::{Deserialize, Serialize};

use crate::domain::{
    Slug,
    version::{Arena, DuplicateRecord, RecordId, Versioned},
};

/// A scholarship award that applicants can select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    /// Identity of this revision.
    pub id: RecordId,

    /// Stable identifier shared by every revision of the award.
    pub identifier: Slug,

    /// The revision this one replaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<RecordId>,

    /// Display name.
    pub name: String,

    /// Longer description shown to applicants.
    #[serde(default)]
    pub description: String,
}

impl Versioned for Award {
    fn id(&self) -> RecordId {
        self.id
    }

    fn identifier(&self) -> &Slug {
        &self.identifier
    }

    fn previous_version(&self) -> Option<RecordId> {
        self.previous_version
    }
}

/// An essay question, with an advertised word limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayPrompt {
    /// Identity of this revision.
    pub id: RecordId,

    /// Stable identifier shared by every revision of the prompt.
    pub identifier: Slug,

    /// The revision this one replaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<RecordId>,

    /// The question text.
    pub prompt: String,

    /// The advertised word limit.
    pub word_limit: u32,
}

impl Versioned for EssayPrompt {
    fn id(&self) -> RecordId {
        self.id
    }

    fn identifier(&self) -> &Slug {
        &self.identifier
    }

    fn previous_version(&self) -> Option<RecordId> {
        self.previous_version
    }
}

/// Every stored revision of every award and essay prompt.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Award revisions.
    pub awards: Arena<Award>,

    /// Essay prompt revisions.
    pub prompts: Arena<EssayPrompt>,
}

impl Catalog {
    /// Builds a catalog from lists of records.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateRecord`] if two awards, or two prompts, share an
    /// identity. An award and a prompt may share an identity.
    pub fn new(
        awards: impl IntoIterator<Item = Award>,
        prompts: impl IntoIterator<Item = EssayPrompt>,
    ) -> Result<Self, DuplicateRecord> {
        Ok(Self {
            awards: Arena::from_records(awards)?,
            prompts: Arena::from_records(prompts)?,
        })
    }
}
