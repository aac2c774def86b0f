//! Versioned records and latest-version resolution.
//!
//! Awards and essay prompts are never edited in place. Changing the text of
//! one creates a new record that points back at the record it replaces, and
//! every revision shares the same [`Slug`]. The revisions therefore form a
//! singly linked list from newest to oldest.
//!
//! Nothing in storage enforces that the list is well formed, so resolution
//! treats the records as a snapshot and walks it forwards from the oldest
//! record, failing with [`BrokenChain`] on splits and cycles instead of
//! looping.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use nonempty::NonEmpty;
use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::domain::Slug;

/// Storage identity of a single record revision.
///
/// This is the key used by [`Arena`] and the value reported as the
/// `subfield` of validation issues that concern a specific record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u32);

impl RecordId {
    /// Wraps a raw record identity.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw record identity.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for RecordId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A record that belongs to a version chain.
pub trait Versioned {
    /// The identity of this revision.
    fn id(&self) -> RecordId;

    /// The identifier shared by every revision in the chain.
    fn identifier(&self) -> &Slug;

    /// The revision this one replaces, or `None` for the oldest revision.
    fn previous_version(&self) -> Option<RecordId>;
}

/// A version chain could not be resolved to a single newest revision.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokenChain {
    /// No record carries the identifier.
    #[error("no records found for '{0}'")]
    Unknown(Slug),

    /// More than one record claims to directly follow the same revision.
    #[error("version chain of '{identifier}' splits after {}: {}", describe(*after), list(successors))]
    Split {
        /// The identifier being resolved.
        identifier: Slug,
        /// The revision with several successors (`None` for several oldest
        /// revisions).
        after: Option<RecordId>,
        /// Every record claiming to follow `after`.
        successors: Vec<RecordId>,
    },

    /// No record follows the current revision, yet some records were never
    /// reached. This happens with cycles, self-references and links to
    /// records outside the chain.
    #[error("version chain of '{identifier}' stops after {} with {unreached} record(s) unreached", describe(*after))]
    NoSuccessor {
        /// The identifier being resolved.
        identifier: Slug,
        /// The last revision reached (`None` if no oldest revision exists).
        after: Option<RecordId>,
        /// The number of records that were never reached.
        unreached: usize,
    },
}

fn describe(after: Option<RecordId>) -> String {
    after.map_or_else(|| "the start".to_string(), |id| id.to_string())
}

fn list(ids: &[RecordId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves the full version chain of `identifier`, oldest revision first.
///
/// Only candidates carrying `identifier` are considered. The walk starts at
/// the record with no previous version and repeatedly advances to the unique
/// record pointing at the current one, at most once per candidate.
///
/// # Errors
///
/// - [`BrokenChain::Unknown`] if no candidate carries the identifier.
/// - [`BrokenChain::Split`] if two or more records follow the same revision.
/// - [`BrokenChain::NoSuccessor`] if the walk stops before every candidate
///   has been reached.
pub fn version_chain<'a, T, I>(
    identifier: &Slug,
    candidates: I,
) -> Result<NonEmpty<&'a T>, BrokenChain>
where
    T: Versioned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let snapshot: Vec<&T> = candidates
        .into_iter()
        .filter(|record| record.identifier() == identifier)
        .collect();

    if snapshot.is_empty() {
        return Err(BrokenChain::Unknown(identifier.clone()));
    }

    let mut chain = NonEmpty::new(successor(identifier, &snapshot, None, snapshot.len())?);
    for reached in 1..snapshot.len() {
        let tail = chain.last().id();
        chain.push(successor(
            identifier,
            &snapshot,
            Some(tail),
            snapshot.len() - reached,
        )?);
    }

    tracing::debug!(
        "resolved '{identifier}' through {} revision(s) to {}",
        chain.len(),
        chain.last().id()
    );
    Ok(chain)
}

/// Finds the newest revision of `identifier` among `candidates`.
///
/// # Errors
///
/// See [`version_chain`].
pub fn latest_version<'a, T, I>(identifier: &Slug, candidates: I) -> Result<&'a T, BrokenChain>
where
    T: Versioned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    version_chain(identifier, candidates).map(|chain| *chain.last())
}

fn successor<'a, T: Versioned>(
    identifier: &Slug,
    snapshot: &[&'a T],
    after: Option<RecordId>,
    unreached: usize,
) -> Result<&'a T, BrokenChain> {
    let mut followers = snapshot
        .iter()
        .copied()
        .filter(|record| record.previous_version() == after);

    let Some(next) = followers.next() else {
        return Err(BrokenChain::NoSuccessor {
            identifier: identifier.clone(),
            after,
            unreached,
        });
    };

    if let Some(second) = followers.next() {
        let mut successors = vec![next.id(), second.id()];
        successors.extend(followers.map(Versioned::id));
        return Err(BrokenChain::Split {
            identifier: identifier.clone(),
            after,
            successors,
        });
    }

    Ok(next)
}

/// Error returned when inserting a record whose identity is already taken.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("record {0} already exists")]
pub struct DuplicateRecord(pub RecordId);

/// An in-memory store of versioned records, keyed by [`RecordId`] and
/// indexed by identifier.
///
/// Resolution is always computed from the records currently stored, so
/// adding a revision never alters a previously returned result.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    records: BTreeMap<RecordId, T>,
    by_identifier: BTreeMap<Slug, Vec<RecordId>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            by_identifier: BTreeMap::new(),
        }
    }
}

impl<T: Versioned> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an arena from a collection of records.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateRecord`] if two records share an identity.
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Result<Self, DuplicateRecord> {
        let mut arena = Self::new();
        for record in records {
            arena.insert(record)?;
        }
        Ok(arena)
    }

    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateRecord`] if a record with the same identity is
    /// already stored.
    pub fn insert(&mut self, record: T) -> Result<(), DuplicateRecord> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Err(DuplicateRecord(id));
        }

        self.by_identifier
            .entry(record.identifier().clone())
            .or_default()
            .push(id);
        self.records.insert(id, record);
        Ok(())
    }

    /// Retrieves a record by identity.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.get(&id)
    }

    /// The number of stored records, across all identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the arena holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over every stored record in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    /// Iterates over the distinct identifiers, in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Slug> {
        self.by_identifier.keys()
    }

    /// Returns a snapshot of every revision carrying `identifier`.
    #[must_use]
    pub fn versions_of(&self, identifier: &Slug) -> Vec<&T> {
        self.by_identifier
            .get(identifier)
            .into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    /// Returns the newest revision of `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokenChain`] if the revisions do not form a single chain.
    pub fn latest(&self, identifier: &Slug) -> Result<&T, BrokenChain> {
        latest_version(identifier, self.versions_of(identifier))
    }

    /// Returns every revision of `identifier`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BrokenChain`] if the revisions do not form a single chain.
    pub fn history(&self, identifier: &Slug) -> Result<NonEmpty<&T>, BrokenChain> {
        version_chain(identifier, self.versions_of(identifier))
    }

    /// Checks the integrity of every chain in the arena.
    ///
    /// Besides the resolution outcome, the report lists the cycles in each
    /// chain (including self-references) and the records whose previous
    /// version lies outside the chain.
    #[instrument(level = "debug", skip(self))]
    #[must_use]
    pub fn diagnose(&self) -> Vec<ChainReport> {
        self.by_identifier
            .iter()
            .map(|(identifier, ids)| {
                let members: BTreeSet<RecordId> = ids.iter().copied().collect();
                let mut graph: DiGraphMap<RecordId, ()> =
                    DiGraphMap::with_capacity(ids.len(), ids.len());
                let mut dangling = Vec::new();

                for record in ids.iter().filter_map(|id| self.records.get(id)) {
                    graph.add_node(record.id());
                    match record.previous_version() {
                        Some(previous) if members.contains(&previous) => {
                            graph.add_edge(record.id(), previous, ());
                        }
                        Some(_) => dangling.push(record.id()),
                        None => {}
                    }
                }

                let cycles = tarjan_scc(&graph)
                    .into_iter()
                    .filter(|component| {
                        component.len() > 1 || graph.contains_edge(component[0], component[0])
                    })
                    .map(|mut component| {
                        component.sort_unstable();
                        component
                    })
                    .collect();

                ChainReport {
                    identifier: identifier.clone(),
                    versions: ids.len(),
                    latest: self.latest(identifier).map(Versioned::id),
                    cycles,
                    dangling,
                }
            })
            .collect()
    }
}

/// Integrity report for a single version chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    /// The identifier shared by the chain.
    pub identifier: Slug,
    /// The number of stored revisions.
    pub versions: usize,
    /// The newest revision, or why it could not be determined.
    pub latest: Result<RecordId, BrokenChain>,
    /// Groups of revisions that reference each other in a loop.
    pub cycles: Vec<Vec<RecordId>>,
    /// Revisions whose previous version is not part of the chain.
    pub dangling: Vec<RecordId>,
}

impl ChainReport {
    /// Whether the chain resolved cleanly.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.latest.is_ok() && self.cycles.is_empty() && self.dangling.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Record {
        id: RecordId,
        identifier: Slug,
        previous: Option<RecordId>,
    }

    impl Versioned for Record {
        fn id(&self) -> RecordId {
            self.id
        }

        fn identifier(&self) -> &Slug {
            &self.identifier
        }

        fn previous_version(&self) -> Option<RecordId> {
            self.previous
        }
    }

    fn record(id: u32, identifier: &str, previous: Option<u32>) -> Record {
        Record {
            id: RecordId::new(id),
            identifier: Slug::try_from(identifier).unwrap(),
            previous: previous.map(RecordId::new),
        }
    }

    fn slug(s: &str) -> Slug {
        Slug::try_from(s).unwrap()
    }

    /// `old <- mid <- new`, stored out of order.
    fn nominal() -> Vec<Record> {
        vec![
            record(3, "test", Some(2)),
            record(1, "test", None),
            record(2, "test", Some(1)),
        ]
    }

    #[test]
    fn latest_nominal() {
        let records = nominal();
        let latest = latest_version(&slug("test"), &records).unwrap();
        assert_eq!(latest.id, RecordId::new(3));
    }

    #[test]
    fn single_record_is_its_own_latest() {
        let records = vec![record(7, "solo", None)];
        assert_eq!(
            latest_version(&slug("solo"), &records).unwrap().id,
            RecordId::new(7)
        );
    }

    #[test]
    fn other_identifiers_are_ignored() {
        let mut records = nominal();
        records.push(record(4, "other", None));
        records.push(record(5, "other", Some(4)));

        assert_eq!(
            latest_version(&slug("test"), &records).unwrap().id,
            RecordId::new(3)
        );
        assert_eq!(
            latest_version(&slug("other"), &records).unwrap().id,
            RecordId::new(5)
        );
    }

    #[test]
    fn unknown_identifier() {
        let records = nominal();
        assert_eq!(
            latest_version(&slug("missing"), &records),
            Err(BrokenChain::Unknown(slug("missing")))
        );
    }

    #[test]
    fn cycle_is_detected() {
        let mut records = nominal();
        // old now points at new: 1 -> 3 -> 2 -> 1
        records[1].previous = Some(RecordId::new(3));

        assert!(matches!(
            latest_version(&slug("test"), &records),
            Err(BrokenChain::NoSuccessor {
                after: None,
                unreached: 3,
                ..
            })
        ));
    }

    #[test]
    fn split_is_detected() {
        let mut records = nominal();
        // mid no longer points at old, so two records claim to be oldest
        records[2].previous = None;

        let error = latest_version(&slug("test"), &records).unwrap_err();
        assert_eq!(
            error,
            BrokenChain::Split {
                identifier: slug("test"),
                after: None,
                successors: vec![RecordId::new(1), RecordId::new(2)],
            }
        );
    }

    #[test]
    fn branch_is_detected() {
        let mut records = nominal();
        records.push(record(4, "test", Some(1)));

        assert!(matches!(
            latest_version(&slug("test"), &records),
            Err(BrokenChain::Split {
                after: Some(after),
                ..
            }) if after == RecordId::new(1)
        ));
    }

    #[test]
    fn self_references_are_detected() {
        let records: Vec<Record> = nominal()
            .into_iter()
            .map(|mut record| {
                record.previous = Some(record.id);
                record
            })
            .collect();

        assert!(matches!(
            latest_version(&slug("test"), &records),
            Err(BrokenChain::NoSuccessor { .. })
        ));
    }

    #[test]
    fn trailing_self_reference_is_detected() {
        let mut records = nominal();
        records.push(record(4, "test", Some(4)));

        assert_eq!(
            latest_version(&slug("test"), &records),
            Err(BrokenChain::NoSuccessor {
                identifier: slug("test"),
                after: Some(RecordId::new(3)),
                unreached: 1,
            })
        );
    }

    #[test]
    fn arena_history_is_oldest_first() {
        let arena = Arena::from_records(nominal()).unwrap();
        let history: Vec<u32> = arena
            .history(&slug("test"))
            .unwrap()
            .iter()
            .map(|record| record.id.get())
            .collect();
        assert_eq!(history, vec![1, 2, 3]);
        assert_eq!(arena.latest(&slug("test")).unwrap().id, RecordId::new(3));
    }

    #[test]
    fn arena_rejects_duplicate_identity() {
        let mut arena = Arena::from_records(nominal()).unwrap();
        assert_eq!(
            arena.insert(record(2, "other", None)),
            Err(DuplicateRecord(RecordId::new(2)))
        );
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn new_revision_does_not_alter_earlier_result() {
        let mut arena = Arena::from_records(nominal()).unwrap();
        let before = arena.latest(&slug("test")).unwrap().id;
        arena.insert(record(4, "test", Some(3))).unwrap();
        let after = arena.latest(&slug("test")).unwrap().id;

        assert_eq!(before, RecordId::new(3));
        assert_eq!(after, RecordId::new(4));
        assert_eq!(arena.versions_of(&slug("test")).len(), 4);
    }

    #[test]
    fn diagnose_reports_cycles_and_dangling_links() {
        let mut records = nominal();
        records.push(record(10, "looped", Some(11)));
        records.push(record(11, "looped", Some(10)));
        records.push(record(20, "selfish", Some(20)));
        records.push(record(30, "dangling", Some(99)));

        let arena = Arena::from_records(records).unwrap();
        let reports: BTreeMap<String, ChainReport> = arena
            .diagnose()
            .into_iter()
            .map(|report| (report.identifier.to_string(), report))
            .collect();

        assert!(reports["test"].is_healthy());
        assert_eq!(reports["test"].latest, Ok(RecordId::new(3)));

        assert_eq!(
            reports["looped"].cycles,
            vec![vec![RecordId::new(10), RecordId::new(11)]]
        );
        assert!(reports["looped"].latest.is_err());

        assert_eq!(reports["selfish"].cycles, vec![vec![RecordId::new(20)]]);
        assert_eq!(reports["dangling"].dangling, vec![RecordId::new(30)]);
        assert!(!reports["dangling"].is_healthy());
    }

    #[test]
    fn error_display() {
        let error = BrokenChain::Split {
            identifier: slug("test"),
            after: None,
            successors: vec![RecordId::new(1), RecordId::new(2)],
        };
        assert_eq!(
            error.to_string(),
            "version chain of 'test' splits after the start: #1, #2"
        );
    }
}
