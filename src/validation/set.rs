use std::collections::HashSet;

use serde::Serialize;

use super::{Code, Error, Issue, Query, Section};

/// The issues found by a validation pass.
///
/// Issues keep the order they were added in, and an issue that is already
/// present is never added twice.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct IssueSet {
    issues: Vec<Issue>,
    #[serde(skip)]
    index: HashSet<Issue>,
}

impl PartialEq for IssueSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for IssueSet {}

impl IssueSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an issue and adds it to the set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] if the location is not contiguous. The
    /// set is unchanged.
    pub fn create(
        &mut self,
        section: Option<Section>,
        field: Option<&str>,
        subfield: Option<i64>,
        code: Code,
    ) -> Result<(), Error> {
        self.add(Issue::new(section, field, subfield, code)?);
        Ok(())
    }

    /// Adds an issue.
    ///
    /// Returns `false` if an equal issue was already present.
    pub fn add(&mut self, issue: Issue) -> bool {
        if self.index.contains(&issue) {
            return false;
        }
        self.index.insert(issue.clone());
        self.issues.push(issue);
        true
    }

    /// Removes an issue.
    ///
    /// Returns `false` if the issue was not present.
    pub fn remove(&mut self, issue: &Issue) -> bool {
        if !self.index.remove(issue) {
            return false;
        }
        self.issues.retain(|existing| existing != issue);
        true
    }

    /// Whether an equal issue is present.
    #[must_use]
    pub fn contains(&self, issue: &Issue) -> bool {
        self.index.contains(issue)
    }

    /// The number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether there are no issues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates over the issues in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    /// Returns the issues matching the query, leaving the set unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] if the query is malformed.
    pub fn search(&self, query: &Query) -> Result<Self, Error> {
        query.check()?;
        Ok(self
            .issues
            .iter()
            .filter(|issue| query.matches(issue))
            .cloned()
            .collect())
    }

    /// Removes and returns the issues matching the query.
    ///
    /// This lets each part of a page claim its issues exactly once, so
    /// whatever is left over can be reported generically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] if the query is malformed. The set is
    /// unchanged.
    pub fn take(&mut self, query: &Query) -> Result<Self, Error> {
        query.check()?;
        let (taken, kept): (Vec<Issue>, Vec<Issue>) = std::mem::take(&mut self.issues)
            .into_iter()
            .partition(|issue| query.matches(issue));
        for issue in &taken {
            self.index.remove(issue);
        }
        self.issues = kept;
        Ok(taken.into_iter().collect())
    }

    /// Returns the codes of the issues matching the query, which must all
    /// share one location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] if the query is malformed, or
    /// [`Error::AmbiguousAggregate`] if the matches have different
    /// locations.
    pub fn aggregate(&self, query: &Query) -> Result<Vec<Code>, Error> {
        self.search(query)?.into_codes()
    }

    /// Like [`aggregate`](Self::aggregate), but also removes the matching
    /// issues.
    ///
    /// # Errors
    ///
    /// As for [`aggregate`](Self::aggregate). On error the set is unchanged.
    pub fn take_aggregate(&mut self, query: &Query) -> Result<Vec<Code>, Error> {
        let codes = self.aggregate(query)?;
        self.take(query)?;
        Ok(codes)
    }

    /// The distinct sections that have at least one issue, in wizard order.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        let mut sections: Vec<Section> = self
            .issues
            .iter()
            .filter_map(Issue::section_name)
            .collect();
        sections.sort_unstable();
        sections.dedup();
        sections
    }

    fn into_codes(self) -> Result<Vec<Code>, Error> {
        let mut issues = self.issues.iter();
        if let Some(first) = issues.next() {
            let location = first.location();
            if issues.any(|issue| issue.location() != location) {
                return Err(Error::AmbiguousAggregate);
            }
        }
        Ok(self.issues.iter().map(Issue::code).collect())
    }
}

impl FromIterator<Issue> for IssueSet {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Issue> for IssueSet {
    fn extend<I: IntoIterator<Item = Issue>>(&mut self, iter: I) {
        for issue in iter {
            self.add(issue);
        }
    }
}

impl IntoIterator for IssueSet {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a IssueSet {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
