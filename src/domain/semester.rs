use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `<term><year>` with an optional space, e.g. `SP17`, `Fall 2016`, `fa2016`.
///
/// The year is either two digits or the zero-padded display form.
static STRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s*(\d{2}|\d{4,5})$").expect("semester pattern is valid")
});

/// Adds 2000 to years written with two digits.
const fn normalize_short_year(year: u16) -> u16 {
    if year < 100 { year + 2000 } else { year }
}

/// The half of the academic year a semester belongs to.
///
/// Terms are ordered chronologically within a year: Spring comes before Fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// January through May.
    Spring,
    /// August through December.
    Fall,
}

impl Term {
    /// Returns the full name of the term (`Spring` or `Fall`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Fall => "Fall",
        }
    }

    /// Returns the two-letter abbreviation of the term (`SP` or `FA`).
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Spring => "SP",
            Self::Fall => "FA",
        }
    }

    /// Returns the term in session on the given month and day, if any.
    ///
    /// Spring runs from January 1 to May 31 and Fall from August 1 to
    /// December 31. June and July belong to neither.
    #[must_use]
    pub const fn in_session(month: u32, day: u32) -> Option<Self> {
        match (month, day) {
            (1..=5, 1..=31) => Some(Self::Spring),
            (8..=12, 1..=31) => Some(Self::Fall),
            _ => None,
        }
    }

    /// Month and day of the representative date of the term.
    const fn canonical_month_day(self) -> (u32, u32) {
        match self {
            Self::Spring => (2, 1),
            Self::Fall => (9, 1),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Term {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sp" | "spring" => Ok(Self::Spring),
            "fa" | "fall" => Ok(Self::Fall),
            _ => Err(Error::Term(s.to_string())),
        }
    }
}

/// The pairing of a [`Term`] and a year.
///
/// A `Semester` is an immutable value. Semesters are totally ordered by year
/// and then by term, so `Fall 2016 < Spring 2017 < Fall 2017`.
///
/// A semester can be built from:
/// - a term and a year ([`Semester::new`], or a `(&str, i32)` pair),
/// - a calendar date ([`Semester::from_date`]),
/// - a compact string such as `SP17` or `FA2016`,
/// - a free string such as `Spring 2017`,
/// - an ISO date string such as `2017-02-01`.
///
/// Two-digit years in text and `(term, year)` pairs are taken to be in the
/// 2000s. [`Semester::new`] and [`Semester::from_date`] keep the year as is.
///
/// # Examples
///
/// ```
/// use scholarship::domain::semester::{Semester, Term};
///
/// let spring: Semester = "SP17".parse().unwrap();
/// assert_eq!(spring, Semester::new(Term::Spring, 2017));
/// assert_eq!(spring.to_string(), "Spring 2017");
/// assert!(spring < "Fall 2017".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Semester {
    // Field order matters: the derived ordering compares the year first.
    year: u16,
    term: Term,
}

impl Semester {
    /// Creates a semester from a term and a year, taken as given.
    #[must_use]
    pub const fn new(term: Term, year: u16) -> Self {
        Self { year, term }
    }

    /// Returns the semester in session on the given date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfSession`] for dates in June or July, and
    /// [`Error::Year`] if the year cannot be represented.
    pub fn from_date(date: NaiveDate) -> Result<Self, Error> {
        let term = Term::in_session(date.month(), date.day()).ok_or(Error::OutOfSession(date))?;
        let year = u16::try_from(date.year()).map_err(|_| Error::Year(date.year().into()))?;
        Ok(Self { year, term })
    }

    /// Returns the term.
    #[must_use]
    pub const fn term(&self) -> Term {
        self.term
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Whether this is a Spring semester.
    #[must_use]
    pub const fn is_spring(&self) -> bool {
        matches!(self.term, Term::Spring)
    }

    /// Whether this is a Fall semester.
    #[must_use]
    pub const fn is_fall(&self) -> bool {
        matches!(self.term, Term::Fall)
    }

    /// Returns the representative date of the semester: February 1 for
    /// Spring, September 1 for Fall.
    ///
    /// This exists for storage round-tripping. Ordering never goes through
    /// the canonical date.
    #[must_use]
    pub fn canonical_date(&self) -> NaiveDate {
        let (month, day) = self.term.canonical_month_day();
        NaiveDate::from_ymd_opt(i32::from(self.year), month, day)
            .expect("every u16 year is representable as a date")
    }

    /// Whole months elapsed between the canonical dates of `earlier` and
    /// `self`. Negative if `earlier` is actually later.
    #[must_use]
    pub fn months_since(&self, earlier: &Self) -> i32 {
        let month_index = |semester: &Self| {
            let month = match semester.term {
                Term::Spring => 2,
                Term::Fall => 9,
            };
            i32::from(semester.year) * 12 + month
        };
        month_index(self) - month_index(earlier)
    }

    /// Returns the compact form, e.g. `SP17`.
    ///
    /// Only the last two digits of the year are kept, so the compact form
    /// round-trips for years 2000 through 2099.
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{}{:02}", self.term.abbreviation(), self.year % 100)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:04}", self.term, self.year)
    }
}

/// Errors that can occur when constructing a [`Semester`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string is not of the form `<term><year>` or `<term> <year>`.
    #[error("Invalid semester format: {0}")]
    Syntax(String),

    /// The term is neither Spring nor Fall.
    #[error("Unknown term '{0}': expected Spring, SP, Fall or FA")]
    Term(String),

    /// The date falls between semesters (June or July).
    #[error("{0} does not fall within a semester")]
    OutOfSession(NaiveDate),

    /// The year cannot be represented.
    #[error("Year {0} is out of range")]
    Year(i64),
}

impl FromStr for Semester {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Self::from_date(date);
        }

        let captures = STRUCTURE
            .captures(s)
            .ok_or_else(|| Error::Syntax(s.to_string()))?;

        let term: Term = captures[1].parse()?;
        let digits = &captures[2];
        let year: u16 = digits
            .parse()
            .map_err(|_| Error::Year(digits.parse().unwrap_or(i64::MAX)))?;

        if digits.len() == 2 {
            Ok(Self::new(term, normalize_short_year(year)))
        } else {
            Ok(Self::new(term, year))
        }
    }
}

impl TryFrom<&str> for Semester {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Semester {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<(&str, i32)> for Semester {
    type Error = Error;

    fn try_from((term, year): (&str, i32)) -> Result<Self, Self::Error> {
        let term: Term = term.trim().parse()?;
        let year = u16::try_from(year).map_err(|_| Error::Year(year.into()))?;
        Ok(Self::new(term, normalize_short_year(year)))
    }
}

impl TryFrom<NaiveDate> for Semester {
    type Error = Error;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_date(value)
    }
}

impl From<Semester> for String {
    fn from(value: Semester) -> Self {
        value.to_string()
    }
}
