use super::{Code, Error, Issue, Level, Section};

/// How a query constrains one level of the issue hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    /// Match any value, including absence.
    Any,
    /// Match only issues where the level is absent.
    Absent,
    /// Match only this value.
    Exactly(T),
}

impl<T> Filter<T> {
    fn matches<U>(&self, value: Option<&U>) -> bool
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        match self {
            Self::Any => true,
            Self::Absent => value.is_none(),
            Self::Exactly(expected) => value.is_some_and(|value| expected == value),
        }
    }
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T> From<T> for Filter<T> {
    fn from(value: T) -> Self {
        Self::Exactly(value)
    }
}

impl From<&str> for Filter<String> {
    fn from(value: &str) -> Self {
        Self::Exactly(value.to_string())
    }
}

/// Selects issues from an [`IssueSet`](super::IssueSet).
///
/// Every level defaults to [`Filter::Any`] and the code to any code.
/// Levels must be constrained from the outside in: once a level is
/// [`Filter::Any`], every deeper level must be too, and once a level is
/// [`Filter::Absent`], no deeper level may ask for an exact value.
///
/// ```
/// use scholarship::validation::{Code, Filter, Query, Section};
///
/// // Issues about the award section itself, not any of its fields.
/// let query = Query::new()
///     .section(Section::Award)
///     .field(Filter::Absent)
///     .code(Code::MinLength);
/// assert!(query.check().is_ok());
///
/// // A subfield without a field is meaningless.
/// assert!(Query::new().subfield(5).check().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    section: Filter<Section>,
    field: Filter<String>,
    subfield: Filter<i64>,
    code: Option<Code>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    /// A query matching every issue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            section: Filter::Any,
            field: Filter::Any,
            subfield: Filter::Any,
            code: None,
        }
    }

    /// Constrains the section.
    #[must_use]
    pub fn section(mut self, section: impl Into<Filter<Section>>) -> Self {
        self.section = section.into();
        self
    }

    /// Constrains the field.
    #[must_use]
    pub fn field(mut self, field: impl Into<Filter<String>>) -> Self {
        self.field = field.into();
        self
    }

    /// Constrains the subfield.
    #[must_use]
    pub fn subfield(mut self, subfield: impl Into<Filter<i64>>) -> Self {
        self.subfield = subfield.into();
        self
    }

    /// Only match issues with this code.
    #[must_use]
    pub const fn code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    /// Checks that the levels are constrained from the outside in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] naming the first level that is
    /// constrained more tightly than its parent allows.
    pub fn check(&self) -> Result<(), Error> {
        let levels = [
            (Level::Section, Shape::of(&self.section)),
            (Level::Field, Shape::of(&self.field)),
            (Level::Subfield, Shape::of(&self.subfield)),
        ];

        let mut broadest = Shape::Exactly;
        for (level, shape) in levels {
            if shape > broadest {
                return Err(Error::Hierarchy { level });
            }
            broadest = broadest.min(shape);
        }
        Ok(())
    }

    /// Whether the issue satisfies every constraint.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        let (section, field, subfield) = issue.location();
        self.section.matches(section.as_ref())
            && self.field.matches(field)
            && self.subfield.matches(subfield.as_ref())
            && self.code.is_none_or(|code| code == issue.code())
    }
}

/// How tightly a filter constrains its level, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Shape {
    Any,
    Absent,
    Exactly,
}

impl Shape {
    const fn of<T>(filter: &Filter<T>) -> Self {
        match filter {
            Filter::Any => Self::Any,
            Filter::Absent => Self::Absent,
            Filter::Exactly(_) => Self::Exactly,
        }
    }
}
