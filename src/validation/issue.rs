use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Error, Level};

/// The wizard sections issues can belong to.
///
/// Sections are ordered as the wizard presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Award selection.
    Award,
    /// Contact, membership and scholastic information.
    #[serde(rename = "basicinfo")]
    BasicInfo,
    /// Financial aid.
    Finaid,
    /// Essays.
    Essay,
    /// Peer feedback.
    Feedback,
}

impl Section {
    /// Every section, in wizard order.
    pub const ALL: [Self; 5] = [
        Self::Award,
        Self::BasicInfo,
        Self::Finaid,
        Self::Essay,
        Self::Feedback,
    ];

    /// The name used in serialized issues.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Award => "award",
            Self::BasicInfo => "basicinfo",
            Self::Finaid => "finaid",
            Self::Essay => "essay",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown section name.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// What is wrong at an issue's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Code {
    /// Information is missing that shouldn't be.
    Required,
    /// Input is malformed in some way.
    Invalid,
    /// Too few.
    MinLength,
    /// Too many.
    MaxLength,
    /// A business rule prevents some action.
    Prohibited,
}

impl Code {
    /// Every code.
    pub const ALL: [Self; 5] = [
        Self::Required,
        Self::Invalid,
        Self::MinLength,
        Self::MaxLength,
        Self::Prohibited,
    ];

    /// The well-known name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Invalid => "invalid",
            Self::MinLength => "min-length",
            Self::MaxLength => "max-length",
            Self::Prohibited => "prohibited",
        }
    }

    /// A short explanation suitable for showing next to a form field.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Required => "This field must be filled in",
            Self::Invalid => "Your current response is invalid",
            Self::MinLength => "Not enough entries",
            Self::MaxLength => "Too long",
            Self::Prohibited => "Not allowed by the award rules",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| Error::UnknownCode(s.to_string()))
    }
}

/// A single validation finding.
///
/// The location is optional at every level, but contiguous: a field is only
/// present with a section, and a subfield only with a field. Equality and
/// hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subfield: Option<i64>,
    code: Code,
}

impl Issue {
    /// Creates an issue, checking that the hierarchy is contiguous.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] if a field is given without a section, or
    /// a subfield without a field.
    pub fn new(
        section: Option<Section>,
        field: Option<&str>,
        subfield: Option<i64>,
        code: Code,
    ) -> Result<Self, Error> {
        if section.is_none() && field.is_some() {
            return Err(Error::Hierarchy {
                level: Level::Field,
            });
        }
        if field.is_none() && subfield.is_some() {
            return Err(Error::Hierarchy {
                level: Level::Subfield,
            });
        }

        Ok(Self {
            section,
            field: field.map(str::to_string),
            subfield,
            code,
        })
    }

    /// An issue concerning the application as a whole.
    #[must_use]
    pub const fn global(code: Code) -> Self {
        Self {
            section: None,
            field: None,
            subfield: None,
            code,
        }
    }

    /// An issue concerning a whole section.
    #[must_use]
    pub const fn section(section: Section, code: Code) -> Self {
        Self {
            section: Some(section),
            field: None,
            subfield: None,
            code,
        }
    }

    /// An issue concerning one field of a section.
    #[must_use]
    pub fn field(section: Section, field: impl Into<String>, code: Code) -> Self {
        Self {
            section: Some(section),
            field: Some(field.into()),
            subfield: None,
            code,
        }
    }

    /// An issue concerning one numbered entry of a field.
    #[must_use]
    pub fn subfield(section: Section, field: impl Into<String>, subfield: i64, code: Code) -> Self {
        Self {
            section: Some(section),
            field: Some(field.into()),
            subfield: Some(subfield),
            code,
        }
    }

    /// The section, if any.
    #[must_use]
    pub const fn section_name(&self) -> Option<Section> {
        self.section
    }

    /// The field, if any.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// The subfield, if any.
    #[must_use]
    pub const fn subfield_index(&self) -> Option<i64> {
        self.subfield
    }

    /// The code.
    #[must_use]
    pub const fn code(&self) -> Code {
        self.code
    }

    /// The `(section, field, subfield)` location of the issue.
    #[must_use]
    pub fn location(&self) -> (Option<Section>, Option<&str>, Option<i64>) {
        (self.section, self.field.as_deref(), self.subfield)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.section, &self.field, self.subfield) {
            (None, _, _) => write!(f, "(application)")?,
            (Some(section), None, _) => write!(f, "{section}")?,
            (Some(section), Some(field), None) => write!(f, "{section}/{field}")?,
            (Some(section), Some(field), Some(subfield)) => {
                write!(f, "{section}/{field}/{subfield}")?;
            }
        }
        write!(f, ": {}", self.code)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn new_rejects_field_without_section() {
        assert_eq!(
            Issue::new(None, Some("noparent"), None, Code::Invalid),
            Err(Error::Hierarchy {
                level: Level::Field
            })
        );
    }

    #[test]
    fn new_rejects_subfield_without_field() {
        assert_eq!(
            Issue::new(None, None, Some(5), Code::Invalid),
            Err(Error::Hierarchy {
                level: Level::Subfield
            })
        );
        assert_eq!(
            Issue::new(Some(Section::Award), None, Some(4), Code::Invalid),
            Err(Error::Hierarchy {
                level: Level::Subfield
            })
        );
    }

    #[test]
    fn new_matches_shorthands() {
        assert_eq!(
            Issue::new(None, None, None, Code::Required).unwrap(),
            Issue::global(Code::Required)
        );
        assert_eq!(
            Issue::new(Some(Section::Essay), None, None, Code::Invalid).unwrap(),
            Issue::section(Section::Essay, Code::Invalid)
        );
        assert_eq!(
            Issue::new(Some(Section::Award), Some("selected"), Some(2), Code::Invalid).unwrap(),
            Issue::subfield(Section::Award, "selected", 2, Code::Invalid)
        );
    }

    #[test_case("required", Code::Required; "required")]
    #[test_case("min-length", Code::MinLength; "min length")]
    #[test_case("max-length", Code::MaxLength; "max length")]
    #[test_case("prohibited", Code::Prohibited; "prohibited")]
    fn parse_code(input: &str, expected: Code) {
        assert_eq!(input.parse::<Code>(), Ok(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn unknown_code() {
        assert_eq!(
            "FALSE".parse::<Code>(),
            Err(Error::UnknownCode("FALSE".to_string()))
        );
    }

    #[test]
    fn parse_section() {
        assert_eq!("basicinfo".parse::<Section>(), Ok(Section::BasicInfo));
        assert!("section1".parse::<Section>().is_err());
    }

    #[test_case(Issue::global(Code::Required), "(application): required"; "global")]
    #[test_case(Issue::section(Section::Award, Code::MinLength), "award: min-length"; "section")]
    #[test_case(Issue::field(Section::BasicInfo, "major", Code::Prohibited), "basicinfo/major: prohibited"; "field")]
    #[test_case(Issue::subfield(Section::Finaid, "provider", 7, Code::Required), "finaid/provider/7: required"; "subfield")]
    fn display(issue: Issue, expected: &str) {
        assert_eq!(issue.to_string(), expected);
    }

    #[test]
    fn serializes_present_levels_only() {
        let json = serde_json::to_string(&Issue::field(Section::BasicInfo, "major", Code::Prohibited))
            .unwrap();
        assert_eq!(
            json,
            r#"{"section":"basicinfo","field":"major","code":"prohibited"}"#
        );
    }
}
