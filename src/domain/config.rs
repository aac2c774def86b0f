use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Slug,
    finaid::Amount,
    semester::{self, Semester, Term},
};

/// Major offered when the applicant's major is not in the list.
pub const OTHER_MAJOR: &str = "Other";

/// Configuration for an application cycle.
///
/// Every value has a default, so an empty file (apart from `_version`) is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Minimum number of peers an applicant must write feedback about.
    pub min_feedback_count: usize,

    /// Due date of the current cycle, if one has been set.
    ///
    /// Applications carry their own due date. This one is used when asking
    /// about "the current semester" without an application at hand.
    pub due_date: Option<NaiveDate>,

    /// An applicant initiated fewer than this many months before the due
    /// semester is a new member.
    pub new_member_months: i32,

    /// Essays may exceed their advertised word limit up to this percentage
    /// of it.
    pub word_limit_grace_percent: u32,

    /// Largest installment amount accepted for a financial aid row.
    pub max_aid_amount: Amount,

    /// Majors applicants may choose from, in addition to [`OTHER_MAJOR`].
    pub majors: Vec<String>,

    /// Which awards are offered, and what they require.
    pub awards: AwardPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_feedback_count: default_min_feedback_count(),
            due_date: None,
            new_member_months: default_new_member_months(),
            word_limit_grace_percent: default_word_limit_grace_percent(),
            max_aid_amount: default_max_aid_amount(),
            majors: default_majors(),
            awards: AwardPolicy::default(),
        }
    }
}

/// Errors that can occur when loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid configuration.
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The semester of the configured due date, if one is set.
    ///
    /// # Errors
    ///
    /// Fails if the due date falls between semesters.
    pub fn current_semester(&self) -> Result<Option<Semester>, semester::Error> {
        self.due_date.map(Semester::from_date).transpose()
    }

    /// Whether an applicant initiated in `initiated` still counts as a new
    /// member when applying in `due`.
    #[must_use]
    pub fn is_new_member(&self, initiated: Semester, due: Semester) -> bool {
        due.months_since(&initiated) < self.new_member_months
    }

    /// The most words accepted for a prompt advertising `word_limit` words.
    #[must_use]
    pub fn word_limit_with_grace(&self, word_limit: u32) -> u64 {
        u64::from(word_limit) * u64::from(self.word_limit_grace_percent) / 100
    }

    /// Whether `major` is one of the configured majors or [`OTHER_MAJOR`].
    #[must_use]
    pub fn is_known_major(&self, major: &str) -> bool {
        major == OTHER_MAJOR || self.majors.iter().any(|known| known == major)
    }
}

/// Which awards are offered each term, and the requirements attached to
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardPolicy {
    /// Awards offered in Spring, in display order.
    pub spring: Vec<Slug>,

    /// Awards offered in Fall, in display order.
    pub fall: Vec<Slug>,

    /// Awards open to every applicant, including graduating seniors. Every
    /// other award is an endowment.
    pub unrestricted: Vec<Slug>,

    /// Awards limited to certain majors.
    pub restrictions: BTreeMap<Slug, MajorRestriction>,

    /// Essay groups required by each award. A group is satisfied by a
    /// response to any one of its prompts.
    pub essays: BTreeMap<Slug, Vec<Vec<Slug>>>,
}

impl AwardPolicy {
    /// The awards offered in the given term. The year plays no part.
    #[must_use]
    pub fn offered_in(&self, term: Term) -> &[Slug] {
        match term {
            Term::Spring => &self.spring,
            Term::Fall => &self.fall,
        }
    }

    /// Whether graduating seniors are barred from the award.
    #[must_use]
    pub fn is_endowment(&self, award: &Slug) -> bool {
        !self.unrestricted.contains(award)
    }

    /// The major restriction on an award, if any.
    #[must_use]
    pub fn restriction(&self, award: &Slug) -> Option<&MajorRestriction> {
        self.restrictions.get(award)
    }

    /// The essay groups an award requires.
    #[must_use]
    pub fn essay_groups(&self, award: &Slug) -> &[Vec<Slug>] {
        self.essays.get(award).map_or(&[], Vec::as_slice)
    }
}

impl Default for AwardPolicy {
    fn default() -> Self {
        let spring = slugs(&[
            "ean_hong",
            "ambassador",
            "giff_albright",
            "joe_conway",
            "dan_summers",
            "navy_marine",
            "excellence",
            "pledge",
        ]);
        let fall = slugs(&["ean_hong", "excellence", "pledge"]);

        let restrictions = BTreeMap::from([
            (
                slug("giff_albright"),
                MajorRestriction {
                    majors: vec!["Architectural Engineering".to_string()],
                    emch_minor: false,
                },
            ),
            (
                slug("joe_conway"),
                MajorRestriction {
                    majors: vec!["Engineering Science".to_string()],
                    emch_minor: true,
                },
            ),
        ]);

        let essays = BTreeMap::from([
            (slug("giff_albright"), vec![slugs(&["giff_visit_review"])]),
            (
                slug("ean_hong"),
                vec![
                    slugs(&["newmember_involvement_previous", "involvement_outside"]),
                    slugs(&[
                        "newmember_coe_friends",
                        "established_coe_friends",
                        "newmember_coe_community_plans",
                    ]),
                    slugs(&[
                        "newmember_plans_from_others",
                        "established_your_legacy_friendship",
                        "established_your_legacy_accomplishments",
                    ]),
                ],
            ),
            (
                slug("ambassador"),
                vec![
                    slugs(&["newmember_involvement_previous", "involvement_outside"]),
                    slugs(&[
                        "newmember_previous_leadership",
                        "established_community_leadership",
                    ]),
                    slugs(&[
                        "newmember_greek_relations_plans",
                        "newmember_greek_relations_accomplishments",
                        "established_greek_relations_accomplishments",
                    ]),
                ],
            ),
        ]);

        Self {
            spring,
            fall,
            unrestricted: slugs(&["ean_hong"]),
            restrictions,
            essays,
        }
    }
}

/// Majors (or minor) required to receive an award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorRestriction {
    /// Majors that qualify.
    pub majors: Vec<String>,

    /// Whether the Engineering Mechanics minor also qualifies.
    #[serde(default)]
    pub emch_minor: bool,
}

impl MajorRestriction {
    /// Whether an applicant with this major and minor qualifies.
    #[must_use]
    pub fn permits(&self, major: Option<&str>, emch_minor: bool) -> bool {
        (self.emch_minor && emch_minor)
            || major.is_some_and(|major| self.majors.iter().any(|m| m == major))
    }
}

fn slug(s: &'static str) -> Slug {
    Slug::try_from(s).expect("built-in identifiers are valid slugs")
}

fn slugs(names: &[&'static str]) -> Vec<Slug> {
    names.iter().copied().map(slug).collect()
}

const fn default_min_feedback_count() -> usize {
    3
}

const fn default_new_member_months() -> i32 {
    8
}

const fn default_word_limit_grace_percent() -> u32 {
    120
}

const fn default_max_aid_amount() -> Amount {
    Amount::from_cents(20_000_000)
}

fn default_majors() -> Vec<String> {
    [
        "Aerospace Engineering",
        "Agricultural Science",
        "Agricultural and Extension Education",
        "Animal Science",
        "Archaeological Science",
        "Architectural Engineering",
        "Architecture",
        "Astronomy and Astrophysics",
        "BioRenewable Systems",
        "Biobehavioral Health",
        "Biochemistry and Molecular Biology",
        "Biological Anthropology",
        "Biological Engineering",
        "Biology",
        "Biomedical Engineering",
        "Biotechnology",
        "Chemical Engineering",
        "Chemistry",
        "Civil Engineering",
        "Computer Engineering",
        "Computer Science",
        "Earth Science and Policy",
        "Earth Sciences",
        "Electrical Engineering",
        "Electro-Mechanical Engineering Technology",
        "Energy Engineering",
        "Energy and Sustainability Policy",
        "Engineering Science",
        "Environmental Studies",
        "Environmental Systems Engineering",
        "Food Science",
        "Forensic Science",
        "General Engineering",
        "Geobiology",
        "Geography",
        "Geosciences",
        "Immunology and Infectious Disease",
        "Industrial Engineering",
        "Information Sciences and Technology",
        "Landscape Architecture",
        "Latin American Studies",
        "Management Information Systems",
        "Materials Science and Engineering",
        "Mathematics",
        "Mechanical Engineering",
        "Meteorology",
        "Microbiology",
        "Mining Engineering",
        "Nuclear Engineering",
        "Nutritional Sciences",
        "Petroleum and Natural Gas Engineering",
        "Physics",
        "Planetary Science and Astronomy",
        "Plant Sciences",
        "Premedicine",
        "Rail Transportation Engineering",
        "Risk Management",
        "Science",
        "Security and Risk Analysis",
        "Statistics",
        "Supply Chain and Information Systems",
        "Telecommunications",
        "Toxicology",
        "Turfgrass Science",
        "Wildlife and Fisheries Science",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_min_feedback_count")]
        min_feedback_count: usize,

        /// Quoted ISO date, e.g. `"2017-02-15"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        due_date: Option<NaiveDate>,

        #[serde(default = "default_new_member_months")]
        new_member_months: i32,

        #[serde(default = "default_word_limit_grace_percent")]
        word_limit_grace_percent: u32,

        #[serde(default = "default_max_aid_amount")]
        max_aid_amount: Amount,

        #[serde(default = "default_majors")]
        majors: Vec<String>,

        #[serde(default)]
        awards: AwardPolicy,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                min_feedback_count,
                due_date,
                new_member_months,
                word_limit_grace_percent,
                max_aid_amount,
                majors,
                awards,
            } => Self {
                min_feedback_count,
                due_date,
                new_member_months,
                word_limit_grace_percent,
                max_aid_amount,
                majors,
                awards,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            min_feedback_count: config.min_feedback_count,
            due_date: config.due_date,
            new_member_months: config.new_member_months,
            word_limit_grace_percent: config.word_limit_grace_percent,
            max_aid_amount: config.max_aid_amount,
            majors: config.majors,
            awards: config.awards,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmin_feedback_count = 5\ndue_date = \"2017-02-15\"\nmajors = [\"Physics\"]\n\n[awards]\nspring = [\"pledge\"]\nfall = []\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.min_feedback_count, 5);
        assert_eq!(
            config.current_semester().unwrap(),
            Some(Semester::new(Term::Spring, 2017))
        );
        assert_eq!(config.majors, vec!["Physics".to_string()]);
        assert_eq!(config.awards.offered_in(Term::Spring), &[slug("pledge")]);
        assert!(config.awards.offered_in(Term::Fall).is_empty());
        // Sections of the policy that were not given keep their defaults.
        assert_eq!(config.awards.unrestricted, vec![slug("ean_hong")]);
        assert_eq!(config.new_member_months, 8);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().starts_with("Failed to read config file"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmin_feedback_count = \"three\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.min_feedback_count = 4;
        config.due_date = NaiveDate::from_ymd_opt(2016, 9, 30);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn default_catalogs() {
        let policy = AwardPolicy::default();
        assert_eq!(policy.offered_in(Term::Spring).len(), 8);
        assert_eq!(
            policy.offered_in(Term::Fall),
            &slugs(&["ean_hong", "excellence", "pledge"])
        );
        assert!(
            policy
                .offered_in(Term::Fall)
                .iter()
                .all(|award| policy.offered_in(Term::Spring).contains(award))
        );
        assert!(!policy.is_endowment(&slug("ean_hong")));
        assert!(policy.is_endowment(&slug("excellence")));
        assert!(policy.essay_groups(&slug("pledge")).is_empty());
        assert_eq!(policy.essay_groups(&slug("ambassador")).len(), 3);
    }

    #[test_case("Architectural Engineering", false, true; "architectural major")]
    #[test_case("Physics", false, false; "other major")]
    #[test_case("Physics", true, false; "minor does not count")]
    fn giff_albright_restriction(major: &str, minor: bool, permitted: bool) {
        let policy = AwardPolicy::default();
        let restriction = policy.restriction(&slug("giff_albright")).unwrap();
        assert_eq!(restriction.permits(Some(major), minor), permitted);
    }

    #[test_case(Some("Engineering Science"), false, true; "engineering science")]
    #[test_case(Some("Physics"), true, true; "emch minor")]
    #[test_case(None, true, true; "minor without major")]
    #[test_case(Some("Physics"), false, false; "neither")]
    fn joe_conway_restriction(major: Option<&str>, minor: bool, permitted: bool) {
        let policy = AwardPolicy::default();
        let restriction = policy.restriction(&slug("joe_conway")).unwrap();
        assert_eq!(restriction.permits(major, minor), permitted);
    }

    #[test_case(250, 300; "exact")]
    #[test_case(7, 8; "rounded down")]
    #[test_case(0, 0; "zero")]
    fn word_limit_grace(limit: u32, expected: u64) {
        assert_eq!(Config::default().word_limit_with_grace(limit), expected);
    }

    #[test]
    fn new_member_threshold() {
        let config = Config::default();
        let spring_17 = Semester::new(Term::Spring, 2017);
        assert!(config.is_new_member(Semester::new(Term::Fall, 2016), spring_17));
        assert!(config.is_new_member(spring_17, spring_17));
        assert!(!config.is_new_member(Semester::new(Term::Spring, 2016), spring_17));
    }

    #[test]
    fn known_majors() {
        let config = Config::default();
        assert!(config.is_known_major("Physics"));
        assert!(config.is_known_major(OTHER_MAJOR));
        assert!(!config.is_known_major("Basket Weaving"));
    }
}
