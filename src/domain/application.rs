use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    feedback::{Feedback, PeerId},
    finaid::FinancialAid,
    semester::{self, Semester},
    version::RecordId,
};

/// An applicant's answer to one essay prompt revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayResponse {
    /// The prompt revision being answered.
    pub prompt: RecordId,

    /// The answer.
    #[serde(default)]
    pub text: String,
}

impl EssayResponse {
    /// Number of whitespace-separated words in the answer.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Everything an applicant has entered so far.
///
/// Applications are filled in over several sessions, so almost every field
/// may be blank or missing. Rules report gaps as issues rather than refusing
/// to load the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Whether the application has been submitted.
    #[serde(default)]
    pub submitted: bool,

    /// The member applying.
    pub applicant: PeerId,

    /// When the application is due. Its semester is the "due semester".
    pub due_at: NaiveDate,

    /// Selected award revisions, in the order they were chosen.
    #[serde(default)]
    pub awards: Vec<RecordId>,

    /// Semester the applicant was initiated.
    #[serde(default)]
    pub semester_initiated: Option<Semester>,

    /// Semester the applicant expects to graduate.
    #[serde(default)]
    pub semester_graduating: Option<Semester>,

    /// Declared major.
    #[serde(default)]
    pub major: Option<String>,

    /// Whether the applicant has an Engineering Mechanics minor.
    #[serde(default)]
    pub emch_minor: bool,

    /// Permanent mailing address.
    #[serde(default)]
    pub address: String,

    /// Primary phone number.
    #[serde(default)]
    pub phone: String,

    /// University e-mail address.
    #[serde(default)]
    pub psu_email: String,

    /// Preferred e-mail address, if different.
    #[serde(default)]
    pub preferred_email: String,

    /// University ID number (`9` followed by eight digits).
    #[serde(default)]
    pub psu_id: String,

    /// Cumulative GPA as of the end of last semester.
    #[serde(default)]
    pub cumulative_gpa: Option<f64>,

    /// GPA for the most recent completed semester.
    #[serde(default)]
    pub semester_gpa: Option<f64>,

    /// Whether the applicant pays in-state tuition.
    #[serde(default)]
    pub in_state_tuition: Option<bool>,

    /// Essay responses.
    #[serde(default)]
    pub essays: Vec<EssayResponse>,

    /// Declared sources of financial aid.
    #[serde(default)]
    pub financial_aid: Vec<FinancialAid>,

    /// Feedback written about other members.
    #[serde(default)]
    pub feedback: Vec<Feedback>,

    /// Free-form remarks.
    #[serde(default)]
    pub additional_remarks: String,
}

impl Application {
    /// Creates an empty draft application.
    #[must_use]
    pub const fn new(applicant: PeerId, due_at: NaiveDate) -> Self {
        Self {
            submitted: false,
            applicant,
            due_at,
            awards: Vec::new(),
            semester_initiated: None,
            semester_graduating: None,
            major: None,
            emch_minor: false,
            address: String::new(),
            phone: String::new(),
            psu_email: String::new(),
            preferred_email: String::new(),
            psu_id: String::new(),
            cumulative_gpa: None,
            semester_gpa: None,
            in_state_tuition: None,
            essays: Vec::new(),
            financial_aid: Vec::new(),
            feedback: Vec::new(),
            additional_remarks: String::new(),
        }
    }

    /// The semester the application is due in.
    ///
    /// # Errors
    ///
    /// Fails if the due date falls between semesters.
    pub fn due_semester(&self) -> Result<Semester, semester::Error> {
        Semester::from_date(self.due_at)
    }

    /// The response to the given prompt revision, if any.
    #[must_use]
    pub fn response_to(&self, prompt: RecordId) -> Option<&EssayResponse> {
        self.essays.iter().find(|response| response.prompt == prompt)
    }

    /// Whether the applicant graduates in the given semester.
    #[must_use]
    pub fn graduates_in(&self, semester: Semester) -> bool {
        self.semester_graduating == Some(semester)
    }
}
