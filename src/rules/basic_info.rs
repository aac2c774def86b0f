//! Contact, membership and scholastic information.

use std::sync::LazyLock;

use regex::Regex;
use tracing::instrument;

use super::Context;
use crate::{
    domain::Application,
    validation::{Code, Issue, IssueSet, Section},
};

/// Nine digits, the first of which is `9`.
static PSU_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^9\d{8}$").expect("ID pattern is valid"));

/// Domain every university e-mail address belongs to.
pub const PSU_EMAIL_DOMAIN: &str = "@psu.edu";

const GPA_RANGE: std::ops::RangeInclusive<f64> = 0.0..=4.0;

/// Whether the text is a ten-digit North American phone number, optionally
/// preceded by the country code `1`.
///
/// Spaces, dots, dashes, parentheses and a leading `+` are ignored.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '.' | '-' | '(' | ')' | '+'))
    {
        return false;
    }

    let digits: Vec<u8> = phone.bytes().filter(u8::is_ascii_digit).collect();
    let national = match digits.as_slice() {
        [b'1', rest @ ..] if rest.len() == 10 => rest,
        all if all.len() == 10 => all,
        _ => return false,
    };

    // Neither the area code nor the exchange may start with 0 or 1.
    matches!(national[0], b'2'..=b'9') && matches!(national[3], b'2'..=b'9')
}

/// Checks the basic information section.
#[instrument(level = "debug", skip_all)]
pub fn validate(application: &Application, context: &Context, issues: &mut IssueSet) {
    let mut flag = |field: &str, code| {
        issues.add(Issue::field(Section::BasicInfo, field, code));
    };

    if application.address.trim().is_empty() {
        flag("address", Code::Required);
    }

    let phone = application.phone.trim();
    if phone.is_empty() {
        flag("phone", Code::Required);
    } else if !is_valid_phone(phone) {
        flag("phone", Code::Invalid);
    }

    let email = application.psu_email.trim();
    if email.is_empty() {
        flag("psu_email", Code::Required);
    } else if !email.ends_with(PSU_EMAIL_DOMAIN) {
        flag("psu_email", Code::Prohibited);
    }

    let preferred = application.preferred_email.trim();
    if !preferred.is_empty() && !preferred.contains('@') {
        flag("preferred_email", Code::Invalid);
    }

    let psu_id = application.psu_id.trim();
    if psu_id.is_empty() {
        flag("psu_id", Code::Required);
    } else if !PSU_ID.is_match(psu_id) {
        flag("psu_id", Code::Invalid);
    }

    match application.semester_initiated {
        None => flag("semester_initiated", Code::Required),
        Some(initiated) if initiated > context.due => flag("semester_initiated", Code::Invalid),
        Some(_) => {}
    }

    match application.semester_graduating {
        None => flag("semester_graduating", Code::Required),
        Some(graduating) if graduating < context.due => {
            flag("semester_graduating", Code::Invalid);
        }
        Some(_) => {}
    }

    for (field, gpa) in [
        ("cumulative_gpa", application.cumulative_gpa),
        ("semester_gpa", application.semester_gpa),
    ] {
        match gpa {
            None => flag(field, Code::Required),
            Some(gpa) if !GPA_RANGE.contains(&gpa) => flag(field, Code::Invalid),
            Some(_) => {}
        }
    }

    if application.in_state_tuition.is_none() {
        flag("in_state_tuition", Code::Required);
    }

    match application.major.as_deref().map(str::trim) {
        None | Some("") => flag("major", Code::Required),
        Some(major) if !context.config.is_known_major(major) => flag("major", Code::Invalid),
        Some(_) => {}
    }
}
