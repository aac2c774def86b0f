//! Financial aid rules.

use tracing::instrument;

use super::Context;
use crate::{
    domain::{Application, FinancialAid, InstallmentFrequency},
    validation::{Code, Issue, IssueSet, Section},
};

/// Checks every financial aid row.
///
/// Issues are located at `finaid/<field>/<row id>` so each can be shown next
/// to the offending row.
#[instrument(level = "debug", skip_all)]
pub fn validate(application: &Application, context: &Context, issues: &mut IssueSet) {
    for row in &application.financial_aid {
        validate_row(row, context, issues);
    }
}

fn validate_row(row: &FinancialAid, context: &Context, issues: &mut IssueSet) {
    let issue = |field: &str, code| Issue::subfield(Section::Finaid, field, row.id, code);

    if row.aid_type.trim().is_empty() {
        issues.add(issue("aid_type", Code::Required));
    }
    if row.provider.trim().is_empty() {
        issues.add(issue("provider", Code::Required));
    }

    let frequency = row.installment_frequency.trim();
    if frequency.is_empty() {
        issues.add(issue("installment_frequency", Code::Required));
    } else if frequency.parse::<InstallmentFrequency>().is_err() {
        issues.add(issue("installment_frequency", Code::Invalid));
    }

    let max = context.config.max_aid_amount;
    if row
        .installment_amount
        .is_some_and(|amount| amount.is_negative() || amount > max)
    {
        tracing::debug!("aid row {} has an amount out of range", row.id);
        issues.add(issue("installment_amount", Code::Invalid));
    }

    if row
        .semester_finished
        .is_some_and(|finished| finished < context.due)
    {
        issues.add(issue("semester_finished", Code::Invalid));
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{
        domain::{Amount, Semester},
        rules::fixtures,
        validation::Query,
    };

    fn complete_row(id: i64) -> FinancialAid {
        FinancialAid {
            id,
            aid_type: "scholarship".to_string(),
            provider: "Engineering Alumni Society".to_string(),
            installment_frequency: "semesterly".to_string(),
            installment_amount: Amount::from_units(500),
            semester_finished: Some(fixtures::semester("SP18")),
        }
    }

    fn run(rows: Vec<FinancialAid>) -> IssueSet {
        let config = fixtures::config();
        let catalog = fixtures::catalog();
        let mut application = fixtures::application();
        application.financial_aid = rows;
        let context = Context::new(&config, &catalog, application.due_semester().unwrap());
        let mut issues = IssueSet::new();
        validate(&application, &context, &mut issues);
        issues
    }

    #[test]
    fn complete_row_has_no_issues() {
        assert!(run(vec![complete_row(1)]).is_empty());
    }

    #[test]
    fn blank_row_reports_each_field() {
        let issues = run(vec![FinancialAid {
            id: 4,
            ..FinancialAid::default()
        }]);

        for field in ["aid_type", "provider", "installment_frequency"] {
            assert!(issues.contains(&Issue::subfield(Section::Finaid, field, 4, Code::Required)));
        }
        assert_eq!(issues.len(), 3);
    }

    #[test_case("-1.00", true; "negative")]
    #[test_case("0.00", false; "zero")]
    #[test_case("200000.00", false; "maximum")]
    #[test_case("200000.01", true; "over maximum")]
    fn amount_range(amount: &str, invalid: bool) {
        let mut row = complete_row(9);
        row.installment_amount = Some(amount.parse().unwrap());

        let issues = run(vec![row, complete_row(10)]);
        let found = issues
            .search(&Query::new().section(Section::Finaid).code(Code::Invalid))
            .unwrap();

        if invalid {
            assert_eq!(found.len(), 1);
            assert_eq!(found.iter().next().unwrap().subfield_index(), Some(9));
        } else {
            assert!(found.is_empty());
        }
    }

    #[test]
    fn missing_amount_is_accepted() {
        let mut row = complete_row(1);
        row.installment_amount = None;
        assert!(run(vec![row]).is_empty());
    }

    #[test]
    fn unknown_frequency() {
        let mut row = complete_row(2);
        row.installment_frequency = "fortnightly".to_string();
        assert!(run(vec![row]).contains(&Issue::subfield(
            Section::Finaid,
            "installment_frequency",
            2,
            Code::Invalid
        )));
    }

    #[test_case("FA16", true; "finished before due semester")]
    #[test_case("SP17", false; "finishing in due semester")]
    #[test_case("FA17", false; "finishing later")]
    fn finished_semester(finished: &str, invalid: bool) {
        let mut row = complete_row(3);
        row.semester_finished = Some(finished.parse::<Semester>().unwrap());
        assert_eq!(
            run(vec![row]).contains(&Issue::subfield(
                Section::Finaid,
                "semester_finished",
                3,
                Code::Invalid
            )),
            invalid
        );
    }
}
