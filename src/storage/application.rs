use std::{fs, path::Path};

use tracing::instrument;

use super::LoadError;
use crate::domain::Application;

/// Reads an application from a YAML file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
#[instrument(level = "debug")]
pub fn load_application(path: &Path) -> Result<Application, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    serde_yaml::from_str(&text).map_err(|e| LoadError::yaml(path, e))
}

/// Writes an application to a YAML file, replacing any existing contents.
///
/// # Errors
///
/// Returns [`LoadError`] if the application cannot be serialized or the
/// file cannot be written.
#[instrument(level = "debug", skip(application))]
pub fn save_application(application: &Application, path: &Path) -> Result<(), LoadError> {
    let text = serde_yaml::to_string(application).map_err(|e| LoadError::yaml(path, e))?;
    fs::write(path, text).map_err(|e| LoadError::io(path, e))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{Amount, EssayResponse, FinancialAid, PeerId, RecordId};

    const DRAFT: &str = r"
applicant: 12
due_at: 2017-02-15
awards: [3, 7]
semester_initiated: FA15
major: Mechanical Engineering
emch_minor: true
cumulative_gpa: 3.2
essays:
  - prompt: 201
    text: I help out.
financial_aid:
  - id: 1
    aid_type: grant
    provider: FAFSA
    installment_frequency: yearly
    installment_amount: 1500.50
";

    #[test]
    fn load_partial_draft() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.yaml");
        fs::write(&path, DRAFT).unwrap();

        let application = load_application(&path).unwrap();
        assert_eq!(application.applicant, PeerId::new(12));
        assert_eq!(
            application.due_at,
            NaiveDate::from_ymd_opt(2017, 2, 15).unwrap()
        );
        assert_eq!(application.awards, vec![RecordId::new(3), RecordId::new(7)]);
        assert_eq!(application.semester_initiated, Some("FA15".parse().unwrap()));
        assert_eq!(application.semester_graduating, None);
        assert_eq!(application.essays.len(), 1);
        assert_eq!(
            application.financial_aid[0].installment_amount,
            Some(Amount::from_cents(150_050))
        );
        assert!(!application.submitted);
        assert!(application.phone.is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.yaml");

        let mut application = Application::new(
            PeerId::new(4),
            NaiveDate::from_ymd_opt(2016, 10, 1).unwrap(),
        );
        application.phone = "609-412-4321".to_string();
        application.essays.push(EssayResponse {
            prompt: RecordId::new(5),
            text: "Some words".to_string(),
        });
        application.financial_aid.push(FinancialAid {
            id: 2,
            installment_amount: Amount::from_units(20),
            ..FinancialAid::default()
        });

        save_application(&application, &path).unwrap();
        assert_eq!(load_application(&path).unwrap(), application);
    }

    #[test]
    fn missing_applicant_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "due_at: 2017-02-15\n").unwrap();
        assert!(matches!(
            load_application(&path),
            Err(LoadError::Yaml { .. })
        ));
    }
}
