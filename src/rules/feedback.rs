//! Peer feedback rules.

use tracing::instrument;

use super::Context;
use crate::{
    domain::Application,
    validation::{Code, Issue, IssueSet, Section},
};

/// Number of feedback entries about members other than the applicant.
#[must_use]
pub fn count(application: &Application) -> usize {
    application
        .feedback
        .iter()
        .filter(|entry| entry.peer != application.applicant)
        .count()
}

/// Checks that enough peers have been reviewed.
#[instrument(level = "debug", skip_all)]
pub fn validate(application: &Application, context: &Context, issues: &mut IssueSet) {
    let given = count(application);
    if given < context.config.min_feedback_count {
        tracing::debug!(
            "{given} of {} feedback entries given",
            context.config.min_feedback_count
        );
        issues.add(Issue::section(Section::Feedback, Code::MinLength));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Feedback, PeerId},
        rules::fixtures,
    };

    fn feedback(peer: u32) -> Feedback {
        Feedback {
            peer: PeerId::new(peer),
            text: "Always shows up".to_string(),
        }
    }

    fn run(application: &Application) -> IssueSet {
        let config = fixtures::config();
        let catalog = fixtures::catalog();
        let context = Context::new(&config, &catalog, application.due_semester().unwrap());
        let mut issues = IssueSet::new();
        validate(application, &context, &mut issues);
        issues
    }

    #[test]
    fn too_few_feedbacks() {
        let mut application = fixtures::application();
        application.feedback = vec![feedback(2), feedback(3)];

        assert!(run(&application).contains(&Issue::section(Section::Feedback, Code::MinLength)));

        application.feedback.push(feedback(4));
        assert!(run(&application).is_empty());
    }

    #[test]
    fn self_feedback_does_not_count() {
        let mut application = fixtures::application();
        application.feedback = vec![feedback(1), feedback(2), feedback(3)];

        assert_eq!(count(&application), 2);
        assert!(!run(&application).is_empty());
    }
}
