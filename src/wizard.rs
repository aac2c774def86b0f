//! Page ordering and access gating for the application wizard.
//!
//! The wizard walks an applicant through one page per section. A page may
//! only be entered once every page before it is complete, where "complete"
//! means the latest validation pass left no issues in that page's section.

use std::{fmt, str::FromStr};

use crate::validation::{IssueSet, Query, Section};

/// A page of the application wizard, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Page {
    /// Introduction. Always complete.
    Welcome,
    /// Award selection.
    Award,
    /// Contact and scholastic information.
    BasicInfo,
    /// Financial aid declarations.
    Finaid,
    /// Essay responses.
    Essay,
    /// Peer feedback.
    Feedback,
}

/// A navigation control shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Return to the first page.
    Restart,
    /// Go to the previous page.
    Prev,
    /// Go to the next page.
    Next,
    /// Submit the application.
    Submit,
}

impl Button {
    /// The control's form name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Submit => "submit",
        }
    }
}

impl Page {
    /// Every page, first to last.
    pub const ALL: [Self; 6] = [
        Self::Welcome,
        Self::Award,
        Self::BasicInfo,
        Self::Finaid,
        Self::Essay,
        Self::Feedback,
    ];

    /// The page's URL name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.section() {
            Some(section) => section.as_str(),
            None => "welcome",
        }
    }

    /// The section whose issues gate this page, if any.
    #[must_use]
    pub const fn section(self) -> Option<Section> {
        match self {
            Self::Welcome => None,
            Self::Award => Some(Section::Award),
            Self::BasicInfo => Some(Section::BasicInfo),
            Self::Finaid => Some(Section::Finaid),
            Self::Essay => Some(Section::Essay),
            Self::Feedback => Some(Section::Feedback),
        }
    }

    const fn position(self) -> usize {
        self as usize
    }

    /// The page before this one.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self.position() {
            0 => None,
            n => Some(Self::ALL[n - 1]),
        }
    }

    /// The page after this one.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        let n = self.position() + 1;
        if n < Self::ALL.len() {
            Some(Self::ALL[n])
        } else {
            None
        }
    }

    /// Whether this page's section has no outstanding issues.
    #[must_use]
    pub fn progress_sentry(self, issues: &IssueSet) -> bool {
        self.section().is_none_or(|section| {
            issues
                .search(&Query::new().section(section))
                .is_ok_and(|found| found.is_empty())
        })
    }

    /// Whether every page before this one is complete.
    #[must_use]
    pub fn can_enter(self, issues: &IssueSet) -> bool {
        Self::ALL[..self.position()]
            .iter()
            .all(|page| page.progress_sentry(issues))
    }

    /// The page to show when this one is requested: itself if it can be
    /// entered, otherwise the first incomplete page before it.
    #[must_use]
    pub fn redirect(self, issues: &IssueSet) -> Self {
        if self.can_enter(issues) {
            return self;
        }

        let target = Self::ALL
            .into_iter()
            .find(|page| !page.progress_sentry(issues))
            .unwrap_or(self);
        tracing::debug!("redirecting from {self} to {target}");
        target
    }

    /// The navigation controls shown on this page.
    #[must_use]
    pub fn buttons(self) -> Vec<Button> {
        let mut buttons = vec![Button::Restart];
        if self.prev().is_some() {
            buttons.push(Button::Prev);
        }
        match self.next() {
            Some(_) => buttons.push(Button::Next),
            None => buttons.push(Button::Submit),
        }
        buttons
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown page name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown wizard page '{0}'")]
pub struct UnknownPage(String);

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::validation::{Code, Issue};

    fn issues(sections: &[Section]) -> IssueSet {
        sections
            .iter()
            .map(|section| Issue::field(*section, "x", Code::Required))
            .collect()
    }

    #[test]
    fn names_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.to_string().parse::<Page>(), Ok(page));
        }
        assert_eq!(Page::BasicInfo.as_str(), "basicinfo");
        assert!("summary".parse::<Page>().is_err());
    }

    #[test]
    fn welcome_is_always_complete() {
        let everything = issues(&Section::ALL);
        assert!(Page::Welcome.progress_sentry(&everything));
        assert!(Page::Award.can_enter(&everything));
    }

    #[test]
    fn global_issues_do_not_block_pages() {
        let mut set = IssueSet::new();
        set.add(Issue::global(Code::Required));
        assert!(Page::ALL.iter().all(|page| page.progress_sentry(&set)));
    }

    #[test_case(&[], Page::Feedback, Page::Feedback; "complete application")]
    #[test_case(&[Section::Award], Page::Essay, Page::Award; "first failing page")]
    #[test_case(&[Section::Finaid, Section::Award], Page::Feedback, Page::Award; "earliest of several")]
    #[test_case(&[Section::Essay], Page::Finaid, Page::Finaid; "later issues do not block")]
    #[test_case(&[Section::Essay], Page::Essay, Page::Essay; "own issues do not block")]
    #[test_case(&[Section::Essay], Page::Feedback, Page::Essay; "blocked by previous page")]
    fn redirect(sections: &[Section], requested: Page, shown: Page) {
        assert_eq!(requested.redirect(&issues(sections)), shown);
    }

    #[test_case(Page::Welcome, &[Button::Restart, Button::Next]; "first page")]
    #[test_case(Page::Finaid, &[Button::Restart, Button::Prev, Button::Next]; "middle page")]
    #[test_case(Page::Feedback, &[Button::Restart, Button::Prev, Button::Submit]; "last page")]
    fn buttons(page: Page, expected: &[Button]) {
        assert_eq!(page.buttons(), expected);
    }

    #[test]
    fn navigation() {
        assert_eq!(Page::Welcome.prev(), None);
        assert_eq!(Page::Welcome.next(), Some(Page::Award));
        assert_eq!(Page::Feedback.next(), None);
        assert_eq!(Page::Essay.prev(), Some(Page::Finaid));
    }
}
