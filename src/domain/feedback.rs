use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a member who can apply and be reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(u32);

impl PeerId {
    /// Wraps a raw peer identity.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "peer {}", self.0)
    }
}

/// A member who may be reviewed by applicants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Identity of the member.
    pub id: PeerId,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Whether the member's account is active.
    #[serde(default = "active_by_default")]
    pub active: bool,

    /// Whether the member has an application for the current cycle.
    #[serde(default)]
    pub has_current_application: bool,
}

const fn active_by_default() -> bool {
    true
}

impl Peer {
    /// Whether applicants may write feedback about this member.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.active && self.has_current_application
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// An applicant's feedback about another member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// The member the feedback is about.
    pub peer: PeerId,

    /// The feedback itself.
    #[serde(default)]
    pub text: String,
}

/// Returns the members that can be reviewed, ordered by last name and then
/// first name.
pub fn eligible_peers<'a>(peers: impl IntoIterator<Item = &'a Peer>) -> Vec<&'a Peer> {
    let mut eligible: Vec<&Peer> = peers.into_iter().filter(|peer| peer.is_eligible()).collect();
    eligible.sort_by(|a, b| {
        (a.last_name.as_str(), a.first_name.as_str())
            .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
    });
    eligible
}
