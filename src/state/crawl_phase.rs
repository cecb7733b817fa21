/// Crawl phase definitions for the round-based orchestrator
///
/// This module defines the phases a crawl moves through and which moves between
/// them are legal.
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Seen set and first round queue are being initialized with the root
    Seeding,

    /// Pages of the round at this depth are being fetched
    RoundActive(u32),

    /// Every fetch of the round at this depth has completed and its links
    /// are being merged into the seen set
    RoundDrained(u32),

    /// The crawl is finished and the URL set can be materialized
    Terminated,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns the depth of the round this phase belongs to, if any
    pub fn depth(&self) -> Option<u32> {
        match self {
            Self::RoundActive(depth) | Self::RoundDrained(depth) => Some(*depth),
            Self::Seeding | Self::Terminated => None,
        }
    }

    /// Returns true if moving from `self` to `next` is legal
    ///
    /// # Transition Table
    ///
    /// | From | To |
    /// |------|----|
    /// | Seeding | RoundActive(0), Terminated |
    /// | RoundActive(d) | RoundDrained(d) |
    /// | RoundDrained(d) | RoundActive(d + 1), Terminated |
    /// | Terminated | (none) |
    ///
    /// `Seeding → Terminated` covers a zero max depth, where nothing is fetched.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (*self, next) {
            (Self::Seeding, Self::RoundActive(0)) => true,
            (Self::Seeding, Self::Terminated) => true,
            (Self::RoundActive(d), Self::RoundDrained(n)) => d == n,
            (Self::RoundDrained(d), Self::RoundActive(n)) => d.checked_add(1) == Some(n),
            (Self::RoundDrained(_), Self::Terminated) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::RoundActive(_) => "round_active",
            Self::RoundDrained(_) => "round_drained",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.depth() {
            Some(depth) => write!(f, "{}({})", self.name(), depth),
            None => write!(f, "{}", self.name()),
        }
    }
}
