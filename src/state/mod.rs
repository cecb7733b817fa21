//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The orchestrator's phase (seeding, active round, drained round, terminated)
//! - `PhaseTracker`: Holds the current phase and rejects illegal transitions

mod crawl_phase;

pub use crawl_phase::CrawlPhase;

use crate::SitemapError;

/// Tracks the orchestrator's current phase
///
/// Every move goes through [`PhaseTracker::advance`], which refuses any
/// transition the phase table does not allow.
#[derive(Debug)]
pub struct PhaseTracker {
    current: CrawlPhase,
}

impl PhaseTracker {
    /// Creates a tracker in the `Seeding` phase
    pub fn new() -> Self {
        Self {
            current: CrawlPhase::Seeding,
        }
    }

    /// Returns the current phase
    pub fn current(&self) -> CrawlPhase {
        self.current
    }

    /// Moves to `next`, or returns `SitemapError::InvalidTransition`
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), SitemapError> {
        if !self.current.can_transition_to(next) {
            return Err(SitemapError::InvalidTransition {
                from: self.current,
                to: next,
            });
        }

        tracing::trace!("Crawl phase {} -> {}", self.current, next);
        self.current = next;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_seeding() {
        assert_eq!(PhaseTracker::new().current(), CrawlPhase::Seeding);
    }

    #[test]
    fn test_tracker_full_cycle() {
        let mut tracker = PhaseTracker::new();
        tracker.advance(CrawlPhase::RoundActive(0)).unwrap();
        tracker.advance(CrawlPhase::RoundDrained(0)).unwrap();
        tracker.advance(CrawlPhase::RoundActive(1)).unwrap();
        tracker.advance(CrawlPhase::RoundDrained(1)).unwrap();
        tracker.advance(CrawlPhase::Terminated).unwrap();
        assert!(tracker.current().is_terminal());
    }

    #[test]
    fn test_tracker_rejects_illegal_move() {
        let mut tracker = PhaseTracker::new();
        let err = tracker.advance(CrawlPhase::RoundDrained(0)).unwrap_err();

        assert!(matches!(
            err,
            SitemapError::InvalidTransition {
                from: CrawlPhase::Seeding,
                to: CrawlPhase::RoundDrained(0),
            }
        ));
        // The failed move leaves the phase untouched
        assert_eq!(tracker.current(), CrawlPhase::Seeding);
    }
}
