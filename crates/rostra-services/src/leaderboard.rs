//! # Leaderboard
//!
//! Ranks users by votes received on their arguments, over an optional
//! trailing window. Pure read; the aggregation itself lives in the
//! store so it always reflects committed state.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rostra_core::{DebateRepo, LeaderboardEntry, Result};
use serde::{Deserialize, Serialize};

/// The time range over which vote totals are aggregated. Joined-debate
/// counts are always lifetime, whatever the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    #[default]
    All,
    Weekly,
    Monthly,
}

impl Window {
    /// Lower bound on vote timestamps, or None for all time.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Window::All => None,
            Window::Weekly => Some(now - Duration::days(7)),
            Window::Monthly => Some(now - Duration::days(30)),
        }
    }
}

#[derive(Clone)]
pub struct Leaderboard {
    repo: Arc<dyn DebateRepo>,
}

impl Leaderboard {
    pub fn new(repo: Arc<dyn DebateRepo>) -> Self {
        Self { repo }
    }

    /// Users sorted descending by windowed vote totals. Windowed
    /// queries omit zero-vote users; `All` keeps them.
    pub async fn entries(&self, window: Window, now: DateTime<Utc>) -> Result<Vec<LeaderboardEntry>> {
        self.repo.leaderboard(window.since(now)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostra_core::MockDebateRepo;
    use uuid::Uuid;

    #[test]
    fn window_bounds() {
        let now = Utc::now();
        assert_eq!(Window::All.since(now), None);
        assert_eq!(Window::Weekly.since(now), Some(now - Duration::days(7)));
        assert_eq!(Window::Monthly.since(now), Some(now - Duration::days(30)));
    }

    #[tokio::test]
    async fn entries_pass_the_window_bound_through() {
        let now = Utc::now();
        let expected = now - Duration::days(7);
        let entry = LeaderboardEntry {
            user_id: Uuid::now_v7(),
            name: "ada".to_string(),
            total_votes: 4,
            debates_count: 2,
        };
        let returned = entry.clone();

        let mut repo = MockDebateRepo::new();
        repo.expect_leaderboard()
            .withf(move |since| *since == Some(expected))
            .returning(move |_| Ok(vec![returned.clone()]));

        let leaderboard = Leaderboard::new(Arc::new(repo));
        let entries = leaderboard.entries(Window::Weekly, now).await.unwrap();
        assert_eq!(entries, vec![entry]);
    }
}
