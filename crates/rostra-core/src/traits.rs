//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! `DebateRepo` is the storage collaborator of the design: transactional
//! CRUD plus the aggregate queries the managers need. Uniqueness of
//! (user, debate) side choices and (user, argument) votes is enforced
//! here by constraint, not by check-then-act in the callers.

use crate::error::Result;
use crate::models::{
    Argument, Debate, Identity, LeaderboardEntry, Side, SideTally, User, Vote,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Data persistence contract for debates, arguments, votes, and users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DebateRepo: Send + Sync {
    // Debate operations
    async fn create_debate(&self, debate: &Debate) -> Result<()>;
    async fn debate(&self, id: Uuid) -> Result<Option<Debate>>;
    async fn list_debates(&self) -> Result<Vec<Debate>>;
    async fn search_debates(&self, query: &str, limit: i64) -> Result<Vec<Debate>>;
    /// Debates still flagged active whose end time has passed.
    async fn expired_active_debates(&self, now: DateTime<Utc>) -> Result<Vec<Debate>>;
    /// Flips status to closed and records the winner. Returns false if
    /// the debate was already closed (idempotent no-op).
    async fn close_debate(&self, id: Uuid, winner: Option<Side>) -> Result<bool>;
    /// Per-side vote sums across the debate's arguments.
    async fn side_tally(&self, debate_id: Uuid) -> Result<SideTally>;

    // Participation operations
    /// Participant link (idempotent) + SideChoice insert, atomically.
    /// A second SideChoice for the same (user, debate) is a Conflict.
    async fn join_debate(&self, debate_id: Uuid, user_id: Uuid, side: Side) -> Result<()>;
    async fn side_choice(&self, debate_id: Uuid, user_id: Uuid) -> Result<Option<Side>>;

    // Argument operations
    async fn create_argument(&self, argument: &Argument) -> Result<()>;
    async fn argument(&self, id: Uuid) -> Result<Option<Argument>>;
    async fn arguments_for_debate(&self, debate_id: Uuid) -> Result<Vec<Argument>>;
    async fn update_argument_content(&self, id: Uuid, content: &str) -> Result<()>;
    /// Removes the argument and cascades removal of its votes.
    async fn delete_argument(&self, id: Uuid) -> Result<()>;

    // Vote operations
    /// Vote insert + vote_count increment, atomically. A second vote by
    /// the same user on the same argument is a Conflict.
    async fn record_vote(&self, vote: &Vote) -> Result<()>;

    // User / leaderboard operations
    async fn upsert_user(&self, user: &User) -> Result<()>;
    /// Vote totals per user, optionally restricted to votes cast at or
    /// after `since`. Windowed queries drop zero-vote users; unwindowed
    /// queries keep them.
    async fn leaderboard(&self, since: Option<DateTime<Utc>>) -> Result<Vec<LeaderboardEntry>>;
}

/// Identity contract. The core only ever asks "who is this token?";
/// real session handling lives outside.
pub trait AuthProvider: Send + Sync {
    /// Verifies a bearer token and returns the identity it names.
    fn authenticate(&self, token: &str) -> Option<Identity>;

    /// Issues a token for an identity (used by seeding and tests).
    fn issue_token(&self, identity: &Identity) -> String;
}
