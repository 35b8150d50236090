//! # Domain Models
//!
//! These structs represent the core entities of Rostra.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two sides of every debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Support,
    Oppose,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Support => "support",
            Side::Oppose => "oppose",
        }
    }

    pub fn parse(s: &str) -> Option<Side> {
        match s {
            "support" => Some(Side::Support),
            "oppose" => Some(Side::Oppose),
            _ => None,
        }
    }
}

/// Lifecycle flag persisted on a debate. "Expired" is not a status;
/// it is the derived predicate `status != Active || ends_at < now`,
/// evaluated fresh wherever it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateStatus {
    Active,
    Closed,
}

impl DebateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateStatus::Active => "active",
            DebateStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<DebateStatus> {
        match s {
            "active" => Some(DebateStatus::Active),
            "closed" => Some(DebateStatus::Closed),
            _ => None,
        }
    }
}

/// A registered user. Persisted lazily on the first mutating request so
/// the leaderboard can put a name next to an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A time-boxed topic with two sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debate {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    /// Opaque reference supplied by the upload collaborator; inert here.
    pub image_url: Option<String>,
    pub duration_hours: i64,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: DebateStatus,
    /// Set once by the close sweep. `None` means tie, no arguments, or
    /// simply "not closed yet" (display paths recompute on demand).
    pub winner: Option<Side>,
}

/// A user's textual contribution to one side of a debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    pub id: Uuid,
    pub debate_id: Uuid,
    pub author_id: Uuid,
    pub side: Side,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized counter, maintained in the same transaction as the
    /// vote insert. Must never drift from the Vote row count.
    pub vote_count: i64,
}

/// One user's single vote on one argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub argument_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The side a user committed to when joining a debate. At most one per
/// (user, debate) pair, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideChoice {
    pub debate_id: Uuid,
    pub user_id: Uuid,
    pub side: Side,
}

/// Input for debate creation, as supplied by the presentation layer.
/// `ends_at` is computed by the core, never trusted from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDebate {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub duration_hours: i64,
    pub creator_id: Uuid,
}

/// Per-side vote sums for a single debate, aggregated over its arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideTally {
    pub support_votes: i64,
    pub oppose_votes: i64,
    pub argument_count: i64,
}

/// Result of the shared scoring function. The sweep persists
/// `Winner(side)` as the debate's winner column; `Tie` and
/// `NoArguments` persist as no winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "side")]
pub enum Outcome {
    NoArguments,
    Tie,
    Winner(Side),
}

/// One row of the leaderboard. `debates_count` is lifetime joins,
/// regardless of the vote window.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub name: String,
    pub total_votes: i64,
    pub debates_count: i64,
}

/// What the auth collaborator hands us per request: either nothing, or
/// a verified user id plus display name. The core never authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub display_name: String,
}
