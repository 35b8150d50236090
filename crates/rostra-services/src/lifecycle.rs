//! # Debate Lifecycle
//!
//! Creation, temporal classification, and outcome resolution.
//! `is_expired` and `outcome` are the *only* derivations of expiry and
//! winner in the codebase; the close sweep and every display path
//! delegate here so the persisted winner can never disagree with the
//! on-demand one.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rostra_core::{
    Argument, Debate, DebateRepo, DebateStatus, DomainError, Identity, NewDebate, Outcome,
    Result, Side, SideTally, User,
};
use serde::Serialize;
use uuid::Uuid;

/// Durations offered by the creation form, in hours.
pub const ALLOWED_DURATIONS: &[i64] = &[1, 12, 24];

/// Search results are capped, matching the original listing behavior.
pub const SEARCH_LIMIT: i64 = 20;

/// A debate is expired iff it was closed administratively or its end
/// time has passed. The status flag alone is never trusted, since the
/// sweep may not have run yet.
pub fn is_expired(debate: &Debate, now: DateTime<Utc>) -> bool {
    debate.status != DebateStatus::Active || debate.ends_at < now
}

/// The single shared scoring function.
pub fn outcome(tally: &SideTally) -> Outcome {
    if tally.argument_count == 0 {
        Outcome::NoArguments
    } else if tally.support_votes > tally.oppose_votes {
        Outcome::Winner(Side::Support)
    } else if tally.oppose_votes > tally.support_votes {
        Outcome::Winner(Side::Oppose)
    } else {
        Outcome::Tie
    }
}

/// What the sweep persists in the debate's winner column.
pub fn persisted_winner(outcome: Outcome) -> Option<Side> {
    match outcome {
        Outcome::Winner(side) => Some(side),
        Outcome::Tie | Outcome::NoArguments => None,
    }
}

/// A debate plus everything a detail page needs. `outcome` is only
/// populated once the debate has expired.
#[derive(Debug, Clone, Serialize)]
pub struct DebateView {
    pub debate: Debate,
    pub arguments: Vec<Argument>,
    pub outcome: Option<Outcome>,
}

#[derive(Clone)]
pub struct Lifecycle {
    repo: Arc<dyn DebateRepo>,
}

impl Lifecycle {
    pub fn new(repo: Arc<dyn DebateRepo>) -> Self {
        Self { repo }
    }

    /// Creates a debate on behalf of the authenticated user.
    /// `ends_at` is computed here, never accepted from the caller.
    pub async fn create_debate(
        &self,
        identity: Option<&Identity>,
        input: NewDebate,
    ) -> Result<Debate> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        if input.creator_id != identity.user_id {
            return Err(DomainError::Forbidden(
                "debates can only be created as yourself".to_string(),
            ));
        }
        validate_new_debate(&input)?;

        let now = Utc::now();
        self.repo
            .upsert_user(&User {
                id: identity.user_id,
                name: identity.display_name.clone(),
                created_at: now,
            })
            .await?;

        let debate = Debate {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            tags: input.tags,
            category: input.category,
            image_url: input.image_url,
            duration_hours: input.duration_hours,
            creator_id: identity.user_id,
            created_at: now,
            ends_at: now + Duration::hours(input.duration_hours),
            status: DebateStatus::Active,
            winner: None,
        };
        self.repo.create_debate(&debate).await?;
        tracing::info!(debate_id = %debate.id, ends_at = %debate.ends_at, "debate created");
        Ok(debate)
    }

    /// Fetches a debate with its arguments, computing the outcome on
    /// demand for expired-but-unswept debates.
    pub async fn debate_view(&self, id: Uuid, now: DateTime<Utc>) -> Result<DebateView> {
        let debate = self
            .repo
            .debate(id)
            .await?
            .ok_or_else(|| DomainError::not_found("debate", id))?;
        let arguments = self.repo.arguments_for_debate(id).await?;
        let outcome = if is_expired(&debate, now) {
            Some(outcome(&self.repo.side_tally(id).await?))
        } else {
            None
        };
        Ok(DebateView {
            debate,
            arguments,
            outcome,
        })
    }

    pub async fn list(&self) -> Result<Vec<Debate>> {
        self.repo.list_debates().await
    }

    /// Case-insensitive match on title, category, or tag.
    pub async fn search(&self, query: &str) -> Result<Vec<Debate>> {
        self.repo.search_debates(query, SEARCH_LIMIT).await
    }

    /// Closes every active debate whose end time has passed, persisting
    /// the winner from the shared scoring function. Idempotent: already
    /// closed debates are skipped by the store-level status guard. One
    /// debate failing does not abort the rest of the batch.
    pub async fn close_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let due = self.repo.expired_active_debates(now).await?;
        let mut closed = 0;
        for debate in due {
            match self.close_one(&debate).await {
                Ok(true) => closed += 1,
                // Lost the race to another sweep, or already gone
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(debate_id = %debate.id, %error, "failed to close debate");
                }
            }
        }
        Ok(closed)
    }

    async fn close_one(&self, debate: &Debate) -> Result<bool> {
        let tally = self.repo.side_tally(debate.id).await?;
        let winner = persisted_winner(outcome(&tally));
        let closed = self.repo.close_debate(debate.id, winner).await?;
        if closed {
            tracing::info!(debate_id = %debate.id, ?winner, "debate closed");
        }
        Ok(closed)
    }
}

fn validate_new_debate(input: &NewDebate) -> Result<()> {
    if input.title.chars().count() < 5 {
        return Err(DomainError::Validation(
            "title must be at least 5 characters".to_string(),
        ));
    }
    if input.description.chars().count() < 10 {
        return Err(DomainError::Validation(
            "description must be at least 10 characters".to_string(),
        ));
    }
    if input.category.trim().is_empty() {
        return Err(DomainError::Validation("category is required".to_string()));
    }
    if !ALLOWED_DURATIONS.contains(&input.duration_hours) {
        return Err(DomainError::Validation(
            "duration must be 1, 12 or 24 hours".to_string(),
        ));
    }
    Ok(())
}
