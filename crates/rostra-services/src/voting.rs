//! # Voting
//!
//! One vote per user per argument. The duplicate check is the unique
//! constraint on (user, argument) inside the repo's transaction: two
//! concurrent votes cannot both commit, and the denormalized counter
//! moves in the same transaction as the vote row.

use std::sync::Arc;

use chrono::Utc;
use rostra_core::{DebateRepo, DomainError, Identity, Result, User, Vote};
use uuid::Uuid;

use crate::lifecycle::is_expired;

#[derive(Clone)]
pub struct Voting {
    repo: Arc<dyn DebateRepo>,
}

impl Voting {
    pub fn new(repo: Arc<dyn DebateRepo>) -> Self {
        Self { repo }
    }

    /// Records a vote by the authenticated user on an argument in an
    /// active debate. `for_user` comes from the request body and must
    /// match the session identity; a mismatch is an impersonation
    /// attempt, not a validation slip.
    pub async fn vote(
        &self,
        identity: Option<&Identity>,
        argument_id: Uuid,
        for_user: Uuid,
    ) -> Result<()> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        if for_user != identity.user_id {
            return Err(DomainError::Forbidden(
                "votes can only be cast as yourself".to_string(),
            ));
        }
        let argument = self
            .repo
            .argument(argument_id)
            .await?
            .ok_or_else(|| DomainError::not_found("argument", argument_id))?;
        let debate = self
            .repo
            .debate(argument.debate_id)
            .await?
            .ok_or_else(|| DomainError::not_found("debate", argument.debate_id))?;
        if is_expired(&debate, Utc::now()) {
            return Err(DomainError::DebateExpired);
        }

        let now = Utc::now();
        self.repo
            .upsert_user(&User {
                id: identity.user_id,
                name: identity.display_name.clone(),
                created_at: now,
            })
            .await?;
        self.repo
            .record_vote(&Vote {
                id: Uuid::now_v7(),
                argument_id,
                user_id: identity.user_id,
                created_at: now,
            })
            .await?;
        tracing::info!(%argument_id, user_id = %identity.user_id, "vote recorded");
        Ok(())
    }
}
