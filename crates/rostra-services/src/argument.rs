//! # Arguments
//!
//! Posting under the content policy, plus the five-minute edit/delete
//! window. The window is computed from the persisted `created_at` on
//! every request; there is no cached "is editable" state anywhere.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rostra_core::{Argument, DebateRepo, DomainError, Identity, Result, Side, User};
use uuid::Uuid;

use crate::content::validate_content;
use crate::lifecycle::is_expired;

/// Authors may edit or delete their own arguments for this long.
pub const EDIT_WINDOW_SECS: i64 = 300;

pub fn within_edit_window(argument: &Argument, now: DateTime<Utc>) -> bool {
    (now - argument.created_at).num_seconds() <= EDIT_WINDOW_SECS
}

#[derive(Clone)]
pub struct Arguments {
    repo: Arc<dyn DebateRepo>,
}

impl Arguments {
    pub fn new(repo: Arc<dyn DebateRepo>) -> Self {
        Self { repo }
    }

    /// Posts an argument to an active debate. The author must have
    /// joined, and the argument's side must match their side choice.
    pub async fn post(
        &self,
        identity: Option<&Identity>,
        debate_id: Uuid,
        side: Side,
        content: &str,
    ) -> Result<Argument> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let debate = self
            .repo
            .debate(debate_id)
            .await?
            .ok_or_else(|| DomainError::not_found("debate", debate_id))?;
        if is_expired(&debate, Utc::now()) {
            return Err(DomainError::DebateExpired);
        }
        validate_content(content)?;
        match self.repo.side_choice(debate_id, identity.user_id).await? {
            None => {
                return Err(DomainError::Forbidden(
                    "join the debate before posting".to_string(),
                ))
            }
            Some(joined) if joined != side => {
                return Err(DomainError::Forbidden(format!(
                    "you joined the {} side",
                    joined.as_str()
                )))
            }
            Some(_) => {}
        }

        let now = Utc::now();
        self.repo
            .upsert_user(&User {
                id: identity.user_id,
                name: identity.display_name.clone(),
                created_at: now,
            })
            .await?;
        let argument = Argument {
            id: Uuid::now_v7(),
            debate_id,
            author_id: identity.user_id,
            side,
            content: content.to_string(),
            created_at: now,
            vote_count: 0,
        };
        self.repo.create_argument(&argument).await?;
        tracing::info!(argument_id = %argument.id, %debate_id, "argument posted");
        Ok(argument)
    }

    /// Replaces the content of the caller's own argument, inside the
    /// edit window. Side and votes are untouched.
    pub async fn edit(
        &self,
        identity: Option<&Identity>,
        argument_id: Uuid,
        new_content: &str,
    ) -> Result<Argument> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let argument = self.owned_within_window(identity, argument_id).await?;
        validate_content(new_content)?;
        self.repo
            .update_argument_content(argument.id, new_content)
            .await?;
        Ok(Argument {
            content: new_content.to_string(),
            ..argument
        })
    }

    /// Deletes the caller's own argument inside the edit window. The
    /// repo cascades removal of its votes in the same transaction.
    pub async fn delete(&self, identity: Option<&Identity>, argument_id: Uuid) -> Result<()> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let argument = self.owned_within_window(identity, argument_id).await?;
        self.repo.delete_argument(argument.id).await?;
        tracing::info!(%argument_id, "argument deleted");
        Ok(())
    }

    async fn owned_within_window(
        &self,
        identity: &Identity,
        argument_id: Uuid,
    ) -> Result<Argument> {
        let argument = self
            .repo
            .argument(argument_id)
            .await?
            .ok_or_else(|| DomainError::not_found("argument", argument_id))?;
        if argument.author_id != identity.user_id {
            return Err(DomainError::Forbidden(
                "only the author may modify an argument".to_string(),
            ));
        }
        if !within_edit_window(&argument, Utc::now()) {
            return Err(DomainError::EditWindowExpired);
        }
        Ok(argument)
    }
}
