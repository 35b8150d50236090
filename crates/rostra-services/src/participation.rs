//! # Participation
//!
//! Admits a user into one side of a debate exactly once. The pre-check
//! here exists only for a friendly error message; the unique constraint
//! on (user, debate) in the store is what actually guarantees a single
//! SideChoice under concurrency.

use std::sync::Arc;

use chrono::Utc;
use rostra_core::{DebateRepo, DomainError, Identity, Result, Side, User};
use uuid::Uuid;

use crate::lifecycle::is_expired;

#[derive(Clone)]
pub struct Participation {
    repo: Arc<dyn DebateRepo>,
}

impl Participation {
    pub fn new(repo: Arc<dyn DebateRepo>) -> Self {
        Self { repo }
    }

    /// Joins the authenticated user to one side of an active debate.
    /// Participant link and SideChoice are written in one transaction by
    /// the repo, so either both exist afterwards or neither does.
    pub async fn join(
        &self,
        identity: Option<&Identity>,
        debate_id: Uuid,
        side: Side,
    ) -> Result<()> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let debate = self
            .repo
            .debate(debate_id)
            .await?
            .ok_or_else(|| DomainError::not_found("debate", debate_id))?;
        if is_expired(&debate, Utc::now()) {
            return Err(DomainError::DebateExpired);
        }
        if let Some(existing) = self.repo.side_choice(debate_id, identity.user_id).await? {
            return Err(DomainError::Conflict(format!(
                "already joined on the {} side",
                existing.as_str()
            )));
        }

        self.repo
            .upsert_user(&User {
                id: identity.user_id,
                name: identity.display_name.clone(),
                created_at: Utc::now(),
            })
            .await?;
        self.repo
            .join_debate(debate_id, identity.user_id, side)
            .await?;
        tracing::info!(%debate_id, user_id = %identity.user_id, side = side.as_str(), "user joined debate");
        Ok(())
    }

    /// The side the user committed to, straight from committed state.
    pub async fn side_of(&self, debate_id: Uuid, user_id: Uuid) -> Result<Option<Side>> {
        self.repo.side_choice(debate_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rostra_core::{Debate, DebateStatus, MockDebateRepo};

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::now_v7(),
            display_name: "ada".to_string(),
        }
    }

    fn active_debate() -> Debate {
        let now = Utc::now();
        Debate {
            id: Uuid::now_v7(),
            title: "Remote work is better".to_string(),
            description: "Office versus home".to_string(),
            tags: vec![],
            category: "work".to_string(),
            image_url: None,
            duration_hours: 24,
            creator_id: Uuid::now_v7(),
            created_at: now,
            ends_at: now + Duration::hours(24),
            status: DebateStatus::Active,
            winner: None,
        }
    }

    #[tokio::test]
    async fn join_requires_identity() {
        let participation = Participation::new(Arc::new(MockDebateRepo::new()));
        let err = participation
            .join(None, Uuid::now_v7(), Side::Support)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthenticated);
    }

    #[tokio::test]
    async fn join_rejects_expired_even_while_status_is_stale() {
        let mut debate = active_debate();
        debate.ends_at = Utc::now() - Duration::minutes(1);
        let debate_id = debate.id;

        let mut repo = MockDebateRepo::new();
        repo.expect_debate()
            .returning(move |_| Ok(Some(debate.clone())));

        let participation = Participation::new(Arc::new(repo));
        let err = participation
            .join(Some(&identity()), debate_id, Side::Oppose)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DebateExpired);
    }

    #[tokio::test]
    async fn join_rejects_second_join_with_different_side() {
        let debate = active_debate();
        let debate_id = debate.id;

        let mut repo = MockDebateRepo::new();
        repo.expect_debate()
            .returning(move |_| Ok(Some(debate.clone())));
        repo.expect_side_choice()
            .returning(|_, _| Ok(Some(Side::Support)));

        let participation = Participation::new(Arc::new(repo));
        let err = participation
            .join(Some(&identity()), debate_id, Side::Oppose)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn join_missing_debate_is_not_found() {
        let mut repo = MockDebateRepo::new();
        repo.expect_debate().returning(|_| Ok(None));

        let participation = Participation::new(Arc::new(repo));
        let err = participation
            .join(Some(&identity()), Uuid::now_v7(), Side::Support)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn join_writes_user_link_and_side_choice() {
        let debate = active_debate();
        let debate_id = debate.id;
        let who = identity();
        let user_id = who.user_id;

        let mut repo = MockDebateRepo::new();
        repo.expect_debate()
            .returning(move |_| Ok(Some(debate.clone())));
        repo.expect_side_choice().returning(|_, _| Ok(None));
        repo.expect_upsert_user()
            .withf(move |user| user.id == user_id && user.name == "ada")
            .returning(|_| Ok(()));
        repo.expect_join_debate()
            .withf(move |d, u, side| *d == debate_id && *u == user_id && *side == Side::Support)
            .returning(|_, _, _| Ok(()));

        let participation = Participation::new(Arc::new(repo));
        participation
            .join(Some(&who), debate_id, Side::Support)
            .await
            .unwrap();
    }
}
