//! # rostra-db-sqlite
//!
//! SQLite implementation of the `DebateRepo` port, mapping the
//! relational model to the `rostra-core` domain models.
//!
//! The integrity rules live here, not in application pre-checks:
//! (user, debate) and (user, argument) uniqueness are schema
//! constraints, multi-row mutations run in transactions, and the
//! denormalized vote counter is incremented in the same transaction as
//! the vote row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rostra_core::error::{DomainError, Result};
use rostra_core::models::{
    Argument, Debate, DebateStatus, LeaderboardEntry, Side, SideTally, User, Vote,
};
use rostra_core::traits::DebateRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

const SCHEMA: &str = include_str!("schema.sql");

pub struct SqliteDebateRepo {
    pool: SqlitePool,
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

fn db_err(error: sqlx::Error) -> DomainError {
    DomainError::Storage(error.to_string())
}

/// Unique-constraint violations are the authoritative duplicate check,
/// surfaced to callers as Conflict.
fn unique_conflict(error: sqlx::Error, message: &str) -> DomainError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(message.to_string())
        }
        _ => db_err(error),
    }
}

fn parse_side(raw: &str) -> Result<Side> {
    Side::parse(raw).ok_or_else(|| DomainError::Storage(format!("unknown side '{raw}'")))
}

fn row_to_debate(row: &SqliteRow) -> Result<Debate> {
    let status_raw: String = row.get("status");
    let status = DebateStatus::parse(&status_raw)
        .ok_or_else(|| DomainError::Storage(format!("unknown debate status '{status_raw}'")))?;
    let winner = match row.get::<Option<String>, _>("winner") {
        Some(raw) => Some(parse_side(&raw)?),
        None => None,
    };
    Ok(Debate {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        title: row.get("title"),
        description: row.get("description"),
        tags: serde_json::from_str(&row.get::<String, _>("tags")).unwrap_or_default(),
        category: row.get("category"),
        image_url: row.get("image_url"),
        duration_hours: row.get("duration_hours"),
        creator_id: blob_to_uuid(row.get::<Vec<u8>, _>("creator_id").as_slice()),
        created_at: row.get("created_at"),
        ends_at: row.get("ends_at"),
        status,
        winner,
    })
}

fn row_to_argument(row: &SqliteRow) -> Result<Argument> {
    let side: String = row.get("side");
    Ok(Argument {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        debate_id: blob_to_uuid(row.get::<Vec<u8>, _>("debate_id").as_slice()),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        side: parse_side(&side)?,
        content: row.get("content"),
        created_at: row.get("created_at"),
        vote_count: row.get("vote_count"),
    })
}

impl SqliteDebateRepo {
    /// Opens (creating if missing) the database at `url` and applies
    /// the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_err)?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_err)?;
        tracing::debug!(url, "sqlite database ready");
        Ok(Self { pool })
    }

    /// A private in-memory database, used by tests. Capped to a single
    /// connection so every query sees the same memory instance.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_err)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(db_err)?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_err)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DebateRepo for SqliteDebateRepo {
    async fn create_debate(&self, debate: &Debate) -> Result<()> {
        sqlx::query(
            "INSERT INTO debates (id, title, description, tags, category, image_url, \
             duration_hours, creator_id, created_at, ends_at, status, winner) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(debate.id))
        .bind(&debate.title)
        .bind(&debate.description)
        .bind(serde_json::to_string(&debate.tags).unwrap_or_else(|_| "[]".to_string()))
        .bind(&debate.category)
        .bind(&debate.image_url)
        .bind(debate.duration_hours)
        .bind(uuid_to_blob(debate.creator_id))
        .bind(debate.created_at)
        .bind(debate.ends_at)
        .bind(debate.status.as_str())
        .bind(debate.winner.map(|side| side.as_str()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn debate(&self, id: Uuid) -> Result<Option<Debate>> {
        let row = sqlx::query("SELECT * FROM debates WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_debate).transpose()
    }

    async fn list_debates(&self) -> Result<Vec<Debate>> {
        let rows = sqlx::query("SELECT * FROM debates ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_debate).collect()
    }

    async fn search_debates(&self, query: &str, limit: i64) -> Result<Vec<Debate>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let rows = sqlx::query(
            "SELECT * FROM debates \
             WHERE lower(title) LIKE ?1 OR lower(category) LIKE ?1 OR lower(tags) LIKE ?1 \
             ORDER BY created_at DESC LIMIT ?2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(row_to_debate).collect()
    }

    async fn expired_active_debates(&self, now: DateTime<Utc>) -> Result<Vec<Debate>> {
        let rows = sqlx::query(
            "SELECT * FROM debates WHERE status = 'active' AND ends_at <= ? ORDER BY ends_at ASC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(row_to_debate).collect()
    }

    /// The status guard makes closing idempotent: a second sweep (or a
    /// concurrent one) matches zero rows and reports false.
    async fn close_debate(&self, id: Uuid, winner: Option<Side>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE debates SET status = 'closed', winner = ? WHERE id = ? AND status = 'active'",
        )
        .bind(winner.map(|side| side.as_str()))
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn side_tally(&self, debate_id: Uuid) -> Result<SideTally> {
        let row = sqlx::query(
            "SELECT \
               COALESCE(SUM(CASE WHEN side = 'support' THEN vote_count ELSE 0 END), 0) AS support_votes, \
               COALESCE(SUM(CASE WHEN side = 'oppose' THEN vote_count ELSE 0 END), 0) AS oppose_votes, \
               COUNT(id) AS argument_count \
             FROM arguments WHERE debate_id = ?",
        )
        .bind(uuid_to_blob(debate_id))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(SideTally {
            support_votes: row.get("support_votes"),
            oppose_votes: row.get("oppose_votes"),
            argument_count: row.get("argument_count"),
        })
    }

    /// Participant link plus SideChoice in one transaction: either both
    /// records exist afterwards or neither does. The link insert is
    /// idempotent; the SideChoice primary key rejects a second join.
    async fn join_debate(&self, debate_id: Uuid, user_id: Uuid, side: Side) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT OR IGNORE INTO participants (debate_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(uuid_to_blob(debate_id))
        .bind(uuid_to_blob(user_id))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query("INSERT INTO side_choices (debate_id, user_id, side) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(debate_id))
            .bind(uuid_to_blob(user_id))
            .bind(side.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| unique_conflict(e, "already joined this debate"))?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn side_choice(&self, debate_id: Uuid, user_id: Uuid) -> Result<Option<Side>> {
        let row = sqlx::query("SELECT side FROM side_choices WHERE debate_id = ? AND user_id = ?")
            .bind(uuid_to_blob(debate_id))
            .bind(uuid_to_blob(user_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(|row| parse_side(&row.get::<String, _>("side")))
            .transpose()
    }

    async fn create_argument(&self, argument: &Argument) -> Result<()> {
        sqlx::query(
            "INSERT INTO arguments (id, debate_id, author_id, side, content, created_at, vote_count) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(argument.id))
        .bind(uuid_to_blob(argument.debate_id))
        .bind(uuid_to_blob(argument.author_id))
        .bind(argument.side.as_str())
        .bind(&argument.content)
        .bind(argument.created_at)
        .bind(argument.vote_count)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn argument(&self, id: Uuid) -> Result<Option<Argument>> {
        let row = sqlx::query("SELECT * FROM arguments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_argument).transpose()
    }

    async fn arguments_for_debate(&self, debate_id: Uuid) -> Result<Vec<Argument>> {
        let rows = sqlx::query("SELECT * FROM arguments WHERE debate_id = ? ORDER BY created_at ASC")
            .bind(uuid_to_blob(debate_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_argument).collect()
    }

    async fn update_argument_content(&self, id: Uuid, content: &str) -> Result<()> {
        let result = sqlx::query("UPDATE arguments SET content = ? WHERE id = ?")
            .bind(content)
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("argument", id));
        }
        Ok(())
    }

    /// Removes the argument and its votes in one transaction, so a
    /// half-deleted argument can never be observed.
    async fn delete_argument(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM votes WHERE argument_id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let result = sqlx::query("DELETE FROM arguments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("argument", id));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    /// Vote row and counter increment commit together or not at all.
    /// A duplicate hits the UNIQUE (argument_id, user_id) constraint
    /// before the counter moves.
    async fn record_vote(&self, vote: &Vote) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("INSERT INTO votes (id, argument_id, user_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(vote.id))
            .bind(uuid_to_blob(vote.argument_id))
            .bind(uuid_to_blob(vote.user_id))
            .bind(vote.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| unique_conflict(e, "already voted on this argument"))?;

        let result = sqlx::query("UPDATE arguments SET vote_count = vote_count + 1 WHERE id = ?")
            .bind(uuid_to_blob(vote.argument_id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the vote row back
            return Err(DomainError::not_found("argument", vote.argument_id));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, created_at) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        )
        .bind(uuid_to_blob(user.id))
        .bind(&user.name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn leaderboard(&self, since: Option<DateTime<Utc>>) -> Result<Vec<LeaderboardEntry>> {
        let rows = match since {
            // Windowed: the inner join drops users without votes in range.
            Some(since) => {
                sqlx::query(
                    "SELECT u.id, u.name, COUNT(v.id) AS total_votes, \
                       (SELECT COUNT(*) FROM participants p WHERE p.user_id = u.id) AS debates_count \
                     FROM users u \
                     JOIN arguments a ON a.author_id = u.id \
                     JOIN votes v ON v.argument_id = a.id AND v.created_at >= ? \
                     GROUP BY u.id, u.name \
                     ORDER BY total_votes DESC, u.created_at ASC",
                )
                .bind(since)
                .fetch_all(&self.pool)
                .await
            }
            // All time: zero-vote users stay on the board.
            None => {
                sqlx::query(
                    "SELECT u.id, u.name, \
                       (SELECT COUNT(*) FROM votes v JOIN arguments a \
                          ON v.argument_id = a.id WHERE a.author_id = u.id) AS total_votes, \
                       (SELECT COUNT(*) FROM participants p WHERE p.user_id = u.id) AS debates_count \
                     FROM users u \
                     ORDER BY total_votes DESC, u.created_at ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| LeaderboardEntry {
                user_id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
                name: row.get("name"),
                total_votes: row.get("total_votes"),
                debates_count: row.get("debates_count"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn repo() -> SqliteDebateRepo {
        SqliteDebateRepo::in_memory().await.unwrap()
    }

    async fn seed_user(repo: &SqliteDebateRepo, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        repo.upsert_user(&User {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
        id
    }

    async fn seed_debate(repo: &SqliteDebateRepo, creator_id: Uuid, ends_in: Duration) -> Debate {
        let now = Utc::now();
        let debate = Debate {
            id: Uuid::now_v7(),
            title: "Pineapple belongs on pizza".to_string(),
            description: "The culinary question".to_string(),
            tags: vec!["food".to_string(), "pizza".to_string()],
            category: "culture".to_string(),
            image_url: None,
            duration_hours: 24,
            creator_id,
            created_at: now,
            ends_at: now + ends_in,
            status: DebateStatus::Active,
            winner: None,
        };
        repo.create_debate(&debate).await.unwrap();
        debate
    }

    async fn seed_argument(
        repo: &SqliteDebateRepo,
        debate_id: Uuid,
        author_id: Uuid,
        side: Side,
    ) -> Argument {
        let argument = Argument {
            id: Uuid::now_v7(),
            debate_id,
            author_id,
            side,
            content: "Sweet and savory belong together".to_string(),
            created_at: Utc::now(),
            vote_count: 0,
        };
        repo.create_argument(&argument).await.unwrap();
        argument
    }

    async fn cast_vote(repo: &SqliteDebateRepo, argument_id: Uuid, user_id: Uuid) -> Result<()> {
        repo.record_vote(&Vote {
            id: Uuid::now_v7(),
            argument_id,
            user_id,
            created_at: Utc::now(),
        })
        .await
    }

    async fn vote_rows(repo: &SqliteDebateRepo, argument_id: Uuid) -> i64 {
        sqlx::query("SELECT COUNT(*) AS n FROM votes WHERE argument_id = ?")
            .bind(uuid_to_blob(argument_id))
            .fetch_one(&repo.pool)
            .await
            .unwrap()
            .get("n")
    }

    #[tokio::test]
    async fn debate_round_trips_with_tags() {
        let repo = repo().await;
        let creator = seed_user(&repo, "ada").await;
        let debate = seed_debate(&repo, creator, Duration::hours(24)).await;

        let fetched = repo.debate(debate.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, debate.id);
        assert_eq!(fetched.title, debate.title);
        assert_eq!(fetched.tags, vec!["food", "pizza"]);
        assert_eq!(fetched.status, DebateStatus::Active);
        assert_eq!(fetched.winner, None);
        assert_eq!(fetched.ends_at, debate.ends_at);
    }

    #[tokio::test]
    async fn second_side_choice_is_rejected_by_constraint() {
        let repo = repo().await;
        let user = seed_user(&repo, "ada").await;
        let debate = seed_debate(&repo, user, Duration::hours(1)).await;

        repo.join_debate(debate.id, user, Side::Support).await.unwrap();
        let err = repo
            .join_debate(debate.id, user, Side::Oppose)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // The committed choice is untouched
        let side = repo.side_choice(debate.id, user).await.unwrap();
        assert_eq!(side, Some(Side::Support));

        // And the rolled-back transaction left a single participant row
        let row = sqlx::query("SELECT COUNT(*) AS n FROM participants WHERE debate_id = ?")
            .bind(uuid_to_blob(debate.id))
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(row.get::<i64, _>("n"), 1);
    }

    #[tokio::test]
    async fn participant_link_insert_is_idempotent() {
        let repo = repo().await;
        let user = seed_user(&repo, "ada").await;
        let debate = seed_debate(&repo, user, Duration::hours(1)).await;

        // A link that already exists must not make the join error
        sqlx::query("INSERT INTO participants (debate_id, user_id, joined_at) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(debate.id))
            .bind(uuid_to_blob(user))
            .bind(Utc::now())
            .execute(&repo.pool)
            .await
            .unwrap();

        repo.join_debate(debate.id, user, Side::Oppose).await.unwrap();
        assert_eq!(
            repo.side_choice(debate.id, user).await.unwrap(),
            Some(Side::Oppose)
        );
    }

    #[tokio::test]
    async fn duplicate_vote_conflicts_and_counter_stays_consistent() {
        let repo = repo().await;
        let author = seed_user(&repo, "ada").await;
        let voter = seed_user(&repo, "lin").await;
        let debate = seed_debate(&repo, author, Duration::hours(1)).await;
        let argument = seed_argument(&repo, debate.id, author, Side::Support).await;

        cast_vote(&repo, argument.id, voter).await.unwrap();
        let err = cast_vote(&repo, argument.id, voter).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Counter equals the vote row count after both attempts
        assert_eq!(vote_rows(&repo, argument.id).await, 1);
        let stored = repo.argument(argument.id).await.unwrap().unwrap();
        assert_eq!(stored.vote_count, 1);
    }

    #[tokio::test]
    async fn delete_argument_cascades_votes() {
        let repo = repo().await;
        let author = seed_user(&repo, "ada").await;
        let voter = seed_user(&repo, "lin").await;
        let debate = seed_debate(&repo, author, Duration::hours(1)).await;
        let argument = seed_argument(&repo, debate.id, author, Side::Support).await;
        cast_vote(&repo, argument.id, voter).await.unwrap();

        repo.delete_argument(argument.id).await.unwrap();
        assert!(repo.argument(argument.id).await.unwrap().is_none());
        assert_eq!(vote_rows(&repo, argument.id).await, 0);

        let err = repo.delete_argument(argument.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn close_debate_is_idempotent_and_records_winner() {
        let repo = repo().await;
        let creator = seed_user(&repo, "ada").await;
        let debate = seed_debate(&repo, creator, Duration::minutes(-5)).await;

        assert!(repo.close_debate(debate.id, Some(Side::Oppose)).await.unwrap());
        let closed = repo.debate(debate.id).await.unwrap().unwrap();
        assert_eq!(closed.status, DebateStatus::Closed);
        assert_eq!(closed.winner, Some(Side::Oppose));

        // Second close is a no-op
        assert!(!repo.close_debate(debate.id, None).await.unwrap());
        let unchanged = repo.debate(debate.id).await.unwrap().unwrap();
        assert_eq!(unchanged.winner, Some(Side::Oppose));

        // Missing debate is a no-op, not an error
        assert!(!repo.close_debate(Uuid::now_v7(), None).await.unwrap());
    }

    #[tokio::test]
    async fn expired_active_debates_finds_overdue_only() {
        let repo = repo().await;
        let creator = seed_user(&repo, "ada").await;
        let overdue = seed_debate(&repo, creator, Duration::minutes(-10)).await;
        let _running = seed_debate(&repo, creator, Duration::hours(2)).await;

        let due = repo.expired_active_debates(Utc::now()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, overdue.id);

        repo.close_debate(overdue.id, None).await.unwrap();
        assert!(repo.expired_active_debates(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn side_tally_sums_per_side_vote_counters() {
        let repo = repo().await;
        let ada = seed_user(&repo, "ada").await;
        let lin = seed_user(&repo, "lin").await;
        let kim = seed_user(&repo, "kim").await;
        let debate = seed_debate(&repo, ada, Duration::hours(1)).await;
        let for_it = seed_argument(&repo, debate.id, ada, Side::Support).await;
        let against = seed_argument(&repo, debate.id, lin, Side::Oppose).await;

        cast_vote(&repo, for_it.id, lin).await.unwrap();
        cast_vote(&repo, against.id, ada).await.unwrap();
        cast_vote(&repo, against.id, kim).await.unwrap();

        let tally = repo.side_tally(debate.id).await.unwrap();
        assert_eq!(tally.support_votes, 1);
        assert_eq!(tally.oppose_votes, 2);
        assert_eq!(tally.argument_count, 2);

        // Empty debate tallies to zero
        let empty = seed_debate(&repo, ada, Duration::hours(1)).await;
        assert_eq!(repo.side_tally(empty.id).await.unwrap(), SideTally::default());
    }

    #[tokio::test]
    async fn leaderboard_windows_votes_but_not_joins() {
        let repo = repo().await;
        let author = seed_user(&repo, "ada").await;
        let voter = seed_user(&repo, "lin").await;
        let idle = seed_user(&repo, "kim").await;
        let debate = seed_debate(&repo, author, Duration::hours(1)).await;
        repo.join_debate(debate.id, author, Side::Support).await.unwrap();
        let argument = seed_argument(&repo, debate.id, author, Side::Support).await;

        // One fresh vote, one from ten days ago
        cast_vote(&repo, argument.id, voter).await.unwrap();
        repo.record_vote(&Vote {
            id: Uuid::now_v7(),
            argument_id: argument.id,
            user_id: idle,
            created_at: Utc::now() - Duration::days(10),
        })
        .await
        .unwrap();

        let all = repo.leaderboard(None).await.unwrap();
        let ada_all = all.iter().find(|e| e.user_id == author).unwrap();
        assert_eq!(ada_all.total_votes, 2);
        assert_eq!(ada_all.debates_count, 1);
        // Zero-vote users are present for the all-time board
        assert!(all.iter().any(|e| e.user_id == idle && e.total_votes == 0));
        assert_eq!(all[0].user_id, author);

        let weekly = repo
            .leaderboard(Some(Utc::now() - Duration::days(7)))
            .await
            .unwrap();
        let ada_weekly = weekly.iter().find(|e| e.user_id == author).unwrap();
        assert_eq!(ada_weekly.total_votes, 1);
        // Joins are lifetime regardless of the vote window
        assert_eq!(ada_weekly.debates_count, 1);
        // Zero-vote users are dropped from windowed boards
        assert!(!weekly.iter().any(|e| e.user_id == idle));
        assert!(!weekly.iter().any(|e| e.user_id == voter));
    }

    #[tokio::test]
    async fn search_matches_title_category_and_tag() {
        let repo = repo().await;
        let creator = seed_user(&repo, "ada").await;
        let debate = seed_debate(&repo, creator, Duration::hours(1)).await;

        for query in ["PINEAPPLE", "culture", "pizza"] {
            let hits = repo.search_debates(query, 20).await.unwrap();
            assert_eq!(hits.len(), 1, "query {query:?} should match");
            assert_eq!(hits[0].id, debate.id);
        }
        assert!(repo.search_debates("quantum", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_argument_content_replaces_content_only() {
        let repo = repo().await;
        let author = seed_user(&repo, "ada").await;
        let voter = seed_user(&repo, "lin").await;
        let debate = seed_debate(&repo, author, Duration::hours(1)).await;
        let argument = seed_argument(&repo, debate.id, author, Side::Support).await;
        cast_vote(&repo, argument.id, voter).await.unwrap();

        repo.update_argument_content(argument.id, "A better phrasing entirely")
            .await
            .unwrap();
        let stored = repo.argument(argument.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "A better phrasing entirely");
        assert_eq!(stored.side, Side::Support);
        assert_eq!(stored.vote_count, 1);

        let err = repo
            .update_argument_content(Uuid::now_v7(), "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
